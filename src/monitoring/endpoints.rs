use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tracing::warn;

use crate::state::AppState;

/// Create monitoring router with metrics and health endpoints
pub fn monitoring_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health/live", get(liveness_check))
        .route("/health/ready", get(readiness_check))
        .route("/metrics", get(prometheus_metrics))
}

/// Liveness probe: if we can respond, we're alive
async fn liveness_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({})))
}

/// Readiness probe: needs a webhook secret and a reachable `messages` table
async fn readiness_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let secret_ok = state.verifier.is_configured();
    let db_ok = state.store.is_ready().await;

    if secret_ok && db_ok {
        (StatusCode::OK, Json(json!({})))
    } else {
        warn!(secret_ok, db_ok, "⚠️ Readiness check failed");
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "detail": "not ready" })),
        )
    }
}

/// Prometheus-format metrics endpoint
async fn prometheus_metrics() -> impl IntoResponse {
    crate::observability::metrics_handler().await
}
