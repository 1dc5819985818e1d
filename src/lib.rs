use axum::{extract::DefaultBodyLimit, middleware as axum_middleware, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod db;
pub mod models;
pub mod monitoring;
pub mod observability;
pub mod state;
pub mod utils;
pub mod webhook;

use api::create_api_router;
use monitoring::monitoring_router;
use observability::request_recording_middleware;
use state::AppState;
use webhook::create_webhook_router;

pub fn create_app_router(app_state: Arc<AppState>) -> Router {
    let max_body_bytes = app_state.config.app.max_body_bytes;

    Router::new()
        // Webhook de entrada (firmado)
        .merge(create_webhook_router())
        // Consultas y estadísticas
        .merge(create_api_router())
        // Health checks y /metrics de Prometheus
        .merge(monitoring_router())
        .with_state(app_state)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(axum_middleware::from_fn(request_recording_middleware))
        .layer(TraceLayer::new_for_http())
}
