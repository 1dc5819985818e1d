use axum::{extract::State, Json};
use shared::AppError;
use std::sync::Arc;

use crate::models::StatsReport;
use crate::state::AppState;

/// GET /stats
pub async fn get_stats(State(state): State<Arc<AppState>>) -> Result<Json<StatsReport>, AppError> {
    let stats = state.store.stats().await?;
    Ok(Json(stats))
}
