pub mod messages;
pub mod stats;

use axum::{routing::get, Router};
use std::sync::Arc;

use crate::state::AppState;

pub use messages::{list_messages, ListMessagesParams, ListMessagesResponse};
pub use stats::get_stats;

/// Read-only endpoints over the stored messages
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/messages", get(list_messages))
        .route("/stats", get(get_stats))
}
