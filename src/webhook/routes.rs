use crate::state::AppState;
use axum::{routing::post, Router};
use std::sync::Arc;

use super::handlers::post_webhook;

/// Creates the router for the inbound webhook
pub fn create_webhook_router() -> Router<Arc<AppState>> {
    Router::new().route("/webhook", post(post_webhook))
}
