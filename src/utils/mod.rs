// Utils module for utility functions
use axum::http::HeaderMap;
use uuid::Uuid;

pub mod time;

pub use time::{is_valid_event_time, now_timestamp, EVENT_TIME_FORMAT};

// Request ID from the `x-request-id` header, or a fresh one
pub fn get_request_id(headers: &HeaderMap) -> String {
    headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .unwrap_or_else(|| Uuid::new_v4().simple().to_string())
}
