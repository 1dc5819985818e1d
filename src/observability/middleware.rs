// ============================================================================
// MIDDLEWARE PARA LOGS Y MÉTRICAS POR REQUEST
// ============================================================================

use axum::{
    extract::{MatchedPath, Request},
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::info;

use crate::observability::record_http_request;
use crate::utils::get_request_id;
use crate::webhook::WebhookOutcome;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Per-request record, emitted when dropped.
///
/// Status starts at 500 and is only overwritten once a response exists, so a
/// handler that panics or a cancelled request is still logged and counted.
struct RequestRecord {
    request_id: String,
    method: String,
    path: String,
    route: String,
    started: Instant,
    status: u16,
    webhook: Option<WebhookOutcome>,
}

impl Drop for RequestRecord {
    fn drop(&mut self) {
        let elapsed = self.started.elapsed();
        let latency_ms = elapsed.as_secs_f64() * 1000.0;

        record_http_request(&self.route, self.status, elapsed.as_secs_f64());

        match &self.webhook {
            Some(outcome) => info!(
                request_id = %self.request_id,
                method = %self.method,
                path = %self.path,
                status = self.status,
                latency_ms,
                message_id = outcome.message_id.as_deref().unwrap_or(""),
                dup = outcome.dup(),
                result = outcome.result.as_str(),
                "request completed"
            ),
            None => info!(
                request_id = %self.request_id,
                method = %self.method,
                path = %self.path,
                status = self.status,
                latency_ms,
                "request completed"
            ),
        }
    }
}

/// Middleware que registra un log estructurado y métricas para cada request
pub async fn request_recording_middleware(req: Request, next: Next) -> Response {
    let request_id = get_request_id(req.headers());
    // Label por ruta registrada para no explotar la cardinalidad
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let mut record = RequestRecord {
        request_id: request_id.clone(),
        method: req.method().to_string(),
        path: req.uri().path().to_string(),
        route,
        started: Instant::now(),
        status: 500,
        webhook: None,
    };

    let mut response = next.run(req).await;

    record.status = response.status().as_u16();
    record.webhook = response.extensions_mut().remove::<WebhookOutcome>();

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
