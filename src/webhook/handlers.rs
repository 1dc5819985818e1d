// ============================================================================
// WEBHOOK HANDLER - POST /webhook
// ============================================================================

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use shared::AppError;
use std::sync::Arc;
use tracing::{info, warn};

use crate::models::InsertOutcome;
use crate::observability::record_webhook_result;
use crate::state::AppState;
use crate::webhook::signature::SIGNATURE_HEADER;
use crate::webhook::validation::{parse_and_validate, peek_message_id};

/// Result label of a webhook call, as exported in `webhook_requests_total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookResult {
    Created,
    Duplicate,
    InvalidSignature,
    ValidationError,
    InternalError,
}

impl WebhookResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            WebhookResult::Created => "created",
            WebhookResult::Duplicate => "duplicate",
            WebhookResult::InvalidSignature => "invalid_signature",
            WebhookResult::ValidationError => "validation_error",
            WebhookResult::InternalError => "internal_error",
        }
    }
}

impl From<InsertOutcome> for WebhookResult {
    fn from(outcome: InsertOutcome) -> Self {
        match outcome {
            InsertOutcome::Created => WebhookResult::Created,
            InsertOutcome::Duplicate => WebhookResult::Duplicate,
        }
    }
}

/// Attached to the response so the request recorder can log it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookOutcome {
    pub message_id: Option<String>,
    pub result: WebhookResult,
}

impl WebhookOutcome {
    pub fn dup(&self) -> bool {
        self.result == WebhookResult::Duplicate
    }
}

/// Verifies, validates and stores one inbound message.
///
/// Duplicates are acknowledged exactly like new messages so senders stop retrying.
pub async fn post_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok());

    if !state.verifier.verify(&body, signature) {
        warn!(
            has_signature = signature.is_some(),
            "🔒 Webhook rejected: invalid signature"
        );
        return with_outcome(
            AppError::InvalidSignature.into_response(),
            None,
            WebhookResult::InvalidSignature,
        );
    }

    let message = match parse_and_validate(&body) {
        Ok(message) => message,
        Err(detail) => {
            let message_id = peek_message_id(&body);
            warn!(message_id = ?message_id, reason = %detail, "❌ Webhook payload rejected");
            return with_outcome(
                AppError::validation("validation error").into_response(),
                message_id,
                WebhookResult::ValidationError,
            );
        }
    };

    let message_id = message.message_id().to_string();
    match state.store.insert(&message).await {
        Ok(outcome) => {
            info!(message_id = %message_id, outcome = outcome.as_str(), "📩 Webhook message stored");
            with_outcome(
                (StatusCode::OK, Json(json!({ "status": "ok" }))).into_response(),
                Some(message_id),
                outcome.into(),
            )
        }
        Err(err) => with_outcome(err.into_response(), Some(message_id), WebhookResult::InternalError),
    }
}

fn with_outcome(mut response: Response, message_id: Option<String>, result: WebhookResult) -> Response {
    record_webhook_result(result.as_str());
    response
        .extensions_mut()
        .insert(WebhookOutcome { message_id, result });
    response
}
