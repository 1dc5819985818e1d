use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::models::ValidatedMessage;
use crate::utils::is_valid_event_time;

pub const MAX_TEXT_CHARS: usize = 4096;

lazy_static! {
    /// E.164-like: a plus sign followed by one or more ASCII digits.
    static ref MSISDN_RE: Regex = Regex::new(r"^\+[0-9]+$").expect("valid MSISDN regex");
}

/// Why a payload was rejected. Logged server side only; callers get a single generic 422.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationErrorDetail {
    #[error("body is not valid JSON: {0}")]
    MalformedJson(String),

    #[error("top-level JSON value is not an object")]
    NotAnObject,

    #[error("payload does not match schema: {0}")]
    Schema(String),

    #[error("message_id must not be empty")]
    EmptyMessageId,

    #[error("{field} is not a valid MSISDN")]
    InvalidMsisdn { field: &'static str },

    #[error("ts must be YYYY-MM-DDTHH:MM:SSZ")]
    InvalidTimestamp,

    #[error("text exceeds 4096 characters ({0})")]
    TextTooLong(usize),
}

#[derive(Debug, Deserialize)]
struct WebhookPayload {
    message_id: String,
    from: String,
    to: String,
    ts: String,
    #[serde(default)]
    text: Option<String>,
}

/// Parses the raw webhook body and applies every field rule.
pub fn parse_and_validate(raw_body: &[u8]) -> Result<ValidatedMessage, ValidationErrorDetail> {
    let value: Value = serde_json::from_slice(raw_body)
        .map_err(|e| ValidationErrorDetail::MalformedJson(e.to_string()))?;

    if !value.is_object() {
        return Err(ValidationErrorDetail::NotAnObject);
    }

    let payload: WebhookPayload = serde_json::from_value(value)
        .map_err(|e| ValidationErrorDetail::Schema(e.to_string()))?;

    validate_payload(payload)
}

fn validate_payload(payload: WebhookPayload) -> Result<ValidatedMessage, ValidationErrorDetail> {
    if payload.message_id.is_empty() {
        return Err(ValidationErrorDetail::EmptyMessageId);
    }
    if !is_valid_msisdn(&payload.from) {
        return Err(ValidationErrorDetail::InvalidMsisdn { field: "from" });
    }
    if !is_valid_msisdn(&payload.to) {
        return Err(ValidationErrorDetail::InvalidMsisdn { field: "to" });
    }
    if !is_valid_event_time(&payload.ts) {
        return Err(ValidationErrorDetail::InvalidTimestamp);
    }
    if let Some(text) = &payload.text {
        let chars = text.chars().count();
        if chars > MAX_TEXT_CHARS {
            return Err(ValidationErrorDetail::TextTooLong(chars));
        }
    }

    Ok(ValidatedMessage {
        message_id: payload.message_id,
        from_msisdn: payload.from,
        to_msisdn: payload.to,
        ts: payload.ts,
        text: payload.text,
    })
}

pub fn is_valid_msisdn(raw: &str) -> bool {
    MSISDN_RE.is_match(raw)
}

/// Best-effort `message_id` extraction for logging rejected requests.
pub fn peek_message_id(raw_body: &[u8]) -> Option<String> {
    serde_json::from_slice::<Value>(raw_body)
        .ok()?
        .get("message_id")?
        .as_str()
        .map(|s| s.to_string())
}
