pub mod handlers;
pub mod routes;
pub mod signature;
pub mod validation;

// Re-export main components
pub use handlers::{post_webhook, WebhookOutcome, WebhookResult};
pub use routes::create_webhook_router;
pub use signature::{sign, SignatureVerifier, SIGNATURE_HEADER};
pub use validation::{parse_and_validate, ValidationErrorDetail};
