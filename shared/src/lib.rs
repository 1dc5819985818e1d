//! Shared library for the inbox service
//!
//! Holds the pieces every binary and crate of the workspace agrees on:
//! - Typed configuration loaded from the environment
//! - The application error type and its HTTP mapping

pub mod config;
pub mod error;

// Re-export commonly used types
pub use config::{AppConfig, Config, DatabaseConfig, LogFormat, WebhookConfig};
pub use error::{AppError, ErrorResponse};
