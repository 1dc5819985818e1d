//! Error handling shared by every HTTP surface of the service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Body of every error response. Deliberately minimal: no signatures, SQL or schema details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("invalid signature")]
    InvalidSignature,

    #[error("Validation error: {detail}")]
    Validation { detail: String },

    #[error("Storage unavailable: {message}")]
    StorageUnavailable { message: String },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl AppError {
    pub fn validation(detail: impl Into<String>) -> Self {
        Self::Validation {
            detail: detail.into(),
        }
    }

    pub fn storage_unavailable(message: impl Into<String>) -> Self {
        Self::StorageUnavailable {
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidSignature => StatusCode::UNAUTHORIZED,
            AppError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::StorageUnavailable { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::InvalidSignature => "INVALID_SIGNATURE",
            AppError::Validation { .. } => "VALIDATION_ERROR",
            AppError::StorageUnavailable { .. } => "STORAGE_UNAVAILABLE",
            AppError::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Text that is safe to hand back to the caller.
    pub fn public_detail(&self) -> String {
        match self {
            AppError::InvalidSignature => "invalid signature".to_string(),
            AppError::Validation { detail } => detail.clone(),
            AppError::StorageUnavailable { .. } | AppError::Database(_) => {
                "internal error".to_string()
            }
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if self.is_client_error() {
            tracing::debug!("Client error: {} - {}", self.error_code(), self);
        } else {
            tracing::error!("API Error: {} - {}", self.error_code(), self);
        }

        let body = ErrorResponse {
            detail: self.public_detail(),
        };
        (status, Json(body)).into_response()
    }
}
