//! API error handling
//!
//! One taxonomy for the whole HTTP surface. Every variant maps to a stable
//! status and body; nothing here is retried internally. Login failure is a
//! single variant on purpose: an unknown email and a wrong password must be
//! indistinguishable to the caller.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// API error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// Error code
    pub code: String,
    /// Human-readable message
    pub message: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn not_found(resource: &str) -> Self {
        Self::new("NOT_FOUND", format!("{resource} not found"))
    }

    pub fn invalid_credentials() -> Self {
        Self::new("INVALID_CREDENTIALS", "Invalid email or password")
    }

    pub fn unauthorized() -> Self {
        Self::new("UNAUTHORIZED", "Access token required")
    }

    pub fn forbidden() -> Self {
        Self::new("FORBIDDEN", "Invalid token")
    }

    pub fn internal_error() -> Self {
        Self::new("INTERNAL_ERROR", "Internal server error")
    }
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// Malformed or missing input, user-correctable
    Validation(String),
    /// Registration conflict on the email unique index
    DuplicateEmail,
    /// Login failure; deliberately the same for unknown email and wrong password
    InvalidCredentials,
    /// No bearer token presented
    Unauthorized,
    /// Bearer token presented but invalid or expired
    Forbidden,
    /// Referenced identity vanished between token issuance and use
    NotFound(String),
    /// Backing store unreachable or failing
    Storage(String),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, ApiError::new("VALIDATION_ERROR", msg))
            }
            AppError::DuplicateEmail => (
                StatusCode::BAD_REQUEST,
                ApiError::new("DUPLICATE_EMAIL", "User already exists with this email"),
            ),
            AppError::InvalidCredentials => {
                (StatusCode::BAD_REQUEST, ApiError::invalid_credentials())
            }
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, ApiError::unauthorized()),
            AppError::Forbidden => (StatusCode::FORBIDDEN, ApiError::forbidden()),
            AppError::NotFound(resource) => {
                (StatusCode::NOT_FOUND, ApiError::not_found(&resource))
            }
            AppError::Storage(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("STORAGE_ERROR", "Storage operation failed").with_details(msg),
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::internal_error().with_details(msg),
            ),
        };

        (status, Json(error)).into_response()
    }
}

impl From<crate::auth::repository::RepositoryError> for AppError {
    fn from(err: crate::auth::repository::RepositoryError) -> Self {
        use crate::auth::repository::RepositoryError;

        match err {
            RepositoryError::EmailAlreadyExists => AppError::DuplicateEmail,
            RepositoryError::UserNotFound => AppError::NotFound("User".to_string()),
            RepositoryError::Database(e) => AppError::Storage(e.to_string()),
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}
