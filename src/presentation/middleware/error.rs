use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::domain::repositories::RepositoryError;
use crate::presentation::middleware::auth::TokenError;

/// Application error types that can be converted to HTTP responses
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{message}")]
    Authentication { message: String },

    #[error("{message}")]
    Authorization { message: String },

    #[error("{message}")]
    NotFound { message: String },

    #[error("{message}")]
    Conflict { message: String },

    #[error("Rate limit exceeded. Please try again later.")]
    RateLimit,

    #[error("{message}")]
    BadRequest { message: String },

    #[error("Database error: {message}")]
    Database { message: String },

    #[error("Internal server error: {message}")]
    Internal { message: String },
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Authentication { .. } => StatusCode::UNAUTHORIZED,
            AppError::Authorization { .. } => StatusCode::FORBIDDEN,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::RateLimit => StatusCode::TOO_MANY_REQUESTS,
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Database { .. } | AppError::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the error type for logging and metrics
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::Authentication { .. } => "authentication",
            AppError::Authorization { .. } => "authorization",
            AppError::NotFound { .. } => "not_found",
            AppError::Conflict { .. } => "conflict",
            AppError::RateLimit => "rate_limit",
            AppError::BadRequest { .. } => "bad_request",
            AppError::Database { .. } => "database",
            AppError::Internal { .. } => "internal",
        }
    }

    /// Check if this error should be logged as an error (vs warning)
    pub fn should_log_as_error(&self) -> bool {
        matches!(self, AppError::Database { .. } | AppError::Internal { .. })
    }

    /// Message safe to expose to clients
    ///
    /// Internal faults are reported generically; the original cause stays in
    /// the logs.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Database { .. } | AppError::Internal { .. } => {
                "Internal server error".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if self.should_log_as_error() {
            error!(error_type = self.error_type(), "Application error: {}", self);
        } else {
            warn!(error_type = self.error_type(), "Application warning: {}", self);
        }

        let body = json!({
            "status": status.as_u16(),
            "message": self.public_message(),
        });

        (status, Json(body)).into_response()
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Database(message) => AppError::Database { message },
            RepositoryError::UnsearchableField(field) => {
                AppError::BadRequest { message: format!("Field not searchable: {field}") }
            }
        }
    }
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Encoding(message) => AppError::Internal { message },
            TokenError::Invalid => AppError::Authorization {
                message: "Invalid token or expired token.".to_string(),
            },
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database { message: err.to_string() }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::BadRequest { message: format!("Invalid JSON: {err}") }
    }
}
