//! Common error types for Mixtape

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Common result type for Mixtape operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across Mixtape microservices
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Request-level error returned by HTTP handlers.
///
/// Every variant maps to one status code; the body is always
/// `{"message": "..."}` so the front-end can render it directly.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing/blank required field, or a rejected precondition that the
    /// caller can fix (self-friend, self-share, duplicate playlist name)
    #[error("{0}")]
    BadRequest(String),

    /// Invalid credentials
    #[error("{0}")]
    Unauthorized(String),

    /// Referenced entity absent in its owning service
    #[error("{0}")]
    NotFound(String),

    /// Duplicate friendship/share/registration
    #[error("{0}")]
    Conflict(String),

    /// A downstream service could not answer an existence check.
    /// The gated mutation must not proceed without a confirmed precondition.
    #[error("Upstream service unavailable: {0}")]
    Dependency(String),

    /// Local store failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ApiError {
    /// Reject a request body field that was omitted or left blank
    pub fn missing_field(name: &str) -> Self {
        ApiError::BadRequest(format!("Missing required field: {}", name))
    }

    /// Unwrap a required request field, rejecting absent or blank values
    pub fn require(value: Option<String>, name: &str) -> std::result::Result<String, ApiError> {
        match value {
            Some(v) if !v.trim().is_empty() => Ok(v),
            _ => Err(ApiError::missing_field(name)),
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Dependency(_) => StatusCode::BAD_GATEWAY,
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("request failed: {}", self);
        }
        let body = Json(json!({
            "message": self.to_string(),
        }));
        (status, body).into_response()
    }
}
