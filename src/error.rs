//! Error types for the key-value façade
//!
//! Only infrastructure failures travel through this type. "Not found" and
//! "already exists" are ordinary outcomes, see [`crate::coordinator::Outcome`].

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Store Error Enum ==
/// Unified error type for the façade.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Cache backend unreachable or timed out
    #[error("Cache backend unavailable: {0}")]
    CacheUnavailable(String),

    /// Durable backend unreachable or timed out
    #[error("Durable store unavailable: {0}")]
    DurableUnavailable(String),

    /// A backend handed back something that is not valid JSON
    #[error("Corrupt entry for key '{key}': {reason}")]
    CorruptEntry { key: String, reason: String },

    /// Request body is not valid JSON
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// Key rejected before reaching the stores
    #[error("Invalid key: {0}")]
    InvalidKey(String),
}

impl StoreError {
    /// True for backend failures, as opposed to rejected client input.
    pub fn is_infrastructure(&self) -> bool {
        !matches!(
            self,
            StoreError::MalformedPayload(_) | StoreError::InvalidKey(_)
        )
    }
}

impl From<redis::RedisError> for StoreError {
    fn from(err: redis::RedisError) -> Self {
        StoreError::CacheUnavailable(err.to_string())
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::DurableUnavailable(err.to_string())
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        let status = match &self {
            StoreError::MalformedPayload(_) | StoreError::InvalidKey(_) => StatusCode::BAD_REQUEST,
            StoreError::CacheUnavailable(_)
            | StoreError::DurableUnavailable(_)
            | StoreError::CorruptEntry { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = if self.is_infrastructure() {
            format!("Unexpected error occurred: {}", self)
        } else {
            self.to_string()
        };

        let body = Json(ErrorResponse::new(message));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the façade.
pub type Result<T> = std::result::Result<T, StoreError>;
