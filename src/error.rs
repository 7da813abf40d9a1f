//! Error types for the cache layer
//!
//! Provides unified error handling using thiserror.
//!
//! These errors are internal to the cache. Failures of caller-supplied
//! fetch/update functions never pass through here; strategies hand them back
//! to the caller untouched.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for cache-internal failures.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key is empty, too long, or contains a wildcard
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Invalidation pattern cannot be compiled
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    /// Value could not be converted to or from its cached form
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::InvalidKey(_) | CacheError::InvalidPattern(_) => StatusCode::BAD_REQUEST,
            CacheError::Serialization(_) | CacheError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for cache-internal operations.
pub type Result<T> = std::result::Result<T, CacheError>;
