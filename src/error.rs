//! Error types for the cache
//!
//! Lookups never fail; these cover the diagnostics surface and the few
//! fallible helpers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
#[derive(Error, Debug)]
pub enum CacheError {
    /// Namespace name not in the known set
    #[error("Unknown namespace: {0}")]
    UnknownNamespace(String),

    /// Invalidation pattern failed to compile
    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::UnknownNamespace(_)
            | CacheError::InvalidPattern(_)
            | CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
