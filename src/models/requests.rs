//! Request DTOs for the diagnostics API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

/// Request body for pattern invalidation (POST /invalidate)
///
/// # Fields
/// - `pattern`: Regular expression matched against full cache keys
#[derive(Debug, Clone, Deserialize)]
pub struct InvalidateRequest {
    /// Regular expression over cache keys
    pub pattern: String,
}

impl InvalidateRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.pattern.trim().is_empty() {
            return Some("Pattern cannot be empty".to_string());
        }
        None
    }
}
