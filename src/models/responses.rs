//! Response DTOs for the diagnostics API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

/// Response body for namespace, pattern and full invalidation
#[derive(Debug, Clone, Serialize)]
pub struct InvalidateResponse {
    /// What was invalidated: a namespace, a pattern or `all`
    pub scope: String,
    /// Number of entries removed
    pub removed: usize,
}

impl InvalidateResponse {
    /// Creates a new InvalidateResponse
    pub fn new(scope: impl Into<String>, removed: usize) -> Self {
        Self {
            scope: scope.into(),
            removed,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current number of cached entries
    pub entries: usize,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy(entries: usize) -> Self {
        Self {
            status: "healthy".to_string(),
            entries,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalidate_response_serialize() {
        let resp = InvalidateResponse::new("user", 3);
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["scope"], "user");
        assert_eq!(json["removed"], 3);
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy(12);
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
        assert!(json.contains("\"entries\":12"));
    }
}
