//! Response DTOs for the admin API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

/// Response body for every invalidation endpoint
#[derive(Debug, Clone, Serialize)]
pub struct InvalidateResponse {
    /// The pattern that was applied
    pub pattern: String,
    /// Number of keys removed
    pub deleted: usize,
}

impl InvalidateResponse {
    pub fn new(pattern: impl Into<String>, deleted: usize) -> Self {
        Self {
            pattern: pattern.into(),
            deleted,
        }
    }
}

/// Response body for the reset endpoint (POST /cache/reset)
#[derive(Debug, Clone, Serialize)]
pub struct ResetResponse {
    pub message: String,
}

impl ResetResponse {
    pub fn done() -> Self {
        Self {
            message: "Cache reset".to_string(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalidate_response_serialize() {
        let resp = InvalidateResponse::new("*:t1:*", 3);
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["pattern"], "*:t1:*");
        assert_eq!(json["deleted"], 3);
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }

    #[test]
    fn test_reset_response_serialize() {
        let json = serde_json::to_string(&ResetResponse::done()).unwrap();
        assert!(json.contains("Cache reset"));
    }
}
