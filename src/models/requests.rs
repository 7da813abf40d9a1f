//! Request DTOs for the admin API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

use crate::cache::MAX_KEY_LENGTH;

/// Request body for an arbitrary pattern invalidation (POST /cache/invalidate)
///
/// # Fields
/// - `pattern`: Key template where `*` matches any run of characters
#[derive(Debug, Clone, Deserialize)]
pub struct InvalidateRequest {
    pub pattern: String,
}

impl InvalidateRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.pattern.is_empty() {
            return Some("Pattern cannot be empty".to_string());
        }
        if self.pattern.len() > MAX_KEY_LENGTH {
            return Some(format!(
                "Pattern exceeds maximum length of {} characters",
                MAX_KEY_LENGTH
            ));
        }
        None
    }
}
