//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use chrono::{DateTime, Duration, Utc};
use serde_json::Value;

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored payload
    pub value: Value,
    /// Instant of insertion
    pub created_at: DateTime<Utc>,
    /// Instant after which the entry is absent, None = no expiration
    pub expires_at: Option<DateTime<Utc>>,
    /// Instant of the most recent successful read (or write)
    pub last_access: DateTime<Utc>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry with optional TTL.
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `ttl_seconds` - Optional TTL in seconds
    pub fn new(value: Value, ttl_seconds: Option<u64>) -> Self {
        let now = Utc::now();

        Self {
            value,
            created_at: now,
            expires_at: expiry_from(now, ttl_seconds),
            last_access: now,
        }
    }

    // == Replace ==
    /// Overwrites the payload in place and restarts the TTL clock.
    ///
    /// `created_at` is preserved; the entry counts as freshly accessed.
    pub fn replace(&mut self, value: Value, ttl_seconds: Option<u64>) {
        let now = Utc::now();
        self.value = value;
        self.expires_at = expiry_from(now, ttl_seconds);
        self.last_access = now;
    }

    // == Touch ==
    /// Records a successful read.
    pub fn touch(&mut self) {
        self.last_access = Utc::now();
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time is strictly past
    /// `expires_at`. Entries without a TTL never expire.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Same as [`is_expired`](Self::is_expired) against an explicit instant.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires) => now > expires,
            None => false,
        }
    }

    // == Time To Live ==
    /// Returns remaining TTL in seconds, or None if no expiration is set.
    ///
    /// Returns `Some(0)` once the entry has expired.
    pub fn ttl_remaining(&self) -> Option<u64> {
        self.expires_at.map(|expires| {
            let remaining = (expires - Utc::now()).num_seconds();
            remaining.max(0) as u64
        })
    }
}

fn expiry_from(now: DateTime<Utc>, ttl_seconds: Option<u64>) -> Option<DateTime<Utc>> {
    ttl_seconds.map(|ttl| {
        let ttl = i64::try_from(ttl).unwrap_or(i64::MAX);
        Duration::try_seconds(ttl)
            .and_then(|d| now.checked_add_signed(d))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    })
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::thread::sleep;
    use std::time::Duration as StdDuration;

    #[test]
    fn test_entry_creation_no_ttl() {
        let entry = CacheEntry::new(json!("test_value"), None);

        assert_eq!(entry.value, json!("test_value"));
        assert!(entry.expires_at.is_none());
        assert!(!entry.is_expired());
        assert_eq!(entry.created_at, entry.last_access);
    }

    #[test]
    fn test_entry_creation_with_ttl() {
        let entry = CacheEntry::new(json!({"id": 1}), Some(60));

        assert!(entry.expires_at.is_some());
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_entry_expiration() {
        let entry = CacheEntry::new(json!(1), Some(1));
        assert!(!entry.is_expired());

        sleep(StdDuration::from_millis(1100));

        assert!(entry.is_expired());
    }

    #[test]
    fn test_expiration_boundary_is_strict() {
        let now = Utc::now();
        let entry = CacheEntry {
            value: json!(null),
            created_at: now,
            expires_at: Some(now),
            last_access: now,
        };

        assert!(!entry.is_expired_at(now));
        assert!(entry.is_expired_at(now + Duration::milliseconds(1)));
    }

    #[test]
    fn test_replace_keeps_created_at() {
        let mut entry = CacheEntry::new(json!("a"), Some(1));
        let created = entry.created_at;
        sleep(StdDuration::from_millis(5));

        entry.replace(json!("b"), None);

        assert_eq!(entry.value, json!("b"));
        assert_eq!(entry.created_at, created);
        assert!(entry.expires_at.is_none());
        assert!(entry.last_access > created);
    }

    #[test]
    fn test_ttl_remaining() {
        let entry = CacheEntry::new(json!(1), Some(10));
        let remaining = entry.ttl_remaining().unwrap();
        assert!(remaining <= 10);
        assert!(remaining >= 9);

        let forever = CacheEntry::new(json!(1), None);
        assert!(forever.ttl_remaining().is_none());
    }

    #[test]
    fn test_huge_ttl_does_not_overflow() {
        let entry = CacheEntry::new(json!(1), Some(u64::MAX));
        assert!(!entry.is_expired());
    }
}
