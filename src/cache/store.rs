//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with LRU tracking and TTL expiration.

use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;

use crate::cache::{
    CacheEntry, CacheStats, KeyPattern, LruTracker, NodeId, StatsSnapshot, MAX_KEY_LENGTH,
    WILDCARD,
};
use crate::error::{CacheError, Result};

/// Capacity used when none is configured.
pub const DEFAULT_MAX_ENTRIES: usize = 10_000;

#[derive(Debug)]
struct Slot {
    entry: CacheEntry,
    node: NodeId,
}

// == Cache Store ==
/// Capacity-bounded key/value storage with per-entry TTL and LRU eviction.
///
/// Expiry is lazy: an expired entry stays in memory until a read observes
/// it, a delete removes it, or it is evicted.
#[derive(Debug)]
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<String, Slot>,
    /// LRU access tracker
    lru: LruTracker,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    max_entries: usize,
}

impl Default for CacheStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES)
    }
}

impl CacheStore {
    // == Constructor ==
    /// Creates a new CacheStore holding at most `max_entries` entries.
    ///
    /// A capacity of zero is raised to one.
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            max_entries: max_entries.max(1),
        }
    }

    // == Set ==
    /// Stores a value with optional TTL in seconds (`None` never expires).
    ///
    /// An existing key is updated in place. A new key arriving at capacity
    /// first evicts the least recently used entry.
    pub fn set(&mut self, key: impl Into<String>, value: Value, ttl: Option<u64>) -> Result<()> {
        let key = key.into();
        validate_key(&key)?;

        if let Some(slot) = self.entries.get_mut(&key) {
            slot.entry.replace(value, ttl);
            self.lru.touch(slot.node);
            self.stats.record_set();
            return Ok(());
        }

        if self.entries.len() >= self.max_entries {
            self.evict_one()?;
        }

        let node = self.lru.insert(key.clone());
        self.entries.insert(
            key,
            Slot {
                entry: CacheEntry::new(value, ttl),
                node,
            },
        );
        self.stats.record_set();

        Ok(())
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Returns None if the key is absent or expired. Expired entries are
    /// removed and counted as misses.
    pub fn get(&mut self, key: &str) -> Option<Value> {
        let expired = match self.entries.get(key) {
            Some(slot) => slot.entry.is_expired(),
            None => {
                self.stats.record_miss();
                return None;
            }
        };

        if expired {
            debug!(key, "Lazily expiring cache entry");
            self.remove_slot(key);
            self.stats.record_miss();
            return None;
        }

        let slot = self.entries.get_mut(key)?;
        slot.entry.touch();
        self.lru.touch(slot.node);
        self.stats.record_hit();
        Some(slot.entry.value.clone())
    }

    // == Peek ==
    /// Borrows an entry without touching recency or statistics.
    ///
    /// Expired entries are still returned.
    pub fn peek(&self, key: &str) -> Option<&CacheEntry> {
        self.entries.get(key).map(|slot| &slot.entry)
    }

    // == Contains ==
    /// True if a non-expired entry exists for `key`. Does not touch statistics.
    pub fn contains(&self, key: &str) -> bool {
        self.entries
            .get(key)
            .is_some_and(|slot| !slot.entry.is_expired())
    }

    // == Delete ==
    /// Removes an entry by key, returning whether it existed.
    pub fn delete(&mut self, key: &str) -> bool {
        if self.remove_slot(key) {
            self.stats.record_deletes(1);
            true
        } else {
            false
        }
    }

    // == Delete Pattern ==
    /// Removes every stored key matching `pattern`, returning the count.
    pub fn delete_pattern(&mut self, pattern: &KeyPattern) -> usize {
        if pattern.is_exact() {
            return usize::from(self.delete(pattern.as_str()));
        }

        let matching: Vec<String> = self
            .entries
            .keys()
            .filter(|key| pattern.matches(key))
            .cloned()
            .collect();

        for key in &matching {
            self.remove_slot(key);
        }

        let count = matching.len();
        self.stats.record_deletes(count);
        count
    }

    // == Clear ==
    /// Removes all entries, counting each as a delete. Returns the prior size.
    pub fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        self.lru.clear();
        self.stats.record_deletes(count);
        count
    }

    // == Reset ==
    /// Removes all entries and zeroes every counter.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.lru.clear();
        self.stats = CacheStats::new();
    }

    // == Stats ==
    /// Returns counters plus derived size, hit rate and utilization.
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot(self.entries.len(), self.max_entries)
    }

    /// Returns the raw counters.
    pub fn counters(&self) -> CacheStats {
        self.stats
    }

    // == Keys ==
    /// Iterates over stored keys in no particular order, expired ones included.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// The key the next eviction would remove.
    pub fn peek_lru(&self) -> Option<&str> {
        self.lru.peek_oldest()
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    fn evict_one(&mut self) -> Result<()> {
        let evicted = self.lru.evict_oldest().ok_or_else(|| {
            CacheError::Internal("Cache is full and eviction failed".to_string())
        })?;
        self.entries.remove(&evicted);
        self.stats.record_eviction();
        debug!(key = %evicted, "Evicted least recently used entry");
        Ok(())
    }

    fn remove_slot(&mut self, key: &str) -> bool {
        match self.entries.remove(key) {
            Some(slot) => {
                self.lru.remove(slot.node);
                true
            }
            None => false,
        }
    }
}

// == Key Validation ==
/// Rejects keys that are empty, longer than `MAX_KEY_LENGTH` bytes, or that
/// contain the wildcard character.
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(CacheError::InvalidKey("Key cannot be empty".to_string()));
    }

    if key.len() > MAX_KEY_LENGTH {
        return Err(CacheError::InvalidKey(format!(
            "Key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        )));
    }

    if key.contains(WILDCARD) {
        return Err(CacheError::InvalidKey(format!(
            "Key cannot contain '{}': {}",
            WILDCARD, key
        )));
    }

    Ok(())
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::thread::sleep;
    use std::time::Duration;

    fn pattern(p: &str) -> KeyPattern {
        KeyPattern::parse(p).unwrap()
    }

    #[test]
    fn test_store_new() {
        let store = CacheStore::new(100);
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
        assert_eq!(store.max_entries(), 100);
        assert_eq!(CacheStore::default().max_entries(), DEFAULT_MAX_ENTRIES);
    }

    #[test]
    fn test_store_set_and_get() {
        let mut store = CacheStore::new(100);

        store.set("key1", json!("value1"), None).unwrap();

        assert_eq!(store.get("key1"), Some(json!("value1")));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent_counts_miss() {
        let mut store = CacheStore::new(100);

        assert_eq!(store.get("nonexistent"), None);

        let stats = store.counters();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 0);
    }

    #[test]
    fn test_store_delete() {
        let mut store = CacheStore::new(100);

        store.set("key1", json!(1), None).unwrap();
        assert!(store.delete("key1"));
        assert!(!store.delete("key1"));

        assert!(store.is_empty());
        assert_eq!(store.counters().deletes, 1);
    }

    #[test]
    fn test_store_overwrite_in_place() {
        let mut store = CacheStore::new(100);

        store.set("key1", json!("value1"), None).unwrap();
        let created = store.peek("key1").unwrap().created_at;
        store.set("key1", json!("value2"), Some(60)).unwrap();

        let entry = store.peek("key1").unwrap();
        assert_eq!(entry.created_at, created);
        assert!(entry.expires_at.is_some());
        assert_eq!(store.get("key1"), Some(json!("value2")));
        assert_eq!(store.len(), 1);
        assert_eq!(store.counters().sets, 2);
    }

    #[test]
    fn test_store_ttl_expiration() {
        let mut store = CacheStore::new(100);

        store.set("key1", json!("value1"), Some(1)).unwrap();
        assert!(store.get("key1").is_some());

        sleep(Duration::from_millis(1100));

        assert_eq!(store.get("key1"), None);
        assert_eq!(store.len(), 0);
        let stats = store.counters();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.deletes, 0);
    }

    #[test]
    fn test_store_lru_eviction() {
        let mut store = CacheStore::new(3);

        store.set("key1", json!(1), None).unwrap();
        store.set("key2", json!(2), None).unwrap();
        store.set("key3", json!(3), None).unwrap();

        // Cache is full, adding key4 should evict key1 (oldest)
        store.set("key4", json!(4), None).unwrap();

        assert_eq!(store.len(), 3);
        assert_eq!(store.counters().evictions, 1);
        assert!(!store.contains("key1"));
        assert!(store.contains("key2"));
        assert!(store.contains("key3"));
        assert!(store.contains("key4"));
    }

    #[test]
    fn test_store_lru_touch_on_get() {
        let mut store = CacheStore::new(3);

        store.set("key1", json!(1), None).unwrap();
        store.set("key2", json!(2), None).unwrap();
        store.set("key3", json!(3), None).unwrap();

        // Access key1 to make it most recently used
        store.get("key1").unwrap();
        assert_eq!(store.peek_lru(), Some("key2"));

        store.set("key4", json!(4), None).unwrap();

        assert!(store.contains("key1"));
        assert!(!store.contains("key2"));
    }

    #[test]
    fn test_store_overwrite_at_capacity_does_not_evict() {
        let mut store = CacheStore::new(2);

        store.set("a", json!(1), None).unwrap();
        store.set("b", json!(2), None).unwrap();
        store.set("a", json!(3), None).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.counters().evictions, 0);
        assert_eq!(store.peek_lru(), Some("b"));
    }

    #[test]
    fn test_store_last_access_updated_on_get() {
        let mut store = CacheStore::new(10);
        store.set("k", json!(1), None).unwrap();
        let before = store.peek("k").unwrap().last_access;

        sleep(Duration::from_millis(5));
        store.get("k").unwrap();

        assert!(store.peek("k").unwrap().last_access > before);
    }

    #[test]
    fn test_store_delete_pattern() {
        let mut store = CacheStore::new(100);

        store.set("contacts:t1:p1", json!(1), None).unwrap();
        store.set("contacts:t1:p2", json!(2), None).unwrap();
        store.set("companies:t1:p1", json!(3), None).unwrap();

        assert_eq!(store.delete_pattern(&pattern("contacts:t1:p*")), 2);
        assert!(store.contains("companies:t1:p1"));
        assert_eq!(store.len(), 1);
        assert_eq!(store.counters().deletes, 2);
    }

    #[test]
    fn test_store_delete_pattern_no_match() {
        let mut store = CacheStore::new(100);
        store.set("contacts:t1:p1", json!(1), None).unwrap();

        assert_eq!(store.delete_pattern(&pattern("leads:*")), 0);
        assert_eq!(store.delete_pattern(&pattern("contacts:t1:p9")), 0);
        assert_eq!(store.counters().deletes, 0);
    }

    #[test]
    fn test_store_delete_pattern_frees_lru_slots() {
        let mut store = CacheStore::new(3);
        store.set("x:t1:1", json!(1), None).unwrap();
        store.set("x:t1:2", json!(2), None).unwrap();
        store.set("y:t1:1", json!(3), None).unwrap();

        store.delete_pattern(&pattern("x:*"));
        store.set("z:t1:1", json!(4), None).unwrap();
        store.set("z:t1:2", json!(5), None).unwrap();

        assert_eq!(store.len(), 3);
        assert_eq!(store.counters().evictions, 0);
        assert_eq!(store.peek_lru(), Some("y:t1:1"));
    }

    #[test]
    fn test_store_clear_counts_deletes() {
        let mut store = CacheStore::new(100);
        store.set("a", json!(1), None).unwrap();
        store.set("b", json!(2), None).unwrap();
        store.get("a");

        assert_eq!(store.clear(), 2);
        assert!(store.is_empty());

        let stats = store.counters();
        assert_eq!(stats.deletes, 2);
        assert_eq!(stats.hits, 1);
        assert_eq!(store.peek_lru(), None);
    }

    #[test]
    fn test_store_reset_zeroes_counters() {
        let mut store = CacheStore::new(100);
        store.set("a", json!(1), None).unwrap();
        store.get("a");
        store.get("b");

        store.reset();

        assert!(store.is_empty());
        assert_eq!(store.counters(), CacheStats::new());
    }

    #[test]
    fn test_store_stats_snapshot() {
        let mut store = CacheStore::new(8);
        store.set("k", json!(1), None).unwrap();
        store.get("k");
        store.get("k");
        store.get("k");
        store.get("missing");

        let snapshot = store.stats();
        assert_eq!(snapshot.hit_rate, "75.00%");
        assert_eq!(snapshot.utilization, "12.50%");
        assert_eq!(snapshot.size, 1);
        assert_eq!(snapshot.max_size, 8);
        assert_eq!(snapshot.sets, 1);
    }

    #[test]
    fn test_store_rejects_invalid_keys() {
        let mut store = CacheStore::new(100);

        let long_key = "x".repeat(MAX_KEY_LENGTH + 1);
        assert!(matches!(
            store.set(long_key, json!(1), None),
            Err(CacheError::InvalidKey(_))
        ));
        assert!(matches!(
            store.set("", json!(1), None),
            Err(CacheError::InvalidKey(_))
        ));
        assert!(matches!(
            store.set("contacts:*:p1", json!(1), None),
            Err(CacheError::InvalidKey(_))
        ));
        assert_eq!(store.counters().sets, 0);
    }

    #[test]
    fn test_zero_capacity_is_raised_to_one() {
        let mut store = CacheStore::new(0);
        store.set("a", json!(1), None).unwrap();
        store.set("b", json!(2), None).unwrap();

        assert_eq!(store.len(), 1);
        assert!(store.contains("b"));
    }
}
