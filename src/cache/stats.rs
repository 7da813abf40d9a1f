//! Cache Statistics Module
//!
//! Tracks cache performance metrics including hits, misses, and evictions.

use serde::Serialize;

// == Cache Stats ==
/// Lifetime counters of one store instance.
///
/// Counters only grow; they return to zero solely through
/// [`CacheStore::reset`](crate::cache::CacheStore::reset).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Number of successful cache retrievals
    pub hits: u64,
    /// Number of failed cache retrievals (key not found or expired)
    pub misses: u64,
    /// Number of inserts and overwrites
    pub sets: u64,
    /// Number of entries removed by delete, pattern delete or clear
    pub deletes: u64,
    /// Number of entries evicted due to LRU policy
    pub evictions: u64,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Hit rate as a percentage in `0.0..=100.0`, 0.0 when nothing was read.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64 * 100.0
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_set(&mut self) {
        self.sets += 1;
    }

    pub fn record_deletes(&mut self, count: usize) {
        self.deletes += count as u64;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    // == Snapshot ==
    /// Combines the counters with the store's occupancy into an exportable view.
    pub fn snapshot(&self, size: usize, max_size: usize) -> StatsSnapshot {
        let utilization = if max_size == 0 {
            0.0
        } else {
            size as f64 / max_size as f64 * 100.0
        };

        StatsSnapshot {
            hits: self.hits,
            misses: self.misses,
            sets: self.sets,
            deletes: self.deletes,
            evictions: self.evictions,
            size,
            max_size,
            hit_rate: format_percent(self.hit_rate()),
            utilization: format_percent(utilization),
        }
    }
}

// == Stats Snapshot ==
/// Point-in-time statistics for export to a metrics system.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub sets: u64,
    pub deletes: u64,
    pub evictions: u64,
    /// Entries currently held
    pub size: usize,
    /// Configured capacity
    pub max_size: usize,
    /// e.g. `"75.00%"`
    pub hit_rate: String,
    /// e.g. `"12.50%"`
    pub utilization: String,
}

fn format_percent(value: f64) -> String {
    format!("{:.2}%", value)
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = CacheStats::new();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.sets, 0);
        assert_eq!(stats.deletes, 0);
        assert_eq!(stats.evictions, 0);
    }

    #[test]
    fn test_hit_rate_no_requests() {
        let stats = CacheStats::new();
        assert_eq!(stats.hit_rate(), 0.0);
        assert_eq!(stats.snapshot(0, 10).hit_rate, "0.00%");
    }

    #[test]
    fn test_hit_rate_three_hits_one_miss() {
        let mut stats = CacheStats::new();
        stats.record_hit();
        stats.record_hit();
        stats.record_hit();
        stats.record_miss();
        assert_eq!(stats.snapshot(1, 10).hit_rate, "75.00%");
    }

    #[test]
    fn test_hit_rate_rounding() {
        let mut stats = CacheStats::new();
        stats.record_hit();
        stats.record_miss();
        stats.record_miss();
        assert_eq!(stats.snapshot(0, 10).hit_rate, "33.33%");
    }

    #[test]
    fn test_utilization() {
        let stats = CacheStats::new();
        let snapshot = stats.snapshot(25, 200);
        assert_eq!(snapshot.utilization, "12.50%");
        assert_eq!(snapshot.size, 25);
        assert_eq!(snapshot.max_size, 200);
    }

    #[test]
    fn test_record_deletes_and_evictions() {
        let mut stats = CacheStats::new();
        stats.record_deletes(3);
        stats.record_deletes(0);
        stats.record_eviction();
        stats.record_eviction();
        assert_eq!(stats.deletes, 3);
        assert_eq!(stats.evictions, 2);
    }

    #[test]
    fn test_snapshot_serializes_camel_case() {
        let json = serde_json::to_value(CacheStats::new().snapshot(0, 10)).unwrap();
        assert_eq!(json["maxSize"], 10);
        assert_eq!(json["hitRate"], "0.00%");
        assert_eq!(json["utilization"], "0.00%");
    }
}
