//! Cache Module
//!
//! Provides in-memory caching with TTL expiration, LRU eviction and
//! wildcard invalidation.

mod entry;
mod lru;
mod pattern;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use lru::{LruTracker, NodeId};
pub use pattern::{KeyPattern, WILDCARD};
pub use stats::{CacheStats, StatsSnapshot};
pub use store::{validate_key, CacheStore, DEFAULT_MAX_ENTRIES};

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;
