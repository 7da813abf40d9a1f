//! Cache Service
//!
//! The shared handle API handlers and strategies hold. One store per process,
//! constructed explicitly and passed around by cloning the handle.

use std::future::Future;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::cache::{CacheStore, KeyPattern, StatsSnapshot};
use crate::config::{Config, TtlPolicy};
use crate::error::Result;
use crate::keys;

// == Fetched ==
/// A value returned by a read-through call, tagged with where it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Fetched<T> {
    pub data: T,
    pub from_cache: bool,
}

impl<T> Fetched<T> {
    pub fn cached(data: T) -> Self {
        Self {
            data,
            from_cache: true,
        }
    }

    pub fn fresh(data: T) -> Self {
        Self {
            data,
            from_cache: false,
        }
    }

    pub fn into_inner(self) -> T {
        self.data
    }
}

// == Cache Service ==
/// Cloneable handle to the process-wide store and its TTL policy.
///
/// The store lock is never held while a caller-supplied function runs.
/// Two concurrent misses on the same key therefore both invoke their fetch
/// function; the later write wins.
#[derive(Debug, Clone)]
pub struct CacheService {
    store: Arc<RwLock<CacheStore>>,
    ttl: Arc<TtlPolicy>,
}

impl Default for CacheService {
    fn default() -> Self {
        Self::new(CacheStore::default(), TtlPolicy::default())
    }
}

impl CacheService {
    // == Constructors ==
    pub fn new(store: CacheStore, ttl: TtlPolicy) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            ttl: Arc::new(ttl),
        }
    }

    /// Builds the service from loaded configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(CacheStore::new(config.max_entries), config.ttl.clone())
    }

    /// Service with the given capacity and default TTLs.
    pub fn with_capacity(max_entries: usize) -> Self {
        Self::new(CacheStore::new(max_entries), TtlPolicy::default())
    }

    pub fn ttl(&self) -> &TtlPolicy {
        &self.ttl
    }

    /// Runs `f` with exclusive access to the store.
    pub async fn write<R>(&self, f: impl FnOnce(&mut CacheStore) -> R) -> R {
        let mut store = self.store.write().await;
        f(&mut store)
    }

    /// Runs `f` with shared access to the store.
    pub async fn read<R>(&self, f: impl FnOnce(&CacheStore) -> R) -> R {
        let store = self.store.read().await;
        f(&store)
    }

    // == Raw Operations ==

    pub async fn get_value(&self, key: &str) -> Option<Value> {
        self.write(|store| store.get(key)).await
    }

    /// Typed lookup. A cached value that does not decode as `T` is a miss.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.get_value(key).await?;
        match serde_json::from_value(value) {
            Ok(decoded) => Some(decoded),
            Err(err) => {
                warn!(key, error = %err, "Cached value has an unexpected shape");
                None
            }
        }
    }

    pub async fn set_value(&self, key: &str, value: Value, ttl: Option<u64>) -> Result<()> {
        self.write(|store| store.set(key, value, ttl)).await
    }

    pub async fn set<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        ttl: Option<u64>,
    ) -> Result<()> {
        let value = serde_json::to_value(value)?;
        self.set_value(key, value, ttl).await
    }

    pub async fn delete(&self, key: &str) -> bool {
        self.write(|store| store.delete(key)).await
    }

    /// Compiles `pattern` and deletes every matching key.
    pub async fn delete_pattern(&self, pattern: &str) -> Result<usize> {
        let pattern = KeyPattern::parse(pattern)?;
        Ok(self.invalidate(&pattern).await)
    }

    /// Deletes every key matching an already compiled pattern.
    pub async fn invalidate(&self, pattern: &KeyPattern) -> usize {
        let count = self.write(|store| store.delete_pattern(pattern)).await;
        if count > 0 {
            info!(pattern = %pattern, count, "Invalidated cache entries");
        }
        count
    }

    /// Removes every key belonging to `tenant_id`.
    pub async fn invalidate_tenant_cache(&self, tenant_id: &str) -> Result<usize> {
        let pattern = keys::tenant_pattern(tenant_id)?;
        Ok(self.invalidate(&pattern).await)
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.read(|store| store.contains(key)).await
    }

    pub async fn len(&self) -> usize {
        self.read(|store| store.len()).await
    }

    pub async fn is_empty(&self) -> bool {
        self.read(|store| store.is_empty()).await
    }

    pub async fn clear(&self) -> usize {
        self.write(|store| store.clear()).await
    }

    /// Drops all entries and zeroes statistics. Intended for test harnesses
    /// and operator tooling only.
    pub async fn reset(&self) {
        self.write(|store| store.reset()).await;
        warn!("Cache store reset");
    }

    pub async fn stats(&self) -> StatsSnapshot {
        self.read(|store| store.stats()).await
    }

    // == With Cache ==
    /// Read-through on an explicit key.
    ///
    /// On a hit the cached value is returned. On a miss `fetch` runs, its
    /// value is stored with `ttl` and returned. A fetch error is returned
    /// unchanged and nothing is stored.
    pub async fn with_cache<T, E, F, Fut>(
        &self,
        key: &str,
        ttl: Option<u64>,
        fetch: F,
    ) -> std::result::Result<Fetched<T>, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
    {
        if let Some(data) = self.get::<T>(key).await {
            debug!(key, "Cache hit");
            return Ok(Fetched::cached(data));
        }

        debug!(key, "Cache miss");
        let data = fetch().await?;
        self.store_quietly(key, &data, ttl).await;
        Ok(Fetched::fresh(data))
    }

    /// Stores a value, logging instead of failing when the cache rejects it.
    pub(crate) async fn store_quietly<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        ttl: Option<u64>,
    ) -> bool {
        match self.set(key, value, ttl).await {
            Ok(()) => true,
            Err(err) => {
                warn!(key, error = %err, "Value not cached");
                false
            }
        }
    }
}
