//! Free-text search results.

use std::future::Future;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;
use crate::keys;
use crate::service::{CacheService, Fetched};

/// Caches search results under `search:tenant:{hash(query)}`.
///
/// Any entity mutation may change any result set, so invalidation is always
/// tenant-wide.
#[derive(Debug, Clone)]
pub struct SearchCacheStrategy {
    cache: CacheService,
}

impl SearchCacheStrategy {
    pub fn new(cache: CacheService) -> Self {
        Self { cache }
    }

    pub async fn get_or_search<T, E, F, Fut>(
        &self,
        tenant_id: &str,
        query: &str,
        search: F,
    ) -> std::result::Result<Fetched<T>, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
    {
        let key = keys::search_key(tenant_id, query);
        let ttl = self.cache.ttl().search;
        self.cache.with_cache(&key, Some(ttl), search).await
    }

    pub async fn invalidate_tenant_search(&self, tenant_id: &str) -> Result<usize> {
        let pattern = keys::search_pattern(tenant_id)?;
        Ok(self.cache.invalidate(&pattern).await)
    }
}
