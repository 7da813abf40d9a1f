//! Paginated list views.

use std::future::Future;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;
use crate::keys::{self, Resource};
use crate::service::{CacheService, Fetched};

/// Caches list pages under `resource:tenant:p{page}`.
#[derive(Debug, Clone)]
pub struct ListCacheStrategy {
    cache: CacheService,
}

impl ListCacheStrategy {
    pub fn new(cache: CacheService) -> Self {
        Self { cache }
    }

    /// Returns page `page` of `resource`, fetching and caching it on a miss
    /// with the resource's list TTL.
    pub async fn get_or_fetch<T, E, F, Fut>(
        &self,
        tenant_id: &str,
        page: u32,
        resource: Resource,
        fetch: F,
    ) -> std::result::Result<Fetched<T>, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
    {
        let key = keys::list_key(resource, tenant_id, page);
        let ttl = resource.list_ttl(self.cache.ttl());
        self.cache.with_cache(&key, Some(ttl), fetch).await
    }

    /// Drops every cached page of `resource` for the tenant.
    pub async fn invalidate_resource(&self, tenant_id: &str, resource: Resource) -> Result<usize> {
        let pattern = keys::list_pages_pattern(resource, tenant_id)?;
        Ok(self.cache.invalidate(&pattern).await)
    }
}
