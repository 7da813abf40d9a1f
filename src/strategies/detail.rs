//! Single-entity views.

use std::future::Future;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::keys::{self, Resource};
use crate::service::{CacheService, Fetched};

/// Caches one entity under `resource:tenant:id`.
#[derive(Debug, Clone)]
pub struct DetailCacheStrategy {
    cache: CacheService,
}

impl DetailCacheStrategy {
    pub fn new(cache: CacheService) -> Self {
        Self { cache }
    }

    pub async fn get_or_fetch<T, E, F, Fut>(
        &self,
        tenant_id: &str,
        id: &str,
        resource: Resource,
        fetch: F,
    ) -> std::result::Result<Fetched<T>, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
    {
        let key = keys::detail_key(resource, tenant_id, id);
        let ttl = resource.detail_ttl(self.cache.ttl());
        self.cache.with_cache(&key, Some(ttl), fetch).await
    }

    /// Deletes exactly the entity's key, returning whether it was cached.
    pub async fn invalidate_resource(&self, tenant_id: &str, id: &str, resource: Resource) -> bool {
        self.cache
            .delete(&keys::detail_key(resource, tenant_id, id))
            .await
    }
}
