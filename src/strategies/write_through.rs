//! Mutations against the data source followed by cache maintenance.

use std::future::Future;

use serde::Serialize;
use tracing::{debug, warn};

use crate::keys::{self, Resource};
use crate::service::CacheService;
use crate::strategies::CacheIdentity;

/// Runs the external write first and touches the cache only once it succeeded.
///
/// A failed write leaves the cached value in place as the last known good
/// state. Only the entity's own detail key is handled here; dependent lists,
/// searches and aggregates belong to
/// [`CascadingInvalidationStrategy`](crate::strategies::CascadingInvalidationStrategy).
#[derive(Debug, Clone)]
pub struct WriteThroughCacheStrategy {
    cache: CacheService,
}

impl WriteThroughCacheStrategy {
    pub fn new(cache: CacheService) -> Self {
        Self { cache }
    }

    /// Applies `update`, then drops the entity's detail entry.
    pub async fn update_and_invalidate<T, E, F, Fut>(
        &self,
        tenant_id: &str,
        id: &str,
        resource: Resource,
        update: F,
    ) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let updated = update().await?;

        let key = keys::detail_key(resource, tenant_id, id);
        let removed = self.cache.delete(&key).await;
        debug!(key = %key, removed, "Invalidated detail after update");

        Ok(updated)
    }

    /// Applies `delete`, then drops the entity's detail entry. Returns the
    /// delete operation's own result.
    pub async fn delete_and_invalidate<E, F, Fut>(
        &self,
        tenant_id: &str,
        id: &str,
        resource: Resource,
        delete: F,
    ) -> Result<bool, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<bool, E>>,
    {
        let deleted = delete().await?;

        let key = keys::detail_key(resource, tenant_id, id);
        let removed = self.cache.delete(&key).await;
        debug!(key = %key, deleted, removed, "Invalidated detail after delete");

        Ok(deleted)
    }

    /// Applies `create`, then seeds the detail cache with the new entity.
    pub async fn create_and_cache<T, E, F, Fut>(
        &self,
        tenant_id: &str,
        resource: Resource,
        create: F,
    ) -> Result<T, E>
    where
        T: Serialize + CacheIdentity,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let created = create().await?;

        match created.cache_id() {
            Some(id) => {
                let key = keys::detail_key(resource, tenant_id, &id);
                let ttl = resource.detail_ttl(self.cache.ttl());
                self.cache.store_quietly(&key, &created, Some(ttl)).await;
            }
            None => warn!(%resource, tenant_id, "Created entity has no id, detail not cached"),
        }

        Ok(created)
    }
}
