//! Pre-populating the cache ahead of demand.

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;

use serde::Serialize;
use serde_json::Value;
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::keys::{self, Resource};
use crate::service::CacheService;

type WarmFuture = Pin<Box<dyn Future<Output = anyhow::Result<Value>> + Send>>;

// == Warm Fetch ==
/// A type-erased fetch function producing a value to warm.
pub struct WarmFetch(Box<dyn FnOnce() -> WarmFuture + Send>);

impl WarmFetch {
    pub fn new<T, F, Fut>(fetch: F) -> Self
    where
        T: Serialize + 'static,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
    {
        Self(Box::new(move || -> WarmFuture {
            Box::pin(async move {
                let value = fetch().await?;
                let json = serde_json::to_value(value)?;
                Ok::<Value, anyhow::Error>(json)
            })
        }))
    }

    fn run(self) -> WarmFuture {
        (self.0)()
    }
}

impl fmt::Debug for WarmFetch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("WarmFetch")
    }
}

// == Warm Entry ==
/// One key to populate.
#[derive(Debug)]
pub struct WarmEntry {
    pub key: String,
    /// TTL in seconds, None never expires
    pub ttl: Option<u64>,
    pub fetch: WarmFetch,
}

impl WarmEntry {
    pub fn new(key: impl Into<String>, ttl: Option<u64>, fetch: WarmFetch) -> Self {
        Self {
            key: key.into(),
            ttl,
            fetch,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WarmStatus {
    Warmed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WarmOutcome {
    pub key: String,
    pub status: WarmStatus,
}

// == Cache Warming Strategy ==
#[derive(Debug, Clone)]
pub struct CacheWarmingStrategy {
    cache: CacheService,
}

impl CacheWarmingStrategy {
    pub fn new(cache: CacheService) -> Self {
        Self { cache }
    }

    /// Fetches and stores every entry concurrently.
    ///
    /// One entry failing (error or panic) never affects the others. Outcomes
    /// are returned in input order.
    pub async fn warm_cache(&self, tenant_id: &str, entries: Vec<WarmEntry>) -> Vec<WarmOutcome> {
        let mut outcomes: Vec<WarmOutcome> = entries
            .iter()
            .map(|entry| WarmOutcome {
                key: entry.key.clone(),
                status: WarmStatus::Failed,
            })
            .collect();

        let mut tasks = JoinSet::new();
        for (index, entry) in entries.into_iter().enumerate() {
            let cache = self.cache.clone();
            tasks.spawn(async move {
                let WarmEntry { key, ttl, fetch } = entry;
                let status = match fetch.run().await {
                    Ok(value) => match cache.set_value(&key, value, ttl).await {
                        Ok(()) => WarmStatus::Warmed,
                        Err(err) => {
                            warn!(key = %key, error = %err, "Warm value rejected by cache");
                            WarmStatus::Failed
                        }
                    },
                    Err(err) => {
                        warn!(key = %key, error = %err, "Warm fetch failed");
                        WarmStatus::Failed
                    }
                };
                (index, status)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, status)) => outcomes[index].status = status,
                Err(err) => warn!(error = %err, "Warm task did not complete"),
            }
        }

        let warmed = outcomes
            .iter()
            .filter(|o| o.status == WarmStatus::Warmed)
            .count();
        info!(
            tenant_id,
            warmed,
            failed = outcomes.len() - warmed,
            "Cache warming finished"
        );

        outcomes
    }

    /// Warms page 1 of each resource's list with the resource's list TTL.
    pub async fn warm_tenant_cache(
        &self,
        tenant_id: &str,
        fetchers: BTreeMap<Resource, WarmFetch>,
    ) -> BTreeMap<Resource, WarmStatus> {
        let resources: Vec<Resource> = fetchers.keys().copied().collect();
        let entries = fetchers
            .into_iter()
            .map(|(resource, fetch)| {
                WarmEntry::new(
                    keys::list_key(resource, tenant_id, 1),
                    Some(resource.list_ttl(self.cache.ttl())),
                    fetch,
                )
            })
            .collect();

        let outcomes = self.warm_cache(tenant_id, entries).await;

        resources
            .into_iter()
            .zip(outcomes)
            .map(|(resource, outcome)| (resource, outcome.status))
            .collect()
    }
}
