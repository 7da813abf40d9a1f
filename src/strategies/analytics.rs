//! Computed aggregates: dashboard metrics and longer-lived reports.

use std::future::Future;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;
use crate::keys;
use crate::service::{CacheService, Fetched};

/// Caches metrics under `analytics:tenant:metric:period` and reports under
/// `reports:tenant:report:period`.
#[derive(Debug, Clone)]
pub struct AnalyticsCacheStrategy {
    cache: CacheService,
}

impl AnalyticsCacheStrategy {
    pub fn new(cache: CacheService) -> Self {
        Self { cache }
    }

    pub async fn get_or_compute<T, E, F, Fut>(
        &self,
        tenant_id: &str,
        metric: &str,
        period: &str,
        compute: F,
    ) -> std::result::Result<Fetched<T>, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
    {
        let key = keys::analytics_key(tenant_id, metric, period);
        let ttl = self.cache.ttl().analytics;
        self.cache.with_cache(&key, Some(ttl), compute).await
    }

    pub async fn get_or_compute_report<T, E, F, Fut>(
        &self,
        tenant_id: &str,
        report: &str,
        period: &str,
        compute: F,
    ) -> std::result::Result<Fetched<T>, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
    {
        let key = keys::report_key(tenant_id, report, period);
        let ttl = self.cache.ttl().reports;
        self.cache.with_cache(&key, Some(ttl), compute).await
    }

    pub async fn invalidate_tenant_analytics(&self, tenant_id: &str) -> Result<usize> {
        let pattern = keys::analytics_pattern(tenant_id)?;
        Ok(self.cache.invalidate(&pattern).await)
    }

    /// Drops every period of one metric.
    pub async fn invalidate_metric(&self, tenant_id: &str, metric: &str) -> Result<usize> {
        let pattern = keys::metric_pattern(tenant_id, metric)?;
        Ok(self.cache.invalidate(&pattern).await)
    }

    pub async fn invalidate_reports(&self, tenant_id: &str) -> Result<usize> {
        let pattern = keys::reports_pattern(tenant_id)?;
        Ok(self.cache.invalidate(&pattern).await)
    }
}
