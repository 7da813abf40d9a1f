//! Cross-resource invalidation after an entity changes.
//!
//! Each rule lists what becomes stale when one entity of a resource is
//! mutated: its own detail entry, its own list pages, list pages of other
//! resources that embed it, every cached search of the tenant, and a set of
//! analytics metrics.

use tracing::info;

use crate::cache::KeyPattern;
use crate::error::Result;
use crate::keys::{self, Resource};
use crate::service::CacheService;

/// Contact-derived metrics.
pub const CONTACT_COUNT: &str = "contact_count";
/// Company-derived metrics.
pub const COMPANY_COUNT: &str = "company_count";
/// Lead-derived metrics.
pub const LEAD_COUNT: &str = "lead_count";
pub const PIPELINE_VALUE: &str = "pipeline_value";

// == Invalidation Rule ==
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidationRule {
    pub resource: Resource,
    /// Other resources whose list pages render this one
    pub also_lists: &'static [Resource],
    /// Whether tenant-wide search results are dropped
    pub search: bool,
    /// Analytics metrics recomputed from this resource
    pub metrics: &'static [&'static str],
}

/// Dependency rules for resources with dependents beyond their own entries.
pub const RULES: &[InvalidationRule] = &[
    InvalidationRule {
        resource: Resource::Contacts,
        also_lists: &[],
        search: true,
        metrics: &[CONTACT_COUNT],
    },
    InvalidationRule {
        resource: Resource::Companies,
        also_lists: &[Resource::Contacts],
        search: true,
        metrics: &[COMPANY_COUNT],
    },
    InvalidationRule {
        resource: Resource::Leads,
        also_lists: &[Resource::Pipelines],
        search: true,
        metrics: &[LEAD_COUNT, PIPELINE_VALUE],
    },
];

/// The rule for `resource`. Resources without an entry in [`RULES`] drop
/// their detail, their list pages and tenant search.
pub fn rule_for(resource: Resource) -> InvalidationRule {
    RULES
        .iter()
        .find(|rule| rule.resource == resource)
        .copied()
        .unwrap_or(InvalidationRule {
            resource,
            also_lists: &[],
            search: true,
            metrics: &[],
        })
}

// == Invalidation Target ==
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidationTarget {
    Key(String),
    Pattern(KeyPattern),
}

impl InvalidationRule {
    /// Expands the rule into concrete keys and patterns for one entity.
    pub fn targets(&self, tenant_id: &str, id: &str) -> Result<Vec<InvalidationTarget>> {
        let mut targets = vec![
            InvalidationTarget::Key(keys::detail_key(self.resource, tenant_id, id)),
            InvalidationTarget::Pattern(keys::list_pages_pattern(self.resource, tenant_id)?),
        ];

        for resource in self.also_lists {
            targets.push(InvalidationTarget::Pattern(keys::list_pages_pattern(
                *resource, tenant_id,
            )?));
        }

        if self.search {
            targets.push(InvalidationTarget::Pattern(keys::search_pattern(tenant_id)?));
        }

        for metric in self.metrics {
            targets.push(InvalidationTarget::Pattern(keys::metric_pattern(
                tenant_id, metric,
            )?));
        }

        Ok(targets)
    }
}

// == Cascading Invalidation Strategy ==
#[derive(Debug, Clone)]
pub struct CascadingInvalidationStrategy {
    cache: CacheService,
}

impl CascadingInvalidationStrategy {
    pub fn new(cache: CacheService) -> Self {
        Self { cache }
    }

    /// Applies the resource's rule, returning the number of keys removed.
    ///
    /// All targets are removed under one store lock, so no reader observes a
    /// partially invalidated state.
    pub async fn invalidate_on_update(
        &self,
        tenant_id: &str,
        resource: Resource,
        id: &str,
    ) -> Result<usize> {
        let targets = rule_for(resource).targets(tenant_id, id)?;

        let removed = self
            .cache
            .write(|store| {
                targets
                    .iter()
                    .map(|target| match target {
                        InvalidationTarget::Key(key) => usize::from(store.delete(key)),
                        InvalidationTarget::Pattern(pattern) => store.delete_pattern(pattern),
                    })
                    .sum::<usize>()
            })
            .await;

        info!(tenant_id, %resource, id, removed, "Cascading invalidation");
        Ok(removed)
    }

    pub async fn invalidate_on_contact_update(
        &self,
        tenant_id: &str,
        contact_id: &str,
    ) -> Result<usize> {
        self.invalidate_on_update(tenant_id, Resource::Contacts, contact_id)
            .await
    }

    pub async fn invalidate_on_company_update(
        &self,
        tenant_id: &str,
        company_id: &str,
    ) -> Result<usize> {
        self.invalidate_on_update(tenant_id, Resource::Companies, company_id)
            .await
    }

    pub async fn invalidate_on_lead_update(
        &self,
        tenant_id: &str,
        lead_id: &str,
    ) -> Result<usize> {
        self.invalidate_on_update(tenant_id, Resource::Leads, lead_id)
            .await
    }
}
