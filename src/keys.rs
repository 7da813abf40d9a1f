//! Key Builder
//!
//! Deterministic cache keys of the form `resource:tenant:discriminator`,
//! and the wildcard patterns that select groups of them.
//!
//! | Kind      | Key                                   |
//! |-----------|---------------------------------------|
//! | list      | `contacts:t1:p2`                      |
//! | detail    | `contacts:t1:{id}`                    |
//! | analytics | `analytics:t1:{metric}:{period}`      |
//! | report    | `reports:t1:{report}:{period}`        |
//! | search    | `search:t1:{hash(query)}`             |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::cache::{KeyPattern, WILDCARD};
use crate::config::TtlPolicy;
use crate::error::{CacheError, Result};

/// Key prefix for analytics metrics.
pub const ANALYTICS_PREFIX: &str = "analytics";
/// Key prefix for reports.
pub const REPORTS_PREFIX: &str = "reports";
/// Key prefix for search results.
pub const SEARCH_PREFIX: &str = "search";
/// Number of hex characters kept from the query digest.
pub const SEARCH_HASH_LEN: usize = 8;

// == Resource ==
/// CRM resource types that own list and detail cache entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Resource {
    Contacts,
    Companies,
    Leads,
    Pipelines,
    ApiKeys,
    Webhooks,
    QrSessions,
    Activities,
    WebhookEvents,
}

impl Resource {
    pub const ALL: [Resource; 9] = [
        Resource::Contacts,
        Resource::Companies,
        Resource::Leads,
        Resource::Pipelines,
        Resource::ApiKeys,
        Resource::Webhooks,
        Resource::QrSessions,
        Resource::Activities,
        Resource::WebhookEvents,
    ];

    /// Key segment for this resource.
    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Contacts => "contacts",
            Resource::Companies => "companies",
            Resource::Leads => "leads",
            Resource::Pipelines => "pipelines",
            Resource::ApiKeys => "api-keys",
            Resource::Webhooks => "webhooks",
            Resource::QrSessions => "qr-sessions",
            Resource::Activities => "activities",
            Resource::WebhookEvents => "webhook-events",
        }
    }

    /// TTL in seconds for list pages of this resource.
    pub fn list_ttl(&self, ttl: &TtlPolicy) -> u64 {
        match self {
            Resource::Pipelines | Resource::ApiKeys | Resource::Webhooks => ttl.long_list,
            Resource::Activities => ttl.activities,
            Resource::WebhookEvents => ttl.webhook_events,
            Resource::Contacts | Resource::Companies | Resource::Leads | Resource::QrSessions => {
                ttl.list
            }
        }
    }

    /// TTL in seconds for single-entity entries of this resource.
    pub fn detail_ttl(&self, ttl: &TtlPolicy) -> u64 {
        ttl.detail
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resource {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self> {
        Resource::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| CacheError::InvalidKey(format!("Unknown resource: {}", s)))
    }
}

// == Keys ==

pub fn list_key(resource: Resource, tenant_id: &str, page: u32) -> String {
    format!("{}:{}:p{}", resource, tenant_id, page)
}

pub fn detail_key(resource: Resource, tenant_id: &str, id: &str) -> String {
    format!("{}:{}:{}", resource, tenant_id, id)
}

pub fn analytics_key(tenant_id: &str, metric: &str, period: &str) -> String {
    format!("{}:{}:{}:{}", ANALYTICS_PREFIX, tenant_id, metric, period)
}

pub fn report_key(tenant_id: &str, report: &str, period: &str) -> String {
    format!("{}:{}:{}:{}", REPORTS_PREFIX, tenant_id, report, period)
}

/// Search key; the free-text query is reduced to a fixed-width hash so the
/// key length stays bounded.
pub fn search_key(tenant_id: &str, query: &str) -> String {
    format!("{}:{}:{}", SEARCH_PREFIX, tenant_id, query_hash(query))
}

/// First `SEARCH_HASH_LEN` hex characters of the SHA-256 of `query`.
pub fn query_hash(query: &str) -> String {
    let digest = Sha256::digest(query.as_bytes());
    let mut encoded = hex::encode(digest);
    encoded.truncate(SEARCH_HASH_LEN);
    encoded
}

// == Patterns ==
// Identifier segments must not contain the wildcard.

fn compile(pattern: String) -> Result<KeyPattern> {
    KeyPattern::parse(&pattern)
}

fn ensure_segment(name: &str, value: &str) -> Result<()> {
    if value.contains(WILDCARD) {
        return Err(CacheError::InvalidPattern(format!(
            "{} cannot contain '{}': {}",
            name, WILDCARD, value
        )));
    }
    Ok(())
}

/// Every key of one tenant: `*:{tenant}:*`, matched on the tenant segment.
pub fn tenant_pattern(tenant_id: &str) -> Result<KeyPattern> {
    ensure_segment("tenant", tenant_id)?;
    compile(format!("*:{}:*", tenant_id))
}

/// Every key of one resource for a tenant: `{resource}:{tenant}:*`.
pub fn resource_pattern(resource: Resource, tenant_id: &str) -> Result<KeyPattern> {
    ensure_segment("tenant", tenant_id)?;
    compile(format!("{}:{}:*", resource, tenant_id))
}

/// All list pages of one resource for a tenant: `{resource}:{tenant}:p*`.
///
/// Only `p` followed by digits is selected, so detail entries whose id
/// merely starts with `p` survive. An id that is itself `p{digits}` shares
/// its key with a list page and cannot be told apart.
pub fn list_pages_pattern(resource: Resource, tenant_id: &str) -> Result<KeyPattern> {
    ensure_segment("tenant", tenant_id)?;
    Ok(KeyPattern::list_pages(&format!("{}:{}:", resource, tenant_id)))
}

/// All analytics of a tenant: `analytics:{tenant}:*`.
pub fn analytics_pattern(tenant_id: &str) -> Result<KeyPattern> {
    ensure_segment("tenant", tenant_id)?;
    compile(format!("{}:{}:*", ANALYTICS_PREFIX, tenant_id))
}

/// Every period of one metric: `analytics:{tenant}:{metric}:*`.
pub fn metric_pattern(tenant_id: &str, metric: &str) -> Result<KeyPattern> {
    ensure_segment("tenant", tenant_id)?;
    ensure_segment("metric", metric)?;
    compile(format!("{}:{}:{}:*", ANALYTICS_PREFIX, tenant_id, metric))
}

/// All reports of a tenant: `reports:{tenant}:*`.
pub fn reports_pattern(tenant_id: &str) -> Result<KeyPattern> {
    ensure_segment("tenant", tenant_id)?;
    compile(format!("{}:{}:*", REPORTS_PREFIX, tenant_id))
}

/// All cached searches of a tenant: `search:{tenant}:*`.
pub fn search_pattern(tenant_id: &str) -> Result<KeyPattern> {
    ensure_segment("tenant", tenant_id)?;
    compile(format!("{}:{}:*", SEARCH_PREFIX, tenant_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_and_detail_keys() {
        assert_eq!(list_key(Resource::Contacts, "t1", 1), "contacts:t1:p1");
        assert_eq!(list_key(Resource::ApiKeys, "t1", 3), "api-keys:t1:p3");
        assert_eq!(detail_key(Resource::Leads, "t1", "42"), "leads:t1:42");
    }

    #[test]
    fn test_analytics_and_report_keys() {
        assert_eq!(
            analytics_key("t1", "contact_count", "30d"),
            "analytics:t1:contact_count:30d"
        );
        assert_eq!(report_key("t1", "sales", "q1"), "reports:t1:sales:q1");
    }

    #[test]
    fn test_search_key_is_stable_and_bounded() {
        let a = search_key("t1", "acme corp");
        let b = search_key("t1", "acme corp");
        let c = search_key("t1", "acme corp ");
        let long = search_key("t1", &"x".repeat(10_000));

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.starts_with("search:t1:"));
        assert_eq!(long.len(), "search:t1:".len() + SEARCH_HASH_LEN);
    }

    #[test]
    fn test_query_hash_known_value() {
        // sha256("") = e3b0c442...
        assert_eq!(query_hash(""), "e3b0c442");
        assert!(query_hash("hello").chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_patterns_select_expected_keys() {
        let tenant = tenant_pattern("t1").unwrap();
        assert!(tenant.matches("contacts:t1:p1"));
        assert!(!tenant.matches("contacts:t2:p1"));

        let pages = list_pages_pattern(Resource::Contacts, "t1").unwrap();
        assert!(pages.matches("contacts:t1:p7"));
        assert!(!pages.matches("companies:t1:p7"));

        let metric = metric_pattern("t1", "contact_count").unwrap();
        assert!(metric.matches("analytics:t1:contact_count:7d"));
        assert!(!metric.matches("analytics:t1:lead_count:7d"));

        assert!(search_pattern("t1").unwrap().matches(&search_key("t1", "q")));
        assert!(reports_pattern("t1").unwrap().matches("reports:t1:x:y"));
        assert!(resource_pattern(Resource::Leads, "t1").unwrap().matches("leads:t1:9"));
        assert!(analytics_pattern("t1").unwrap().matches("analytics:t1:a:b"));
    }

    #[test]
    fn test_tenant_pattern_spares_other_tenants_analytics() {
        let tenant = tenant_pattern("t1").unwrap();
        assert!(tenant.matches(&analytics_key("t1", "contact_count", "30d")));
        assert!(!tenant.matches(&analytics_key("t2", "t1", "30d")));
        assert!(!tenant.matches(&analytics_key("t2", "lead_count", "t1")));
        assert!(!tenant.matches(&report_key("t2", "t1", "q1")));
    }

    #[test]
    fn test_list_pages_pattern_spares_p_prefixed_ids() {
        let pages = list_pages_pattern(Resource::Contacts, "t1").unwrap();
        assert!(pages.matches(&list_key(Resource::Contacts, "t1", 3)));
        assert!(!pages.matches(&detail_key(Resource::Contacts, "t1", "pat-42")));
        assert_eq!(pages.to_string(), "contacts:t1:p*");
    }

    #[test]
    fn test_wildcard_segments_rejected() {
        assert!(tenant_pattern("*").is_err());
        assert!(metric_pattern("t1", "a*").is_err());
    }

    #[test]
    fn test_resource_round_trip_and_ttl() {
        let ttl = TtlPolicy::default();
        for resource in Resource::ALL {
            assert_eq!(resource.as_str().parse::<Resource>().unwrap(), resource);
        }
        assert!("widgets".parse::<Resource>().is_err());

        assert_eq!(Resource::Contacts.list_ttl(&ttl), 300);
        assert_eq!(Resource::Pipelines.list_ttl(&ttl), 600);
        assert_eq!(Resource::Activities.list_ttl(&ttl), 120);
        assert_eq!(Resource::WebhookEvents.list_ttl(&ttl), 120);
        assert_eq!(Resource::Leads.detail_ttl(&ttl), 600);
    }

    #[test]
    fn test_resource_serde_names() {
        let json = serde_json::to_string(&Resource::QrSessions).unwrap();
        assert_eq!(json, "\"qr-sessions\"");
    }
}
