//! Cache Strategies
//!
//! Read/write patterns layered on [`CacheService`] and the key builders.
//! Every strategy is a thin handle over a shared service; cloning one is
//! cheap and all clones see the same store.
//!
//! Failures of caller-supplied functions are returned to the caller as-is.
//! Invalidation always happens after a successful external mutation.

mod analytics;
mod cascade;
mod detail;
mod list;
mod search;
mod warming;
mod write_through;

pub use analytics::AnalyticsCacheStrategy;
pub use cascade::{
    rule_for, CascadingInvalidationStrategy, InvalidationRule, InvalidationTarget, COMPANY_COUNT,
    CONTACT_COUNT, LEAD_COUNT, PIPELINE_VALUE, RULES,
};
pub use detail::DetailCacheStrategy;
pub use list::ListCacheStrategy;
pub use search::SearchCacheStrategy;
pub use warming::{CacheWarmingStrategy, WarmEntry, WarmFetch, WarmOutcome, WarmStatus};
pub use write_through::WriteThroughCacheStrategy;

use serde_json::Value;

use crate::service::CacheService;

// == Cache Identity ==
/// Entities that can name their own detail cache key.
pub trait CacheIdentity {
    /// The discriminator used in `resource:tenant:id`, if known.
    fn cache_id(&self) -> Option<String>;
}

impl CacheIdentity for Value {
    /// Reads a string or numeric `id` field.
    fn cache_id(&self) -> Option<String> {
        match self.get("id")? {
            Value::String(id) => Some(id.clone()),
            Value::Number(id) => Some(id.to_string()),
            _ => None,
        }
    }
}

// == Strategy Set ==
/// All strategies wired to one service, for injection into handler state.
#[derive(Debug, Clone)]
pub struct CacheStrategies {
    pub list: ListCacheStrategy,
    pub detail: DetailCacheStrategy,
    pub analytics: AnalyticsCacheStrategy,
    pub search: SearchCacheStrategy,
    pub write_through: WriteThroughCacheStrategy,
    pub warming: CacheWarmingStrategy,
    pub cascade: CascadingInvalidationStrategy,
}

impl CacheStrategies {
    pub fn new(cache: CacheService) -> Self {
        Self {
            list: ListCacheStrategy::new(cache.clone()),
            detail: DetailCacheStrategy::new(cache.clone()),
            analytics: AnalyticsCacheStrategy::new(cache.clone()),
            search: SearchCacheStrategy::new(cache.clone()),
            write_through: WriteThroughCacheStrategy::new(cache.clone()),
            warming: CacheWarmingStrategy::new(cache.clone()),
            cascade: CascadingInvalidationStrategy::new(cache),
        }
    }
}
