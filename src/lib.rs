//! CRM Cache - caching layer for a multi-tenant CRM
//!
//! A capacity-bounded TTL/LRU store with wildcard invalidation, plus the
//! list, detail, analytics, search, write-through, warming and cascading
//! strategies that sit between API handlers and the database.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod keys;
pub mod models;
pub mod service;
pub mod strategies;

pub use api::AppState;
pub use config::{Config, TtlPolicy};
pub use error::CacheError;
pub use keys::Resource;
pub use service::{CacheService, Fetched};
pub use strategies::CacheStrategies;
