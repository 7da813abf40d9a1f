//! Configuration Module
//!
//! Handles loading cache and server configuration from environment variables.

use std::env;
use std::str::FromStr;

use crate::cache::DEFAULT_MAX_ENTRIES;

/// Reads an environment variable, falling back to `default` when it is
/// missing or does not parse.
fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// == TTL Policy ==
/// Default time-to-live, in seconds, for each class of cached data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TtlPolicy {
    /// Contacts, companies, leads, qr-sessions list pages
    pub list: u64,
    /// Pipelines, api-keys, webhooks list pages
    pub long_list: u64,
    /// Single-entity views
    pub detail: u64,
    pub activities: u64,
    pub analytics: u64,
    pub reports: u64,
    pub search: u64,
    pub webhook_events: u64,
}

impl Default for TtlPolicy {
    fn default() -> Self {
        Self {
            list: 300,
            long_list: 600,
            detail: 600,
            activities: 120,
            analytics: 600,
            reports: 1800,
            search: 180,
            webhook_events: 120,
        }
    }
}

impl TtlPolicy {
    /// Loads TTL overrides from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_TTL_LIST` (default: 300)
    /// - `CACHE_TTL_LONG_LIST` (default: 600)
    /// - `CACHE_TTL_DETAIL` (default: 600)
    /// - `CACHE_TTL_ACTIVITIES` (default: 120)
    /// - `CACHE_TTL_ANALYTICS` (default: 600)
    /// - `CACHE_TTL_REPORTS` (default: 1800)
    /// - `CACHE_TTL_SEARCH` (default: 180)
    /// - `CACHE_TTL_WEBHOOK_EVENTS` (default: 120)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            list: env_or("CACHE_TTL_LIST", defaults.list),
            long_list: env_or("CACHE_TTL_LONG_LIST", defaults.long_list),
            detail: env_or("CACHE_TTL_DETAIL", defaults.detail),
            activities: env_or("CACHE_TTL_ACTIVITIES", defaults.activities),
            analytics: env_or("CACHE_TTL_ANALYTICS", defaults.analytics),
            reports: env_or("CACHE_TTL_REPORTS", defaults.reports),
            search: env_or("CACHE_TTL_SEARCH", defaults.search),
            webhook_events: env_or("CACHE_TTL_WEBHOOK_EVENTS", defaults.webhook_events),
        }
    }
}

/// Cache and server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries the cache can hold
    pub max_entries: usize,
    /// HTTP port of the admin surface
    pub server_port: u16,
    /// Per-class TTL defaults
    pub ttl: TtlPolicy,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_ENTRIES` - Maximum cache entries (default: 10000)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CACHE_TTL_*` - see [`TtlPolicy::from_env`]
    pub fn from_env() -> Self {
        Self {
            max_entries: env_or("MAX_ENTRIES", DEFAULT_MAX_ENTRIES),
            server_port: env_or("SERVER_PORT", 3000),
            ttl: TtlPolicy::from_env(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            server_port: 3000,
            ttl: TtlPolicy::default(),
        }
    }
}
