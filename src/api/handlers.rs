//! API Handlers
//!
//! HTTP request handlers for the cache admin endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::cache::StatsSnapshot;
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::keys::{self, Resource};
use crate::models::{HealthResponse, InvalidateRequest, InvalidateResponse, ResetResponse};
use crate::service::CacheService;
use crate::strategies::CacheStrategies;

/// Application state shared across all handlers.
///
/// Holds the one cache service of the process plus the strategies wired to it.
#[derive(Debug, Clone)]
pub struct AppState {
    pub cache: CacheService,
    pub strategies: CacheStrategies,
}

impl AppState {
    /// Creates a new AppState around the given cache service.
    pub fn new(cache: CacheService) -> Self {
        Self {
            strategies: CacheStrategies::new(cache.clone()),
            cache,
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(CacheService::from_config(config))
    }
}

/// Handler for GET /stats
///
/// Returns the store's counters with derived hit rate and utilization.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsSnapshot> {
    Json(state.cache.stats().await)
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Handler for DELETE /cache/tenants/:tenant
///
/// Removes every key of one tenant.
pub async fn invalidate_tenant_handler(
    State(state): State<AppState>,
    Path(tenant): Path<String>,
) -> Result<Json<InvalidateResponse>> {
    let pattern = keys::tenant_pattern(&tenant)?;
    let deleted = state.cache.invalidate(&pattern).await;

    Ok(Json(InvalidateResponse::new(pattern.as_str(), deleted)))
}

/// Handler for DELETE /cache/tenants/:tenant/:resource
///
/// Removes every list and detail key of one resource for a tenant.
pub async fn invalidate_resource_handler(
    State(state): State<AppState>,
    Path((tenant, resource)): Path<(String, String)>,
) -> Result<Json<InvalidateResponse>> {
    let resource: Resource = resource.parse()?;
    let pattern = keys::resource_pattern(resource, &tenant)?;
    let deleted = state.cache.invalidate(&pattern).await;

    Ok(Json(InvalidateResponse::new(pattern.as_str(), deleted)))
}

/// Handler for POST /cache/invalidate
///
/// Removes every key matching an arbitrary pattern.
pub async fn invalidate_pattern_handler(
    State(state): State<AppState>,
    Json(req): Json<InvalidateRequest>,
) -> Result<Json<InvalidateResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidPattern(error_msg));
    }

    let deleted = state.cache.delete_pattern(&req.pattern).await?;

    Ok(Json(InvalidateResponse::new(req.pattern, deleted)))
}

/// Handler for POST /cache/reset
///
/// Drops every entry and zeroes statistics.
pub async fn reset_handler(State(state): State<AppState>) -> Json<ResetResponse> {
    state.cache.reset().await;
    Json(ResetResponse::done())
}
