//! API Module
//!
//! Admin and observability HTTP surface for the cache.
//!
//! # Endpoints
//! - `GET /health` - Health check endpoint
//! - `GET /stats` - Cache statistics snapshot
//! - `DELETE /cache/tenants/:tenant` - Invalidate one tenant
//! - `DELETE /cache/tenants/:tenant/:resource` - Invalidate one resource of a tenant
//! - `POST /cache/invalidate` - Invalidate by pattern
//! - `POST /cache/reset` - Drop all entries and statistics

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
