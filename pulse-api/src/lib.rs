//! Pulse API - REST API Layer
//!
//! This crate provides the HTTP surface of the Pulse event analytics
//! service: idempotent event ingestion and windowed count queries, scoped
//! per tenant. Handlers are thin adapters over the event store contract -
//! deduplication is enforced by the storage layer's uniqueness constraint
//! on `(tenant_id, event_id)`, never by the transport.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod macros;
pub mod middleware;
#[cfg(feature = "openapi")]
pub mod openapi;
pub mod routes;
pub mod state;
pub mod telemetry;
pub mod types;
pub mod validation;

// Re-export commonly used types
pub use auth::{AuthConfig, AuthContext};
pub use config::ApiConfig;
pub use db::{DbClient, DbConfig};
pub use error::{ApiError, ApiResult, ErrorCode};
pub use middleware::{auth_middleware, AuthExtractor, AuthMiddlewareState};
#[cfg(feature = "openapi")]
pub use openapi::ApiDoc;
pub use routes::create_api_router;
pub use state::AppState;
pub use types::*;
