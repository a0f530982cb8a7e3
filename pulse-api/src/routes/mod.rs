//! REST API Routes Module
//!
//! This module contains all REST API route handlers:
//!
//! - Event ingestion (`POST /api/v1/events`, authenticated)
//! - Windowed counts (`GET /api/v1/metrics`, authenticated)
//! - Health check endpoints (Kubernetes-compatible, public)
//! - OpenAPI spec (public)
//!
//! The authenticated group sits behind the tenant-resolution middleware;
//! handlers inside it receive an [`crate::auth::AuthContext`] and never a
//! raw credential.

pub mod event;
pub mod health;
pub mod metrics;

use std::time::Duration;

use axum::{
    http::{header, header::HeaderName, HeaderValue, Method},
    middleware::from_fn_with_state,
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::AuthConfig;
use crate::config::ApiConfig;
use crate::db::DbClient;
use crate::error::{ApiError, ApiResult};
use crate::middleware::{auth_middleware, AuthMiddlewareState};
use crate::state::AppState;

// Re-export route creation functions for convenience
pub use event::create_router as event_router;
pub use health::create_router as health_router;
pub use metrics::create_router as metrics_router;

// ============================================================================
// OPENAPI ENDPOINT
// ============================================================================

/// Handler for /openapi.json endpoint.
#[cfg(feature = "openapi")]
async fn openapi_json() -> axum::Json<utoipa::openapi::OpenApi> {
    use utoipa::OpenApi;
    axum::Json(crate::openapi::ApiDoc::openapi())
}

// ============================================================================
// PRODUCTION VALIDATION
// ============================================================================

/// Check if running in a production environment.
fn is_production_environment() -> bool {
    std::env::var("PULSE_ENVIRONMENT")
        .map(|e| matches!(e.to_lowercase().as_str(), "production" | "prod"))
        .unwrap_or(false)
}

/// Validate API configuration for production use.
fn validate_api_config_for_production(config: &ApiConfig) -> ApiResult<()> {
    if config.cors_origins.is_empty() {
        return Err(ApiError::invalid_input(
            "CORS origins not configured for production. Set PULSE_CORS_ORIGINS.",
        ));
    }
    Ok(())
}

// ============================================================================
// ROUTER ASSEMBLY
// ============================================================================

/// Build the complete application router.
///
/// # Middleware Order (outer to inner)
/// 1. CORS (outermost) - handles preflight requests
/// 2. Trace - request/response logging
/// 3. Auth (only on /api/v1/*) - resolves credentials to tenants
pub fn create_api_router(
    db: DbClient,
    api_config: &ApiConfig,
    auth_config: AuthConfig,
) -> ApiResult<Router> {
    if is_production_environment() {
        validate_api_config_for_production(api_config)?;
    }

    let auth_state = AuthMiddlewareState::new(auth_config);
    let app_state = AppState::new(db.clone());

    // Protected API routes (auth required)
    let api_routes = Router::new()
        .nest("/events", event::create_router())
        .nest("/metrics", metrics::create_router())
        .with_state(app_state)
        .layer(from_fn_with_state(auth_state, auth_middleware));

    let router = Router::new()
        .nest("/api/v1", api_routes)
        // Health checks (no auth required)
        .nest("/health", health::create_router(db));

    // OpenAPI spec
    #[cfg(feature = "openapi")]
    let router = router.route("/openapi.json", axum::routing::get(openapi_json));

    let cors = build_cors_layer(api_config);

    Ok(router.layer(TraceLayer::new_for_http()).layer(cors))
}

// ============================================================================
// CORS LAYER
// ============================================================================

/// Build the CORS layer from ApiConfig.
///
/// In development mode (empty origins), allows all origins.
/// In production mode, only allows configured origins.
fn build_cors_layer(config: &ApiConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .max_age(Duration::from_secs(config.cors_max_age_secs));

    if config.cors_origins.is_empty() {
        // Development mode: allow all origins
        tracing::info!("CORS: Development mode - allowing all origins");
        cors.allow_origin(Any).allow_headers(Any)
    } else {
        // Production mode: only allow configured origins
        tracing::info!(
            "CORS: Production mode - allowing origins: {:?}",
            config.cors_origins
        );
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors.allow_origin(origins)
            .allow_headers([
                header::CONTENT_TYPE,
                header::ACCEPT,
                HeaderName::from_static("x-api-key"),
                HeaderName::from_static("idempotency-key"),
            ])
            .allow_credentials(config.cors_allow_credentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_production_validation_requires_cors_origins() {
        let config = ApiConfig::default();
        assert!(validate_api_config_for_production(&config).is_err());

        let mut config = ApiConfig::default();
        config.cors_origins = vec!["https://pulse.run".to_string()];
        assert!(validate_api_config_for_production(&config).is_ok());
    }
}
