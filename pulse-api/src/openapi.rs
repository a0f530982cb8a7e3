//! OpenAPI Specification for Pulse API
//!
//! This module defines the OpenAPI document for the Pulse REST API.
//! It uses utoipa to generate the specification from Rust types and route
//! annotations.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::error::{ApiError, ErrorCode};
use crate::routes::{event, health, metrics};
use crate::types::{EventCountResponse, IngestEventRequest, IngestEventResponse};

/// OpenAPI document for the Pulse API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Pulse API",
        version = "0.2.0",
        description = "Multi-tenant event analytics: idempotent ingestion and windowed counts",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT"),
    ),
    servers(
        (url = "http://localhost:8080", description = "Local Development")
    ),
    tags(
        (name = "Events", description = "Idempotent event ingestion"),
        (name = "Metrics", description = "Per-tenant windowed event counts"),
        (name = "Health", description = "Liveness and readiness probes")
    ),
    paths(
        event::ingest_event,
        metrics::count_events,
        health::ping,
        health::liveness,
        health::readiness,
    ),
    components(
        schemas(
            IngestEventRequest,
            IngestEventResponse,
            EventCountResponse,
            ApiError,
            ErrorCode,
            health::HealthResponse,
            health::HealthStatus,
            health::HealthDetails,
            health::ComponentHealth,
        )
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Registers the X-API-Key security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "api_key",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("X-API-Key"))),
            );
        }
    }
}
