//! Tracing Subscriber Initialization
//!
//! Sets up structured logging for the service. Output format and verbosity
//! are environment-driven so the same binary serves development (pretty
//! text, debug spans) and production (JSON lines for log shippers).

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{ApiError, ApiResult};

/// Telemetry configuration from environment variables.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name attached to log lines
    pub service_name: String,
    /// Emit JSON lines instead of human-readable text
    pub json_output: bool,
    /// Default filter directive when RUST_LOG is unset
    pub default_filter: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: std::env::var("PULSE_SERVICE_NAME")
                .unwrap_or_else(|_| "pulse-api".to_string()),
            json_output: std::env::var("PULSE_LOG_JSON")
                .map(|s| s == "true" || s == "1")
                .unwrap_or(false),
            default_filter: "info,tower_http=debug".to_string(),
        }
    }
}

/// Initialize the tracing subscriber.
///
/// Call once at application startup, before any tracing occurs. Honors
/// `RUST_LOG` when set; falls back to the config's default filter.
pub fn init_tracing(config: &TelemetryConfig) -> ApiResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_filter.clone()));

    let registry = tracing_subscriber::registry().with(filter);

    let result = if config.json_output {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };

    result.map_err(|e| {
        ApiError::internal_error(format!("Failed to initialize tracing subscriber: {}", e))
    })?;

    tracing::info!(service = %config.service_name, "telemetry initialized");
    Ok(())
}
