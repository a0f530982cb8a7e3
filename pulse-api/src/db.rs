//! Database Connection Pool Module
//!
//! This module provides PostgreSQL connection pooling using deadpool-postgres
//! and the durable event store operations built on it. Deduplication is NOT
//! implemented here: the `events` table's primary key on
//! `(tenant_id, event_id)` arbitrates write races atomically inside
//! Postgres, and this module only observes the outcome. No application-level
//! locking exists anywhere on the write path.

use deadpool_postgres::{Config, ManagerConfig, Pool, RecyclingMethod, Runtime};
use std::time::Duration;
use tokio_postgres::NoTls;

use crate::error::{ApiError, ApiResult};
use pulse_core::{Attributes, IngestOutcome, TimeWindow, Timestamp};
use pulse_store::{validate_event_identity, validate_series_identity};

// ============================================================================
// SCHEMA
// ============================================================================

/// Embedded schema so the service self-bootstraps its database. Safe to
/// apply repeatedly.
///
/// The primary key on `(tenant_id, event_id)` is the idempotency contract;
/// the secondary index on `(tenant_id, event_name, occurred_at)` is the
/// access path for windowed counts and is part of the design, not an
/// optional optimization.
const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS events (
    tenant_id   TEXT        NOT NULL,
    event_id    TEXT        NOT NULL,
    event_name  TEXT        NOT NULL,
    occurred_at TIMESTAMPTZ NOT NULL,
    attributes  JSONB       NOT NULL DEFAULT '{}',
    ingested_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    PRIMARY KEY (tenant_id, event_id)
);

CREATE INDEX IF NOT EXISTS events_tenant_name_occurred_idx
    ON events (tenant_id, event_name, occurred_at);
";

// ============================================================================
// CONNECTION POOL CONFIGURATION
// ============================================================================

/// Database connection pool configuration.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// PostgreSQL host
    pub host: String,
    /// PostgreSQL port
    pub port: u16,
    /// Database name
    pub dbname: String,
    /// Database user
    pub user: String,
    /// Database password
    pub password: String,
    /// Maximum pool size
    pub max_size: usize,
    /// Connection timeout
    pub timeout: Duration,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            dbname: "pulse".to_string(),
            user: "postgres".to_string(),
            password: "".to_string(),
            max_size: 16,
            timeout: Duration::from_secs(30),
        }
    }
}

impl DbConfig {
    /// Create a new database configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("PULSE_DB_HOST").unwrap_or_else(|_| "localhost".to_string()),
            port: std::env::var("PULSE_DB_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5432),
            dbname: std::env::var("PULSE_DB_NAME").unwrap_or_else(|_| "pulse".to_string()),
            user: std::env::var("PULSE_DB_USER").unwrap_or_else(|_| "postgres".to_string()),
            password: std::env::var("PULSE_DB_PASSWORD").unwrap_or_default(),
            max_size: std::env::var("PULSE_DB_POOL_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(16),
            timeout: Duration::from_secs(
                std::env::var("PULSE_DB_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
        }
    }

    /// Create a connection pool from this configuration.
    pub fn create_pool(&self) -> ApiResult<Pool> {
        let mut cfg = Config::new();
        cfg.host = Some(self.host.clone());
        cfg.port = Some(self.port);
        cfg.dbname = Some(self.dbname.clone());
        cfg.user = Some(self.user.clone());
        cfg.password = Some(self.password.clone());

        cfg.manager = Some(ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        });

        let pool = cfg
            .create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(|e| ApiError::database_error(format!("Failed to create pool: {}", e)))?;

        Ok(pool)
    }
}

// ============================================================================
// DATABASE CLIENT WRAPPER
// ============================================================================

/// Database client that wraps a connection pool and provides the durable
/// event store operations.
#[derive(Clone)]
pub struct DbClient {
    pool: Pool,
}

impl DbClient {
    /// Build a client from configuration. Pool creation is lazy; the first
    /// operation establishes connections.
    pub fn from_config(config: &DbConfig) -> ApiResult<Self> {
        let pool = config.create_pool()?;
        Ok(Self { pool })
    }

    /// Apply the embedded schema. Safe to run multiple times.
    pub async fn ensure_schema(&self) -> ApiResult<()> {
        let client = self.pool.get().await?;
        client.batch_execute(SCHEMA_SQL).await?;
        Ok(())
    }

    /// Validate pool connectivity. Used by the readiness endpoint.
    pub async fn health_check(&self) -> ApiResult<()> {
        let client = self.pool.get().await?;
        client.query_one("SELECT 1", &[]).await?;
        Ok(())
    }

    /// Record an event exactly once.
    ///
    /// `INSERT ... ON CONFLICT (tenant_id, event_id) DO NOTHING RETURNING 1`
    /// returns a row only for the submission that created the record; a
    /// conflicting submission returns no row and is reported as
    /// `Duplicate` without comparing its payload against the stored one.
    /// The call returns only once the durability outcome is known.
    pub async fn event_ingest(
        &self,
        tenant_id: &str,
        event_id: &str,
        event_name: &str,
        occurred_at: Timestamp,
        attributes: Option<Attributes>,
    ) -> ApiResult<IngestOutcome> {
        validate_event_identity(tenant_id, event_id, event_name)
            .map_err(ApiError::from)?;

        let attributes = serde_json::Value::Object(attributes.unwrap_or_default());

        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                "INSERT INTO events (tenant_id, event_id, event_name, occurred_at, attributes)
                 VALUES ($1, $2, $3, $4, $5)
                 ON CONFLICT (tenant_id, event_id) DO NOTHING
                 RETURNING 1",
                &[
                    &tenant_id,
                    &event_id,
                    &event_name,
                    &occurred_at,
                    &attributes,
                ],
            )
            .await?;

        let outcome = if row.is_some() {
            IngestOutcome::Created
        } else {
            IngestOutcome::Duplicate
        };

        tracing::debug!(
            tenant_id,
            event_id,
            event_name,
            outcome = %outcome,
            "event ingest"
        );

        Ok(outcome)
    }

    /// Count events for `(tenant_id, event_name)` with `occurred_at` in the
    /// half-open window `[from, to)`.
    ///
    /// Failure is surfaced as an error, never as a zero count.
    pub async fn event_count(
        &self,
        tenant_id: &str,
        event_name: &str,
        window: TimeWindow,
    ) -> ApiResult<i64> {
        validate_series_identity(tenant_id, event_name).map_err(ApiError::from)?;

        let client = self.pool.get().await?;
        let row = client
            .query_one(
                "SELECT COUNT(*)
                 FROM events
                 WHERE tenant_id = $1
                   AND event_name = $2
                   AND occurred_at >= $3
                   AND occurred_at <  $4",
                &[&tenant_id, &event_name, &window.from, &window.to],
            )
            .await?;

        Ok(row.get(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DbConfig::default();
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 5432);
        assert_eq!(config.dbname, "pulse");
        assert_eq!(config.max_size, 16);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_pool_creation_is_lazy() {
        // No PostgreSQL is running here; building the client must still
        // succeed because connections are only opened on first use.
        let client = DbClient::from_config(&DbConfig::default());
        assert!(client.is_ok());
    }

    #[test]
    fn test_schema_declares_dedup_key_and_scan_index() {
        assert!(SCHEMA_SQL.contains("PRIMARY KEY (tenant_id, event_id)"));
        assert!(SCHEMA_SQL.contains("ON events (tenant_id, event_name, occurred_at)"));
    }
}
