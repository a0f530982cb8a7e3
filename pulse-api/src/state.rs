//! Shared application state for Axum routers.

use crate::db::DbClient;

/// Application-wide state shared across all routes.
#[derive(Clone)]
pub struct AppState {
    /// Database client backing the durable event store.
    pub db: DbClient,
    /// Process start, for uptime reporting.
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Create application state around a database client.
    pub fn new(db: DbClient) -> Self {
        Self {
            db,
            start_time: std::time::Instant::now(),
        }
    }
}

// Use macro to reduce boilerplate for FromRef implementations
crate::impl_from_ref!(DbClient, db);
crate::impl_from_ref!(std::time::Instant, start_time);
