//! Pulse Store - Event Store Trait and In-Memory Implementation
//!
//! Defines the storage abstraction for Pulse events. The durable PostgreSQL
//! implementation lives in pulse-api; [`InMemoryEventStore`] here backs
//! tests, development, and embedded use.

pub mod memory;

pub use memory::InMemoryEventStore;

use async_trait::async_trait;
use pulse_core::{Attributes, IngestOutcome, StoreError, TimeWindow, Timestamp, ValidationError};

// ============================================================================
// PRECONDITION HELPERS
// ============================================================================

/// Reject blank identity fields before any storage interaction.
///
/// Every implementation applies the same precondition, so callers that
/// bypass the HTTP layer still get validation failures distinct from
/// storage failures.
pub fn validate_event_identity(
    tenant_id: &str,
    event_id: &str,
    event_name: &str,
) -> Result<(), ValidationError> {
    require_non_empty("tenant_id", tenant_id)?;
    require_non_empty("event_id", event_id)?;
    require_non_empty("event_name", event_name)?;
    Ok(())
}

/// Reject blank series fields (count path).
pub fn validate_series_identity(
    tenant_id: &str,
    event_name: &str,
) -> Result<(), ValidationError> {
    require_non_empty("tenant_id", tenant_id)?;
    require_non_empty("event_name", event_name)?;
    Ok(())
}

fn require_non_empty(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::RequiredFieldMissing {
            field: field.to_string(),
        });
    }
    Ok(())
}

// ============================================================================
// EVENT STORE TRAIT
// ============================================================================

/// Async storage contract for Pulse events.
///
/// The abstract requirement is a mapping keyed by `(tenant_id, event_id)`
/// with atomic insert-if-absent semantics, plus an access path ordered by
/// `(tenant_id, event_name, occurred_at)` for windowed counts. The
/// uniqueness of the dedup key is the sole concurrency-control mechanism:
/// implementations must not need application-level locking beyond whatever
/// makes the insert-if-absent step itself atomic.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Record an event exactly once.
    ///
    /// Returns `Created` when no record with this `(tenant_id, event_id)`
    /// existed and one was written; `Duplicate` when one already exists -
    /// regardless of whether the rest of the payload matches the stored
    /// record. Of N racing identical submissions exactly one observes
    /// `Created`; no duplicate row is ever visible, even transiently.
    ///
    /// # Errors
    /// [`StoreError::Validation`] on blank identity fields (checked before
    /// storage is touched); other variants when durability is in doubt, in
    /// which case the caller must treat the outcome as unknown and may
    /// safely retry.
    async fn ingest(
        &self,
        tenant_id: &str,
        event_id: &str,
        event_name: &str,
        occurred_at: Timestamp,
        attributes: Option<Attributes>,
    ) -> Result<IngestOutcome, StoreError>;

    /// Count events for `(tenant_id, event_name)` with `occurred_at` in the
    /// half-open window `[from, to)`.
    ///
    /// Reflects records visible when the query runs; once an ingest call
    /// has returned `Created`, every subsequent count includes its record.
    ///
    /// # Errors
    /// Storage failure is surfaced as an error - never silently reported
    /// as zero matching records.
    async fn count(
        &self,
        tenant_id: &str,
        event_name: &str,
        window: TimeWindow,
    ) -> Result<i64, StoreError>;
}
