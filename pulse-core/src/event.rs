//! Event record and windowed-count types.
//!
//! An [`EventRecord`] is the sole persisted entity in Pulse. Its identity is
//! the `(tenant_id, event_id)` pair - the idempotency key. Records are
//! immutable once written: no update or delete operation exists.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;
use crate::identity::{EventId, TenantId, Timestamp};

// ============================================================================
// ATTRIBUTES
// ============================================================================

/// Free-form event attributes: a JSON object attached to an event at
/// ingestion time. Defaults to the empty map when the caller omits it.
pub type Attributes = serde_json::Map<String, serde_json::Value>;

// ============================================================================
// EVENT RECORD
// ============================================================================

/// A durably recorded event.
///
/// Identity is `(tenant_id, event_id)`; two writes carrying the same pair
/// are the same logical event no matter what the rest of the payload says.
/// The stored record always wins: a duplicate submission with a differing
/// `event_name`, `occurred_at`, or `attributes` is discarded without
/// comparison. Callers that mutate a payload between retries of the same id
/// will not be told - that is a client bug this contract hides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct EventRecord {
    /// Owning tenant. Assigned by the resolver, never client-supplied.
    pub tenant_id: TenantId,
    /// Idempotency key within the tenant. Client-supplied or generated.
    pub event_id: EventId,
    /// Free-form category label (e.g. "login", "purchase").
    pub event_name: String,
    /// When the event happened, per the caller. Not server-observed time.
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub occurred_at: Timestamp,
    /// Free-form attributes. Empty map when omitted at ingest.
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(value_type = Object))]
    pub attributes: Attributes,
    /// When the store wrote the record. Server-assigned.
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub ingested_at: Timestamp,
}

// ============================================================================
// INGEST OUTCOME
// ============================================================================

/// Outcome of a successful ingest call.
///
/// `Duplicate` is a success, not an error: the logical event already exists
/// and the retry was absorbed. Exactly one of N racing submissions for the
/// same `(tenant_id, event_id)` observes `Created`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum IngestOutcome {
    /// The record did not exist and was written.
    Created,
    /// A record with the same `(tenant_id, event_id)` already existed;
    /// nothing was written.
    Duplicate,
}

impl IngestOutcome {
    /// True when the submission was absorbed as a retry.
    pub const fn is_duplicate(&self) -> bool {
        matches!(self, IngestOutcome::Duplicate)
    }
}

impl fmt::Display for IngestOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngestOutcome::Created => write!(f, "created"),
            IngestOutcome::Duplicate => write!(f, "duplicate"),
        }
    }
}

// ============================================================================
// TIME WINDOW
// ============================================================================

/// A half-open time window `[from, to)`.
///
/// `from` is included, `to` is excluded, exactly at boundary values: a
/// record with `occurred_at == to` is outside the window. Adjacent windows
/// therefore never double-count or skip a boundary event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct TimeWindow {
    /// Inclusive lower bound.
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub from: Timestamp,
    /// Exclusive upper bound. Strictly greater than `from`.
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub to: Timestamp,
}

impl TimeWindow {
    /// Create a window, rejecting `from >= to`.
    pub fn new(from: Timestamp, to: Timestamp) -> Result<Self, ValidationError> {
        if from >= to {
            return Err(ValidationError::EmptyWindow { from, to });
        }
        Ok(Self { from, to })
    }

    /// Half-open membership test: `from <= ts < to`.
    pub fn contains(&self, ts: Timestamp) -> bool {
        self.from <= ts && ts < self.to
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.from.to_rfc3339(), self.to.to_rfc3339())
    }
}
