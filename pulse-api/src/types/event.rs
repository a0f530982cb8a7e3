//! Event ingestion API types

use pulse_core::{Attributes, EventId, IngestOutcome};
use serde::{Deserialize, Serialize};

/// POST /api/v1/events request body.
///
/// `event_id` is optional; clients that retry should pass the
/// `Idempotency-Key` header (which takes precedence) or a stable
/// `event_id`. When neither is present the server generates one, which
/// cannot deduplicate client retries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct IngestEventRequest {
    /// Idempotency key within the tenant. Any non-empty string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<EventId>,
    /// Free-form category label (e.g. "login").
    pub event_name: String,
    /// When the event occurred, RFC3339.
    pub timestamp: String,
    /// Free-form attributes. Defaults to an empty map.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<Object>))]
    pub attributes: Option<Attributes>,
}

/// POST /api/v1/events response body.
///
/// `duplicate: true` indicates idempotent success - the event already
/// existed and the submission was absorbed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct IngestEventResponse {
    /// The idempotency key under which the event is stored.
    pub event_id: EventId,
    /// Whether the event already existed.
    pub duplicate: bool,
}

impl IngestEventResponse {
    /// Build a response from the store outcome.
    pub fn from_outcome(event_id: EventId, outcome: IngestOutcome) -> Self {
        Self {
            event_id,
            duplicate: outcome.is_duplicate(),
        }
    }
}
