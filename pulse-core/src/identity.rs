//! Identity types for Pulse entities

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Tenant identifier. Opaque, non-empty, assigned by the tenant resolver.
///
/// Tenants never see each other's identifiers; the resolver maps an API
/// credential to exactly one of these.
pub type TenantId = String;

/// Event identifier. Opaque, non-empty, unique per tenant.
///
/// Clients may supply their own (any non-empty string is accepted); when
/// absent, the transport layer generates one with [`new_event_id`].
pub type EventId = String;

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

/// Generate a new UUIDv7 event id (timestamp-sortable).
/// UUIDv7 embeds a Unix timestamp, making generated ids naturally sortable
/// by creation time.
pub fn new_event_id() -> EventId {
    Uuid::now_v7().to_string()
}
