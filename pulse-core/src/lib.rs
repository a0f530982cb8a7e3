//! Pulse Core - Entity Types
//!
//! Pure data structures with no behavior. All other crates depend on this.
//! This crate contains ONLY data types - no business logic.

pub mod error;
pub mod event;
pub mod identity;

pub use error::{StoreError, ValidationError};
pub use event::{Attributes, EventRecord, IngestOutcome, TimeWindow};
pub use identity::{new_event_id, EventId, TenantId, Timestamp};
