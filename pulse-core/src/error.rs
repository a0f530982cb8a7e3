//! Error types for Pulse operations

use crate::identity::Timestamp;
use thiserror::Error;

/// Validation errors.
///
/// Detected before any storage interaction; fully recoverable by the caller
/// correcting input. Never retried automatically.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required field missing: {field}")]
    RequiredFieldMissing { field: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Invalid time window: from {from} must be strictly before to {to}")]
    EmptyWindow { from: Timestamp, to: Timestamp },
}

/// Storage layer errors.
///
/// A storage error means the outcome of the operation is unknown to the
/// caller. Retrying ingest is always safe (the dedup key arbitrates);
/// retrying count is naturally idempotent. A duplicate submission is NOT an
/// error - it is the `Duplicate` variant of a successful ingest outcome.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Storage unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("Insert failed: {reason}")]
    InsertFailed { reason: String },

    #[error("Query failed: {reason}")]
    QueryFailed { reason: String },

    #[error("Attribute serialization failed: {reason}")]
    SerializationFailed { reason: String },

    #[error("Storage lock poisoned")]
    LockPoisoned,

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono::Utc;

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::RequiredFieldMissing {
            field: "event_name".to_string(),
        };
        assert_eq!(err.to_string(), "Required field missing: event_name");
    }

    #[test]
    fn test_empty_window_display_names_both_bounds() {
        let from = Utc.with_ymd_and_hms(2026, 2, 14, 0, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2026, 2, 13, 0, 0, 0).unwrap();
        let err = ValidationError::EmptyWindow { from, to };
        let msg = err.to_string();
        assert!(msg.contains("2026-02-14"));
        assert!(msg.contains("2026-02-13"));
    }

    #[test]
    fn test_store_error_wraps_validation() {
        let err: StoreError = ValidationError::RequiredFieldMissing {
            field: "tenant_id".to_string(),
        }
        .into();
        assert!(matches!(err, StoreError::Validation(_)));
        assert_eq!(err.to_string(), "Required field missing: tenant_id");
    }

    #[test]
    fn test_store_error_display() {
        let err = StoreError::Unavailable {
            reason: "connection refused".to_string(),
        };
        assert_eq!(err.to_string(), "Storage unavailable: connection refused");
    }
}
