//! Validation Traits
//!
//! Common validation patterns extracted from route handlers. Everything
//! here runs before any storage interaction: a request that fails
//! validation never reaches the database.

use crate::error::{ApiError, ApiResult};
use pulse_core::{TimeWindow, Timestamp, ValidationError};

/// Trait for validating non-empty strings.
///
/// # Example
/// ```ignore
/// use pulse_api::validation::ValidateNonEmpty;
///
/// fn ingest(event_name: &str) -> ApiResult<()> {
///     event_name.validate_non_empty("event_name")?;
///     // ... rest of logic
/// }
/// ```
pub trait ValidateNonEmpty {
    /// Validate that the value is non-empty.
    ///
    /// # Arguments
    /// - `field_name`: Name of the field for error messages
    ///
    /// # Errors
    /// Returns `ApiError::missing_field` if the value is empty or whitespace-only.
    fn validate_non_empty(&self, field_name: &str) -> ApiResult<()>;
}

impl ValidateNonEmpty for str {
    fn validate_non_empty(&self, field_name: &str) -> ApiResult<()> {
        if self.trim().is_empty() {
            return Err(ApiError::missing_field(field_name));
        }
        Ok(())
    }
}

impl ValidateNonEmpty for String {
    fn validate_non_empty(&self, field_name: &str) -> ApiResult<()> {
        self.as_str().validate_non_empty(field_name)
    }
}

impl<T: ValidateNonEmpty> ValidateNonEmpty for Option<T> {
    fn validate_non_empty(&self, field_name: &str) -> ApiResult<()> {
        match self {
            Some(value) => value.validate_non_empty(field_name),
            None => Err(ApiError::missing_field(field_name)),
        }
    }
}

/// Parse an RFC3339 timestamp field, normalizing to UTC.
pub fn parse_rfc3339(field_name: &str, value: &str) -> ApiResult<Timestamp> {
    value.validate_non_empty(field_name)?;
    chrono::DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&chrono::Utc))
        .map_err(|_| ApiError::invalid_format(field_name, "an RFC3339 timestamp"))
}

/// Build a query window from its bounds, rejecting `from >= to`.
pub fn validate_window(from: Timestamp, to: Timestamp) -> ApiResult<TimeWindow> {
    TimeWindow::new(from, to).map_err(|err| match err {
        ValidationError::EmptyWindow { .. } => {
            ApiError::invalid_window("'from' must be strictly before 'to'")
        }
        other => other.into(),
    })
}
