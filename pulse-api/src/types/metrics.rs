//! Windowed count (metrics) API types

use pulse_core::Timestamp;
use serde::{Deserialize, Serialize};

/// GET /api/v1/metrics query parameters.
///
/// Bounds arrive as RFC3339 strings and are parsed and validated
/// (`from < to`) before the store is reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
pub struct CountQuery {
    /// Category label to count.
    pub event_name: String,
    /// Inclusive window start, RFC3339.
    pub from: String,
    /// Exclusive window end, RFC3339.
    pub to: String,
}

/// GET /api/v1/metrics response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct EventCountResponse {
    /// Category label that was counted.
    pub event_name: String,
    /// Inclusive window start (UTC).
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub from: Timestamp,
    /// Exclusive window end (UTC).
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub to: Timestamp,
    /// Number of matching events in `[from, to)`.
    pub count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_count_query_requires_all_params() {
        let full: Result<CountQuery, _> = serde_json::from_value(serde_json::json!({
            "event_name": "login",
            "from": "2026-02-13T00:00:00Z",
            "to": "2026-02-14T00:00:00Z",
        }));
        assert!(full.is_ok());

        let missing: Result<CountQuery, _> = serde_json::from_value(serde_json::json!({
            "event_name": "login",
            "from": "2026-02-13T00:00:00Z",
        }));
        assert!(missing.is_err());
    }

    #[test]
    fn test_count_response_serialization() -> Result<(), serde_json::Error> {
        let response = EventCountResponse {
            event_name: "login".to_string(),
            from: Utc.with_ymd_and_hms(2026, 2, 13, 0, 0, 0).unwrap(),
            to: Utc.with_ymd_and_hms(2026, 2, 14, 0, 0, 0).unwrap(),
            count: 42,
        };
        let json = serde_json::to_string(&response)?;
        assert!(json.contains("\"count\":42"));
        assert!(json.contains("\"event_name\":\"login\""));
        Ok(())
    }
}
