//! Event Ingestion REST Route
//!
//! POST /api/v1/events
//! - Requires X-API-Key (tenant context via the auth middleware)
//! - Durable: returns success only after the store reports the outcome
//! - Idempotent: duplicates detected via `(tenant_id, event_id)` uniqueness
//!
//! Idempotency key precedence:
//! 1. `Idempotency-Key` header (recommended for retries)
//! 2. `event_id` in the payload
//! 3. generated UUIDv7 (fallback; cannot dedupe client retries)

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};

use crate::{
    db::DbClient,
    error::{ApiError, ApiResult},
    middleware::AuthExtractor,
    state::AppState,
    types::{IngestEventRequest, IngestEventResponse},
    validation::{parse_rfc3339, ValidateNonEmpty},
};
use pulse_core::{new_event_id, IngestOutcome};

/// Header carrying a client-chosen idempotency key for safe retries.
pub const IDEMPOTENCY_KEY_HEADER: &str = "idempotency-key";

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

/// POST /api/v1/events - Ingest one event exactly once
#[utoipa::path(
    post,
    path = "/api/v1/events",
    tag = "Events",
    request_body = IngestEventRequest,
    responses(
        (status = 201, description = "Event created", body = IngestEventResponse),
        (status = 200, description = "Duplicate absorbed (idempotent success)", body = IngestEventResponse),
        (status = 400, description = "Validation failure", body = ApiError),
        (status = 401, description = "Unauthorized", body = ApiError),
    ),
    security(
        ("api_key" = [])
    )
)]
pub async fn ingest_event(
    State(db): State<DbClient>,
    AuthExtractor(auth): AuthExtractor,
    headers: HeaderMap,
    Json(request): Json<IngestEventRequest>,
) -> ApiResult<impl IntoResponse> {
    // Validation happens before any storage interaction.
    request.event_name.validate_non_empty("event_name")?;
    let occurred_at = parse_rfc3339("timestamp", &request.timestamp)?;

    let event_id = headers
        .get(IDEMPOTENCY_KEY_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(str::to_string)
        .or_else(|| {
            request
                .event_id
                .as_deref()
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(new_event_id);

    let outcome = db
        .event_ingest(
            &auth.tenant_id,
            &event_id,
            &request.event_name,
            occurred_at,
            request.attributes,
        )
        .await?;

    // 201 for new events, 200 for duplicates (idempotent success).
    let status = match outcome {
        IngestOutcome::Created => StatusCode::CREATED,
        IngestOutcome::Duplicate => StatusCode::OK,
    };

    Ok((
        status,
        Json(IngestEventResponse::from_outcome(event_id, outcome)),
    ))
}

// ============================================================================
// ROUTER SETUP
// ============================================================================

/// Create the event routes router.
pub fn create_router() -> axum::Router<AppState> {
    axum::Router::new().route("/", axum::routing::post(ingest_event))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idempotency_header_name_is_lowercase() {
        // HeaderMap lookups are case-insensitive, but the constant must be
        // a valid lowercase header name.
        assert_eq!(IDEMPOTENCY_KEY_HEADER, "idempotency-key");
    }

    #[test]
    fn test_response_status_choice() {
        // The handler maps Created to 201 and Duplicate to 200; both are
        // success statuses - a duplicate is never an error.
        assert!(StatusCode::CREATED.is_success());
        assert!(StatusCode::OK.is_success());
    }
}
