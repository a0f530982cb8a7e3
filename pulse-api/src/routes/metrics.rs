//! Windowed Count (Metrics) REST Route
//!
//! GET /api/v1/metrics?event_name=...&from=...&to=...
//! - Requires X-API-Key (tenant context via the auth middleware)
//! - Returns the count for the half-open window [from, to)

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};

use crate::{
    db::DbClient,
    error::{ApiError, ApiResult},
    middleware::AuthExtractor,
    state::AppState,
    types::{CountQuery, EventCountResponse},
    validation::{parse_rfc3339, validate_window, ValidateNonEmpty},
};

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

/// GET /api/v1/metrics - Count events in a half-open window
#[utoipa::path(
    get,
    path = "/api/v1/metrics",
    tag = "Metrics",
    params(CountQuery),
    responses(
        (status = 200, description = "Count of matching events", body = EventCountResponse),
        (status = 400, description = "Validation failure", body = ApiError),
        (status = 401, description = "Unauthorized", body = ApiError),
    ),
    security(
        ("api_key" = [])
    )
)]
pub async fn count_events(
    State(db): State<DbClient>,
    AuthExtractor(auth): AuthExtractor,
    Query(query): Query<CountQuery>,
) -> ApiResult<impl IntoResponse> {
    // Validation happens before any storage interaction; a failed count is
    // reported as a failure, never as zero.
    query.event_name.validate_non_empty("event_name")?;
    let from = parse_rfc3339("from", &query.from)?;
    let to = parse_rfc3339("to", &query.to)?;
    let window = validate_window(from, to)?;

    let count = db
        .event_count(&auth.tenant_id, &query.event_name, window)
        .await?;

    Ok(Json(EventCountResponse {
        event_name: query.event_name,
        from: window.from,
        to: window.to,
        count,
    }))
}

// ============================================================================
// ROUTER SETUP
// ============================================================================

/// Create the metrics routes router.
pub fn create_router() -> axum::Router<AppState> {
    axum::Router::new().route("/", axum::routing::get(count_events))
}
