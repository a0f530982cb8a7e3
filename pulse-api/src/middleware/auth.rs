//! Axum Middleware for Tenant Resolution
//!
//! This middleware:
//! - Extracts the `X-API-Key` header
//! - Resolves it against the immutable credential table
//! - Injects AuthContext into request extensions on success
//! - Returns 401 for requests whose credential does not resolve
//!
//! Missing, blank, and unknown credentials are rejected identically.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::auth::{authenticate, AuthConfig, AuthContext, API_KEY_HEADER};
use crate::error::ApiError;

// ============================================================================
// MIDDLEWARE STATE
// ============================================================================

/// Shared state for the authentication middleware.
///
/// Wraps the startup snapshot of the credential table; cloning shares the
/// same immutable table.
#[derive(Debug, Clone)]
pub struct AuthMiddlewareState {
    /// Credential -> tenant table, fixed for the process lifetime.
    pub auth_config: Arc<AuthConfig>,
}

impl AuthMiddlewareState {
    /// Create middleware state from an authentication configuration.
    pub fn new(auth_config: AuthConfig) -> Self {
        Self {
            auth_config: Arc::new(auth_config),
        }
    }
}

// ============================================================================
// MIDDLEWARE FUNCTION
// ============================================================================

/// Axum middleware enforcing tenant context on every protected route.
///
/// # Example
///
/// ```ignore
/// use axum::{Router, middleware};
/// use pulse_api::middleware::{auth_middleware, AuthMiddlewareState};
/// use pulse_api::AuthConfig;
///
/// let auth_state = AuthMiddlewareState::new(AuthConfig::from_env()?);
/// let app = Router::new()
///     .route("/api/v1/events", axum::routing::post(|| async { "OK" }))
///     .layer(middleware::from_fn_with_state(auth_state, auth_middleware));
/// ```
pub async fn auth_middleware(
    State(state): State<AuthMiddlewareState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthMiddlewareError> {
    let api_key = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|h| h.to_str().ok());

    let auth_context = authenticate(&state.auth_config, api_key).map_err(AuthMiddlewareError)?;

    // Inject AuthContext into request extensions; downstream handlers read
    // the resolved tenant from there and never the raw credential.
    request.extensions_mut().insert(auth_context);

    Ok(next.run(request).await)
}

// ============================================================================
// ERROR HANDLING
// ============================================================================

/// Error wrapper for the middleware that implements IntoResponse, so a
/// failed resolution becomes a structured 401 body without reaching any
/// handler.
#[derive(Debug)]
pub struct AuthMiddlewareError(pub ApiError);

impl IntoResponse for AuthMiddlewareError {
    fn into_response(self) -> Response {
        self.0.into_response()
    }
}

// ============================================================================
// TYPED EXTRACTOR
// ============================================================================

/// Typed Axum extractor for the authentication context.
///
/// Implements `FromRequestParts`, so protected handlers state their tenant
/// requirement in their signature and it is enforced by the type system:
///
/// ```ignore
/// async fn ingest_event(AuthExtractor(auth): AuthExtractor) -> impl IntoResponse {
///     // auth.tenant_id is the resolved tenant
/// }
/// ```
///
/// The `auth_middleware` must be applied to the route for this extractor to
/// succeed; without it the extractor returns a 500.
#[derive(Debug, Clone)]
pub struct AuthExtractor(pub AuthContext);

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthExtractor
where
    S: Send + Sync,
{
    type Rejection = AuthMiddlewareError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .map(AuthExtractor)
            .ok_or_else(|| {
                AuthMiddlewareError(ApiError::internal_error(
                    "AuthContext not found in request extensions. \
                     Ensure auth_middleware is applied to this route.",
                ))
            })
    }
}

impl std::ops::Deref for AuthExtractor {
    type Target = AuthContext;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
