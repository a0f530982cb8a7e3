//! Property-Based Tests for Authentication Enforcement
//!
//! For any API request, IF the request's credential does not resolve to a
//! tenant THEN the API SHALL return 401 Unauthorized - and missing, blank,
//! and unknown credentials are indistinguishable in the response. Requests
//! carrying a registered credential reach the handler with the resolved
//! tenant.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware,
    routing::get,
    Json, Router,
};
use proptest::prelude::*;
use pulse_api::middleware::{auth_middleware, AuthExtractor, AuthMiddlewareState};
use pulse_api::AuthConfig;
use tower::ServiceExt;

// ============================================================================
// TEST CONFIGURATION
// ============================================================================

/// Create a test authentication configuration with known credentials.
fn test_auth_config() -> AuthConfig {
    AuthConfig::parse("tenant1:valid_api_key_123,tenant2:valid_api_key_456").unwrap()
}

/// Echo the resolved tenant so assertions can check isolation.
async fn whoami(AuthExtractor(auth): AuthExtractor) -> Json<String> {
    Json(auth.tenant_id)
}

/// Create a test Axum app with authentication middleware.
fn test_app() -> Router {
    let auth_state = AuthMiddlewareState::new(test_auth_config());

    Router::new()
        .route("/api/v1/whoami", get(whoami))
        .layer(middleware::from_fn_with_state(auth_state, auth_middleware))
}

async fn send(app: Router, api_key: Option<&str>) -> (StatusCode, Vec<u8>) {
    let mut builder = Request::builder().uri("/api/v1/whoami");
    if let Some(key) = api_key {
        builder = builder.header("x-api-key", key);
    }
    let response = app
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .unwrap()
        .to_vec();
    (status, body)
}

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(future)
}

// ============================================================================
// PROPERTY TEST STRATEGIES
// ============================================================================

/// Strategy for generating authentication headers: valid keys, random
/// invalid keys, blank keys, or no header at all.
#[derive(Debug, Clone)]
enum AuthHeader {
    Valid(&'static str),
    Invalid(String),
    Blank(String),
    None,
}

fn auth_header_strategy() -> impl Strategy<Value = AuthHeader> {
    prop_oneof![
        Just(AuthHeader::Valid("valid_api_key_123")),
        Just(AuthHeader::Valid("valid_api_key_456")),
        "[a-z0-9_]{10,30}".prop_map(AuthHeader::Invalid),
        " {0,5}".prop_map(AuthHeader::Blank),
        Just(AuthHeader::None),
    ]
}

// ============================================================================
// PROPERTIES
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Requests are admitted exactly when the credential resolves.
    #[test]
    fn prop_auth_gate_admits_only_registered_credentials(header in auth_header_strategy()) {
        block_on(async {
            let app = test_app();
            let (status, _) = match &header {
                AuthHeader::Valid(key) => send(app, Some(key)).await,
                AuthHeader::Invalid(key) => send(app, Some(key)).await,
                AuthHeader::Blank(key) => send(app, Some(key)).await,
                AuthHeader::None => send(app, None).await,
            };

            match header {
                AuthHeader::Valid(_) => prop_assert_eq!(status, StatusCode::OK),
                _ => prop_assert_eq!(status, StatusCode::UNAUTHORIZED),
            }
            Ok(())
        })?;
    }

    /// Every rejected request carries the same body: nothing distinguishes
    /// a near-miss credential from a missing one.
    #[test]
    fn prop_rejections_are_uniform(key in "[a-z0-9_]{1,40}") {
        block_on(async {
            prop_assume!(!matches!(key.as_str(), "valid_api_key_123" | "valid_api_key_456"));

            let (status_unknown, body_unknown) = send(test_app(), Some(&key)).await;
            let (status_missing, body_missing) = send(test_app(), None).await;

            prop_assert_eq!(status_unknown, StatusCode::UNAUTHORIZED);
            prop_assert_eq!(status_missing, StatusCode::UNAUTHORIZED);
            prop_assert_eq!(body_unknown, body_missing);
            Ok(())
        })?;
    }
}

// ============================================================================
// EXAMPLE-BASED CHECKS
// ============================================================================

#[tokio::test]
async fn test_each_credential_resolves_to_its_own_tenant() {
    let (status, body) = send(test_app(), Some("valid_api_key_123")).await;
    assert_eq!(status, StatusCode::OK);
    let tenant: String = serde_json::from_slice(&body).unwrap();
    assert_eq!(tenant, "tenant1");

    let (status, body) = send(test_app(), Some("valid_api_key_456")).await;
    assert_eq!(status, StatusCode::OK);
    let tenant: String = serde_json::from_slice(&body).unwrap();
    assert_eq!(tenant, "tenant2");
}

#[tokio::test]
async fn test_unauthorized_body_is_structured() {
    let (status, body) = send(test_app(), Some("not-a-key")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let error: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(error["code"], "UNAUTHORIZED");
    assert!(error["message"].is_string());
}
