//! Tenant Resolution via API Keys
//!
//! Maps an opaque API credential to a tenant identifier. The mapping is a
//! static, process-lifetime snapshot built once at startup and shared by
//! reference - no mutation path exists while the process runs, so request
//! handling never races on it.
//!
//! Unknown and blank credentials fail resolution identically: the response
//! leaks nothing about which credentials are almost-valid.

use std::collections::HashMap;

use crate::error::{ApiError, ApiResult};
use pulse_core::TenantId;

/// Header carrying the API credential.
pub const API_KEY_HEADER: &str = "x-api-key";

// ============================================================================
// AUTH CONFIGURATION
// ============================================================================

/// Authentication configuration: the credential -> tenant table.
///
/// Lookup is O(1). The table is immutable after construction; handlers
/// receive it behind an `Arc`.
#[derive(Clone, Default)]
pub struct AuthConfig {
    /// Credential -> tenant id. Keys are never logged.
    keys: HashMap<String, TenantId>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("keys", &format!("[{} credentials]", self.keys.len()))
            .finish()
    }
}

impl AuthConfig {
    /// Create authentication configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `PULSE_API_KEYS`: credential table as `"tenant1:key1,tenant2:key2"`
    ///
    /// When the variable is unset or empty, a single development credential
    /// (`tenant-key-123` -> `tenant1`) is installed so the service runs out
    /// of the box.
    ///
    /// # Errors
    /// Returns an error when the variable is present but malformed; a typo
    /// in the credential table must fail startup, not silently drop tenants.
    pub fn from_env() -> ApiResult<Self> {
        let raw = std::env::var("PULSE_API_KEYS").unwrap_or_default();
        let mut config = Self::parse(&raw)?;

        if config.keys.is_empty() {
            tracing::warn!("PULSE_API_KEYS not set; installing development credential");
            config.add_key("tenant-key-123".to_string(), "tenant1".to_string());
        }

        Ok(config)
    }

    /// Parse a credential table of the form `"tenant1:key1,tenant2:key2"`.
    pub fn parse(raw: &str) -> ApiResult<Self> {
        let mut keys = HashMap::new();

        for pair in raw.split(',') {
            let pair = pair.trim();
            if pair.is_empty() {
                continue;
            }
            let (tenant, key) = pair.split_once(':').ok_or_else(|| {
                ApiError::invalid_input("PULSE_API_KEYS must be \"tenant:key,tenant:key\"")
            })?;
            let tenant = tenant.trim();
            let key = key.trim();
            if tenant.is_empty() || key.is_empty() {
                return Err(ApiError::invalid_input(
                    "PULSE_API_KEYS must be \"tenant:key,tenant:key\"",
                ));
            }
            keys.insert(key.to_string(), tenant.to_string());
        }

        Ok(Self { keys })
    }

    /// Register a credential. Only callable before the config is shared.
    pub fn add_key(&mut self, key: String, tenant_id: TenantId) {
        self.keys.insert(key, tenant_id);
    }

    /// Number of registered credentials.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// True when no credentials are registered.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Resolve a credential to its tenant id.
    ///
    /// Blank credentials resolve to nothing, the same as unknown ones.
    pub fn resolve(&self, credential: &str) -> Option<&str> {
        let credential = credential.trim();
        if credential.is_empty() {
            return None;
        }
        self.keys.get(credential).map(String::as_str)
    }
}

// ============================================================================
// AUTHENTICATION CONTEXT
// ============================================================================

/// Authentication context injected into request extensions after the
/// credential has been resolved. Handlers downstream of the auth middleware
/// read the tenant id from here and never see the raw credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    /// The resolved tenant. Non-empty by construction.
    pub tenant_id: TenantId,
}

// ============================================================================
// AUTHENTICATION
// ============================================================================

/// Authenticate a request from its API key header value.
///
/// Missing, blank, and unknown credentials all yield the same
/// `Unauthorized` error - identical code, identical message.
pub fn authenticate(config: &AuthConfig, api_key: Option<&str>) -> ApiResult<AuthContext> {
    let credential = api_key.unwrap_or_default();
    match config.resolve(credential) {
        Some(tenant_id) => Ok(AuthContext {
            tenant_id: tenant_id.to_string(),
        }),
        None => Err(ApiError::unauthorized()),
    }
}
