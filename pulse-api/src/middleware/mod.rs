//! Middleware modules for Pulse API
//!
//! - `auth`: credential resolution middleware. Runs before every protected
//!   handler and injects [`crate::auth::AuthContext`] into request
//!   extensions; handlers never see raw credentials.

mod auth;

pub use auth::{auth_middleware, AuthExtractor, AuthMiddlewareError, AuthMiddlewareState};
