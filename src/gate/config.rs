//! Gate configuration and shared per-request state.

use axum::http::Method;
use std::sync::Arc;

use super::identity::{IdentityProvider, IdentityVerifier};

const DEFAULT_CSRF_COOKIE_MAX_AGE_SECONDS: i64 = 24 * 60 * 60;

/// Cookie carrying the CSRF secret; the browser is the only store for it.
pub const CSRF_COOKIE_NAME: &str = "csrf_secret";

/// Header the client must echo the CSRF secret back in.
pub const CSRF_HEADER_NAME: &str = "x-csrf-token";

#[derive(Clone, Debug)]
pub struct GateConfig {
    frontend_base_url: String,
    csrf_cookie_max_age_seconds: i64,
}

impl GateConfig {
    #[must_use]
    pub fn new(frontend_base_url: String) -> Self {
        Self {
            frontend_base_url,
            csrf_cookie_max_age_seconds: DEFAULT_CSRF_COOKIE_MAX_AGE_SECONDS,
        }
    }

    #[must_use]
    pub fn with_csrf_cookie_max_age_seconds(mut self, seconds: i64) -> Self {
        self.csrf_cookie_max_age_seconds = seconds;
        self
    }

    #[must_use]
    pub fn csrf_cookie_max_age_seconds(&self) -> i64 {
        self.csrf_cookie_max_age_seconds
    }

    pub(crate) fn frontend_base_url(&self) -> &str {
        &self.frontend_base_url
    }

    /// Only mark cookies secure when the frontend is served over HTTPS.
    pub(crate) fn csrf_cookie_secure(&self) -> bool {
        self.frontend_base_url.starts_with("https://")
    }

    /// Methods that never change state and therefore skip the CSRF stage.
    pub(crate) fn is_safe_method(method: &Method) -> bool {
        matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
    }
}

/// Per-process gate state handed to middleware and handlers.
pub struct GateState {
    config: GateConfig,
    verifier: IdentityVerifier,
}

impl GateState {
    #[must_use]
    pub fn new(config: GateConfig, provider: Arc<dyn IdentityProvider>) -> Self {
        Self {
            config,
            verifier: IdentityVerifier::new(provider),
        }
    }

    #[must_use]
    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    #[must_use]
    pub fn verifier(&self) -> &IdentityVerifier {
        &self.verifier
    }
}
