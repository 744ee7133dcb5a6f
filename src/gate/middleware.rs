//! Auth gate middleware: CSRF stage first, then identity for marked routes.
//!
//! Both stages terminate the request on failure; nothing downgrades to
//! anonymous access on a protected route.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::warn;

use super::{
    config::{GateConfig, GateState},
    csrf,
    error::GateError,
    identity::VerifiedIdentity,
};

/// Router-wide CSRF stage. Safe methods pass through untouched; every other
/// method must present a matching cookie/header pair.
pub async fn csrf_gate(request: Request, next: Next) -> Response {
    if GateConfig::is_safe_method(request.method()) {
        return next.run(request).await;
    }

    match csrf::validate(request.headers()) {
        Ok(()) => next.run(request).await,
        Err(err) => {
            warn!(
                reason = err.reason(),
                method = %request.method(),
                path = %request.uri().path(),
                "request rejected by CSRF guard"
            );
            err.into_response()
        }
    }
}

/// Per-route identity stage. On success the verified claims ride along in
/// the request extensions for downstream handlers.
pub async fn identity_gate(
    State(state): State<Arc<GateState>>,
    mut request: Request,
    next: Next,
) -> Response {
    match state.verifier().verify_request(request.headers()).await {
        Ok(identity) => {
            request.extensions_mut().insert(identity);
            next.run(request).await
        }
        Err(err) => err.into_response(),
    }
}

/// Extract the identity the gate attached to the request.
///
/// Rejects with 401 if the identity layer did not run or did not allow the
/// request.
#[axum::async_trait]
impl<S: Send + Sync> FromRequestParts<S> for VerifiedIdentity {
    type Rejection = GateError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<VerifiedIdentity>()
            .cloned()
            .ok_or(GateError::MissingToken)
    }
}
