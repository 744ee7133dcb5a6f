//! Error taxonomy for gate decisions.
//!
//! Every variant resolves to an explicit HTTP response with a stable JSON
//! body so API clients can branch on it. Nothing here is fatal for the
//! process; a rejected request must be retried end-to-end by the caller.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GateError {
    #[error("missing CSRF cookie")]
    MissingCsrfCookie,
    #[error("missing CSRF header")]
    MissingCsrfHeader,
    #[error("CSRF token mismatch")]
    CsrfMismatch,
    #[error("missing bearer token")]
    MissingToken,
    #[error("invalid identity token: {0}")]
    InvalidToken(String),
    #[error("identity provider unavailable: {0}")]
    ProviderUnavailable(String),
    #[error("malformed credential hash")]
    MalformedCredentialHash,
}

impl GateError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::MissingCsrfCookie | Self::MissingCsrfHeader | Self::CsrfMismatch => {
                StatusCode::FORBIDDEN
            }
            Self::MissingToken | Self::InvalidToken(_) | Self::MalformedCredentialHash => {
                StatusCode::UNAUTHORIZED
            }
            // Fail closed: unknown identity is denied, but the status tells
            // clients to back off instead of re-authenticating.
            Self::ProviderUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Stable machine-readable reason for response bodies and logs.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::MissingCsrfCookie => "missing_csrf_cookie",
            Self::MissingCsrfHeader => "missing_csrf_header",
            Self::CsrfMismatch => "csrf_mismatch",
            Self::MissingToken => "missing_token",
            Self::InvalidToken(_) => "invalid_token",
            Self::ProviderUnavailable(_) => "provider_unavailable",
            Self::MalformedCredentialHash => "malformed_credential_hash",
        }
    }

    const fn message(&self) -> &'static str {
        match self {
            Self::MissingCsrfCookie | Self::MissingCsrfHeader | Self::CsrfMismatch => {
                "Invalid CSRF token"
            }
            Self::MissingToken => "Missing authorization header",
            Self::InvalidToken(_) => "Invalid identity token",
            Self::MalformedCredentialHash => "Invalid stored credential",
            Self::ProviderUnavailable(_) => "Identity provider unavailable",
        }
    }
}

impl IntoResponse for GateError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.message(),
            "reason": self.reason(),
        }));
        (self.status(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csrf_variants_map_to_forbidden() {
        assert_eq!(GateError::MissingCsrfCookie.status(), StatusCode::FORBIDDEN);
        assert_eq!(GateError::MissingCsrfHeader.status(), StatusCode::FORBIDDEN);
        assert_eq!(GateError::CsrfMismatch.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn token_variants_map_to_unauthorized() {
        assert_eq!(GateError::MissingToken.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            GateError::InvalidToken("expired".to_string()).status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn provider_unavailable_maps_to_service_unavailable() {
        assert_eq!(
            GateError::ProviderUnavailable("timeout".to_string()).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn csrf_body_message_is_stable() {
        assert_eq!(GateError::CsrfMismatch.message(), "Invalid CSRF token");
        assert_eq!(GateError::MissingCsrfCookie.reason(), "missing_csrf_cookie");
    }

    #[test]
    fn credential_hash_message_is_distinct_from_token_message() {
        assert_ne!(
            GateError::MalformedCredentialHash.message(),
            GateError::InvalidToken("expired".to_string()).message()
        );
        assert_eq!(
            GateError::MalformedCredentialHash.message(),
            "Invalid stored credential"
        );
    }
}
