//! Token verification against the external identity provider.
//!
//! The gate never decodes identity tokens itself: it extracts the bearer
//! string and hands it to an injected [`IdentityProvider`]. Results are
//! never cached in either direction; a token that fails now may succeed
//! later if clock skew was the cause.

use anyhow::{Context, Result};
use async_trait::async_trait;
use axum::http::{header::AUTHORIZATION, HeaderMap};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt, sync::Arc};
use tracing::warn;
use url::Url;
use utoipa::ToSchema;

use super::error::GateError;
use crate::gate::APP_USER_AGENT;

/// Decoded claim set for one request. Never persisted by this layer.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VerifiedIdentity {
    /// Subject identifier assigned by the identity provider.
    #[serde(rename = "sub")]
    pub subject: String,
    /// Issuance timestamp, unix seconds.
    #[serde(rename = "iat")]
    pub issued_at_unix: i64,
    /// Expiry timestamp, unix seconds.
    #[serde(rename = "exp")]
    pub expires_at_unix: i64,
    /// Provider-specific custom claims, passed through untouched.
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub custom_claims: serde_json::Map<String, serde_json::Value>,
}

/// External identity provider capability consumed by the gate.
///
/// Implementations own their retry and timeout policy; the gate performs
/// exactly one call per verification and fails closed on any error.
#[async_trait]
pub trait IdentityProvider: Send + Sync + fmt::Debug {
    async fn verify_identity_token(&self, token: &str) -> Result<VerifiedIdentity, GateError>;
}

/// HTTP client for an identity provider exposing a `POST <base>/verify`
/// endpoint that accepts `{"token": "..."}` and returns the claim set.
pub struct HttpIdentityProvider {
    client: reqwest::Client,
    verify_url: String,
    api_key: Option<SecretString>,
}

impl fmt::Debug for HttpIdentityProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpIdentityProvider")
            .field("verify_url", &self.verify_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl HttpIdentityProvider {
    /// Build a provider client from its base URL.
    ///
    /// # Errors
    /// Returns an error if the URL does not parse or the HTTP client cannot
    /// be built.
    pub fn new(base_url: &str, api_key: Option<SecretString>) -> Result<Self> {
        Url::parse(base_url).with_context(|| format!("Invalid identity provider URL: {base_url}"))?;

        let client = reqwest::Client::builder()
            .user_agent(APP_USER_AGENT)
            .build()
            .context("Failed to build identity provider HTTP client")?;

        let base = base_url.trim_end_matches('/');
        Ok(Self {
            client,
            verify_url: format!("{base}/verify"),
            api_key,
        })
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn verify_identity_token(&self, token: &str) -> Result<VerifiedIdentity, GateError> {
        let mut body = HashMap::new();
        body.insert("token", token);

        let mut request = self.client.post(&self.verify_url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.header("x-api-key", key.expose_secret());
        }

        let response = request
            .send()
            .await
            .map_err(|err| GateError::ProviderUnavailable(err.to_string()))?;

        let status = response.status();
        if status.is_success() {
            // A 2xx with an unreadable claim set is a provider fault, not a
            // bad token.
            response
                .json::<VerifiedIdentity>()
                .await
                .map_err(|err| GateError::ProviderUnavailable(format!("invalid claims: {err}")))
        } else if status.is_client_error() {
            Err(GateError::InvalidToken(format!("provider returned {status}")))
        } else {
            Err(GateError::ProviderUnavailable(format!(
                "provider returned {status}"
            )))
        }
    }
}

/// Request-facing wrapper: bearer extraction plus one provider call.
pub struct IdentityVerifier {
    provider: Arc<dyn IdentityProvider>,
}

impl IdentityVerifier {
    #[must_use]
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self { provider }
    }

    /// Verify the bearer token on a request.
    ///
    /// A missing `Authorization` header is reported before the provider is
    /// contacted.
    pub async fn verify_request(&self, headers: &HeaderMap) -> Result<VerifiedIdentity, GateError> {
        let token = extract_bearer_token(headers).ok_or(GateError::MissingToken)?;
        self.provider
            .verify_identity_token(&token)
            .await
            .map_err(|err| {
                warn!(reason = err.reason(), "identity verification failed");
                err
            })
    }
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let trimmed = value.trim();
    let token = trimmed
        .strip_prefix("Bearer ")
        .or_else(|| trimmed.strip_prefix("bearer "))?
        .trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Default)]
    struct CountingProvider {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl IdentityProvider for CountingProvider {
        async fn verify_identity_token(
            &self,
            token: &str,
        ) -> Result<VerifiedIdentity, GateError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(GateError::InvalidToken(format!("unknown token: {token}")))
        }
    }

    fn bearer_headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn extract_bearer_token_strips_scheme() {
        let headers = bearer_headers("Bearer abc123");
        assert_eq!(extract_bearer_token(&headers), Some("abc123".to_string()));
    }

    #[test]
    fn extract_bearer_token_accepts_lowercase_scheme() {
        let headers = bearer_headers("bearer abc123");
        assert_eq!(extract_bearer_token(&headers), Some("abc123".to_string()));
    }

    #[test]
    fn extract_bearer_token_rejects_other_schemes() {
        let headers = bearer_headers("Basic dXNlcjpwYXNz");
        assert_eq!(extract_bearer_token(&headers), None);
    }

    #[test]
    fn extract_bearer_token_rejects_empty_token() {
        let headers = bearer_headers("Bearer   ");
        assert_eq!(extract_bearer_token(&headers), None);
    }

    #[tokio::test]
    async fn missing_header_fails_before_provider_call() {
        let provider = Arc::new(CountingProvider::default());
        let verifier = IdentityVerifier::new(provider.clone());

        let err = verifier.verify_request(&HeaderMap::new()).await.unwrap_err();
        assert!(matches!(err, GateError::MissingToken));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn provider_receives_extracted_token_string() {
        let provider = Arc::new(CountingProvider::default());
        let verifier = IdentityVerifier::new(provider.clone());

        let headers = bearer_headers("Bearer not-a-real-token");
        let err = verifier.verify_request(&headers).await.unwrap_err();
        assert!(matches!(err, GateError::InvalidToken(_)));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn http_provider_rejects_invalid_url() {
        assert!(HttpIdentityProvider::new("not a url", None).is_err());
    }

    #[test]
    fn http_provider_builds_verify_url() {
        let provider = HttpIdentityProvider::new("https://identity.tld/v1/tokens/", None).unwrap();
        assert_eq!(provider.verify_url, "https://identity.tld/v1/tokens/verify");
    }

    #[test]
    fn http_provider_debug_redacts_api_key() {
        let provider = HttpIdentityProvider::new(
            "https://identity.tld/v1/tokens",
            Some(SecretString::from("super-secret".to_string())),
        )
        .unwrap();
        let debug = format!("{provider:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn verified_identity_deserializes_custom_claims() {
        let identity: VerifiedIdentity = serde_json::from_value(serde_json::json!({
            "sub": "user-42",
            "iat": 1_700_000_000,
            "exp": 1_700_003_600,
            "plan": "pro",
            "projects": 3
        }))
        .unwrap();

        assert_eq!(identity.subject, "user-42");
        assert_eq!(identity.custom_claims.get("plan").and_then(|v| v.as_str()), Some("pro"));
    }
}
