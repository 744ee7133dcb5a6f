//! Double-submit CSRF guard.
//!
//! The server issues a high-entropy secret in both a cookie and the response
//! body of `GET /csrf-token`; state-changing requests must echo the body
//! value in the `x-csrf-token` header. The cookie itself is the only store:
//! validation compares the pair and keeps no server-side state.

use anyhow::{Context, Result};
use axum::http::{
    header::{InvalidHeaderValue, COOKIE},
    HeaderMap, HeaderValue,
};
use base64::Engine;
use rand::{rngs::OsRng, RngCore};
use subtle::ConstantTimeEq;

use super::{
    config::{GateConfig, CSRF_COOKIE_NAME, CSRF_HEADER_NAME},
    error::GateError,
};

/// Create a new CSRF secret for the cookie and response body.
///
/// # Errors
/// Returns an error if the OS random source fails.
pub fn generate_csrf_secret() -> Result<String> {
    let mut bytes = [0u8; 32];
    OsRng
        .try_fill_bytes(&mut bytes)
        .context("failed to generate CSRF secret")?;
    Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes))
}

/// Read the CSRF secret cookie from a request, if present.
pub(crate) fn extract_csrf_cookie(headers: &HeaderMap) -> Option<String> {
    let header = headers.get(COOKIE)?;
    let value = header.to_str().ok()?;
    for pair in value.split(';') {
        // Browsers may send nameless cookies as bare tokens; skip those
        // segments instead of giving up on the whole header.
        let Some((key, val)) = pair.trim().split_once('=') else {
            continue;
        };
        if key.trim() == CSRF_COOKIE_NAME {
            let val = val.trim();
            if !val.is_empty() {
                return Some(val.to_string());
            }
        }
    }
    None
}

/// Build the `Set-Cookie` value for a freshly issued CSRF secret.
///
/// The cookie is deliberately not `HttpOnly`: the double-submit contract is
/// that same-origin script echoes the value back in a header, which a
/// cross-site attacker cannot read. Expiry lives in `Max-Age` only; the
/// token itself carries none.
pub(crate) fn csrf_cookie(
    config: &GateConfig,
    secret: &str,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let max_age = config.csrf_cookie_max_age_seconds();
    let mut cookie = format!("{CSRF_COOKIE_NAME}={secret}; Path=/; SameSite=Lax; Max-Age={max_age}");
    if config.csrf_cookie_secure() {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

/// Validate the cookie/header pair on a state-changing request.
pub(crate) fn validate(headers: &HeaderMap) -> Result<(), GateError> {
    let cookie = extract_csrf_cookie(headers).ok_or(GateError::MissingCsrfCookie)?;

    let header = headers
        .get(CSRF_HEADER_NAME)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(GateError::MissingCsrfHeader)?;

    if constant_time_eq(header, &cookie) {
        Ok(())
    } else {
        Err(GateError::CsrfMismatch)
    }
}

/// Exact comparison of the header and cookie values, in constant time.
///
/// When lengths differ, performs a dummy comparison to avoid leaking length
/// information through timing variance.
fn constant_time_eq(provided: &str, expected: &str) -> bool {
    let provided = provided.as_bytes();
    let expected = expected.as_bytes();
    if provided.len() != expected.len() {
        let _ = expected.ct_eq(expected);
        return false;
    }
    provided.ct_eq(expected).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    fn headers_with(cookie: Option<&str>, header: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(secret) = cookie {
            headers.insert(
                COOKIE,
                HeaderValue::from_str(&format!("{CSRF_COOKIE_NAME}={secret}")).unwrap(),
            );
        }
        if let Some(token) = header {
            headers.insert(CSRF_HEADER_NAME, HeaderValue::from_str(token).unwrap());
        }
        headers
    }

    #[test]
    fn generated_secret_is_32_bytes_base64url() {
        let secret = generate_csrf_secret().unwrap();
        let decoded = URL_SAFE_NO_PAD.decode(secret.as_bytes()).unwrap();
        assert_eq!(decoded.len(), 32);
    }

    #[test]
    fn generated_secrets_differ() {
        let first = generate_csrf_secret().unwrap();
        let second = generate_csrf_secret().unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn extract_finds_secret_among_other_cookies() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("session=abc; csrf_secret=topsecret; theme=dark"),
        );
        assert_eq!(
            extract_csrf_cookie(&headers),
            Some("topsecret".to_string())
        );
    }

    #[test]
    fn extract_skips_nameless_cookie_segments() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("flagtoken; csrf_secret=shared; other"),
        );
        assert_eq!(extract_csrf_cookie(&headers), Some("shared".to_string()));
    }

    #[test]
    fn extract_ignores_empty_value() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("csrf_secret="));
        assert_eq!(extract_csrf_cookie(&headers), None);
    }

    #[test]
    fn validate_rejects_missing_cookie() {
        let headers = headers_with(None, Some("token"));
        assert!(matches!(
            validate(&headers),
            Err(GateError::MissingCsrfCookie)
        ));
    }

    #[test]
    fn validate_rejects_missing_header() {
        let headers = headers_with(Some("token"), None);
        assert!(matches!(
            validate(&headers),
            Err(GateError::MissingCsrfHeader)
        ));
    }

    #[test]
    fn validate_rejects_mismatch() {
        let headers = headers_with(Some("cookie-value"), Some("header-value"));
        assert!(matches!(validate(&headers), Err(GateError::CsrfMismatch)));
    }

    #[test]
    fn validate_accepts_matching_pair() {
        let headers = headers_with(Some("shared-secret"), Some("shared-secret"));
        assert!(validate(&headers).is_ok());
    }

    #[test]
    fn cookie_carries_max_age_and_same_site() {
        let config =
            GateConfig::new("http://localhost:3000".to_string()).with_csrf_cookie_max_age_seconds(60);
        let value = csrf_cookie(&config, "secret").unwrap();
        let cookie = value.to_str().unwrap();
        assert_eq!(
            cookie,
            "csrf_secret=secret; Path=/; SameSite=Lax; Max-Age=60"
        );
    }

    #[test]
    fn cookie_is_secure_for_https_frontend() {
        let config = GateConfig::new("https://blueprint.dev".to_string());
        let value = csrf_cookie(&config, "secret").unwrap();
        assert!(value.to_str().unwrap().ends_with("; Secure"));
    }

    #[test]
    fn constant_time_eq_rejects_prefix_and_empty() {
        assert!(constant_time_eq("secret", "secret"));
        assert!(!constant_time_eq("secre", "secret"));
        assert!(!constant_time_eq("", "secret"));
    }
}
