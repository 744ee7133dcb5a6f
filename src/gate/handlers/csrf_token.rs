//! CSRF secret issuance endpoint.

use axum::{
    extract::State,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::error;
use utoipa::ToSchema;

use crate::gate::{config::GateState, csrf};

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct CsrfTokenResponse {
    /// Value the client must echo back in the `x-csrf-token` header.
    #[serde(rename = "csrfToken")]
    pub csrf_token: String,
}

#[utoipa::path(
    get,
    path = "/csrf-token",
    responses(
        (status = 200, description = "CSRF token issued or echoed", body = CsrfTokenResponse),
    ),
    tag = "gate"
)]
pub async fn csrf_token(
    headers: HeaderMap,
    state: State<Arc<GateState>>,
) -> impl IntoResponse {
    // Concurrent tabs share one secret: only mint a new one when the browser
    // did not send a cookie.
    if let Some(existing) = csrf::extract_csrf_cookie(&headers) {
        return (
            StatusCode::OK,
            Json(CsrfTokenResponse {
                csrf_token: existing,
            }),
        )
            .into_response();
    }

    let secret = match csrf::generate_csrf_secret() {
        Ok(secret) => secret,
        Err(err) => {
            error!("Failed to generate CSRF secret: {err}");
            return issuance_failure();
        }
    };

    let mut response_headers = HeaderMap::new();
    match csrf::csrf_cookie(state.config(), &secret) {
        Ok(cookie) => {
            response_headers.insert(SET_COOKIE, cookie);
        }
        Err(err) => {
            error!("Failed to build CSRF cookie: {err}");
            return issuance_failure();
        }
    }

    (
        StatusCode::OK,
        response_headers,
        Json(CsrfTokenResponse { csrf_token: secret }),
    )
        .into_response()
}

/// Failures while minting a secret keep the JSON error contract.
fn issuance_failure() -> axum::response::Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "Failed to issue CSRF token",
            "reason": "csrf_issuance_failed",
        })),
    )
        .into_response()
}
