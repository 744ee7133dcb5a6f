//! Client-error intake. Stands in for the application's error reporting
//! endpoint; the gate's CSRF stage runs in front of it.

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ErrorReport {
    pub message: String,
    #[serde(default)]
    pub stack: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/errors",
    request_body = ErrorReport,
    responses(
        (status = 202, description = "Report accepted"),
        (status = 400, description = "Missing payload"),
        (status = 403, description = "Invalid CSRF token"),
    ),
    tag = "blueprint"
)]
#[instrument(skip(payload))]
pub async fn report(payload: Option<Json<ErrorReport>>) -> impl IntoResponse {
    let Some(Json(report)) = payload else {
        return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response();
    };

    warn!(
        message = %report.message,
        url = report.url.as_deref().unwrap_or("unknown"),
        "client error reported"
    );

    StatusCode::ACCEPTED.into_response()
}
