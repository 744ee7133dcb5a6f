//! Upload intake. The actual file transfer is the application's concern;
//! this handler only demonstrates the identity-gated side of the contract.

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use utoipa::ToSchema;

use crate::gate::identity::VerifiedIdentity;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct UploadRequest {
    #[serde(rename = "fileName")]
    pub file_name: String,
    #[serde(rename = "contentType", default)]
    pub content_type: Option<String>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct UploadResponse {
    pub status: String,
    #[serde(rename = "uploadedBy")]
    pub uploaded_by: String,
}

#[utoipa::path(
    post,
    path = "/api/upload",
    request_body = UploadRequest,
    responses(
        (status = 202, description = "Upload accepted", body = UploadResponse),
        (status = 400, description = "Missing payload"),
        (status = 401, description = "Missing or invalid identity token"),
        (status = 403, description = "Invalid CSRF token"),
    ),
    tag = "blueprint"
)]
#[instrument(skip(payload))]
pub async fn upload(
    identity: VerifiedIdentity,
    payload: Option<Json<UploadRequest>>,
) -> impl IntoResponse {
    let Some(Json(request)) = payload else {
        return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response();
    };

    debug!(
        subject = %identity.subject,
        file_name = %request.file_name,
        "upload accepted"
    );

    (
        StatusCode::ACCEPTED,
        Json(UploadResponse {
            status: "accepted".to_string(),
            uploaded_by: identity.subject,
        }),
    )
        .into_response()
}
