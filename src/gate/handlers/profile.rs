//! Identity readout for the signed-in user.

use axum::{response::IntoResponse, Json};

use crate::gate::identity::VerifiedIdentity;

#[utoipa::path(
    get,
    path = "/api/profile",
    responses(
        (status = 200, description = "Verified claims for the caller", body = VerifiedIdentity),
        (status = 401, description = "Missing or invalid identity token"),
    ),
    tag = "blueprint"
)]
pub async fn profile(identity: VerifiedIdentity) -> impl IntoResponse {
    Json(identity)
}
