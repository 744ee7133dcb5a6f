use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::gate::handlers::health::health,
        crate::gate::handlers::csrf_token::csrf_token,
        crate::gate::handlers::errors::report,
        crate::gate::handlers::upload::upload,
        crate::gate::handlers::profile::profile,
    ),
    components(schemas(
        crate::gate::handlers::csrf_token::CsrfTokenResponse,
        crate::gate::handlers::errors::ErrorReport,
        crate::gate::handlers::upload::UploadRequest,
        crate::gate::handlers::upload::UploadResponse,
        crate::gate::identity::VerifiedIdentity,
    )),
    tags(
        (name = "gate", description = "CSRF issuance and service health"),
        (name = "blueprint", description = "Gated application endpoints"),
    )
)]
pub struct ApiDoc;
