//! OpenAPI documentation.
//!
//! [`ApiDoc`] registers every HTTP endpoint, the request and response bodies,
//! the error envelope schemas from [`crate::inbound::http::schemas`] and the
//! session cookie security scheme. Swagger UI serves it in debug builds and
//! `cargo run --bin openapi-dump` prints it for external tooling.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::input_seq::{AlignmentRequest, ReferenceRequest, UploadedFile};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::users::{LoginRequest, SignupRequest, UserProfile};

/// Adds the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /user/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "VirusDecode backend API",
        description = "Reference metadata lookup, sequence alignment and user accounts."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::input_seq::reference_metadata,
        crate::inbound::http::input_seq::alignment,
        crate::inbound::http::users::signup,
        crate::inbound::http::users::login,
        crate::inbound::http::users::current_user,
        crate::inbound::http::users::logout,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ReferenceRequest,
        AlignmentRequest,
        UploadedFile,
        SignupRequest,
        LoginRequest,
        UserProfile,
        ErrorSchema,
        ErrorCodeSchema
    )),
    tags(
        (name = "inputSeq", description = "Reference metadata and sequence alignment"),
        (name = "users", description = "Account signup, login and profile"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
