//! OpenAPI schema definitions for domain types.
//!
//! Domain types stay framework-agnostic by not deriving `ToSchema`; the
//! wrappers here mirror their wire shape and register under the domain path.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Authentication failed or is missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The login id is already taken.
    #[schema(rename = "conflict")]
    Conflict,
    /// The database is unreachable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// The analysis script failed, timed out or wrote unusable output.
    #[schema(rename = "analysis_failed")]
    AnalysisFailed,
    /// The submission could not be written to its workspace.
    #[schema(rename = "storage_failed")]
    StorageFailed,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`] as rendered in the HTTP
/// error envelope.
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Always `error`.
    #[schema(example = "error")]
    status: String,
    /// Stable machine-readable error code.
    #[schema(example = "analysis_failed")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "analysis script exited with status 1")]
    message: String,
    /// Correlation identifier, also sent as the `trace-id` header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary details such as the offending field.
    details: Option<serde_json::Value>,
}
