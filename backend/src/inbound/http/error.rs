//! HTTP adapter mapping for domain errors.
//!
//! Keeps the domain error type HTTP-agnostic while letting Actix handlers turn
//! domain failures into a consistent `{"status": "error", ...}` envelope.

use std::borrow::Cow;

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use tracing::error;

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

pub use crate::domain::ApiResult;

/// Value of the `status` field on every error body.
pub const ERROR_STATUS: &str = "error";

const INTERNAL_MESSAGE: &str = "Internal server error";

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::AnalysisFailed => StatusCode::BAD_GATEWAY,
        ErrorCode::StorageFailed | ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Body sent to clients. Internal failures keep only their trace id.
fn public_view(error: &Error) -> Cow<'_, Error> {
    if error.code() != ErrorCode::InternalError {
        return Cow::Borrowed(error);
    }
    let generic = Error::internal(INTERNAL_MESSAGE);
    Cow::Owned(match error.trace_id() {
        Some(id) => generic.with_trace_id(id.to_owned()),
        None => generic,
    })
}

#[derive(Serialize)]
struct ErrorEnvelope<'a> {
    status: &'static str,
    #[serde(flatten)]
    error: Cow<'a, Error>,
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!(
                code = ?self.code(),
                trace_id = self.trace_id().unwrap_or_default(),
                message = self.message(),
                "request failed"
            );
        }

        let mut builder = HttpResponse::build(status);
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        builder.json(ErrorEnvelope {
            status: ERROR_STATUS,
            error: public_view(self),
        })
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "actix error promoted to domain error");
        Self::internal(INTERNAL_MESSAGE)
    }
}
