//! Domain primitives, services and ports.
//!
//! Purpose: Define strongly typed entities used by the API and the driven
//! adapters, plus the services that implement the driving ports. Keep types
//! immutable and document invariants in each type's Rustdoc.
//!
//! Public surface:
//! - Error, ErrorCode: API error payload and stable error identifier.
//! - User, SignUp, LoginCredentials, PasswordHash: account model.
//! - SequenceId, SequenceEntry, VariantSubmission, AnalysisOutcome: analysis
//!   requests and their results.
//! - UserAccountService, SequenceAnalysisService: driving port
//!   implementations.

pub mod auth;
pub mod error;
pub mod password;
pub mod ports;
pub mod sequence;
pub mod sequence_analysis_service;
pub mod trace_id;
pub mod user;
pub mod user_account_service;

pub use self::auth::{LoginCredentials, LoginValidationError};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::password::{HashCost, PasswordHash, PasswordHashError};
pub use self::sequence::{
    AnalysisOutcome, AnalysisResult, SequenceEntry, SequenceId, SequenceValidationError,
    VariantSubmission,
};
pub use self::sequence_analysis_service::SequenceAnalysisService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    ACCOUNT_FIELD_MAX, LoginId, PersonName, SignUp, SignUpValidationError, User, UserId,
    UserValidationError,
};
pub use self::user_account_service::UserAccountService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use virusdecode::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::unauthorized("login required"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
