//! Shared request-validation helpers for inbound HTTP adapters.

use actix_web::web;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;

use crate::domain::Error;

/// Build an `invalid_request` error naming the offending field.
pub(crate) fn field_error(field: &str, code: &str, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "code": code,
    }))
}

/// JSON extractor configuration that reports malformed bodies with the
/// standard error envelope instead of Actix's plain-text default.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        debug!(error = %err, "rejected JSON body");
        Error::invalid_request(format!("malformed JSON body: {err}")).into()
    })
}

/// Decode an optional JSON body; an empty body yields `None`.
pub(crate) fn optional_json<T: DeserializeOwned>(body: &[u8]) -> Result<Option<T>, Error> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(body)
        .map(Some)
        .map_err(|err| Error::invalid_request(format!("malformed JSON body: {err}")))
}
