//! Sequence input handlers.
//!
//! ```text
//! POST /inputSeq/reference {"sequenceId":"NC_045512"}
//! POST /inputSeq/alignment {"referenceSequenceId":null,"sequences":{"variant":"ACGT"},"files":[]}
//! ```
//!
//! Both endpoints answer `200` with the analysis object, or `204` with an
//! empty body when the analysis produced no data.

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::{
    AnalysisOutcome, Error, SequenceEntry, SequenceId, SequenceValidationError, VariantSubmission,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{field_error, optional_json};

/// Request body for `POST /inputSeq/reference`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceRequest {
    #[schema(example = "NC_045512")]
    pub sequence_id: String,
}

/// One uploaded FASTA file.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
pub struct UploadedFile {
    pub name: String,
    pub content: String,
}

/// Request body for `POST /inputSeq/alignment`.
///
/// At least one of `referenceSequenceId` or sequence text (`sequences` and/or
/// `files`) must be present. When both are sent the sequences are aligned
/// against the named reference.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct AlignmentRequest {
    #[schema(example = json!(null))]
    pub reference_sequence_id: Option<String>,
    /// Pasted sequences keyed by name, in submission order.
    #[schema(value_type = Object, example = json!({"variant": "ACGTACGT"}))]
    pub sequences: Map<String, Value>,
    pub files: Vec<UploadedFile>,
}

fn map_sequence_error(error: SequenceValidationError, id_field: &str) -> Error {
    let message = error.to_string();
    match error {
        SequenceValidationError::EmptySequenceId => {
            field_error(id_field, "empty_sequence_id", message)
        }
        SequenceValidationError::InvalidSequenceId => {
            field_error(id_field, "invalid_sequence_id", message)
        }
        SequenceValidationError::EmptySequenceText { .. } => {
            field_error("sequences", "empty_sequence_text", message)
        }
        SequenceValidationError::EmptySubmission => {
            field_error("body", "empty_submission", message)
        }
    }
}

impl TryFrom<AlignmentRequest> for VariantSubmission {
    type Error = Error;

    fn try_from(value: AlignmentRequest) -> Result<Self, Self::Error> {
        const ID_FIELD: &str = "referenceSequenceId";

        let reference = value
            .reference_sequence_id
            .filter(|raw| !raw.trim().is_empty())
            .map(SequenceId::new)
            .transpose()
            .map_err(|err| map_sequence_error(err, ID_FIELD))?;

        let mut entries = Vec::with_capacity(value.sequences.len() + value.files.len());
        for (name, text) in value.sequences {
            let Value::String(text) = text else {
                return Err(field_error(
                    "sequences",
                    "invalid_sequence_text",
                    format!("sequence `{name}` must be a string"),
                ));
            };
            entries.push(
                SequenceEntry::new(name, text).map_err(|err| map_sequence_error(err, ID_FIELD))?,
            );
        }
        for file in value.files {
            entries.push(
                SequenceEntry::new(file.name, file.content)
                    .map_err(|err| map_sequence_error(err, ID_FIELD))?,
            );
        }

        Self::from_parts(reference, entries).map_err(|err| map_sequence_error(err, ID_FIELD))
    }
}

fn outcome_response(outcome: AnalysisOutcome) -> HttpResponse {
    match outcome {
        AnalysisOutcome::Found(result) => HttpResponse::Ok().json(result),
        AnalysisOutcome::Empty => HttpResponse::NoContent().finish(),
    }
}

/// Look up metadata for a reference sequence.
#[utoipa::path(
    post,
    path = "/inputSeq/reference",
    request_body = ReferenceRequest,
    responses(
        (status = 200, description = "Reference metadata", body = serde_json::Value),
        (status = 204, description = "No metadata for this reference"),
        (status = 400, description = "Invalid sequence id", body = ErrorSchema),
        (status = 502, description = "Analysis failed", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["inputSeq"],
    operation_id = "referenceMetadata",
    security([])
)]
#[post("/reference")]
pub async fn reference_metadata(
    state: web::Data<HttpState>,
    payload: web::Json<ReferenceRequest>,
) -> ApiResult<HttpResponse> {
    let sequence_id = SequenceId::new(&payload.sequence_id)
        .map_err(|err| map_sequence_error(err, "sequenceId"))?;
    let outcome = state.analysis.reference_metadata(&sequence_id).await?;
    Ok(outcome_response(outcome))
}

/// Stage a submission and align it.
///
/// The body is optional at the transport level so that a missing body gets
/// the standard error envelope rather than a framework default.
#[utoipa::path(
    post,
    path = "/inputSeq/alignment",
    request_body = AlignmentRequest,
    responses(
        (status = 200, description = "Alignment result", body = serde_json::Value),
        (status = 204, description = "Alignment produced no data"),
        (status = 400, description = "Missing, malformed or empty submission", body = ErrorSchema),
        (status = 500, description = "Submission could not be saved", body = ErrorSchema),
        (status = 502, description = "Analysis failed", body = ErrorSchema)
    ),
    tags = ["inputSeq"],
    operation_id = "alignment",
    security([])
)]
#[post("/alignment")]
pub async fn alignment(state: web::Data<HttpState>, body: web::Bytes) -> ApiResult<HttpResponse> {
    let request: AlignmentRequest = optional_json(&body)?.ok_or_else(|| {
        field_error("body", "missing_body", "request body is required")
    })?;
    let submission = VariantSubmission::try_from(request)?;
    let outcome = state.analysis.align(&submission).await?;
    Ok(outcome_response(outcome))
}

#[cfg(test)]
#[path = "input_seq_tests.rs"]
mod tests;
