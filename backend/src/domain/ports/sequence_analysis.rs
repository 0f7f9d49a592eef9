//! Driving port for reference metadata and alignment requests.

use async_trait::async_trait;

use crate::domain::{AnalysisOutcome, Error, SequenceId, VariantSubmission};

/// Sequence analysis use-cases exposed to inbound adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SequenceAnalysis: Send + Sync {
    /// Look up metadata for a reference sequence id.
    async fn reference_metadata(&self, sequence_id: &SequenceId) -> Result<AnalysisOutcome, Error>;

    /// Stage a submission and align it.
    async fn align(&self, submission: &VariantSubmission) -> Result<AnalysisOutcome, Error>;
}
