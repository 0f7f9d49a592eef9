//! Capability port for computing reference metadata and alignments.
//!
//! The production adapter shells out to an analysis script, but callers only
//! see this trait; an in-process implementation can replace it without
//! touching the domain service or the HTTP layer.

use async_trait::async_trait;

use crate::domain::{AnalysisOutcome, SequenceId};

use super::{StagedSubmission, define_port_error};

define_port_error! {
    /// Failures raised by analysis providers. None of these mean "no data";
    /// that is [`AnalysisOutcome::Empty`].
    pub enum AnalysisProviderError {
        /// The analysis backend could not be started.
        Launch { message: String } => "analysis backend could not be started: {message}",
        /// The analysis backend exited unsuccessfully.
        Exit { status: String } => "analysis backend exited unsuccessfully ({status})",
        /// The analysis backend exceeded its time budget.
        Timeout { seconds: u64 } => "analysis backend timed out after {seconds}s",
        /// The analysis output could not be read or decoded.
        Output { message: String } => "analysis output unusable: {message}",
        /// Scratch space for the analysis could not be prepared.
        Workspace { message: String } => "analysis workspace unavailable: {message}",
    }
}

/// Driven port computing sequence analyses.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SequenceAnalysisProvider: Send + Sync {
    /// Describe a reference sequence.
    async fn reference_metadata(
        &self,
        sequence_id: &SequenceId,
    ) -> Result<AnalysisOutcome, AnalysisProviderError>;

    /// Align a staged submission against its reference.
    async fn align(
        &self,
        staged: &StagedSubmission,
    ) -> Result<AnalysisOutcome, AnalysisProviderError>;
}
