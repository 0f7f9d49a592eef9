//! Sequence analysis domain service.
//!
//! Stages each alignment submission into its own workspace, hands it to the
//! analysis provider and discards the workspace afterwards, whatever the
//! provider reported or if the request is dropped mid-run. Provider failures
//! surface as `AnalysisFailed`; only a successful run with no data becomes
//! [`AnalysisOutcome::Empty`].

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::ports::{
    AnalysisProviderError, SequenceAnalysis, SequenceAnalysisProvider, SubmissionStore,
    SubmissionStoreError, WorkspaceGuard,
};
use crate::domain::{AnalysisOutcome, Error, SequenceId, VariantSubmission};

/// Service implementing [`SequenceAnalysis`].
pub struct SequenceAnalysisService<S: ?Sized, P: ?Sized> {
    store: Arc<S>,
    provider: Arc<P>,
    keep_workspaces: bool,
}

impl<S: ?Sized, P: ?Sized> Clone for SequenceAnalysisService<S, P> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            provider: Arc::clone(&self.provider),
            keep_workspaces: self.keep_workspaces,
        }
    }
}

impl<S: ?Sized, P: ?Sized> SequenceAnalysisService<S, P> {
    pub fn new(store: Arc<S>, provider: Arc<P>) -> Self {
        Self {
            store,
            provider,
            keep_workspaces: false,
        }
    }

    /// Leave workspaces on disk after each request, for debugging.
    #[must_use]
    pub fn keep_workspaces(mut self, keep: bool) -> Self {
        self.keep_workspaces = keep;
        self
    }
}

fn map_store_error(error: SubmissionStoreError) -> Error {
    match error {
        SubmissionStoreError::Io { message } => {
            Error::storage_failed(format!("failed to save submission: {message}"))
        }
    }
}

fn map_provider_error(error: AnalysisProviderError) -> Error {
    match error {
        AnalysisProviderError::Workspace { message } => {
            Error::storage_failed(format!("analysis workspace unavailable: {message}"))
        }
        other => Error::analysis_failed(other.to_string()),
    }
}

fn outcome_label(outcome: &AnalysisOutcome) -> &'static str {
    if outcome.is_empty() { "empty" } else { "found" }
}

impl<S, P> SequenceAnalysisService<S, P>
where
    S: SubmissionStore + ?Sized + 'static,
    P: SequenceAnalysisProvider + ?Sized,
{
    /// Fetch metadata describing a reference sequence.
    pub async fn reference_metadata(
        &self,
        sequence_id: &SequenceId,
    ) -> Result<AnalysisOutcome, Error> {
        let outcome = self
            .provider
            .reference_metadata(sequence_id)
            .await
            .map_err(|err| {
                warn!(%sequence_id, error = %err, "metadata lookup failed");
                map_provider_error(err)
            })?;
        info!(%sequence_id, outcome = outcome_label(&outcome), "metadata lookup finished");
        Ok(outcome)
    }

    /// Stage and align a submission in a fresh workspace.
    pub async fn align(&self, submission: &VariantSubmission) -> Result<AnalysisOutcome, Error> {
        let staged = self.store.stage(submission).await.map_err(|err| {
            warn!(error = %err, "staging submission failed");
            map_store_error(err)
        })?;
        let workspace_id = staged.workspace().id();
        let guard = WorkspaceGuard::new(Arc::clone(&self.store), staged.workspace().clone());

        let result = self.provider.align(&staged).await;

        if self.keep_workspaces {
            info!(%workspace_id, dir = %guard.workspace().dir().display(), "keeping workspace");
            guard.keep();
        } else {
            guard.discard().await;
        }

        let outcome = result.map_err(|err| {
            warn!(%workspace_id, error = %err, "alignment failed");
            map_provider_error(err)
        })?;
        info!(%workspace_id, outcome = outcome_label(&outcome), "alignment finished");
        Ok(outcome)
    }
}

#[async_trait]
impl<S, P> SequenceAnalysis for SequenceAnalysisService<S, P>
where
    S: SubmissionStore + ?Sized + 'static,
    P: SequenceAnalysisProvider + ?Sized,
{
    async fn reference_metadata(&self, sequence_id: &SequenceId) -> Result<AnalysisOutcome, Error> {
        Self::reference_metadata(self, sequence_id).await
    }

    async fn align(&self, submission: &VariantSubmission) -> Result<AnalysisOutcome, Error> {
        Self::align(self, submission).await
    }
}

#[cfg(test)]
#[path = "sequence_analysis_service_tests.rs"]
mod tests;
