//! `SequenceAnalysisProvider` backed by the analysis script.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{
    AnalysisProviderError, SequenceAnalysisProvider, StagedSubmission, SubmissionStore,
    SubmissionStoreError, WorkspaceGuard,
};
use crate::domain::{AnalysisOutcome, SequenceId};

use super::runner::{ScriptError, ScriptMode, ScriptRunner};

/// Script-backed analysis provider.
///
/// Alignments run inside the workspace the caller staged, with the reference
/// id as an extra argument when sequence text came with one. Metadata lookups
/// open a scratch workspace of their own and discard it afterwards, even when
/// the lookup is abandoned.
#[derive(Clone)]
pub struct ScriptAnalysisProvider {
    runner: Arc<ScriptRunner>,
    workspaces: Arc<dyn SubmissionStore>,
    keep_workspaces: bool,
}

impl ScriptAnalysisProvider {
    pub fn new(runner: ScriptRunner, workspaces: Arc<dyn SubmissionStore>) -> Self {
        Self {
            runner: Arc::new(runner),
            workspaces,
            keep_workspaces: false,
        }
    }

    /// Leave metadata workspaces on disk after each lookup.
    #[must_use]
    pub fn keep_workspaces(mut self, keep: bool) -> Self {
        self.keep_workspaces = keep;
        self
    }
}

fn map_store_error(error: SubmissionStoreError) -> AnalysisProviderError {
    match error {
        SubmissionStoreError::Io { message } => AnalysisProviderError::workspace(message),
    }
}

fn map_script_error(error: ScriptError) -> AnalysisProviderError {
    match error {
        ScriptError::Launch { interpreter, source } => {
            AnalysisProviderError::launch(format!("{interpreter}: {source}"))
        }
        ScriptError::Exit { status, .. } => AnalysisProviderError::exit(status),
        ScriptError::Timeout { timeout } => AnalysisProviderError::timeout(timeout.as_secs()),
        err @ (ScriptError::OutputRead { .. } | ScriptError::MalformedOutput { .. }) => {
            AnalysisProviderError::output(err.to_string())
        }
    }
}

#[async_trait]
impl SequenceAnalysisProvider for ScriptAnalysisProvider {
    async fn reference_metadata(
        &self,
        sequence_id: &SequenceId,
    ) -> Result<AnalysisOutcome, AnalysisProviderError> {
        let workspace = self
            .workspaces
            .open_workspace()
            .await
            .map_err(map_store_error)?;
        let guard = WorkspaceGuard::new(Arc::clone(&self.workspaces), workspace);

        let result = self
            .runner
            .run(
                guard.workspace().dir(),
                ScriptMode::Metadata,
                &[sequence_id.as_ref()],
            )
            .await;

        if self.keep_workspaces {
            info!(workspace_id = %guard.workspace().id(), "keeping metadata workspace");
            guard.keep();
        } else {
            guard.discard().await;
        }
        result.map_err(map_script_error)
    }

    async fn align(
        &self,
        staged: &StagedSubmission,
    ) -> Result<AnalysisOutcome, AnalysisProviderError> {
        let mut args = vec![staged.input_file()];
        if let Some(reference) = staged.reference() {
            args.push(reference.as_ref());
        }
        self.runner
            .run(staged.workspace().dir(), ScriptMode::Alignment, &args)
            .await
            .map_err(map_script_error)
    }
}
