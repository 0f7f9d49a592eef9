//! Port for staging submissions into request-scoped workspaces.
//!
//! Every call to [`SubmissionStore::open_workspace`] or
//! [`SubmissionStore::stage`] yields a fresh directory, so concurrent requests
//! never share an input file.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::{SequenceId, VariantSubmission};

use super::define_port_error;

define_port_error! {
    /// Failures raised while preparing a workspace.
    pub enum SubmissionStoreError {
        /// Filesystem operation failed.
        Io { message: String } => "failed to save submission: {message}",
    }
}

/// Scratch directory owned by a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    id: Uuid,
    dir: PathBuf,
}

impl Workspace {
    pub fn new(id: Uuid, dir: PathBuf) -> Self {
        Self { id, dir }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Absolute or root-relative path of the workspace directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Which kind of canonical input file was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StagedInputKind {
    /// `reference.txt` naming a reference sequence id.
    ReferenceMarker,
    /// `input.fasta` holding literal sequence text.
    Fasta,
}

/// A submission written to its workspace, ready for alignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedSubmission {
    workspace: Workspace,
    input_file: String,
    kind: StagedInputKind,
    reference: Option<SequenceId>,
}

impl StagedSubmission {
    pub fn new(workspace: Workspace, input_file: impl Into<String>, kind: StagedInputKind) -> Self {
        Self {
            workspace,
            input_file: input_file.into(),
            kind,
            reference: None,
        }
    }

    /// Record the reference that staged sequence text is aligned against.
    #[must_use]
    pub fn with_reference(mut self, reference: SequenceId) -> Self {
        self.reference = Some(reference);
        self
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// File name of the canonical input, relative to the workspace.
    pub fn input_file(&self) -> &str {
        self.input_file.as_str()
    }

    pub fn kind(&self) -> StagedInputKind {
        self.kind
    }

    /// Reference for sequence text staged together with one.
    pub fn reference(&self) -> Option<&SequenceId> {
        self.reference.as_ref()
    }
}

/// Driven port writing submissions to disk.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// Create an empty workspace.
    async fn open_workspace(&self) -> Result<Workspace, SubmissionStoreError>;

    /// Create a workspace and write the submission's canonical input file.
    async fn stage(
        &self,
        submission: &VariantSubmission,
    ) -> Result<StagedSubmission, SubmissionStoreError>;

    /// Remove a workspace. Failures are logged by the adapter, never returned.
    async fn discard(&self, workspace: &Workspace);
}

/// Discards a workspace when dropped unless it was released first.
///
/// A request future can be dropped at any await point when the client goes
/// away. The guard then hands the removal to the runtime so the directory is
/// not left behind.
pub struct WorkspaceGuard<S: SubmissionStore + ?Sized + 'static> {
    store: Arc<S>,
    workspace: Workspace,
    armed: bool,
}

impl<S: SubmissionStore + ?Sized + 'static> WorkspaceGuard<S> {
    pub fn new(store: Arc<S>, workspace: Workspace) -> Self {
        Self {
            store,
            workspace,
            armed: true,
        }
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Remove the workspace now.
    pub async fn discard(mut self) {
        self.armed = false;
        self.store.discard(&self.workspace).await;
    }

    /// Leave the workspace on disk.
    pub fn keep(mut self) {
        self.armed = false;
    }
}

impl<S: SubmissionStore + ?Sized + 'static> Drop for WorkspaceGuard<S> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let workspace = self.workspace.clone();
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!(workspace_id = %workspace.id(), "no runtime to discard abandoned workspace");
            return;
        };
        debug!(workspace_id = %workspace.id(), "discarding abandoned workspace");
        let store = Arc::clone(&self.store);
        runtime.spawn(async move { store.discard(&workspace).await });
    }
}
