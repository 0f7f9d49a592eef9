//! Filesystem adapter for the `SubmissionStore` port.
//!
//! Each workspace is a UUID-named directory below a configured root. All
//! access goes through a `cap_std` handle on that root, so paths cannot
//! escape it.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::{SequenceEntry, VariantSubmission};
use crate::domain::ports::{
    StagedInputKind, StagedSubmission, SubmissionStore, SubmissionStoreError, Workspace,
};

/// File written for submissions naming a reference sequence id.
pub const REFERENCE_MARKER_FILE: &str = "reference.txt";
/// File written for submissions carrying literal sequence text.
pub const FASTA_INPUT_FILE: &str = "input.fasta";

/// `SubmissionStore` writing workspaces below a root directory.
#[derive(Clone)]
pub struct CapStdSubmissionStore {
    root: Arc<Dir>,
    root_path: PathBuf,
}

impl CapStdSubmissionStore {
    /// Open (creating if needed) the workspace root.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error when the root cannot be created or
    /// opened.
    pub fn open(root_path: impl Into<PathBuf>) -> io::Result<Self> {
        let root_path = root_path.into();
        Dir::create_ambient_dir_all(&root_path, ambient_authority())?;
        let root = Dir::open_ambient_dir(&root_path, ambient_authority())?;
        Ok(Self {
            root: Arc::new(root),
            root_path,
        })
    }

    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    fn create_workspace(root: &Dir, root_path: &Path) -> io::Result<Workspace> {
        let id = Uuid::new_v4();
        let name = id.to_string();
        root.create_dir(&name)?;
        Ok(Workspace::new(id, root_path.join(name)))
    }

    /// Write the canonical input files.
    ///
    /// A reference goes to `reference.txt` and sequence text to
    /// `input.fasta`; a submission carrying both writes both, and the FASTA
    /// file is the script's input.
    fn write_input(
        root: &Dir,
        workspace: &Workspace,
        submission: &VariantSubmission,
    ) -> io::Result<StagedSubmission> {
        let dir = root.open_dir(workspace.id().to_string())?;
        if let Some(reference) = submission.reference() {
            dir.write(REFERENCE_MARKER_FILE, format!("{reference}\n").as_bytes())?;
        }
        let entries = submission.entries();
        if entries.is_empty() {
            return Ok(StagedSubmission::new(
                workspace.clone(),
                REFERENCE_MARKER_FILE,
                StagedInputKind::ReferenceMarker,
            ));
        }

        let fasta: String = entries.iter().map(SequenceEntry::to_fasta).collect();
        dir.write(FASTA_INPUT_FILE, fasta.as_bytes())?;
        let staged =
            StagedSubmission::new(workspace.clone(), FASTA_INPUT_FILE, StagedInputKind::Fasta);
        Ok(match submission.reference() {
            Some(reference) => staged.with_reference(reference.clone()),
            None => staged,
        })
    }

    async fn blocking<T, F>(&self, op: F) -> Result<T, SubmissionStoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Dir, &Path) -> io::Result<T> + Send + 'static,
    {
        let root = Arc::clone(&self.root);
        let root_path = self.root_path.clone();
        tokio::task::spawn_blocking(move || op(&root, &root_path))
            .await
            .map_err(|err| SubmissionStoreError::io(err.to_string()))?
            .map_err(|err| SubmissionStoreError::io(err.to_string()))
    }
}

#[async_trait]
impl SubmissionStore for CapStdSubmissionStore {
    async fn open_workspace(&self) -> Result<Workspace, SubmissionStoreError> {
        let workspace = self.blocking(Self::create_workspace).await?;
        debug!(workspace_id = %workspace.id(), "workspace opened");
        Ok(workspace)
    }

    async fn stage(
        &self,
        submission: &VariantSubmission,
    ) -> Result<StagedSubmission, SubmissionStoreError> {
        let workspace = self.open_workspace().await?;
        let submission = submission.clone();
        let target = workspace.clone();
        let staged = self
            .blocking(move |root, _| Self::write_input(root, &target, &submission))
            .await;
        match staged {
            Ok(staged) => {
                debug!(
                    workspace_id = %workspace.id(),
                    input_file = staged.input_file(),
                    "submission staged"
                );
                Ok(staged)
            }
            Err(err) => {
                self.discard(&workspace).await;
                Err(err)
            }
        }
    }

    async fn discard(&self, workspace: &Workspace) {
        let name = workspace.id().to_string();
        let removed = self
            .blocking(move |root, _| match root.remove_dir_all(&name) {
                Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
                other => other,
            })
            .await;
        match removed {
            Ok(()) => debug!(workspace_id = %workspace.id(), "workspace discarded"),
            Err(err) => warn!(
                workspace_id = %workspace.id(),
                error = %err,
                "failed to discard workspace"
            ),
        }
    }
}
