//! Builders wiring adapters into the HTTP state.

use std::io;
use std::sync::Arc;

use tracing::info;

use virusdecode::domain::ports::{SubmissionStore, UserRepository};
use virusdecode::domain::{SequenceAnalysisService, UserAccountService};
use virusdecode::inbound::http::state::HttpState;
use virusdecode::outbound::memory::InMemoryUserRepository;
use virusdecode::outbound::persistence::{DbPool, DieselUserRepository};
use virusdecode::outbound::script::{ScriptAnalysisProvider, ScriptRunner};
use virusdecode::outbound::workspace::CapStdSubmissionStore;

use super::{AnalysisConfig, ServerConfig};

fn build_user_repository(pool: Option<&DbPool>) -> Arc<dyn UserRepository> {
    match pool {
        Some(pool) => Arc::new(DieselUserRepository::new(pool.clone())),
        None => {
            info!("no database configured; accounts are kept in memory");
            Arc::new(InMemoryUserRepository::new())
        }
    }
}

type ScriptBackedAnalysis = SequenceAnalysisService<dyn SubmissionStore, ScriptAnalysisProvider>;

fn build_analysis(config: &AnalysisConfig) -> io::Result<ScriptBackedAnalysis> {
    let store: Arc<dyn SubmissionStore> =
        Arc::new(CapStdSubmissionStore::open(config.workspace_root.clone())?);
    let runner = ScriptRunner::new(config.script.clone());
    let provider = ScriptAnalysisProvider::new(runner, Arc::clone(&store))
        .keep_workspaces(config.keep_workspaces);
    info!(
        interpreter = config.script.interpreter(),
        script = %config.script.script_path().display(),
        workspace_root = %config.workspace_root.display(),
        "analysis pipeline configured"
    );
    Ok(SequenceAnalysisService::new(store, Arc::new(provider))
        .keep_workspaces(config.keep_workspaces))
}

/// Build the handler state from the server configuration.
///
/// # Errors
/// Fails when the workspace root cannot be created or opened.
pub(super) fn build_http_state(config: &ServerConfig) -> io::Result<HttpState> {
    let accounts = UserAccountService::new(build_user_repository(config.db_pool.as_ref()));
    let analysis = build_analysis(&config.analysis)?;
    Ok(HttpState::new(Arc::new(accounts), Arc::new(analysis)))
}
