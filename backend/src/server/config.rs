//! HTTP server configuration object.

use std::net::SocketAddr;
use std::path::PathBuf;

use actix_web::cookie::{Key, SameSite};
use virusdecode::outbound::persistence::DbPool;
use virusdecode::outbound::script::ScriptConfig;

/// Settings for the analysis pipeline.
pub struct AnalysisConfig {
    pub(crate) script: ScriptConfig,
    pub(crate) workspace_root: PathBuf,
    pub(crate) keep_workspaces: bool,
}

impl AnalysisConfig {
    #[must_use]
    pub fn new(script: ScriptConfig, workspace_root: PathBuf, keep_workspaces: bool) -> Self {
        Self {
            script,
            workspace_root,
            keep_workspaces,
        }
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) analysis: AnalysisConfig,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(
        key: Key,
        cookie_secure: bool,
        same_site: SameSite,
        bind_addr: SocketAddr,
        analysis: AnalysisConfig,
    ) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            analysis,
            db_pool: None,
        }
    }

    /// Store accounts in PostgreSQL instead of memory.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }
}
