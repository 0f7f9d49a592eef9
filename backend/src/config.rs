//! Application settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `VIRUSDECODE_*` environment variables and an
//! optional configuration file, in that order of precedence.

use std::net::{AddrParseError, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::inbound::http::session_config::SessionToggles;
use crate::outbound::script::DEFAULT_SCRIPT_TIMEOUT;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_INTERPRETER: &str = "python3";
const DEFAULT_SCRIPT_PATH: &str = "bioinformatics/alignment_and_translation.py";
const DEFAULT_WORKSPACE_ROOT: &str = "bioinformatics/workspaces";
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";

/// Server settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "VIRUSDECODE")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL; without one, accounts live in memory.
    pub database_url: Option<String>,
    /// Interpreter used to run the analysis script.
    pub interpreter: Option<String>,
    /// Path to the analysis script.
    pub script_path: Option<PathBuf>,
    /// Directory holding per-request workspaces.
    pub workspace_root: Option<PathBuf>,
    /// Upper bound on a single script run, in seconds; at least one.
    pub script_timeout_secs: Option<u64>,
    /// Keep request workspaces after analysis for debugging.
    pub keep_workspaces: Option<bool>,
    /// File holding the session signing key.
    pub session_key_file: Option<PathBuf>,
    /// Mark session cookies `Secure`; on unless explicitly disabled.
    pub session_cookie_secure: Option<bool>,
    /// `SameSite` policy for session cookies: `Strict`, `Lax` or `None`.
    pub session_same_site: Option<String>,
    /// Allow a generated session key when the key file is unreadable.
    pub session_allow_ephemeral: Option<bool>,
}

impl AppSettings {
    /// Parsed bind address.
    ///
    /// # Errors
    /// Returns the parse error for a malformed address.
    pub fn bind_addr(&self) -> Result<SocketAddr, AddrParseError> {
        self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR).parse()
    }

    pub fn interpreter(&self) -> &str {
        self.interpreter.as_deref().unwrap_or(DEFAULT_INTERPRETER)
    }

    pub fn script_path(&self) -> PathBuf {
        self.script_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SCRIPT_PATH))
    }

    pub fn workspace_root(&self) -> PathBuf {
        self.workspace_root
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_WORKSPACE_ROOT))
    }

    /// Script time budget. Zero would fail every run, so it counts as one
    /// second.
    pub fn script_timeout(&self) -> Duration {
        self.script_timeout_secs
            .map_or(DEFAULT_SCRIPT_TIMEOUT, |secs| Duration::from_secs(secs.max(1)))
    }

    pub fn keep_workspaces(&self) -> bool {
        self.keep_workspaces.unwrap_or(false)
    }

    /// Session toggles for [`crate::inbound::http::session_config`].
    pub fn session_toggles(&self) -> SessionToggles {
        SessionToggles {
            key_file: self
                .session_key_file
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_KEY_FILE)),
            cookie_secure: self.session_cookie_secure.unwrap_or(true),
            same_site: self.session_same_site.clone(),
            allow_ephemeral: self.session_allow_ephemeral.unwrap_or(false),
        }
    }
}
