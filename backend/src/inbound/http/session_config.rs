//! Session cookie settings and validation.
//!
//! Raw toggles come from [`crate::config::AppSettings`]; this module turns
//! them into a signing key and cookie policy, enforcing stricter rules in
//! release builds.

pub mod fingerprint;

use std::io;
use std::path::{Path, PathBuf};

use actix_web::cookie::{Key, SameSite};
use cap_std::{ambient_authority, fs::Dir};
use tracing::warn;
use zeroize::Zeroize;

/// Minimum key length accepted in release builds.
pub const SESSION_KEY_MIN_LEN: usize = 64;
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";

/// Build mode for session configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate missing keys and loose cookie policies.
    Debug,
    /// Release builds require a real key and a consistent policy.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use virusdecode::inbound::http::session_config::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// assert_eq!(mode == BuildMode::Debug, cfg!(debug_assertions));
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Raw session toggles as configured by the operator.
#[derive(Debug, Clone)]
pub struct SessionToggles {
    pub key_file: PathBuf,
    pub cookie_secure: bool,
    pub same_site: Option<String>,
    pub allow_ephemeral: bool,
}

/// Validated session settings.
pub struct SessionSettings {
    /// Signing and encryption key for cookie sessions.
    pub key: Key,
    /// Whether session cookies are marked `Secure`.
    pub cookie_secure: bool,
    /// `SameSite` policy for session cookies.
    pub same_site: SameSite,
}

/// Errors raised while validating session configuration.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    /// Reading the session key file failed.
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The session key file is too short for release builds.
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    /// The `SameSite` value is not recognised.
    #[error("invalid session SameSite policy '{value}'; expected {SAMESITE_EXPECTED}")]
    InvalidSameSite { value: String },
    /// `SameSite=None` requires a secure cookie in release builds.
    #[error("SameSite=None requires secure session cookies")]
    InsecureSameSiteNone,
    /// Release builds must not allow ephemeral session keys.
    #[error("ephemeral session keys are not allowed in release builds")]
    EphemeralNotAllowed,
}

/// Validate session toggles for the given build mode.
///
/// # Errors
/// Returns [`SessionConfigError`] when a release build is misconfigured or
/// the key file cannot be read and no ephemeral fallback is permitted.
pub fn session_settings(
    toggles: &SessionToggles,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    if toggles.allow_ephemeral && !mode.is_debug() {
        return Err(SessionConfigError::EphemeralNotAllowed);
    }
    let same_site = same_site(toggles.same_site.as_deref(), toggles.cookie_secure, mode)?;
    let key = session_key(&toggles.key_file, mode, toggles.allow_ephemeral)?;
    Ok(SessionSettings {
        key,
        cookie_secure: toggles.cookie_secure,
        same_site,
    })
}

fn same_site(
    raw: Option<&str>,
    cookie_secure: bool,
    mode: BuildMode,
) -> Result<SameSite, SessionConfigError> {
    let Some(raw) = raw else {
        return Ok(if mode.is_debug() {
            SameSite::Lax
        } else {
            SameSite::Strict
        });
    };
    match raw.to_ascii_lowercase().as_str() {
        "lax" => Ok(SameSite::Lax),
        "strict" => Ok(SameSite::Strict),
        "none" if cookie_secure => Ok(SameSite::None),
        "none" if mode.is_debug() => {
            warn!("SameSite=None without secure cookies; browsers may reject the session");
            Ok(SameSite::None)
        }
        "none" => Err(SessionConfigError::InsecureSameSiteNone),
        _ => Err(SessionConfigError::InvalidSameSite {
            value: raw.to_owned(),
        }),
    }
}

fn read_key_bytes(path: &Path) -> io::Result<Vec<u8>> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "key path has no file name"))?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority())?;
    dir.read(file_name)
}

fn session_key(
    path: &Path,
    mode: BuildMode,
    allow_ephemeral: bool,
) -> Result<Key, SessionConfigError> {
    match read_key_bytes(path) {
        Ok(mut bytes) => {
            let length = bytes.len();
            if length < SESSION_KEY_MIN_LEN {
                bytes.zeroize();
                if mode.is_debug() {
                    warn!(
                        path = %path.display(),
                        length,
                        "session key too short; using temporary key (dev only)"
                    );
                    return Ok(Key::generate());
                }
                return Err(SessionConfigError::KeyTooShort {
                    path: path.to_path_buf(),
                    length,
                    min_len: SESSION_KEY_MIN_LEN,
                });
            }
            let key = Key::derive_from(&bytes);
            bytes.zeroize();
            Ok(key)
        }
        Err(error) if mode.is_debug() || allow_ephemeral => {
            warn!(
                path = %path.display(),
                error = %error,
                "using temporary session key (dev only)"
            );
            Ok(Key::generate())
        }
        Err(error) => Err(SessionConfigError::KeyRead {
            path: path.to_path_buf(),
            source: error,
        }),
    }
}
