//! Session key fingerprinting.
//!
//! The server logs a truncated SHA-256 of the signing key at startup so
//! operators can tell which key is active without exposing it.

use actix_web::cookie::Key;
use sha2::{Digest, Sha256};

const FINGERPRINT_BYTES: usize = 8;

/// First eight bytes of the SHA-256 of the key's signing half, as lowercase
/// hex.
///
/// # Examples
///
/// ```rust
/// use actix_web::cookie::Key;
/// use virusdecode::inbound::http::session_config::fingerprint::key_fingerprint;
///
/// let fp = key_fingerprint(&Key::generate());
/// assert_eq!(fp.len(), 16);
/// ```
#[must_use]
pub fn key_fingerprint(key: &Key) -> String {
    let digest = Sha256::digest(key.signing());
    hex::encode(&digest[..FINGERPRINT_BYTES])
}
