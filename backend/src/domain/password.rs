//! Salted one-way password hashes.
//!
//! Hashes are Argon2id PHC strings
//! (`$argon2id$v=19$m=<KiB>,t=<passes>,p=1$<salt>$<hash>`). The string
//! carries its own salt and cost, so hashes made under an older [`HashCost`]
//! keep verifying after the configured cost changes.

use std::fmt;

use argon2::password_hash::{
    PasswordHash as PhcString, PasswordHasher, PasswordVerifier, SaltString,
};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::rngs::OsRng;
use tracing::warn;

/// Errors raised when producing or decoding a stored hash.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordHashError {
    #[error("password hash is not a valid PHC string: {0}")]
    Malformed(String),
    #[error("unsupported password hash algorithm `{0}`")]
    UnsupportedAlgorithm(String),
    #[error("password hashing failed: {0}")]
    Hashing(String),
}

/// Argon2id work factor for new hashes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashCost {
    memory_kib: u32,
    passes: u32,
}

impl HashCost {
    /// 19 MiB and two passes.
    pub const DEFAULT: Self = Self::new(19 * 1024, 2);

    /// Smallest cost Argon2 accepts; for tests only.
    pub const MINIMAL: Self = Self::new(Params::MIN_M_COST, Params::MIN_T_COST);

    pub const fn new(memory_kib: u32, passes: u32) -> Self {
        Self { memory_kib, passes }
    }

    fn hasher(self) -> Result<Argon2<'static>, PasswordHashError> {
        let params = Params::new(self.memory_kib, self.passes, 1, None)
            .map_err(|err| PasswordHashError::Hashing(err.to_string()))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

impl Default for HashCost {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Encoded salted password hash.
///
/// # Examples
/// ```
/// use virusdecode::domain::{HashCost, PasswordHash};
///
/// let hash = PasswordHash::derive("x-ray", HashCost::MINIMAL).expect("hash");
/// assert!(hash.verify("x-ray"));
/// assert!(!hash.verify("X-ray"));
/// assert!(!hash.as_str().contains("x-ray"));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash {
    encoded: String,
}

impl PasswordHash {
    /// Hash `password` with a fresh random salt.
    ///
    /// # Errors
    /// Fails when `cost` is outside Argon2's accepted range.
    pub fn derive(password: &str, cost: HashCost) -> Result<Self, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        let phc = cost
            .hasher()?
            .hash_password(password.as_bytes(), &salt)
            .map_err(|err| PasswordHashError::Hashing(err.to_string()))?;
        Ok(Self {
            encoded: phc.to_string(),
        })
    }

    /// Burn the same work as verifying against a stored hash, then fail.
    ///
    /// Used when no account matches so both outcomes take similar time.
    pub fn verify_absent(candidate: &str, cost: HashCost) -> bool {
        if let Err(err) = Self::derive(candidate, cost) {
            warn!(error = %err, "placeholder hash failed");
        }
        false
    }

    /// Decode a stored hash.
    ///
    /// # Errors
    /// Rejects anything that is not an Argon2id PHC string.
    pub fn parse(encoded: &str) -> Result<Self, PasswordHashError> {
        let phc =
            PhcString::new(encoded).map_err(|err| PasswordHashError::Malformed(err.to_string()))?;
        if phc.algorithm != argon2::ARGON2ID_IDENT {
            return Err(PasswordHashError::UnsupportedAlgorithm(
                phc.algorithm.to_string(),
            ));
        }
        if phc.salt.is_none() || phc.hash.is_none() {
            return Err(PasswordHashError::Malformed("missing salt or hash".to_owned()));
        }
        Ok(Self {
            encoded: encoded.to_owned(),
        })
    }

    /// Check a candidate password against this hash.
    pub fn verify(&self, candidate: &str) -> bool {
        let Ok(phc) = PhcString::new(&self.encoded) else {
            return false;
        };
        Argon2::default()
            .verify_password(candidate.as_bytes(), &phc)
            .is_ok()
    }

    pub fn as_str(&self) -> &str {
        self.encoded.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordHash").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn hash(password: &str) -> PasswordHash {
        PasswordHash::derive(password, HashCost::MINIMAL).expect("hash derives")
    }

    #[rstest]
    fn hashes_are_argon2id_phc_strings() {
        let stored = hash("pw");
        assert!(stored.as_str().starts_with("$argon2id$v=19$m=8,t=1,p=1$"));
    }

    #[rstest]
    fn random_salts_differ_between_hashes() {
        let first = hash("pw");
        let second = hash("pw");
        assert_ne!(first.as_str(), second.as_str());
        assert!(first.verify("pw"));
        assert!(second.verify("pw"));
    }

    #[rstest]
    fn parsed_hash_verifies_original_password() {
        let stored = hash("correct horse");
        let parsed = PasswordHash::parse(stored.as_str()).expect("parse stored hash");
        assert!(parsed.verify("correct horse"));
        assert!(!parsed.verify("correct horse "));
    }

    #[rstest]
    fn hash_made_under_another_cost_still_verifies() {
        let stored = PasswordHash::derive("pw", HashCost::new(16, 2)).expect("hash derives");
        let parsed = PasswordHash::parse(stored.as_str()).expect("parse");
        assert!(parsed.verify("pw"));
    }

    #[rstest]
    #[case("plaintext")]
    #[case("sha256$1$00$00")]
    #[case("$argon2id$v=19$m=8")]
    fn parse_rejects_non_phc_text(#[case] encoded: &str) {
        assert!(matches!(
            PasswordHash::parse(encoded),
            Err(PasswordHashError::Malformed(_))
        ));
    }

    #[rstest]
    fn parse_rejects_other_algorithms() {
        let argon2i = "$argon2i$v=19$m=8,t=1,p=1$c2FsdHNhbHQ$aGFzaGhhc2hoYXNoaGFzaA";
        assert_eq!(
            PasswordHash::parse(argon2i),
            Err(PasswordHashError::UnsupportedAlgorithm("argon2i".to_owned()))
        );
    }

    #[rstest]
    fn cost_below_minimum_is_an_error() {
        assert!(matches!(
            PasswordHash::derive("pw", HashCost::new(1, 1)),
            Err(PasswordHashError::Hashing(_))
        ));
    }

    #[rstest]
    fn absent_account_never_verifies() {
        assert!(!PasswordHash::verify_absent("pw", HashCost::MINIMAL));
    }

    #[rstest]
    fn debug_output_hides_hash() {
        let stored = hash("pw");
        assert!(!format!("{stored:?}").contains("argon2id"));
    }
}
