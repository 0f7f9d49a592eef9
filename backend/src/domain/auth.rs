//! Login credentials.
//!
//! Inbound adapters build [`LoginCredentials`] from raw payload strings before
//! calling the account port, so validation never leaks into handlers.

use std::fmt;

use zeroize::Zeroizing;

use super::{LoginId, UserValidationError};

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Login id was missing or malformed.
    InvalidLoginId(UserValidationError),
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLoginId(err) => err.fmt(f),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials.
///
/// ## Invariants
/// - `login_id` satisfies [`LoginId`] validation.
/// - `password` is non-empty and keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use virusdecode::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("rosalind", "x-ray").unwrap();
/// assert_eq!(creds.login_id().as_ref(), "rosalind");
/// assert_eq!(creds.password(), "x-ray");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    login_id: LoginId,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    pub fn try_from_parts(login_id: &str, password: &str) -> Result<Self, LoginValidationError> {
        let login_id = LoginId::new(login_id).map_err(LoginValidationError::InvalidLoginId)?;
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            login_id,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    pub fn login_id(&self) -> &LoginId {
        &self.login_id
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}
