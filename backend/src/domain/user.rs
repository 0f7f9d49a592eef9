//! User account model.
//!
//! Accounts are identified internally by a UUID and externally by a login id
//! chosen at signup. Names are free text but bounded; passwords only ever
//! appear here as a [`PasswordHash`].

use std::fmt;

use uuid::Uuid;

use super::PasswordHash;

/// Maximum length, in characters, of login ids and names.
pub const ACCOUNT_FIELD_MAX: usize = 64;

/// Validation errors raised by the account value constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    #[error("user id must be a valid UUID")]
    InvalidId,
    #[error("login id must not be empty")]
    EmptyLoginId,
    #[error("login id must not contain whitespace")]
    LoginIdWhitespace,
    #[error("{field} must not be empty")]
    EmptyName { field: &'static str },
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },
}

fn check_length(value: &str, field: &'static str) -> Result<(), UserValidationError> {
    if value.chars().count() > ACCOUNT_FIELD_MAX {
        return Err(UserValidationError::TooLong {
            field,
            max: ACCOUNT_FIELD_MAX,
        });
    }
    Ok(())
}

/// Internal account identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(Uuid);

impl UserId {
    /// Parse an identifier from its hyphenated string form.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let raw = id.as_ref();
        if raw.trim() != raw {
            return Err(UserValidationError::InvalidId);
        }
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }

    /// Generate a fresh random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Login identifier chosen by the user at signup.
///
/// ## Invariants
/// - Trimmed, non-empty, free of inner whitespace.
/// - At most [`ACCOUNT_FIELD_MAX`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LoginId(String);

impl LoginId {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyLoginId);
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(UserValidationError::LoginIdWhitespace);
        }
        check_length(trimmed, "login id")?;
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for LoginId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for LoginId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// First or last name of an account holder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonName(String);

impl PersonName {
    /// Validate a name; `field` names the input in error messages.
    pub fn new(raw: impl AsRef<str>, field: &'static str) -> Result<Self, UserValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyName { field });
        }
        check_length(trimmed, field)?;
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for PersonName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PersonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Persisted user account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    login_id: LoginId,
    first_name: PersonName,
    last_name: PersonName,
    password: PasswordHash,
}

impl User {
    pub fn new(
        id: UserId,
        login_id: LoginId,
        first_name: PersonName,
        last_name: PersonName,
        password: PasswordHash,
    ) -> Self {
        Self {
            id,
            login_id,
            first_name,
            last_name,
            password,
        }
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn login_id(&self) -> &LoginId {
        &self.login_id
    }

    pub fn first_name(&self) -> &PersonName {
        &self.first_name
    }

    pub fn last_name(&self) -> &PersonName {
        &self.last_name
    }

    pub fn password(&self) -> &PasswordHash {
        &self.password
    }
}

/// Validated signup fields, before the password is hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUp {
    login_id: LoginId,
    first_name: PersonName,
    last_name: PersonName,
    password: zeroize::Zeroizing<String>,
}

/// Signup validation failures, including the password rule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignUpValidationError {
    #[error(transparent)]
    Field(#[from] UserValidationError),
    #[error("password must not be empty")]
    EmptyPassword,
}

impl SignUp {
    /// Validate raw signup input.
    ///
    /// # Examples
    /// ```
    /// use virusdecode::domain::SignUp;
    ///
    /// let signup = SignUp::try_from_parts("  rosalind ", "Rosalind", "Franklin", "x-ray").unwrap();
    /// assert_eq!(signup.login_id().as_ref(), "rosalind");
    /// ```
    pub fn try_from_parts(
        login_id: &str,
        first_name: &str,
        last_name: &str,
        password: &str,
    ) -> Result<Self, SignUpValidationError> {
        let login_id = LoginId::new(login_id)?;
        let first_name = PersonName::new(first_name, "first name")?;
        let last_name = PersonName::new(last_name, "last name")?;
        if password.is_empty() {
            return Err(SignUpValidationError::EmptyPassword);
        }
        Ok(Self {
            login_id,
            first_name,
            last_name,
            password: zeroize::Zeroizing::new(password.to_owned()),
        })
    }

    pub fn login_id(&self) -> &LoginId {
        &self.login_id
    }

    pub fn first_name(&self) -> &PersonName {
        &self.first_name
    }

    pub fn last_name(&self) -> &PersonName {
        &self.last_name
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

#[cfg(test)]
mod tests;
