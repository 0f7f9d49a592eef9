//! Driving port for account signup, login and profile lookup.
//!
//! Inbound adapters call this port without importing persistence, so HTTP
//! handler tests substitute a double instead of wiring a database.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, SignUp, User, UserId};

/// Account use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserAccounts: Send + Sync {
    /// Register a new account. Duplicate login ids yield `Conflict`.
    async fn sign_up(&self, signup: &SignUp) -> Result<User, Error>;

    /// Check credentials and return the matching account, or `Unauthorized`.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error>;

    /// Load an account by internal id, or `NotFound`.
    async fn profile(&self, user_id: &UserId) -> Result<User, Error>;
}
