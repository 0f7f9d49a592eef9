//! Port abstraction for user persistence adapters and their errors.

use async_trait::async_trait;

use crate::domain::{LoginId, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// The login id is already taken by another account.
        DuplicateLoginId { login_id: String } => "login id `{login_id}` is already registered",
    }
}

/// Driven port over the `users` table.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account. Fails with `DuplicateLoginId` if the login id
    /// is taken.
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Fetch an account by internal identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch an account by login id.
    async fn find_by_login_id(
        &self,
        login_id: &LoginId,
    ) -> Result<Option<User>, UserPersistenceError>;
}
