//! Account domain service.
//!
//! Implements the [`UserAccounts`] driving port on top of a
//! [`UserRepository`]. Passwords are hashed with Argon2id before they reach
//! the repository. Hashing runs on Tokio's blocking pool so it never stalls
//! an HTTP worker, and an unknown login id costs the same hashing work as a
//! wrong password.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::task::spawn_blocking;
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use crate::domain::ports::{UserAccounts, UserPersistenceError, UserRepository};
use crate::domain::{
    Error, HashCost, LoginCredentials, LoginId, PasswordHash, SignUp, User, UserId,
};

const INVALID_CREDENTIALS: &str = "invalid credentials";

/// Account service implementing [`UserAccounts`].
pub struct UserAccountService<R: ?Sized> {
    repository: Arc<R>,
    hash_cost: HashCost,
}

impl<R: ?Sized> Clone for UserAccountService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            hash_cost: self.hash_cost,
        }
    }
}

impl<R: ?Sized> UserAccountService<R> {
    /// Create a service using the default hash cost.
    pub fn new(repository: Arc<R>) -> Self {
        Self::with_hash_cost(repository, HashCost::DEFAULT)
    }

    /// Create a service with an explicit hash cost. Tests use
    /// [`HashCost::MINIMAL`].
    pub fn with_hash_cost(repository: Arc<R>, hash_cost: HashCost) -> Self {
        Self {
            repository,
            hash_cost,
        }
    }
}

fn hashing_task_failed(err: &tokio::task::JoinError) -> Error {
    Error::internal(format!("password hashing task failed: {err}"))
}

impl<R> UserAccountService<R>
where
    R: UserRepository + ?Sized,
{
    fn map_persistence_error(error: UserPersistenceError) -> Error {
        match error {
            UserPersistenceError::Connection { message } => {
                Error::service_unavailable(format!("user repository unavailable: {message}"))
            }
            UserPersistenceError::Query { message } => {
                Error::internal(format!("user repository error: {message}"))
            }
            UserPersistenceError::DuplicateLoginId { login_id } => {
                Self::duplicate_login_id(&login_id)
            }
        }
    }

    fn duplicate_login_id(login_id: &str) -> Error {
        Error::conflict(format!("login id `{login_id}` is already registered"))
    }

    /// Register a new account.
    ///
    /// The existence check gives a friendly conflict early; the repository's
    /// uniqueness constraint still decides races between concurrent signups.
    pub async fn create_account(&self, signup: &SignUp) -> Result<User, Error> {
        if self.find_by_login_id(signup.login_id()).await?.is_some() {
            return Err(Self::duplicate_login_id(signup.login_id().as_ref()));
        }

        let password = Zeroizing::new(signup.password().to_owned());
        let cost = self.hash_cost;
        let hash = spawn_blocking(move || PasswordHash::derive(&password, cost))
            .await
            .map_err(|err| hashing_task_failed(&err))?
            .map_err(|err| Error::internal(err.to_string()))?;

        let user = User::new(
            UserId::random(),
            signup.login_id().clone(),
            signup.first_name().clone(),
            signup.last_name().clone(),
            hash,
        );
        self.repository
            .insert(&user)
            .await
            .map_err(Self::map_persistence_error)?;
        info!(user_id = %user.id(), login_id = %user.login_id(), "account registered");
        Ok(user)
    }

    /// Look up an account by login id.
    pub async fn find_by_login_id(&self, login_id: &LoginId) -> Result<Option<User>, Error> {
        self.repository
            .find_by_login_id(login_id)
            .await
            .map_err(Self::map_persistence_error)
    }

    /// Look up an account by internal id.
    pub async fn find_by_id(&self, user_id: &UserId) -> Result<Option<User>, Error> {
        self.repository
            .find_by_id(user_id)
            .await
            .map_err(Self::map_persistence_error)
    }

    /// Check a candidate password against the user's stored hash.
    ///
    /// Without a user the same hashing work is spent and the answer is
    /// `false`.
    pub async fn verify_password(&self, user: Option<&User>, candidate: &str) -> bool {
        let candidate = Zeroizing::new(candidate.to_owned());
        let stored = user.map(|user| user.password().clone());
        let cost = self.hash_cost;
        let outcome = spawn_blocking(move || match stored {
            Some(hash) => hash.verify(&candidate),
            None => PasswordHash::verify_absent(&candidate, cost),
        })
        .await;
        outcome.unwrap_or_else(|err| {
            warn!(error = %err, "password verification task failed");
            false
        })
    }
}

#[async_trait]
impl<R> UserAccounts for UserAccountService<R>
where
    R: UserRepository + ?Sized,
{
    async fn sign_up(&self, signup: &SignUp) -> Result<User, Error> {
        self.create_account(signup).await
    }

    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error> {
        let user = self.find_by_login_id(credentials.login_id()).await?;
        let matches = self
            .verify_password(user.as_ref(), credentials.password())
            .await;
        match user {
            Some(user) if matches => Ok(user),
            _ => {
                debug!(login_id = %credentials.login_id(), "login rejected");
                Err(Error::unauthorized(INVALID_CREDENTIALS))
            }
        }
    }

    async fn profile(&self, user_id: &UserId) -> Result<User, Error> {
        self.find_by_id(user_id)
            .await?
            .ok_or_else(|| Error::not_found(format!("user {user_id} not found")))
    }
}

#[cfg(test)]
#[path = "user_account_service_tests.rs"]
mod tests;
