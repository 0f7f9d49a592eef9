//! In-process `UserRepository` used when no database is configured.
//!
//! Accounts live only as long as the process. Login ids are unique, matching
//! the constraint the PostgreSQL schema enforces.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{LoginId, User, UserId};

/// Thread-safe map of accounts keyed by id.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<UserId, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: PoisonError<T>) -> UserPersistenceError {
    UserPersistenceError::query("user store lock poisoned")
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut users = self.users.write().map_err(poisoned)?;
        if users
            .values()
            .any(|existing| existing.login_id() == user.login_id())
        {
            return Err(UserPersistenceError::duplicate_login_id(
                user.login_id().as_ref(),
            ));
        }
        users.insert(*user.id(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let users = self.users.read().map_err(poisoned)?;
        Ok(users.get(id).cloned())
    }

    async fn find_by_login_id(
        &self,
        login_id: &LoginId,
    ) -> Result<Option<User>, UserPersistenceError> {
        let users = self.users.read().map_err(poisoned)?;
        Ok(users
            .values()
            .find(|user| user.login_id() == login_id)
            .cloned())
    }
}
