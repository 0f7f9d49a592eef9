//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_async::RunQueryDsl;
use tracing::{debug, warn};

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{LoginId, PasswordHash, PersonName, User, UserId};

use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    UserPersistenceError::connection(error.into_message())
}

/// Map Diesel errors to port errors. Unique violations only arise from the
/// login id index, so they carry the login id being written.
fn map_diesel_error(error: DieselError, login_id: Option<&str>) -> UserPersistenceError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match (error, login_id) {
        (DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _), Some(login_id)) => {
            UserPersistenceError::duplicate_login_id(login_id)
        }
        (DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _), _) => {
            UserPersistenceError::connection("database connection error")
        }
        (DieselError::NotFound, _) => UserPersistenceError::query("record not found"),
        (DieselError::QueryBuilderError(_), _) => {
            UserPersistenceError::query("database query error")
        }
        _ => UserPersistenceError::query("database error"),
    }
}

/// Rebuild a domain user from a row, rejecting rows the domain would not
/// have written.
fn row_to_user(row: &UserRow) -> Result<User, UserPersistenceError> {
    let invalid = |field: &str, reason: String| {
        warn!(user_id = %row.id, field, %reason, "stored account failed validation");
        UserPersistenceError::query(format!("stored account has invalid {field}"))
    };
    let login_id = LoginId::new(&row.login_id).map_err(|err| invalid("login id", err.to_string()))?;
    let first_name = PersonName::new(&row.first_name, "first name")
        .map_err(|err| invalid("first name", err.to_string()))?;
    let last_name = PersonName::new(&row.last_name, "last name")
        .map_err(|err| invalid("last name", err.to_string()))?;
    let password = PasswordHash::parse(&row.password_hash)
        .map_err(|err| invalid("password hash", err.to_string()))?;

    Ok(User::new(
        UserId::from_uuid(row.id),
        login_id,
        first_name,
        last_name,
        password,
    ))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewUserRow {
            id: *user.id().as_uuid(),
            login_id: user.login_id().as_ref(),
            first_name: user.first_name().as_ref(),
            last_name: user.last_name().as_ref(),
            password_hash: user.password().as_str(),
        };

        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_diesel_error(err, Some(user.login_id().as_ref())))
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        users::table
            .filter(users::id.eq(*id.as_uuid()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, None))?
            .map(|row| row_to_user(&row))
            .transpose()
    }

    async fn find_by_login_id(
        &self,
        login_id: &LoginId,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        users::table
            .filter(users::login_id.eq(login_id.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, None))?
            .map(|row| row_to_user(&row))
            .transpose()
    }
}
