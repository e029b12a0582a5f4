//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserAccount, UserPersistenceError, UserRepository};
use crate::domain::{User, UserId};

use super::diesel_error_mapping::{DatabaseFailure, USERS_EMAIL_KEY, classify_diesel_error};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Build the repository over a connection pool.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    DatabaseFailure::from_pool(error)
        .into_basic(UserPersistenceError::connection, UserPersistenceError::query)
}

fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    classify_diesel_error(error)
        .into_basic(UserPersistenceError::connection, UserPersistenceError::query)
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(&self, account: &UserAccount) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let email = account.user.email().as_ref();
        let new_row = NewUserRow {
            id: *account.user.id().as_uuid(),
            name: account.user.name().as_ref(),
            email,
            password_hash: account.password_hash.as_str(),
        };

        diesel::insert_into(users::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| {
                let failure = classify_diesel_error(err);
                if failure.names(USERS_EMAIL_KEY) {
                    UserPersistenceError::duplicate_email(email)
                } else {
                    failure.into_basic(UserPersistenceError::connection, UserPersistenceError::query)
                }
            })
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = users::table
            .filter(users::email.eq(email))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(|row| row.into_account().map_err(UserPersistenceError::query))
            .transpose()
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = users::table
            .find(id.as_uuid())
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(|row| row.into_user().map_err(UserPersistenceError::query))
            .transpose()
    }
}
