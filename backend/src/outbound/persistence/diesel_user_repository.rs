//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Uniqueness is enforced by the `users_username_key` and `users_email_key`
//! constraints, so a violated write fails inside the database rather than
//! after a racy pre-check. Partial updates merge `data` in the same `UPDATE`
//! statement that writes the other fields.

use async_trait::async_trait;
use chrono::Utc;
use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::Jsonb;
use diesel_async::RunQueryDsl;
use serde_json::Value;
use tracing::debug;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{
    DataChange, Email, NewUser, User, UserChanges, UserData, UserId, Username,
};

use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

const USERNAME_CONSTRAINT: &str = "users_username_key";
const EMAIL_CONSTRAINT: &str = "users_email_key";

/// Diesel-backed implementation of the [`UserRepository`] port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    UserPersistenceError::connection(error.into_message())
}

/// Name the unique field a violated constraint protects.
fn duplicate_field(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some(USERNAME_CONSTRAINT) => "username",
        Some(EMAIL_CONSTRAINT) => "email",
        _ => "username or email",
    }
}

fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            UserPersistenceError::duplicate(duplicate_field(info.constraint_name()))
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
            UserPersistenceError::connection(info.message())
        }
        DieselError::DatabaseError(_, info) => UserPersistenceError::query(info.message()),
        DieselError::QueryBuilderError(err) => UserPersistenceError::query(err.to_string()),
        other => UserPersistenceError::query(other.to_string()),
    }
}

fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    let UserRow {
        id,
        username,
        email,
        data,
        created_at,
        updated_at,
    } = row;
    let username = Username::new(username)
        .map_err(|err| UserPersistenceError::query(format!("stored user {id}: {err}")))?;
    let email = Email::new(email)
        .map_err(|err| UserPersistenceError::query(format!("stored user {id}: {err}")))?;
    Ok(User::new(
        UserId::from_uuid(id),
        NewUser::new(username, email, UserData::new(data)),
        created_at,
        updated_at,
    ))
}

fn rows_to_users(rows: Vec<UserRow>) -> Result<Vec<User>, UserPersistenceError> {
    rows.into_iter().map(row_to_user).collect()
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let now = Utc::now();
        let row = NewUserRow {
            id: *UserId::random().as_uuid(),
            username: user.username().as_ref(),
            email: user.email().as_ref(),
            data: user.data().as_value(),
            created_at: now,
            updated_at: now,
        };

        let stored: UserRow = diesel::insert_into(users::table)
            .values(&row)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_user(stored)
    }

    async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<UserRow> = users::table
            .order((users::created_at.asc(), users::id.asc()))
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_users(rows)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .find(id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_user).transpose()
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .filter(users::username.eq(username.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_user).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_user).transpose()
    }

    async fn update(
        &self,
        id: &UserId,
        changes: &UserChanges,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let username = changes
            .username()
            .map(|value| users::username.eq(value.as_ref().to_owned()));
        let email = changes
            .email()
            .map(|value| users::email.eq(value.as_ref().to_owned()));
        let replace = match changes.data() {
            Some(DataChange::Replace(data)) => Some(users::data.eq(data.as_value().clone())),
            _ => None,
        };
        // Stored non-object data merges as if it were `{}`.
        let merge = match changes.data() {
            Some(DataChange::Merge(patch)) => {
                let patch = Value::Object(patch.clone());
                Some(
                    users::data.eq(sql::<Jsonb>(
                        "CASE WHEN jsonb_typeof(data) = 'object' THEN data || ",
                    )
                    .bind::<Jsonb, _>(patch.clone())
                    .sql(" ELSE ")
                    .bind::<Jsonb, _>(patch)
                    .sql(" END")),
                )
            }
            _ => None,
        };

        let row: Option<UserRow> = diesel::update(users::table.find(id.as_uuid()))
            .set((
                username,
                email,
                replace,
                merge,
                users::updated_at.eq(Utc::now()),
            ))
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_user).transpose()
    }

    async fn delete(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = diesel::delete(users::table.find(id.as_uuid()))
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_user).transpose()
    }
}
