//! Driven port for user storage adapters and their errors.
//!
//! Adapters must enforce username and email uniqueness themselves: the check
//! and the write happen atomically with respect to other writers, so two
//! concurrent requests can never both claim the same value.

use async_trait::async_trait;

use crate::domain::{Email, NewUser, User, UserChanges, UserId, Username};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// A unique field is already held by another record.
        Duplicate { field: String } => "{field} already exists",
    }
}

/// Storage contract for user records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new record, assigning its identifier and timestamps.
    async fn create(&self, user: &NewUser) -> Result<User, UserPersistenceError>;

    /// Every stored record in storage order.
    async fn list(&self) -> Result<Vec<User>, UserPersistenceError>;

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserPersistenceError>;

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserPersistenceError>;

    /// Apply `changes` to the record as a single atomic step.
    ///
    /// Returns `Ok(None)` when no record has `id`.
    async fn update(
        &self,
        id: &UserId,
        changes: &UserChanges,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Remove the record, returning what was stored.
    ///
    /// Returns `Ok(None)` when no record has `id`.
    async fn delete(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;
}
