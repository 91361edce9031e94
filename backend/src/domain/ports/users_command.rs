//! Driving port for mutating users.

use async_trait::async_trait;

use crate::domain::{Error, NewUser, User, UserChanges, UserId};

/// Write-side user use cases.
///
/// Errors carry [`crate::domain::ErrorCode::DuplicateUser`] when a username or
/// email collides, [`crate::domain::ErrorCode::NotFound`] when the target is
/// missing and [`crate::domain::ErrorCode::InternalError`] when the store
/// fails.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersCommand: Send + Sync {
    async fn create_user(&self, user: NewUser) -> Result<User, Error>;

    /// Replace the named fields; `data` is swapped wholesale.
    async fn replace_user(&self, id: &UserId, changes: UserChanges) -> Result<User, Error>;

    /// Apply a partial update. Rejects an empty change set.
    async fn patch_user(&self, id: &UserId, changes: UserChanges) -> Result<User, Error>;

    /// Delete and return the removed record.
    async fn delete_user(&self, id: &UserId) -> Result<User, Error>;
}
