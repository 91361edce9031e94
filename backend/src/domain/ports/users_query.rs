//! Driving port for reading users.
//!
//! HTTP handlers call this port for every read-only use case so they never
//! touch a repository directly.

use async_trait::async_trait;

use crate::domain::{Error, User, UserId};

/// Read-side user use cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// All stored users.
    async fn list_users(&self) -> Result<Vec<User>, Error>;

    /// The user with `id`, or a `NotFound` error.
    async fn get_user(&self, id: &UserId) -> Result<User, Error>;

    /// The user whose username exactly equals the trimmed `username`.
    async fn find_by_username(&self, username: &str) -> Result<User, Error>;

    /// The user whose email equals the normalised `email`.
    async fn find_by_email(&self, email: &str) -> Result<User, Error>;
}
