//! In-process `UserRepository` adapter.
//!
//! Records live in a `Vec` behind a single mutex, kept in creation order.
//! Every uniqueness check runs under the same lock as the write it guards.
//! Used by the HTTP tests and suitable for local runs without PostgreSQL.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{Email, NewUser, User, UserChanges, UserId, Username};

/// Mutex-guarded in-memory user store.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<User>>, UserPersistenceError> {
        self.users
            .lock()
            .map_err(|_| UserPersistenceError::query("in-memory user store lock poisoned"))
    }
}

/// First unique field of `candidate` already held by a record other than `skip`.
fn conflicting_field(
    users: &[User],
    username: &Username,
    email: &Email,
    skip: Option<&UserId>,
) -> Option<&'static str> {
    let others = || users.iter().filter(move |user| Some(user.id()) != skip);
    if others().any(|user| user.username() == username) {
        return Some("username");
    }
    if others().any(|user| user.email() == email) {
        return Some("email");
    }
    None
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut users = self.lock()?;
        if let Some(field) = conflicting_field(&users, user.username(), user.email(), None) {
            return Err(UserPersistenceError::duplicate(field));
        }

        let mut id = UserId::random();
        while users.iter().any(|stored| stored.id() == &id) {
            id = UserId::random();
        }
        let now = Utc::now();
        let created = User::new(id, user.clone(), now, now);
        users.push(created.clone());
        Ok(created)
    }

    async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
        Ok(self.lock()?.clone())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.lock()?.iter().find(|user| user.id() == id).cloned())
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserPersistenceError> {
        Ok(self
            .lock()?
            .iter()
            .find(|user| user.username() == username)
            .cloned())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserPersistenceError> {
        Ok(self
            .lock()?
            .iter()
            .find(|user| user.email() == email)
            .cloned())
    }

    async fn update(
        &self,
        id: &UserId,
        changes: &UserChanges,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut users = self.lock()?;
        let Some(index) = users.iter().position(|user| user.id() == id) else {
            return Ok(None);
        };

        let updated = changes.apply_to(&users[index], Utc::now());
        if let Some(field) =
            conflicting_field(&users, updated.username(), updated.email(), Some(id))
        {
            return Err(UserPersistenceError::duplicate(field));
        }
        users[index] = updated.clone();
        Ok(Some(updated))
    }

    async fn delete(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut users = self.lock()?;
        let removed = users
            .iter()
            .position(|user| user.id() == id)
            .map(|index| users.remove(index));
        Ok(removed)
    }
}
