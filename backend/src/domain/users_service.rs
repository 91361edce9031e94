//! User domain service.
//!
//! Implements the [`UsersQuery`] and [`UsersCommand`] driving ports on top of
//! any [`UserRepository`], translating persistence failures into domain
//! errors.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::error;

use crate::domain::ports::{UserPersistenceError, UserRepository, UsersCommand, UsersQuery};
use crate::domain::{Email, Error, NewUser, User, UserChanges, UserId, Username};

const USER_NOT_FOUND: &str = "user not found";
const DUPLICATE_USER: &str = "username or email already exists";
const EMPTY_PATCH: &str = "no fields provided for update";

/// Service implementing the user driving ports.
#[derive(Clone)]
pub struct UsersService<R> {
    repo: Arc<R>,
}

impl<R> UsersService<R> {
    /// Create a service over the given repository.
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

impl<R> UsersService<R>
where
    R: UserRepository,
{
    fn map_persistence_error(error: UserPersistenceError) -> Error {
        match error {
            UserPersistenceError::Duplicate { field } => {
                Error::duplicate_user(DUPLICATE_USER).with_details(json!({
                    "field": field,
                    "code": "duplicate",
                }))
            }
            other @ (UserPersistenceError::Connection { .. }
            | UserPersistenceError::Query { .. }) => {
                error!(error = %other, "user repository failure");
                Error::internal(other.to_string())
            }
        }
    }

    fn found(user: Option<User>) -> Result<User, Error> {
        user.ok_or_else(|| Error::not_found(USER_NOT_FOUND))
    }

    async fn apply(&self, id: &UserId, changes: &UserChanges) -> Result<User, Error> {
        let updated = self
            .repo
            .update(id, changes)
            .await
            .map_err(Self::map_persistence_error)?;
        Self::found(updated)
    }
}

#[async_trait]
impl<R> UsersQuery for UsersService<R>
where
    R: UserRepository,
{
    async fn list_users(&self) -> Result<Vec<User>, Error> {
        self.repo.list().await.map_err(Self::map_persistence_error)
    }

    async fn get_user(&self, id: &UserId) -> Result<User, Error> {
        let user = self
            .repo
            .find_by_id(id)
            .await
            .map_err(Self::map_persistence_error)?;
        Self::found(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<User, Error> {
        // A blank probe cannot match a stored (non-blank) username.
        let Ok(username) = Username::new(username) else {
            return Err(Error::not_found(USER_NOT_FOUND));
        };
        let user = self
            .repo
            .find_by_username(&username)
            .await
            .map_err(Self::map_persistence_error)?;
        Self::found(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<User, Error> {
        let Ok(email) = Email::new(email) else {
            return Err(Error::not_found(USER_NOT_FOUND));
        };
        let user = self
            .repo
            .find_by_email(&email)
            .await
            .map_err(Self::map_persistence_error)?;
        Self::found(user)
    }
}

#[async_trait]
impl<R> UsersCommand for UsersService<R>
where
    R: UserRepository,
{
    async fn create_user(&self, user: NewUser) -> Result<User, Error> {
        self.repo
            .create(&user)
            .await
            .map_err(Self::map_persistence_error)
    }

    async fn replace_user(&self, id: &UserId, changes: UserChanges) -> Result<User, Error> {
        self.apply(id, &changes).await
    }

    async fn patch_user(&self, id: &UserId, changes: UserChanges) -> Result<User, Error> {
        if changes.is_empty() {
            return Err(Error::invalid_request(EMPTY_PATCH)
                .with_details(json!({ "code": "empty_update" })));
        }
        self.apply(id, &changes).await
    }

    async fn delete_user(&self, id: &UserId) -> Result<User, Error> {
        let removed = self
            .repo
            .delete(id)
            .await
            .map_err(Self::map_persistence_error)?;
        Self::found(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockUserRepository;
    use crate::domain::{DataChange, ErrorCode, UserData};
    use mockall::predicate::eq;
    use chrono::Utc;
    use rstest::{fixture, rstest};

    fn make_service(repo: MockUserRepository) -> UsersService<MockUserRepository> {
        UsersService::new(Arc::new(repo))
    }

    #[fixture]
    fn alice() -> User {
        let now = Utc::now();
        User::new(
            UserId::random(),
            NewUser::new(
                Username::new("alice").expect("username"),
                Email::new("alice@example.com").expect("email"),
                UserData::default(),
            ),
            now,
            now,
        )
    }

    #[rstest]
    #[tokio::test]
    async fn get_user_returns_not_found_for_missing_record() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().times(1).return_once(|_| Ok(None));

        let err = make_service(repo)
            .get_user(&UserId::random())
            .await
            .expect_err("missing user");
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.message(), USER_NOT_FOUND);
    }

    #[rstest]
    #[tokio::test]
    async fn empty_patch_never_reaches_the_store() {
        let mut repo = MockUserRepository::new();
        repo.expect_update().never();

        let err = make_service(repo)
            .patch_user(&UserId::random(), UserChanges::new())
            .await
            .expect_err("empty patch");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.message(), EMPTY_PATCH);
    }

    #[rstest]
    #[tokio::test]
    async fn empty_replacement_still_touches_the_record(alice: User) {
        let id = *alice.id();
        let mut repo = MockUserRepository::new();
        repo.expect_update()
            .times(1)
            .return_once(move |_, _| Ok(Some(alice)));

        let user = make_service(repo)
            .replace_user(&id, UserChanges::new())
            .await
            .expect("replace succeeds");
        assert_eq!(user.id(), &id);
    }

    #[rstest]
    #[tokio::test]
    async fn patch_forwards_changes_to_the_store(alice: User) {
        let id = *alice.id();
        let changes = UserChanges::new().with_data(DataChange::from_patch_value(json!({ "k": 1 })));
        let mut repo = MockUserRepository::new();
        repo.expect_update()
            .with(eq(id), eq(changes.clone()))
            .times(1)
            .return_once(move |_, _| Ok(Some(alice)));

        make_service(repo)
            .patch_user(&id, changes)
            .await
            .expect("patch succeeds");
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_maps_to_duplicate_user_with_field() {
        let mut repo = MockUserRepository::new();
        repo.expect_create()
            .times(1)
            .return_once(|_| Err(UserPersistenceError::duplicate("email")));

        let new_user = NewUser::new(
            Username::new("bob").expect("username"),
            Email::new("bob@example.com").expect("email"),
            UserData::default(),
        );
        let err = make_service(repo)
            .create_user(new_user)
            .await
            .expect_err("duplicate");
        assert_eq!(err.code(), ErrorCode::DuplicateUser);
        assert_eq!(err.message(), DUPLICATE_USER);
        assert_eq!(
            err.details().and_then(|d| d.get("field")),
            Some(&json!("email"))
        );
    }

    #[rstest]
    #[case(UserPersistenceError::connection("refused"), "user repository connection failed: refused")]
    #[case(UserPersistenceError::query("syntax"), "user repository query failed: syntax")]
    #[tokio::test]
    async fn store_failures_become_internal_errors(
        #[case] failure: UserPersistenceError,
        #[case] expected: &str,
    ) {
        let mut repo = MockUserRepository::new();
        repo.expect_list().times(1).return_once(move || Err(failure));

        let err = make_service(repo).list_users().await.expect_err("failure");
        assert_eq!(err.code(), ErrorCode::InternalError);
        assert_eq!(err.message(), expected);
    }

    #[rstest]
    #[tokio::test]
    async fn blank_username_probe_is_not_found_without_store_call() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_username().never();

        let err = make_service(repo)
            .find_by_username("   ")
            .await
            .expect_err("blank probe");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn email_probe_is_normalised(alice: User) {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .withf(|email| email.as_ref() == "alice@example.com")
            .times(1)
            .return_once(move |_| Ok(Some(alice)));

        let user = make_service(repo)
            .find_by_email(" Alice@Example.COM ")
            .await
            .expect("found");
        assert_eq!(user.username().as_ref(), "alice");
    }

    #[rstest]
    #[tokio::test]
    async fn delete_returns_removed_record(alice: User) {
        let id = *alice.id();
        let mut repo = MockUserRepository::new();
        repo.expect_delete()
            .with(eq(id))
            .times(1)
            .return_once(move |_| Ok(Some(alice)));

        let removed = make_service(repo).delete_user(&id).await.expect("deleted");
        assert_eq!(removed.id(), &id);
    }
}
