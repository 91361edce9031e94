//! Tests for the domain user model.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

const VALID_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

#[fixture]
fn new_user() -> NewUser {
    NewUser::new(
        Username::new("ada").expect("valid username"),
        Email::new("ada@example.com").expect("valid email"),
        UserData::new(json!({ "role": "admin" })),
    )
}

#[rstest]
fn user_id_accepts_uuid() {
    let id = UserId::new(VALID_ID).expect("valid id");
    assert_eq!(id.to_string(), VALID_ID);
}

#[rstest]
#[case("", UserValidationError::EmptyId)]
#[case("not-a-uuid", UserValidationError::InvalidId)]
#[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6", UserValidationError::InvalidId)]
fn user_id_rejects_invalid_input(#[case] raw: &str, #[case] expected: UserValidationError) {
    assert_eq!(UserId::new(raw), Err(expected));
}

#[rstest]
fn random_ids_are_distinct() {
    assert_ne!(UserId::random(), UserId::random());
}

#[rstest]
#[case("ada", "ada")]
#[case("  ada  ", "ada")]
#[case("Ada Lovelace", "Ada Lovelace")]
fn username_is_trimmed_and_case_preserving(#[case] raw: &str, #[case] expected: &str) {
    let username = Username::new(raw).expect("valid username");
    assert_eq!(username.as_ref(), expected);
}

#[rstest]
#[case("")]
#[case("   ")]
fn username_rejects_blank_input(#[case] raw: &str) {
    assert_eq!(Username::new(raw), Err(UserValidationError::EmptyUsername));
}

#[rstest]
#[case("ada@example.com", "ada@example.com")]
#[case("  Ada@Example.COM ", "ada@example.com")]
fn email_is_trimmed_and_lower_cased(#[case] raw: &str, #[case] expected: &str) {
    let email = Email::new(raw).expect("valid email");
    assert_eq!(email.as_ref(), expected);
}

#[rstest]
fn email_rejects_blank_input() {
    assert_eq!(Email::new(" \t "), Err(UserValidationError::EmptyEmail));
}

#[rstest]
fn user_data_defaults_to_empty_object() {
    let data = UserData::default();
    assert_eq!(data.as_value(), &json!({}));
    assert!(data.as_object().is_some_and(Map::is_empty));
}

#[rstest]
fn user_data_round_trips_nested_values() {
    let value = json!({ "a": 1, "b": { "c": 2 }, "tags": ["x", null, true] });
    let data = UserData::from(value.clone());
    assert_eq!(data.into_value(), value);
}

#[rstest]
fn user_exposes_fields(new_user: NewUser) {
    let id = UserId::new(VALID_ID).expect("valid id");
    let now = Utc::now();
    let user = User::new(id, new_user.clone(), now, now);

    assert_eq!(user.id(), &id);
    assert_eq!(user.username(), new_user.username());
    assert_eq!(user.email(), new_user.email());
    assert_eq!(user.data(), new_user.data());
    assert_eq!(user.created_at(), now);
    assert_eq!(user.updated_at(), now);
}

#[rstest]
fn touch_never_moves_before_creation(new_user: NewUser) {
    let created = Utc::now();
    let mut user = User::new(UserId::random(), new_user, created, created);

    user.touch(created - chrono::Duration::seconds(10));
    assert_eq!(user.updated_at(), created);

    let later = created + chrono::Duration::seconds(5);
    user.touch(later);
    assert_eq!(user.updated_at(), later);
}
