//! Request body parsing for the user endpoints.
//!
//! Bodies are read as raw JSON objects so that key *presence* decides which
//! fields a full or partial update touches: `{"data": null}` names `data`,
//! `{}` names nothing.

use serde_json::{Map, Value, json};

use crate::domain::{
    DataChange, Email, Error, NewUser, UserChanges, UserData, UserId, UserValidationError,
    Username,
};

/// Validation failure codes reported in error details.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValidationCode {
    MissingField,
    InvalidType,
    EmptyValue,
    InvalidBody,
}

impl ValidationCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::InvalidType => "invalid_type",
            Self::EmptyValue => "empty_value",
            Self::InvalidBody => "invalid_body",
        }
    }
}

/// Body field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const USERNAME: Self = Self("username");
    pub(crate) const EMAIL: Self = Self("email");
    pub(crate) const DATA: Self = Self("data");

    fn as_str(self) -> &'static str {
        self.0
    }
}

fn field_error(field: FieldName, code: ValidationCode, message: String) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code.as_str(),
    }))
}

fn missing_field_error(field: FieldName) -> Error {
    let name = field.as_str();
    field_error(field, ValidationCode::MissingField, format!("{name} is required"))
}

fn invalid_type_error(field: FieldName) -> Error {
    let name = field.as_str();
    field_error(
        field,
        ValidationCode::InvalidType,
        format!("{name} must be a string"),
    )
}

fn empty_value_error(field: FieldName) -> Error {
    let name = field.as_str();
    field_error(
        field,
        ValidationCode::EmptyValue,
        format!("{name} must not be empty"),
    )
}

fn invalid_body_error() -> Error {
    Error::invalid_request("request body must be a JSON object")
        .with_details(json!({ "code": ValidationCode::InvalidBody.as_str() }))
}

fn into_object(body: Value) -> Result<Map<String, Value>, Error> {
    match body {
        Value::Object(map) => Ok(map),
        _ => Err(invalid_body_error()),
    }
}

fn string_field(value: &Value, field: FieldName) -> Result<&str, Error> {
    value.as_str().ok_or_else(|| invalid_type_error(field))
}

fn username_from(value: &Value) -> Result<Username, Error> {
    let raw = string_field(value, FieldName::USERNAME)?;
    Username::new(raw).map_err(|_| empty_value_error(FieldName::USERNAME))
}

fn email_from(value: &Value) -> Result<Email, Error> {
    let raw = string_field(value, FieldName::EMAIL)?;
    Email::new(raw).map_err(|_| empty_value_error(FieldName::EMAIL))
}

/// Parse a create body: `username` and `email` are required strings; a
/// missing or `null` `data` becomes `{}`.
pub(crate) fn parse_new_user(body: Value) -> Result<NewUser, Error> {
    let mut body = into_object(body)?;
    let username = match body.get(FieldName::USERNAME.as_str()) {
        None | Some(Value::Null) => return Err(missing_field_error(FieldName::USERNAME)),
        Some(value) => username_from(value)?,
    };
    let email = match body.get(FieldName::EMAIL.as_str()) {
        None | Some(Value::Null) => return Err(missing_field_error(FieldName::EMAIL)),
        Some(value) => email_from(value)?,
    };
    let data = match body.remove(FieldName::DATA.as_str()) {
        None | Some(Value::Null) => UserData::default(),
        Some(value) => UserData::new(value),
    };
    Ok(NewUser::new(username, email, data))
}

fn identity_changes(body: &Map<String, Value>) -> Result<UserChanges, Error> {
    let mut changes = UserChanges::new();
    if let Some(value) = body.get(FieldName::USERNAME.as_str()) {
        changes = changes.with_username(username_from(value)?);
    }
    if let Some(value) = body.get(FieldName::EMAIL.as_str()) {
        changes = changes.with_email(email_from(value)?);
    }
    Ok(changes)
}

/// Parse a full-replacement body: every present field is overwritten and
/// `data` replaces the stored bag wholesale.
pub(crate) fn parse_replacement(body: Value) -> Result<UserChanges, Error> {
    let mut body = into_object(body)?;
    let mut changes = identity_changes(&body)?;
    if let Some(value) = body.remove(FieldName::DATA.as_str()) {
        changes = changes.with_data(DataChange::Replace(UserData::new(value)));
    }
    Ok(changes)
}

/// Parse a partial-update body: an object `data` merges, anything else
/// replaces.
pub(crate) fn parse_patch(body: Value) -> Result<UserChanges, Error> {
    let mut body = into_object(body)?;
    let mut changes = identity_changes(&body)?;
    if let Some(value) = body.remove(FieldName::DATA.as_str()) {
        changes = changes.with_data(DataChange::from_patch_value(value));
    }
    Ok(changes)
}

/// Parse a path identifier. Anything that is not a UUID cannot name a stored
/// user, so it is reported as not found.
pub(crate) fn parse_user_id(raw: &str) -> Result<UserId, Error> {
    UserId::new(raw).map_err(|err: UserValidationError| {
        Error::not_found("user not found").with_details(json!({ "reason": err.to_string() }))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    fn detail_field(error: &Error) -> Option<&str> {
        error
            .details()
            .and_then(|details| details.get("field"))
            .and_then(Value::as_str)
    }

    #[rstest]
    fn new_user_defaults_data_to_empty_object() {
        let user = parse_new_user(json!({ "username": "ada", "email": "Ada@Example.com" }))
            .expect("valid body");
        assert_eq!(user.username().as_ref(), "ada");
        assert_eq!(user.email().as_ref(), "ada@example.com");
        assert_eq!(user.data().as_value(), &json!({}));
    }

    #[rstest]
    fn new_user_keeps_nested_data() {
        let data = json!({ "a": 1, "b": { "c": 2 } });
        let user = parse_new_user(json!({ "username": "ada", "email": "a@b.c", "data": data }))
            .expect("valid body");
        assert_eq!(user.data().as_value(), &data);
    }

    #[rstest]
    #[case(json!({ "email": "a@b.c" }), "username")]
    #[case(json!({ "username": null, "email": "a@b.c" }), "username")]
    #[case(json!({ "username": "ada" }), "email")]
    #[case(json!({ "username": "ada", "email": null }), "email")]
    fn new_user_requires_identity_fields(#[case] body: Value, #[case] field: &str) {
        let err = parse_new_user(body).expect_err("missing field");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.message(), format!("{field} is required"));
        assert_eq!(detail_field(&err), Some(field));
    }

    #[rstest]
    #[case(json!({ "username": 7, "email": "a@b.c" }), "username must be a string")]
    #[case(json!({ "username": "  ", "email": "a@b.c" }), "username must not be empty")]
    #[case(json!({ "username": "ada", "email": "" }), "email must not be empty")]
    fn new_user_rejects_bad_values(#[case] body: Value, #[case] message: &str) {
        let err = parse_new_user(body).expect_err("invalid value");
        assert_eq!(err.message(), message);
    }

    #[rstest]
    #[case(json!([]))]
    #[case(json!("text"))]
    fn non_object_bodies_are_rejected(#[case] body: Value) {
        let err = parse_patch(body).expect_err("not an object");
        assert_eq!(err.message(), "request body must be a JSON object");
    }

    #[rstest]
    fn empty_patch_names_nothing() {
        assert!(parse_patch(json!({})).expect("valid body").is_empty());
    }

    #[rstest]
    fn patch_with_unknown_keys_only_names_nothing() {
        assert!(parse_patch(json!({ "role": "admin" })).expect("valid body").is_empty());
    }

    #[rstest]
    #[case(json!({ "data": { "k": 1 } }), true)]
    #[case(json!({ "data": null }), false)]
    #[case(json!({ "data": "reset" }), false)]
    fn patch_data_merges_only_objects(#[case] body: Value, #[case] merges: bool) {
        let changes = parse_patch(body).expect("valid body");
        let is_merge = matches!(changes.data(), Some(DataChange::Merge(_)));
        assert_eq!(is_merge, merges);
    }

    #[rstest]
    fn replacement_data_always_replaces() {
        let changes = parse_replacement(json!({ "data": { "k": 1 } })).expect("valid body");
        assert_eq!(
            changes.data(),
            Some(&DataChange::Replace(UserData::new(json!({ "k": 1 }))))
        );
    }

    #[rstest]
    fn replacement_rejects_empty_username() {
        let err = parse_replacement(json!({ "username": "" })).expect_err("empty");
        assert_eq!(detail_field(&err), Some("username"));
    }

    #[rstest]
    #[case("not-a-uuid")]
    #[case("")]
    fn malformed_ids_are_not_found(#[case] raw: &str) {
        let err = parse_user_id(raw).expect_err("malformed id");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
