//! Field-level changes applied to a stored user.
//!
//! Full replacement (`PUT`) and partial update (`PATCH`) both resolve to a
//! [`UserChanges`] value. They differ only in how `data` is treated: a full
//! replacement always swaps the attribute bag wholesale, while a partial
//! update shallow-merges an object into the stored bag.
//!
//! Shallow merge copies the top-level keys of the incoming object over the
//! stored object. Keys missing from the incoming object are kept. Nested
//! objects are replaced, not merged, and an incoming `null` is stored as
//! `null` rather than deleting the key.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use super::{Email, User, UserData, Username};

/// How a mutation changes the stored attribute bag.
#[derive(Debug, Clone, PartialEq)]
pub enum DataChange {
    /// Store the value as-is, discarding whatever was there.
    Replace(UserData),
    /// Overlay these top-level keys onto the stored object.
    Merge(Map<String, Value>),
}

impl DataChange {
    /// Classify a `data` value received by a partial update.
    ///
    /// Objects merge; every other JSON value (including `null` and arrays)
    /// replaces the stored bag.
    pub fn from_patch_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self::Merge(map),
            other => Self::Replace(UserData::new(other)),
        }
    }

    /// Compute the bag that results from applying this change to `stored`.
    pub fn apply_to(&self, stored: &UserData) -> UserData {
        match self {
            Self::Replace(data) => data.clone(),
            Self::Merge(incoming) => UserData::new(shallow_merge(stored.as_value(), incoming)),
        }
    }
}

/// Overlay `incoming` onto `stored`, one level deep.
///
/// A stored value that is not an object is treated as an empty object.
///
/// # Examples
/// ```
/// use serde_json::json;
/// use users_api::domain::shallow_merge;
///
/// let stored = json!({ "a": 1, "b": { "c": 2 } });
/// let incoming = json!({ "b": { "d": 3 }, "e": null });
/// let merged = shallow_merge(&stored, incoming.as_object().expect("object"));
/// assert_eq!(merged, json!({ "a": 1, "b": { "d": 3 }, "e": null }));
/// ```
pub fn shallow_merge(stored: &Value, incoming: &Map<String, Value>) -> Value {
    let mut merged = stored.as_object().cloned().unwrap_or_default();
    for (key, value) in incoming {
        merged.insert(key.clone(), value.clone());
    }
    Value::Object(merged)
}

/// Set of changes requested for an existing user.
///
/// `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserChanges {
    username: Option<Username>,
    email: Option<Email>,
    data: Option<DataChange>,
}

impl UserChanges {
    /// Start with no changes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a new username.
    #[must_use]
    pub fn with_username(mut self, username: Username) -> Self {
        self.username = Some(username);
        self
    }

    /// Set a new email.
    #[must_use]
    pub fn with_email(mut self, email: Email) -> Self {
        self.email = Some(email);
        self
    }

    /// Change the attribute bag.
    #[must_use]
    pub fn with_data(mut self, data: DataChange) -> Self {
        self.data = Some(data);
        self
    }

    pub fn username(&self) -> Option<&Username> {
        self.username.as_ref()
    }

    pub fn email(&self) -> Option<&Email> {
        self.email.as_ref()
    }

    pub fn data(&self) -> Option<&DataChange> {
        self.data.as_ref()
    }

    /// True when no field is named.
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.email.is_none() && self.data.is_none()
    }

    /// Produce the record that results from applying these changes at `now`.
    ///
    /// The identifier and creation time are preserved; `updated_at` moves to
    /// `now` (never earlier than `created_at`).
    pub fn apply_to(&self, user: &User, now: DateTime<Utc>) -> User {
        let mut updated = user.clone();
        if let Some(username) = &self.username {
            updated.set_username(username.clone());
        }
        if let Some(email) = &self.email {
            updated.set_email(email.clone());
        }
        if let Some(change) = &self.data {
            let data = change.apply_to(user.data());
            updated.set_data(data);
        }
        updated.touch(now);
        updated
    }
}
