//! Uniform JSON response envelope.
//!
//! Every response body, success or failure, has the shape
//! `{success, data?, message?, error?, count?, details?}`. Absent members are
//! omitted rather than serialised as `null`. OpenAPI schemas for the
//! concrete envelopes live in [`super::schemas`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Response envelope wrapping a payload of type `T`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    /// Whether the operation succeeded.
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Human-readable outcome.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Underlying failure text for server-side errors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Number of records in `data` for list responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    /// Structured validation context, such as the offending field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl<T> ApiEnvelope<T> {
    /// Successful envelope carrying `data`.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            error: None,
            count: None,
            details: None,
        }
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    #[must_use]
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }
}

/// Envelope for failures; it never carries data.
pub type ErrorEnvelope = ApiEnvelope<Value>;

impl ErrorEnvelope {
    /// Failed envelope with a message.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
            error: None,
            count: None,
            details: None,
        }
    }

    #[must_use]
    pub fn with_error(mut self, error: Option<String>) -> Self {
        self.error = error;
        self
    }

    #[must_use]
    pub fn with_details(mut self, details: Option<Value>) -> Self {
        self.details = details;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn success_omits_absent_members() {
        let body = serde_json::to_value(ApiEnvelope::ok(json!([1, 2])).with_count(2))
            .expect("serialise");
        assert_eq!(body, json!({ "success": true, "data": [1, 2], "count": 2 }));
    }

    #[rstest]
    fn failure_carries_message_and_error() {
        let body = serde_json::to_value(
            ErrorEnvelope::failure("failed to list users").with_error(Some("boom".to_owned())),
        )
        .expect("serialise");
        assert_eq!(
            body,
            json!({ "success": false, "message": "failed to list users", "error": "boom" })
        );
    }
}
