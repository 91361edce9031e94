//! OpenAPI schema definitions for request and response bodies.
//!
//! Handlers read bodies as raw JSON (key presence matters) and write the
//! generic [`super::envelope::ApiEnvelope`], so these types exist only to
//! describe the wire format to utoipa.

use utoipa::ToSchema;

use super::users::UserResponse;

/// Body accepted by `POST /users`.
#[derive(ToSchema)]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct CreateUserRequest {
    /// Unique login name; surrounding whitespace is trimmed.
    #[schema(example = "ada")]
    username: String,
    /// Unique address; stored lower-cased.
    #[schema(example = "ada@example.com")]
    email: String,
    /// Arbitrary JSON; defaults to `{}`.
    #[schema(value_type = Object)]
    data: Option<serde_json::Value>,
}

/// Body accepted by `PUT` and `PATCH /users/{id}`.
///
/// Only keys present in the body are changed. `PATCH` shallow-merges an
/// object `data` into the stored value; `PUT` replaces it.
#[derive(ToSchema)]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct UpdateUserRequest {
    #[schema(example = "ada")]
    username: Option<String>,
    #[schema(example = "ada@example.com")]
    email: Option<String>,
    /// Any JSON value.
    #[schema(value_type = Object)]
    data: Option<serde_json::Value>,
}

/// Envelope carrying one user.
#[derive(ToSchema)]
#[schema(as = UserEnvelope)]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct UserEnvelopeSchema {
    #[schema(example = true)]
    success: bool,
    #[schema(example = "user created")]
    message: Option<String>,
    data: UserResponse,
}

/// Envelope carrying every user.
#[derive(ToSchema)]
#[schema(as = UserListEnvelope)]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct UserListEnvelopeSchema {
    #[schema(example = true)]
    success: bool,
    #[schema(example = 1)]
    count: usize,
    data: Vec<UserResponse>,
}

/// Envelope describing a failure.
#[derive(ToSchema)]
#[schema(as = ErrorEnvelope)]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct ErrorEnvelopeSchema {
    #[schema(example = false)]
    success: bool,
    #[schema(example = "user not found")]
    message: String,
    /// Underlying failure text, present on server errors.
    #[schema(example = "user repository connection failed: connection refused")]
    error: Option<String>,
    /// Validation context such as `{"field": "username", "code": "missing_field"}`.
    #[schema(value_type = Object)]
    details: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::PartialSchema;

    fn schema_json<T: PartialSchema>() -> String {
        serde_json::to_string(&T::schema()).expect("schema serialises to JSON")
    }

    #[test]
    fn error_envelope_documents_error_text() {
        let schema = schema_json::<ErrorEnvelopeSchema>();
        assert!(schema.contains("\"error\""));
        assert!(schema.contains("\"details\""));
    }

    #[test]
    fn list_envelope_documents_count() {
        assert!(schema_json::<UserListEnvelopeSchema>().contains("\"count\""));
    }
}
