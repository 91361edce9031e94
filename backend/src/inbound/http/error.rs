//! HTTP adapter mapping for domain errors.
//!
//! Handlers return [`ApiResult`]; failures render as the shared
//! [`ErrorEnvelope`]. Internal errors are reported under a message naming the
//! failed operation, with the underlying failure text in `error`.

use std::fmt;

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::error;

use crate::domain::{Error, ErrorCode};

use super::envelope::ErrorEnvelope;

const INTERNAL_SERVER_ERROR: &str = "internal server error";

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// Domain error paired with the operation that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    error: Error,
    operation: Option<&'static str>,
}

impl ApiError {
    /// Wrap a domain error raised while performing `operation`.
    pub fn during(operation: &'static str, error: Error) -> Self {
        Self {
            error,
            operation: Some(operation),
        }
    }

    pub fn error(&self) -> &Error {
        &self.error
    }

    fn envelope(&self) -> ErrorEnvelope {
        match self.error.code() {
            ErrorCode::InternalError => {
                ErrorEnvelope::failure(self.operation.unwrap_or(INTERNAL_SERVER_ERROR))
                    .with_error(Some(self.error.message().to_owned()))
            }
            ErrorCode::InvalidRequest | ErrorCode::DuplicateUser | ErrorCode::NotFound => {
                ErrorEnvelope::failure(self.error.message())
                    .with_details(self.error.details().cloned())
            }
        }
    }
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        Self {
            error,
            operation: None,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.operation {
            Some(operation) => write!(f, "{operation}: {}", self.error),
            None => fmt::Display::fmt(&self.error, f),
        }
    }
}

/// Attach an operation name to domain failures.
pub trait OperationContext<T> {
    /// Map `Err(error)` to an [`ApiError`] naming `operation`.
    fn during(self, operation: &'static str) -> ApiResult<T>;
}

impl<T> OperationContext<T> for Result<T, Error> {
    fn during(self, operation: &'static str) -> ApiResult<T> {
        self.map_err(|error| ApiError::during(operation, error))
    }
}

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest | ErrorCode::DuplicateUser => StatusCode::BAD_REQUEST,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        status_for(self.error.code())
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!(
                code = %self.error.code(),
                operation = self.operation.unwrap_or("unknown"),
                error = %self.error,
                "request failed"
            );
        }
        HttpResponse::build(status).json(self.envelope())
    }
}
