//! REST error envelope.
//!
//! Every failure that crosses the HTTP boundary is one of four kinds. Lower
//! layers convert into [`RestError`] through the `From` impls below; their
//! native errors are logged here and never serialized.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use pact_core::auth::AuthError;
use pact_core::store::StoreError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, RestError>;

/// Cause attached to storage failures.
pub const DATABASE_ERROR: &str = "database error";

/// Closed set of failure categories clients can branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    #[serde(rename = "bad_request")]
    BadRequest,
    #[serde(rename = "not_found")]
    NotFound,
    #[serde(rename = "unauthorized")]
    Unauthorized,
    #[serde(rename = "internal_server_error")]
    InternalError,
}

impl ErrorKind {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorKind::BadRequest => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Wire error: `{"message", "httpStatus", "errorKind", "causes"}`.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[error("{message}")]
pub struct RestError {
    message: String,
    http_status: u16,
    error_kind: ErrorKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    causes: Vec<String>,
}

impl RestError {
    fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            http_status: kind.status().as_u16(),
            error_kind: kind,
            causes: Vec::new(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadRequest, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    /// An internal error carrying an opaque, caller-safe cause.
    pub fn internal(message: impl Into<String>, cause: impl Into<String>) -> Self {
        Self::new(ErrorKind::InternalError, message).with_cause(cause)
    }

    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        self.causes.push(cause.into());
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> ErrorKind {
        self.error_kind
    }

    pub fn status(&self) -> StatusCode {
        self.error_kind.status()
    }

    pub fn causes(&self) -> &[String] {
        &self.causes
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

impl From<StoreError> for RestError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound => RestError::not_found("record not found"),
            other => {
                error!(error = %other, "store failure");
                RestError::internal("error when accessing storage", DATABASE_ERROR)
            }
        }
    }
}

impl From<AuthError> for RestError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::TokenError(msg) => {
                error!(error = %msg, "token failure");
                RestError::internal("error when issuing tokens", "token signing error")
            }
            AuthError::Internal(msg) => {
                error!(error = %msg, "auth failure");
                RestError::internal("internal authentication error", "authentication error")
            }
        }
    }
}
