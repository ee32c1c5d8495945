//! Request handlers.

pub mod agreements;
pub mod auth;
pub mod health;
pub mod notifications;
pub mod users;

use axum::http::StatusCode;

use crate::error::RestError;

/// Fallback for paths that match no registered route.
pub async fn route_not_found() -> RestError {
    RestError::not_found("route not found")
}

/// Response for routes whose business logic is not built yet.
pub(crate) fn not_implemented() -> StatusCode {
    StatusCode::NOT_IMPLEMENTED
}
