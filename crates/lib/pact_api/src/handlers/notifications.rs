//! Notification handlers (not implemented).

use axum::extract::Path;
use axum::http::StatusCode;

use super::not_implemented;

/// `GET /api/v1/notifications`
pub async fn list_notifications() -> StatusCode {
    not_implemented()
}

/// `GET /api/v1/notifications/{id}`
pub async fn get_notification(Path(_id): Path<String>) -> StatusCode {
    not_implemented()
}

/// `DELETE /api/v1/notifications/{id}`
pub async fn delete_notification(Path(_id): Path<String>) -> StatusCode {
    not_implemented()
}
