//! User CRUD handlers (not implemented).

use axum::extract::Path;
use axum::http::StatusCode;

use super::not_implemented;

/// `POST /api/v1/users`
pub async fn create_user() -> StatusCode {
    not_implemented()
}

/// `GET /api/v1/users/{id}`
pub async fn get_user(Path(_id): Path<String>) -> StatusCode {
    not_implemented()
}

/// `PUT /api/v1/users/{id}`
pub async fn update_user(Path(_id): Path<String>) -> StatusCode {
    not_implemented()
}

/// `DELETE /api/v1/users/{id}`
pub async fn delete_user(Path(_id): Path<String>) -> StatusCode {
    not_implemented()
}
