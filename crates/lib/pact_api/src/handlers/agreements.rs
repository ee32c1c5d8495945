//! Agreement CRUD handlers (not implemented).

use axum::extract::Path;
use axum::http::StatusCode;

use super::not_implemented;

/// `GET /api/v1/agreements`
pub async fn list_agreements() -> StatusCode {
    not_implemented()
}

/// `POST /api/v1/agreements`
pub async fn create_agreement() -> StatusCode {
    not_implemented()
}

/// `GET /api/v1/agreements/{id}`
pub async fn get_agreement(Path(_id): Path<String>) -> StatusCode {
    not_implemented()
}

/// `PUT /api/v1/agreements/{id}`
pub async fn update_agreement(Path(_id): Path<String>) -> StatusCode {
    not_implemented()
}

/// `DELETE /api/v1/agreements/{id}`
pub async fn delete_agreement(Path(_id): Path<String>) -> StatusCode {
    not_implemented()
}
