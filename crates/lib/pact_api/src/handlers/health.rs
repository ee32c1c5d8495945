//! Liveness endpoint.

use axum::Json;

use crate::models::HealthResponse;

/// `GET /health` — 200 while the process is serving.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        version: pact_core::version().into(),
    })
}
