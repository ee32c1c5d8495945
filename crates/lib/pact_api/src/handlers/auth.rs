//! Authentication request handlers.

use axum::extract::State;
use axum::{Extension, Json};
use axum::extract::rejection::JsonRejection;
use tracing::debug;

use crate::AppState;
use crate::error::{AppResult, RestError};
use crate::middleware::access_gate::AuthenticatedUser;
use crate::middleware::context::RequestContext;
use crate::models::{LoginRequest, LoginResponse, LogoutResponse};
use crate::services::auth;

/// `POST /login` — authenticate with email + password.
pub async fn login_handler(
    State(state): State<AppState>,
    ctx: RequestContext,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<Json<LoginResponse>> {
    let Json(credentials) = body.map_err(|e| {
        debug!(error = %e, "login body rejected");
        RestError::bad_request("invalid json body")
    })?;
    let resp = auth::login(&state, &ctx, credentials).await?;
    Ok(Json(resp))
}

/// `GET /logout` — always succeeds; issued tokens stay valid until expiry.
pub async fn logout_handler(
    user: Option<Extension<AuthenticatedUser>>,
) -> Json<LogoutResponse> {
    if let Some(Extension(user)) = user {
        debug!(user_id = %user.user_id, token_id = %user.token_id, "logout requested");
    }
    Json(auth::logout().await)
}
