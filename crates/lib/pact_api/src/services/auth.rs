//! Authentication service: credential verification, token pair issuance and
//! token record lookup.

use chrono::Utc;
use pact_core::auth::jwt::issue_token_pair;
use pact_core::auth::password::verify_password;
use pact_core::auth::sanitize::sanitize_email;
use pact_core::models::auth::{Credentials, TokenRecord};
use pact_core::store::{self, StoreError, with_timeout};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::AppState;
use crate::error::{AppResult, DATABASE_ERROR, RestError};
use crate::middleware::context::RequestContext;
use crate::models::{LoginResponse, LogoutResponse};

const LOGIN_FAILED: &str = "error when trying to login";

/// Authenticate with email + password and issue a persisted token pair.
pub async fn login(
    state: &AppState,
    ctx: &RequestContext,
    credentials: Credentials,
) -> AppResult<LoginResponse> {
    let result = try_login(state, credentials).await;
    if let Err(e) = &result {
        warn!(
            trace_id = %ctx.trace_id(),
            client_id = ctx.client_id(),
            kind = ?e.kind(),
            reason = e.message(),
            "login rejected"
        );
    }
    result
}

async fn try_login(state: &AppState, credentials: Credentials) -> AppResult<LoginResponse> {
    let email = sanitize_email(&credentials.email);
    if email.is_empty() || credentials.password.is_empty() {
        return Err(RestError::bad_request("email and password are required"));
    }

    let user = with_timeout(state.config.store_timeout, state.users.find_by_email(&email))
        .await
        .map_err(|e| {
            error!(email = %email, error = %e, "user lookup failed");
            RestError::internal(LOGIN_FAILED, DATABASE_ERROR)
        })?
        .ok_or_else(|| RestError::not_found("no user for email"))?;

    if !user.status.can_login() {
        return Err(RestError::bad_request(format!(
            "account not active, status is {}",
            user.status
        )));
    }

    // bcrypt runs inline on the request task; its cost is the brute-force brake.
    match verify_password(&credentials.password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => return Err(RestError::bad_request("credentials did not match")),
        Err(e) => {
            warn!(user_id = %user.id, error = %e, "stored password hash unusable");
            return Err(RestError::bad_request("credentials did not match"));
        }
    }

    let pair = issue_token_pair(&user.id, &state.keys, Utc::now()).map_err(RestError::from)?;

    let pair = with_timeout(
        state.config.store_timeout,
        store::save_token_pair(state.tokens.as_ref(), pair),
    )
    .await
    .map_err(|e| {
        error!(user_id = %user.id, error = %e, "token pair not persisted");
        RestError::internal(LOGIN_FAILED, DATABASE_ERROR)
    })?;

    info!(
        email = %email,
        user_id = %user.id,
        access_id = %pair.access_id,
        refresh_id = %pair.refresh_id,
        "login succeeded"
    );

    Ok(LoginResponse {
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
    })
}

/// Fetch one stored token half by its id.
pub async fn get_token_record(state: &AppState, id: Uuid) -> AppResult<TokenRecord> {
    with_timeout(
        state.config.store_timeout,
        store::get_token_record(state.tokens.as_ref(), id),
    )
    .await
    .map_err(|e| match e {
        StoreError::NotFound => RestError::not_found(format!("no token record for id {id}")),
        other => RestError::from(other),
    })
}

/// Logout is a no-op: neither token half is invalidated. The store exposes
/// `delete` for when revocation is wired in.
pub async fn logout() -> LogoutResponse {
    LogoutResponse { success: true }
}
