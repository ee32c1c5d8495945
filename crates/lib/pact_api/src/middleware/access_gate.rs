//! Access gate: decides which matched routes a request may reach.
//!
//! Mounted with `route_layer`, so it only sees requests that matched a
//! registered route. Unmatched paths fall through to the 404 fallback and are
//! never reported as authentication failures.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use pact_core::auth::jwt::verify_access_token;
use pact_core::models::auth::TokenKind;
use tracing::debug;
use uuid::Uuid;

use crate::AppState;
use crate::config::GateMode;
use crate::error::{ErrorKind, RestError};
use crate::services::auth::get_token_record;

/// Login route; always public.
pub const LOGIN_PATH: &str = "/login";

/// Liveness route; always public.
pub const HEALTH_PATH: &str = "/health";

/// Identity admitted by the bearer gate, stored in request extensions.
///
/// Handlers read it with `Option<Extension<AuthenticatedUser>>`; it is absent
/// on public routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub token_id: Uuid,
}

/// Extract the credential from `Bearer <token>`; the scheme is case-insensitive.
fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

pub fn is_public_path(path: &str) -> bool {
    path == LOGIN_PATH || path == HEALTH_PATH
}

/// Axum middleware: public paths pass, everything else is decided by the
/// configured [`GateMode`].
pub async fn access_gate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, RestError> {
    if is_public_path(request.uri().path()) {
        return Ok(next.run(request).await);
    }

    match state.config.gate_mode {
        // Locked mode has no admission path for authenticated callers, so
        // every protected route is refused. Bearer mode is the opt-in fix.
        GateMode::Locked => {
            debug!(path = request.uri().path(), "access gate locked");
            Err(RestError::bad_request("request is not authenticated"))
        }
        GateMode::Bearer => {
            let user = authenticate_bearer(&state, request.headers()).await?;
            debug!(user_id = %user.user_id, "access gate admitted bearer");
            request.extensions_mut().insert(user);
            Ok(next.run(request).await)
        }
    }
}

/// Verify `Authorization: Bearer <jwt>` against the signing key and the
/// stored access half it names.
async fn authenticate_bearer(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<AuthenticatedUser, RestError> {
    let header = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| RestError::unauthorized("missing authorization header"))?;

    let token = bearer_token(header)
        .ok_or_else(|| RestError::unauthorized("invalid authorization scheme"))?;

    let invalid = || RestError::unauthorized("invalid or expired token");

    let claims = verify_access_token(token, &state.keys).ok_or_else(invalid)?;
    let token_id = Uuid::parse_str(&claims.token_id).map_err(|_| invalid())?;

    let record = match get_token_record(state, token_id).await {
        Ok(record) => record,
        Err(e) if e.kind() == ErrorKind::NotFound => return Err(invalid()),
        Err(e) => return Err(e),
    };

    if record.kind != TokenKind::Access
        || record.user_id != claims.user_id
        || record.token != token
        || record.is_expired_at(Utc::now())
    {
        return Err(invalid());
    }

    Ok(AuthenticatedUser {
        user_id: claims.user_id,
        token_id,
    })
}
