//! # pact_api
//!
//! HTTP API library for Pact.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use pact_core::auth::jwt::SigningKeys;
use pact_core::store::{TokenStore, UserDirectory};
use tower_http::cors::{Any, CorsLayer};

use crate::config::ApiConfig;
use crate::handlers::{agreements, auth, health, notifications, users};
use crate::middleware::access_gate::{HEALTH_PATH, LOGIN_PATH, access_gate};
use crate::middleware::content_type::require_json;
use crate::middleware::context::propagate_context;

/// Route path for the no-op logout endpoint.
pub const LOGOUT_PATH: &str = "/logout";

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// API configuration.
    pub config: ApiConfig,
    /// Account lookups (owned by the user service).
    pub users: Arc<dyn UserDirectory>,
    /// Issued token halves.
    pub tokens: Arc<dyn TokenStore>,
    /// Access/refresh signing secrets derived from `config`.
    pub keys: SigningKeys,
}

impl AppState {
    pub fn new(
        config: ApiConfig,
        users: Arc<dyn UserDirectory>,
        tokens: Arc<dyn TokenStore>,
    ) -> Self {
        let keys = config.signing_keys();
        Self {
            config,
            users,
            tokens,
            keys,
        }
    }
}

/// Builds the Axum router with all routes, the middleware chain and shared state.
///
/// Request order: CORS → context propagation → Content-Type check → routing →
/// access gate (matched routes only) → handler. Unmatched paths skip the gate
/// and land in the JSON 404 fallback.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(LOGIN_PATH, post(auth::login_handler))
        .route(LOGOUT_PATH, get(auth::logout_handler))
        .route(HEALTH_PATH, get(health::health_handler))
        .route("/api/v1/users", post(users::create_user))
        .route(
            "/api/v1/users/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route(
            "/api/v1/agreements",
            get(agreements::list_agreements).post(agreements::create_agreement),
        )
        .route(
            "/api/v1/agreements/{id}",
            get(agreements::get_agreement)
                .put(agreements::update_agreement)
                .delete(agreements::delete_agreement),
        )
        .route(
            "/api/v1/notifications",
            get(notifications::list_notifications),
        )
        .route(
            "/api/v1/notifications/{id}",
            get(notifications::get_notification).delete(notifications::delete_notification),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            access_gate,
        ))
        .fallback(handlers::route_not_found)
        .layer(axum::middleware::from_fn(require_json))
        .layer(axum::middleware::from_fn(propagate_context))
        .layer(cors)
        .with_state(state)
}
