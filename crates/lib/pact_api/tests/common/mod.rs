//! Shared fixtures: in-memory stores, a seeded user directory and request helpers.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use pact_api::config::{ApiConfig, GateMode};
use pact_api::{AppState, router};
use pact_core::auth::password::{MIN_BCRYPT_COST, hash_password};
use pact_core::models::auth::{User, UserStatus};
use pact_core::store::{MemoryTokenStore, MemoryUserDirectory};
use tower::ServiceExt;

pub const EMAIL: &str = "a@b.com";
pub const PASSWORD: &str = "correct";

pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    pub users: Arc<MemoryUserDirectory>,
    pub tokens: Arc<MemoryTokenStore>,
}

pub fn user(id: &str, email: &str, status: UserStatus) -> User {
    User {
        id: id.into(),
        email: email.into(),
        password_hash: hash_password(PASSWORD, MIN_BCRYPT_COST).expect("hash"),
        status,
    }
}

pub fn test_app(gate_mode: GateMode) -> TestApp {
    let mut config = ApiConfig::from_lookup(|_| None).expect("dev config");
    config.gate_mode = gate_mode;
    config.bcrypt_cost = MIN_BCRYPT_COST;

    let users = Arc::new(MemoryUserDirectory::new());
    users.insert(user("user-1", EMAIL, UserStatus::Active));
    let tokens = Arc::new(MemoryTokenStore::new());

    let state = AppState::new(config, users.clone(), tokens.clone());
    TestApp {
        app: router(state.clone()),
        state,
        users,
        tokens,
    }
}

pub fn login_request(email: &str, password: &str) -> Request<Body> {
    let body = serde_json::json!({ "email": email, "password": password });
    Request::builder()
        .method("POST")
        .uri("/login")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn send(app: &Router, req: Request<Body>) -> Response<Body> {
    app.clone().oneshot(req).await.expect("request")
}

pub async fn json_body(resp: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("parse JSON")
}

/// Assert a RestError envelope and return it.
pub async fn expect_error(
    resp: Response<Body>,
    status: StatusCode,
    kind: &str,
) -> serde_json::Value {
    assert_eq!(resp.status(), status);
    let json = json_body(resp).await;
    assert_eq!(json["errorKind"], kind, "body: {json}");
    assert_eq!(json["httpStatus"], status.as_u16());
    json
}
