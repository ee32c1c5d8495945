//! Integration tests — middleware chain: trace context, Content-Type contract
//! and both access gate modes.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use pact_api::config::GateMode;
use pact_api::middleware::context::TRACE_ID_HEADER;
use chrono::{Duration, Utc};
use pact_core::auth::jwt::verify_access_token;
use pact_core::models::auth::{TokenKind, TokenRecord};
use pact_core::store::{TokenStore, get_token_record};
use uuid::Uuid;

use common::{EMAIL, PASSWORD, expect_error, json_body, login_request, send, test_app};

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn get_with_bearer(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

fn post_login(content_type: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("POST").uri("/login");
    if let Some(ct) = content_type {
        builder = builder.header("content-type", ct);
    }
    let body = serde_json::json!({ "email": EMAIL, "password": PASSWORD });
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn login_tokens(t: &common::TestApp) -> (String, String) {
    let json = json_body(send(&t.app, login_request(EMAIL, PASSWORD)).await).await;
    (
        json["accessToken"].as_str().unwrap().to_string(),
        json["refreshToken"].as_str().unwrap().to_string(),
    )
}

// ---------------------------------------------------------------------------
// Trace context
// ---------------------------------------------------------------------------

#[tokio::test]
async fn every_response_carries_a_v7_trace_id() {
    let t = test_app(GateMode::Locked);
    for req in [get("/health"), get("/api/v1/users/123"), get("/missing")] {
        let resp = send(&t.app, req).await;
        let header = resp
            .headers()
            .get(TRACE_ID_HEADER)
            .expect("trace header")
            .to_str()
            .unwrap();
        let id = Uuid::parse_str(header).unwrap();
        assert_eq!(id.get_version(), Some(uuid::Version::SortRand));
    }
}

#[tokio::test]
async fn rejected_requests_still_get_a_trace_id() {
    let t = test_app(GateMode::Locked);
    let resp = send(&t.app, post_login(None)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(resp.headers().contains_key(TRACE_ID_HEADER));
}

// ---------------------------------------------------------------------------
// Content-Type contract
// ---------------------------------------------------------------------------

#[tokio::test]
async fn json_with_charset_is_accepted() {
    let t = test_app(GateMode::Locked);
    let resp = send(&t.app, post_login(Some("application/json; charset=utf-8"))).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn text_plain_post_is_rejected() {
    let t = test_app(GateMode::Locked);
    let resp = send(&t.app, post_login(Some("text/plain"))).await;
    let json = expect_error(resp, StatusCode::BAD_REQUEST, "bad_request").await;
    assert_eq!(json["message"], "Content-Type header must be application/json");
    assert!(t.tokens.is_empty());
}

#[tokio::test]
async fn missing_content_type_on_post_is_rejected() {
    let t = test_app(GateMode::Locked);
    let resp = send(&t.app, post_login(None)).await;
    let json = expect_error(resp, StatusCode::BAD_REQUEST, "bad_request").await;
    assert_eq!(json["message"], "Content-Type header cannot be empty");
}

#[tokio::test]
async fn malformed_content_type_is_rejected() {
    let t = test_app(GateMode::Locked);
    let resp = send(&t.app, post_login(Some("application"))).await;
    let json = expect_error(resp, StatusCode::BAD_REQUEST, "bad_request").await;
    assert_eq!(json["message"], "malformed Content-Type header");
}

#[tokio::test]
async fn missing_content_type_on_get_is_accepted() {
    let t = test_app(GateMode::Locked);
    let resp = send(&t.app, get("/health")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let json = json_body(resp).await;
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn content_type_is_checked_before_the_gate() {
    let t = test_app(GateMode::Locked);
    let req = Request::builder()
        .method("DELETE")
        .uri("/api/v1/users/123")
        .body(Body::empty())
        .unwrap();
    let json = expect_error(send(&t.app, req).await, StatusCode::BAD_REQUEST, "bad_request").await;
    assert_eq!(json["message"], "Content-Type header cannot be empty");
}

// ---------------------------------------------------------------------------
// Access gate: locked mode
// ---------------------------------------------------------------------------

#[tokio::test]
async fn locked_gate_rejects_protected_routes() {
    let t = test_app(GateMode::Locked);
    for uri in ["/api/v1/users/123", "/api/v1/agreements", "/logout"] {
        let resp = send(&t.app, get(uri)).await;
        let json = expect_error(resp, StatusCode::BAD_REQUEST, "bad_request").await;
        assert_eq!(json["message"], "request is not authenticated");
    }
}

#[tokio::test]
async fn locked_gate_ignores_valid_bearer_tokens() {
    let t = test_app(GateMode::Locked);
    let (access, _) = login_tokens(&t).await;
    let resp = send(&t.app, get_with_bearer("/api/v1/users/123", &access)).await;
    expect_error(resp, StatusCode::BAD_REQUEST, "bad_request").await;
}

#[tokio::test]
async fn unmatched_paths_are_not_found_not_unauthenticated() {
    let t = test_app(GateMode::Locked);
    let resp = send(&t.app, get("/api/v1/unknown/thing")).await;
    let json = expect_error(resp, StatusCode::NOT_FOUND, "not_found").await;
    assert_eq!(json["message"], "route not found");
}

// ---------------------------------------------------------------------------
// Access gate: bearer mode
// ---------------------------------------------------------------------------

#[tokio::test]
async fn bearer_gate_admits_a_stored_access_token() {
    let t = test_app(GateMode::Bearer);
    let (access, _) = login_tokens(&t).await;

    let resp = send(&t.app, get_with_bearer("/logout", &access)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await["success"], true);

    let resp = send(&t.app, get_with_bearer("/api/v1/users/123", &access)).await;
    assert_eq!(resp.status(), StatusCode::NOT_IMPLEMENTED);
}

#[tokio::test]
async fn logout_leaves_tokens_usable() {
    let t = test_app(GateMode::Bearer);
    let (access, _) = login_tokens(&t).await;
    let resp = send(&t.app, get_with_bearer("/logout", &access)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(t.tokens.len(), 2);
    let resp = send(&t.app, get_with_bearer("/logout", &access)).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn bearer_gate_requires_a_header() {
    let t = test_app(GateMode::Bearer);
    let resp = send(&t.app, get("/api/v1/agreements")).await;
    let json = expect_error(resp, StatusCode::UNAUTHORIZED, "unauthorized").await;
    assert_eq!(json["message"], "missing authorization header");

    let req = Request::builder()
        .uri("/api/v1/agreements")
        .header("authorization", "Basic dXNlcjpwdw==")
        .body(Body::empty())
        .unwrap();
    let json = expect_error(send(&t.app, req).await, StatusCode::UNAUTHORIZED, "unauthorized").await;
    assert_eq!(json["message"], "invalid authorization scheme");
}

#[tokio::test]
async fn bearer_gate_rejects_refresh_and_garbage_tokens() {
    let t = test_app(GateMode::Bearer);
    let (_, refresh) = login_tokens(&t).await;
    for token in [refresh.as_str(), "not.a.jwt"] {
        let resp = send(&t.app, get_with_bearer("/api/v1/agreements", token)).await;
        expect_error(resp, StatusCode::UNAUTHORIZED, "unauthorized").await;
    }
}

#[tokio::test]
async fn bearer_gate_rejects_tokens_without_a_stored_record() {
    let t = test_app(GateMode::Bearer);
    let (access, _) = login_tokens(&t).await;
    let claims = verify_access_token(&access, &t.state.keys).unwrap();
    let id = Uuid::parse_str(&claims.token_id).unwrap();
    assert!(t.tokens.delete(id).await.unwrap());

    let resp = send(&t.app, get_with_bearer("/api/v1/agreements", &access)).await;
    let json = expect_error(resp, StatusCode::UNAUTHORIZED, "unauthorized").await;
    assert_eq!(json["message"], "invalid or expired token");
}

/// Replace the stored access record with `edit` applied, then expect the
/// untouched JWT to be refused.
async fn assert_rewritten_record_is_refused(edit: impl FnOnce(&mut TokenRecord)) {
    let t = test_app(GateMode::Bearer);
    let (access, _) = login_tokens(&t).await;
    let claims = verify_access_token(&access, &t.state.keys).unwrap();
    let id = Uuid::parse_str(&claims.token_id).unwrap();
    let mut record = get_token_record(t.tokens.as_ref(), id).await.unwrap();
    edit(&mut record);
    t.tokens.put_all(&[record]).await.unwrap();

    let resp = send(&t.app, get_with_bearer("/api/v1/agreements", &access)).await;
    let json = expect_error(resp, StatusCode::UNAUTHORIZED, "unauthorized").await;
    assert_eq!(json["message"], "invalid or expired token");
}

#[tokio::test]
async fn bearer_gate_rejects_an_expired_record() {
    assert_rewritten_record_is_refused(|r| r.expires_at = Utc::now() - Duration::minutes(1)).await;
}

#[tokio::test]
async fn bearer_gate_rejects_a_record_owned_by_another_user() {
    assert_rewritten_record_is_refused(|r| r.user_id = "someone-else".to_string()).await;
}

#[tokio::test]
async fn bearer_gate_rejects_a_record_with_a_different_token() {
    assert_rewritten_record_is_refused(|r| r.token = "other".to_string()).await;
}

#[tokio::test]
async fn bearer_gate_rejects_a_record_of_the_refresh_kind() {
    assert_rewritten_record_is_refused(|r| r.kind = TokenKind::Refresh).await;
}

#[tokio::test]
async fn bearer_scheme_matches_case_insensitively() {
    let t = test_app(GateMode::Bearer);
    let (access, _) = login_tokens(&t).await;
    let req = Request::builder()
        .uri("/logout")
        .header("authorization", format!("bearer {access}"))
        .body(Body::empty())
        .unwrap();
    assert_eq!(send(&t.app, req).await.status(), StatusCode::OK);
}

#[tokio::test]
async fn bearer_gate_surfaces_store_failures_as_internal() {
    let t = test_app(GateMode::Bearer);
    let (access, _) = login_tokens(&t).await;
    t.tokens.set_unavailable(true);
    let resp = send(&t.app, get_with_bearer("/api/v1/agreements", &access)).await;
    expect_error(resp, StatusCode::INTERNAL_SERVER_ERROR, "internal_server_error").await;
}

#[tokio::test]
async fn bearer_gate_keeps_login_and_health_public() {
    let t = test_app(GateMode::Bearer);
    assert_eq!(send(&t.app, get("/health")).await.status(), StatusCode::OK);
    assert_eq!(
        send(&t.app, login_request(EMAIL, PASSWORD)).await.status(),
        StatusCode::OK
    );
}
