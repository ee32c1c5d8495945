//! Content-Type enforcement for mutating requests.

use axum::{
    extract::Request,
    http::{HeaderValue, Method, header::CONTENT_TYPE},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::error::RestError;

const JSON_MEDIA_TYPE: &str = "application/json";

/// Axum middleware: every method except GET must declare a JSON body.
pub async fn require_json(request: Request, next: Next) -> Result<Response, RestError> {
    if request.method() != Method::GET
        && let Err(e) = check_content_type(request.headers().get(CONTENT_TYPE))
    {
        debug!(reason = e.message(), "rejected by content type check");
        return Err(e);
    }
    Ok(next.run(request).await)
}

/// Validate a `Content-Type` value as `application/json`, parameters allowed.
pub fn check_content_type(value: Option<&HeaderValue>) -> Result<(), RestError> {
    let raw = match value {
        Some(v) if !v.as_bytes().trim_ascii().is_empty() => v,
        _ => return Err(RestError::bad_request("Content-Type header cannot be empty")),
    };
    let essence = raw
        .to_str()
        .ok()
        .and_then(parse_media_type)
        .ok_or_else(|| RestError::bad_request("malformed Content-Type header"))?;
    if essence != JSON_MEDIA_TYPE {
        return Err(RestError::bad_request(
            "Content-Type header must be application/json",
        ));
    }
    Ok(())
}

/// Parse `type/subtype *(; name=value)` and return the lowercased `type/subtype`.
fn parse_media_type(raw: &str) -> Option<String> {
    let mut parts = raw.split(';');
    let essence = parts.next()?.trim();
    let (main, sub) = essence.split_once('/')?;
    if !is_token(main) || !is_token(sub) {
        return None;
    }
    for param in parts.map(str::trim).filter(|p| !p.is_empty()) {
        let (name, value) = param.split_once('=')?;
        if !is_token(name.trim_end()) || value.trim().is_empty() {
            return None;
        }
    }
    Some(essence.to_ascii_lowercase())
}

/// RFC 7230 token characters.
fn is_token(s: &str) -> bool {
    !s.is_empty()
        && s.bytes()
            .all(|b| b.is_ascii_graphic() && !b"()<>@,;:\\\"/[]?={}".contains(&b))
}
