//! Per-request trace and client identity.
//!
//! The outermost middleware builds a [`RequestContext`], stores it in the
//! request extensions and runs the rest of the chain inside a `request` span
//! carrying both ids, so every downstream log line is correlated.

use std::time::SystemTime;

use axum::{
    extract::{FromRequestParts, Request},
    http::{HeaderMap, HeaderValue, request::Parts},
    middleware::Next,
    response::Response,
};
use pact_core::uuid::uuidv7_at;
use tracing::{Instrument, info_span, warn};
use uuid::Uuid;

use crate::error::RestError;

/// Caller-supplied client identifier.
pub const CLIENT_ID_HEADER: &str = "x-client-id";

/// Response header echoing the trace id.
pub const TRACE_ID_HEADER: &str = "x-trace-id";

/// Immutable identity of one request. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    trace_id: Uuid,
    client_id: String,
}

impl RequestContext {
    pub fn new(trace_id: Uuid, client_id: impl Into<String>) -> Self {
        Self {
            trace_id,
            client_id: client_id.into(),
        }
    }

    pub fn trace_id(&self) -> Uuid {
        self.trace_id
    }

    /// Opaque caller id; empty when the header was absent.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }
}

/// Generate a time-ordered trace id from the system clock.
pub fn new_trace_id() -> Uuid {
    trace_id_at(SystemTime::now())
}

/// Trace id for a given clock reading; the nil UUID if the reading is unusable.
pub fn trace_id_at(now: SystemTime) -> Uuid {
    match uuidv7_at(now) {
        Ok(id) => id,
        Err(e) => {
            warn!(error = %e, "trace id generation failed, using nil id");
            Uuid::nil()
        }
    }
}

fn client_id_from(headers: &HeaderMap) -> String {
    headers
        .get(CLIENT_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// Axum middleware: attaches a [`RequestContext`] and a correlation span.
pub async fn propagate_context(mut request: Request, next: Next) -> Response {
    let ctx = RequestContext::new(new_trace_id(), client_id_from(request.headers()));
    let span = info_span!(
        "request",
        trace_id = %ctx.trace_id(),
        client_id = %ctx.client_id(),
        method = %request.method(),
        path = %request.uri().path(),
    );
    let trace_header = HeaderValue::from_str(&ctx.trace_id().to_string()).ok();
    request.extensions_mut().insert(ctx);

    let mut response = next.run(request).instrument(span).await;
    if let Some(value) = trace_header {
        response.headers_mut().insert(TRACE_ID_HEADER, value);
    }
    response
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = RestError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestContext>()
            .cloned()
            .ok_or_else(|| RestError::internal("request context missing", "middleware error"))
    }
}
