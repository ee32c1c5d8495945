//! # pact_core
//!
//! Core domain logic for Pact: credentials, token issuance and the
//! storage contracts the HTTP layer depends on.

pub mod auth;
pub mod migrate;
pub mod models;
pub mod store;
pub mod uuid;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
