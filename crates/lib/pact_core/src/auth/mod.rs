//! Authentication logic.
//!
//! Provides password hashing, JWT token pair issuance and input sanitizing
//! for the login flow in `pact_api`.

pub mod jwt;
pub mod password;
pub mod sanitize;

use thiserror::Error;

/// Authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Token error: {0}")]
    TokenError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
