//! Domain models shared across the API layer.

pub mod auth;
