//! Request middleware, applied in this order: context, content type, access gate.

pub mod access_gate;
pub mod content_type;
pub mod context;
