//! HTTP middleware layers: CORS and per-request tracing.

pub mod cors;
pub mod trace;
