//! jokebox-server library crate.
//!
//! Everything except the binary entry point lives here so that
//! integration tests can drive the full router in-process:
//! - `db` — the joke repository trait and its SQLite implementation
//! - `routes` — axum routers and handlers
//! - `middleware` — CORS and request-tracing layers
//! - `random` — injectable uniform index picker
//! - `state` — shared application state

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod random;
pub mod routes;
pub mod schemas;
pub mod state;
