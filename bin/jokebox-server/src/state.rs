//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use crate::config::Config;
use crate::db::sqlite::SqliteStore;
use crate::random::IndexPicker;

/// State shared across all HTTP handlers.
///
/// Everything here is immutable after startup, so requests never contend
/// on in-process locks.
pub struct AppState {
    /// Server configuration (env-derived).
    pub config: Arc<Config>,
    /// Persistent joke store.
    pub store: Arc<SqliteStore>,
    /// Uniform random index source for the `/jokes/random*` endpoints.
    /// Injected so tests can substitute a deterministic picker.
    pub picker: Arc<dyn IndexPicker>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}
