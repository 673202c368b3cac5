use std::sync::Arc;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; the only shared data is the immutable configuration.
/// Database connections are deliberately not pooled here: each request opens
/// its own short-lived connection to whichever project database it targets.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration (manifest and database directories, bind address).
    pub config: Arc<ServerConfig>,
}
