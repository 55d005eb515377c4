use std::sync::Arc;

use warden_db::RbacStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Persistence backend, opened in `main` and closed after shutdown.
    pub store: Arc<dyn RbacStore>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
