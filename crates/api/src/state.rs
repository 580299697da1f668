use std::sync::Arc;

use uptemplate_core::blob::BlobStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: uptemplate_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Storage for uploaded media files.
    pub blob_store: Arc<dyn BlobStore>,
}
