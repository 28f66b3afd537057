use std::sync::Arc;

use biblio_lookup::BookMetadataProvider;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: biblio_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Source of book metadata for unknown ISBNs.
    pub metadata: Arc<dyn BookMetadataProvider>,
}
