use std::sync::Arc;

use crate::auth::session::SessionStore;
use crate::background::enrichment::EnrichmentQueue;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: dreamboard_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Cookie-backed session lookup and issuance.
    pub sessions: SessionStore,
    /// Sender side of the background enrichment worker.
    pub enrichment: EnrichmentQueue,
}
