/// Shared application state
use crate::{config::ServerConfig, middleware::AuthenticatedUser};
use podshelf_storage::LocalStorageContext;
use sqlx::SqlitePool;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: Arc<ServerConfig>) -> Self {
        Self { pool, config }
    }

    /// Storage scoped to the authenticated caller
    pub fn storage_for(&self, auth: &AuthenticatedUser) -> LocalStorageContext {
        LocalStorageContext::new(
            self.pool.clone(),
            auth.user_id().clone(),
            self.config.progress.policy(),
        )
    }
}
