use crate::config::AppConfig;
use crate::store::{CatalogStore, RedbCatalogStore, StoreError};
use std::sync::Arc;

/// Shared application state
///
/// The store handle is constructed once at startup and passed by reference
/// into every handler; there is no ambient connection singleton.
#[derive(Clone)]
pub struct AppState {
    /// Service configuration
    pub config: Arc<AppConfig>,

    /// Catalog store (shared across requests)
    pub store: Arc<dyn CatalogStore>,
}

impl AppState {
    /// Create state backed by the redb store at `config.db_path`.
    pub fn new(config: AppConfig) -> Result<Self, StoreError> {
        let store = Arc::new(RedbCatalogStore::open(&config.db_path)?);
        Ok(Self {
            config: Arc::new(config),
            store,
        })
    }

    /// Create state over an existing store handle. Used by tests to swap in
    /// an in-memory or pre-seeded backend.
    pub fn with_store(config: AppConfig, store: Arc<dyn CatalogStore>) -> Self {
        Self {
            config: Arc::new(config),
            store,
        }
    }
}
