use std::sync::Arc;

use tienda_infra::{DocumentStore, InMemoryDocumentStore, ListLimits, Page, ServerConfig, StoreBackend, StoreError};

/// Shared handle passed to every handler.
///
/// The store is injected here rather than held in a global, so tests can run
/// the real router over any `DocumentStore`.
#[derive(Clone)]
pub struct AppServices {
    store: Arc<dyn DocumentStore>,
    list_limits: ListLimits,
}

impl AppServices {
    pub fn new(store: Arc<dyn DocumentStore>, list_limits: ListLimits) -> Self {
        Self { store, list_limits }
    }

    /// In-memory store with default list limits (dev/test).
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryDocumentStore::new()), ListLimits::default())
    }

    pub fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }

    /// Resolve list query parameters against the configured limits.
    pub fn page(&self, limit: Option<u32>, offset: Option<u32>) -> Page {
        Page::new(limit, offset, self.list_limits.max_limit)
    }
}

/// Build services for the configured store backend.
pub async fn build_services(config: &ServerConfig) -> Result<AppServices, StoreError> {
    let store: Arc<dyn DocumentStore> = match &config.store {
        StoreBackend::InMemory => {
            tracing::info!("using in-memory document store");
            Arc::new(InMemoryDocumentStore::new())
        }
        #[cfg(feature = "postgres")]
        StoreBackend::Postgres { database_url } => {
            use secrecy::ExposeSecret;

            let store = tienda_infra::PostgresDocumentStore::connect(database_url.expose_secret()).await?;
            store.ensure_schema().await?;
            tracing::info!("using postgres document store");
            Arc::new(store)
        }
        #[cfg(not(feature = "postgres"))]
        StoreBackend::Postgres { .. } => {
            tracing::warn!("USE_PERSISTENT_STORES=true but postgres feature not enabled, falling back to in-memory");
            Arc::new(InMemoryDocumentStore::new())
        }
    };

    Ok(AppServices::new(store, config.list_limits))
}
