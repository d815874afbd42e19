//! Infrastructure layer: document storage backends and configuration.

pub mod config;
pub mod document_store;

pub use config::{ConfigError, ListLimits, ServerConfig, StoreBackend};
pub use document_store::{
    Document, DocumentStore, DocumentUpdate, InMemoryDocumentStore, Page, StoreError,
};
#[cfg(feature = "postgres")]
pub use document_store::PostgresDocumentStore;
