//! Document store boundary.
//!
//! Collection-name + document-id addressing over flat JSON documents, with
//! store-assigned ids and a store-side clock for update stamps.

pub mod in_memory;
pub mod page;
#[cfg(feature = "postgres")]
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryDocumentStore;
pub use page::Page;
#[cfg(feature = "postgres")]
pub use postgres::PostgresDocumentStore;
pub use r#trait::{Document, DocumentStore, DocumentUpdate, StoreError};
