use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use tienda_core::{DocumentId, Fields};

use super::page::Page;

/// A stored document.
///
/// `create_time` and `update_time` are store metadata; they are not part of
/// the document's fields. `update_time` equals `create_time` until the first
/// update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub fields: Fields,
    pub create_time: DateTime<Utc>,
    pub update_time: DateTime<Utc>,
}

/// A merge write against an existing document.
///
/// Listed fields overwrite the stored values; unlisted stored fields are kept.
/// When `server_timestamp` names a field, the store sets it to its own clock
/// at write time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentUpdate {
    pub fields: Fields,
    pub server_timestamp: Option<&'static str>,
}

impl DocumentUpdate {
    pub fn new(fields: Fields) -> Self {
        Self {
            fields,
            server_timestamp: None,
        }
    }

    pub fn with_server_timestamp(mut self, field: &'static str) -> Self {
        self.server_timestamp = Some(field);
        self
    }
}

/// Document store failure.
///
/// The message is the backend's own description and is surfaced to callers
/// unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("{0}")]
    Unavailable(String),

    #[error("{0}")]
    Backend(String),
}

/// Collection-addressed document store.
///
/// ## Conditional writes
///
/// `update_if_exists` and `delete_if_exists` check existence and write in one
/// store operation and report whether the document was there. Callers never
/// need a separate `get` round trip before writing.
///
/// ## Ordering
///
/// `list` returns documents in ascending id order. With generated ids this is
/// creation order, but callers must not depend on it.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// List one page of a collection.
    async fn list(&self, collection: &str, page: Page) -> Result<Vec<Document>, StoreError>;

    /// Fetch a document. `Ok(None)` when absent.
    async fn get(&self, collection: &str, id: &DocumentId) -> Result<Option<Document>, StoreError>;

    /// Insert a new document under a store-generated id.
    async fn add(&self, collection: &str, fields: Fields) -> Result<DocumentId, StoreError>;

    /// Merge `update` into the document if it exists. Returns `false` when absent.
    async fn update_if_exists(
        &self,
        collection: &str,
        id: &DocumentId,
        update: DocumentUpdate,
    ) -> Result<bool, StoreError>;

    /// Remove the document if it exists. Returns `false` when absent.
    async fn delete_if_exists(&self, collection: &str, id: &DocumentId) -> Result<bool, StoreError>;
}

#[async_trait]
impl<S> DocumentStore for Arc<S>
where
    S: DocumentStore + ?Sized,
{
    async fn list(&self, collection: &str, page: Page) -> Result<Vec<Document>, StoreError> {
        (**self).list(collection, page).await
    }

    async fn get(&self, collection: &str, id: &DocumentId) -> Result<Option<Document>, StoreError> {
        (**self).get(collection, id).await
    }

    async fn add(&self, collection: &str, fields: Fields) -> Result<DocumentId, StoreError> {
        (**self).add(collection, fields).await
    }

    async fn update_if_exists(
        &self,
        collection: &str,
        id: &DocumentId,
        update: DocumentUpdate,
    ) -> Result<bool, StoreError> {
        (**self).update_if_exists(collection, id, update).await
    }

    async fn delete_if_exists(&self, collection: &str, id: &DocumentId) -> Result<bool, StoreError> {
        (**self).delete_if_exists(collection, id).await
    }
}
