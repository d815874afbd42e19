use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use tienda_core::{DocumentId, FieldValue, Fields};

use super::page::Page;
use super::r#trait::{Document, DocumentStore, DocumentUpdate, StoreError};

#[derive(Debug, Default)]
struct State {
    collections: HashMap<String, BTreeMap<DocumentId, Document>>,
    last_tick: Option<DateTime<Utc>>,
}

impl State {
    /// Store clock. Strictly increasing across calls, even if the wall clock stalls.
    fn tick(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let next = match self.last_tick {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_tick = Some(next);
        next
    }
}

/// In-memory document store.
///
/// Intended for tests/dev. All collections live behind one lock; no lock is
/// held across an await.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    state: RwLock<State>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in a collection.
    pub fn len(&self, collection: &str) -> usize {
        self.state
            .read()
            .map(|s| s.collections.get(collection).map_or(0, BTreeMap::len))
            .unwrap_or(0)
    }

    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }
}

fn poisoned() -> StoreError {
    StoreError::Unavailable("lock poisoned".to_string())
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn list(&self, collection: &str, page: Page) -> Result<Vec<Document>, StoreError> {
        let state = self.state.read().map_err(|_| poisoned())?;
        let Some(docs) = state.collections.get(collection) else {
            return Ok(vec![]);
        };

        Ok(docs
            .values()
            .skip(page.offset as usize)
            .take(page.limit.map_or(usize::MAX, |l| l as usize))
            .cloned()
            .collect())
    }

    async fn get(&self, collection: &str, id: &DocumentId) -> Result<Option<Document>, StoreError> {
        let state = self.state.read().map_err(|_| poisoned())?;
        Ok(state
            .collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned())
    }

    async fn add(&self, collection: &str, fields: Fields) -> Result<DocumentId, StoreError> {
        let mut state = self.state.write().map_err(|_| poisoned())?;
        let now = state.tick();
        let docs = state.collections.entry(collection.to_string()).or_default();

        let mut id = DocumentId::generate();
        while docs.contains_key(&id) {
            id = DocumentId::generate();
        }

        docs.insert(
            id.clone(),
            Document {
                id: id.clone(),
                fields,
                create_time: now,
                update_time: now,
            },
        );
        Ok(id)
    }

    async fn update_if_exists(
        &self,
        collection: &str,
        id: &DocumentId,
        update: DocumentUpdate,
    ) -> Result<bool, StoreError> {
        let mut state = self.state.write().map_err(|_| poisoned())?;
        let exists = state
            .collections
            .get(collection)
            .is_some_and(|docs| docs.contains_key(id));
        if !exists {
            return Ok(false);
        }

        let now = state.tick();
        let Some(doc) = state
            .collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
        else {
            return Ok(false);
        };

        doc.fields.extend(update.fields);
        if let Some(field) = update.server_timestamp {
            let stamp = serde_json::to_value(now).unwrap_or(FieldValue::Null);
            doc.fields.insert(field.to_string(), stamp);
        }
        doc.update_time = now;
        Ok(true)
    }

    async fn delete_if_exists(&self, collection: &str, id: &DocumentId) -> Result<bool, StoreError> {
        let mut state = self.state.write().map_err(|_| poisoned())?;
        Ok(state
            .collections
            .get_mut(collection)
            .and_then(|docs| docs.remove(id))
            .is_some())
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use serde_json::json;

    use super::*;

    fn fields(v: serde_json::Value) -> Fields {
        match v {
            serde_json::Value::Object(m) => m,
            _ => panic!("expected object"),
        }
    }

    #[tokio::test]
    async fn add_then_get_returns_fields() {
        let store = InMemoryDocumentStore::new();
        let id = store.add("clientes", fields(json!({ "nombre": "Ana" }))).await.unwrap();

        let doc = store.get("clientes", &id).await.unwrap().unwrap();
        assert_eq!(doc.id, id);
        assert_eq!(doc.fields.get("nombre"), Some(&json!("Ana")));
        assert_eq!(doc.create_time, doc.update_time);
    }

    #[tokio::test]
    async fn collections_are_isolated() {
        let store = InMemoryDocumentStore::new();
        let id = store.add("clientes", Fields::new()).await.unwrap();

        assert!(store.get("productos", &id).await.unwrap().is_none());
        assert!(!store.delete_if_exists("productos", &id).await.unwrap());
        assert_eq!(store.len("clientes"), 1);
    }

    #[tokio::test]
    async fn update_merges_and_stamps() {
        let store = InMemoryDocumentStore::new();
        let id = store
            .add("ventas", fields(json!({ "cliente": "c1", "total": 10 })))
            .await
            .unwrap();

        let update = DocumentUpdate::new(fields(json!({ "total": 12 })))
            .with_server_timestamp("fechaActualizacion");
        assert!(store.update_if_exists("ventas", &id, update).await.unwrap());

        let doc = store.get("ventas", &id).await.unwrap().unwrap();
        assert_eq!(doc.fields.get("cliente"), Some(&json!("c1")));
        assert_eq!(doc.fields.get("total"), Some(&json!(12)));
        assert!(doc.update_time > doc.create_time);

        let stamp: DateTime<Utc> =
            serde_json::from_value(doc.fields["fechaActualizacion"].clone()).unwrap();
        assert_eq!(stamp, doc.update_time);
    }

    #[tokio::test]
    async fn conditional_writes_report_absence() {
        let store = InMemoryDocumentStore::new();
        let missing: DocumentId = "nope".parse().unwrap();

        let update = DocumentUpdate::new(Fields::new());
        assert!(!store.update_if_exists("productos", &missing, update).await.unwrap());
        assert!(!store.delete_if_exists("productos", &missing).await.unwrap());
        assert!(store.is_empty("productos"));
    }

    #[tokio::test]
    async fn list_pages_in_id_order() {
        let store = InMemoryDocumentStore::new();
        let mut ids = Vec::new();
        for i in 0..5 {
            ids.push(store.add("productos", fields(json!({ "n": i }))).await.unwrap());
        }
        ids.sort();

        let page = store.list("productos", Page { limit: Some(2), offset: 1 }).await.unwrap();
        let got: Vec<_> = page.into_iter().map(|d| d.id).collect();
        assert_eq!(got, ids[1..3].to_vec());

        assert!(store.list("productos", Page { limit: Some(2), offset: 9 }).await.unwrap().is_empty());
        assert!(store.list("ventas", Page::ALL).await.unwrap().is_empty());
    }

    proptest! {
        #[test]
        fn list_counts_creates_minus_deletes(creates in 1usize..40, deletes_frac in 0.0f64..1.0) {
            let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
            rt.block_on(async {
                let store = InMemoryDocumentStore::new();
                let mut ids = Vec::new();
                for _ in 0..creates {
                    ids.push(store.add("clientes", Fields::new()).await.unwrap());
                }

                let deletes = ((creates as f64) * deletes_frac) as usize;
                for id in ids.iter().take(deletes) {
                    assert!(store.delete_if_exists("clientes", id).await.unwrap());
                }

                let listed = store.list("clientes", Page::ALL).await.unwrap();
                assert_eq!(listed.len(), creates - deletes);
            });
        }
    }
}
