//! Postgres-backed document store.
//!
//! All collections share one `documents` table keyed by `(collection, id)`;
//! the document's fields live in a JSONB column.
//!
//! ## Error Mapping
//!
//! | SQLx Error | StoreError |
//! |------------|------------|
//! | `PoolClosed`, `PoolTimedOut`, `Io`, `Tls` | `Unavailable` |
//! | anything else | `Backend` |
//!
//! The database's own message is kept as the error text.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use tracing::instrument;

use tienda_core::{DocumentId, FieldValue, Fields};

use super::page::Page;
use super::r#trait::{Document, DocumentStore, DocumentUpdate, StoreError};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS documents (
    collection  TEXT        NOT NULL,
    id          TEXT        NOT NULL,
    fields      JSONB       NOT NULL DEFAULT '{}'::jsonb,
    create_time TIMESTAMPTZ NOT NULL DEFAULT clock_timestamp(),
    update_time TIMESTAMPTZ NOT NULL DEFAULT clock_timestamp(),
    PRIMARY KEY (collection, id)
)
"#;

/// Postgres-backed document store.
///
/// ## Conditional writes
///
/// `update_if_exists` and `delete_if_exists` are single `UPDATE`/`DELETE`
/// statements filtered on the primary key; existence is read from
/// `rows_affected`, so there is no window between check and write.
///
/// ## Timestamps
///
/// Create/update times and the server-timestamp field come from the
/// database clock (`clock_timestamp()`), never from the API process.
#[derive(Debug, Clone)]
pub struct PostgresDocumentStore {
    pool: Arc<PgPool>,
}

impl PostgresDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Connect to `database_url`.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPool::connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        Ok(Self::new(pool))
    }

    /// Create the `documents` table if it does not exist.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(SCHEMA)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for PostgresDocumentStore {
    #[instrument(skip(self), err)]
    async fn list(&self, collection: &str, page: Page) -> Result<Vec<Document>, StoreError> {
        // LIMIT NULL is no limit.
        let rows = sqlx::query(
            r#"
            SELECT id, fields, create_time, update_time
            FROM documents
            WHERE collection = $1
            ORDER BY id ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(collection)
        .bind(page.limit.map(i64::from))
        .bind(i64::from(page.offset))
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list", e))?;

        rows.iter().map(row_to_document).collect()
    }

    #[instrument(skip(self, id), fields(id = %id), err)]
    async fn get(&self, collection: &str, id: &DocumentId) -> Result<Option<Document>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, fields, create_time, update_time
            FROM documents
            WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(collection)
        .bind(id.as_str())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("get", e))?;

        row.as_ref().map(row_to_document).transpose()
    }

    #[instrument(skip(self, fields), err)]
    async fn add(&self, collection: &str, fields: Fields) -> Result<DocumentId, StoreError> {
        let id = DocumentId::generate();

        sqlx::query(
            r#"
            INSERT INTO documents (collection, id, fields, create_time, update_time)
            VALUES ($1, $2, $3, clock_timestamp(), clock_timestamp())
            "#,
        )
        .bind(collection)
        .bind(id.as_str())
        .bind(sqlx::types::Json(FieldValue::Object(fields)))
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("add", e))?;

        Ok(id)
    }

    #[instrument(skip(self, id, update), fields(id = %id), err)]
    async fn update_if_exists(
        &self,
        collection: &str,
        id: &DocumentId,
        update: DocumentUpdate,
    ) -> Result<bool, StoreError> {
        // $4 NULL leaves the stamp out; otherwise the field is set to the
        // same instant written to update_time.
        let result = sqlx::query(
            r#"
            WITH clock AS (SELECT clock_timestamp() AS now)
            UPDATE documents
            SET fields = documents.fields || $3::jsonb
                    || CASE WHEN $4::text IS NULL THEN '{}'::jsonb
                            ELSE jsonb_build_object($4::text, to_jsonb(clock.now))
                       END,
                update_time = clock.now
            FROM clock
            WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(collection)
        .bind(id.as_str())
        .bind(sqlx::types::Json(FieldValue::Object(update.fields)))
        .bind(update.server_timestamp)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_if_exists", e))?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, id), fields(id = %id), err)]
    async fn delete_if_exists(&self, collection: &str, id: &DocumentId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id.as_str())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_if_exists", e))?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_document(row: &sqlx::postgres::PgRow) -> Result<Document, StoreError> {
    let decode = |e: sqlx::Error| map_sqlx_error("decode_row", e);

    let id: String = row.try_get("id").map_err(decode)?;
    let sqlx::types::Json(fields): sqlx::types::Json<FieldValue> =
        row.try_get("fields").map_err(decode)?;
    let create_time: DateTime<Utc> = row.try_get("create_time").map_err(decode)?;
    let update_time: DateTime<Utc> = row.try_get("update_time").map_err(decode)?;

    let id = id
        .parse::<DocumentId>()
        .map_err(|e| StoreError::Backend(e.to_string()))?;
    let fields = match fields {
        FieldValue::Object(map) => map,
        other => {
            return Err(StoreError::Backend(format!(
                "document {id} has non-object fields: {other}"
            )));
        }
    };

    Ok(Document {
        id,
        fields,
        create_time,
        update_time,
    })
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => StoreError::Backend(format!(
            "database error in {operation}: {}",
            db_err.message()
        )),
        sqlx::Error::PoolClosed => {
            StoreError::Unavailable(format!("connection pool closed in {operation}"))
        }
        sqlx::Error::PoolTimedOut => {
            StoreError::Unavailable(format!("connection pool timed out in {operation}"))
        }
        e @ (sqlx::Error::Io(_) | sqlx::Error::Tls(_)) => {
            StoreError::Unavailable(format!("{operation}: {e}"))
        }
        other => StoreError::Backend(format!("{operation}: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    async fn connect() -> PostgresDocumentStore {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let store = PostgresDocumentStore::connect(&url).await.unwrap();
        store.ensure_schema().await.unwrap();
        store
    }

    fn fields(v: serde_json::Value) -> Fields {
        match v {
            FieldValue::Object(m) => m,
            _ => panic!("expected object"),
        }
    }

    #[tokio::test]
    #[ignore = "requires DATABASE_URL"]
    async fn update_merges_fields_and_stamps_database_time() {
        let store = connect().await;
        let collection = format!("test-{}", DocumentId::generate());

        let id = store
            .add(&collection, fields(json!({ "nombre": "Ana", "email": "a@x.com" })))
            .await
            .unwrap();
        let created = store.get(&collection, &id).await.unwrap().unwrap();

        let update = DocumentUpdate::new(fields(json!({ "nombre": "Eva" })))
            .with_server_timestamp("fechaActualizacion");
        assert!(store.update_if_exists(&collection, &id, update).await.unwrap());

        let doc = store.get(&collection, &id).await.unwrap().unwrap();
        assert_eq!(doc.fields["nombre"], json!("Eva"));
        assert_eq!(doc.fields["email"], json!("a@x.com"));
        assert!(doc.update_time > created.create_time);
        let stamp: DateTime<Utc> =
            serde_json::from_value(doc.fields["fechaActualizacion"].clone()).unwrap();
        assert_eq!(stamp, doc.update_time);

        let plain = DocumentUpdate::new(fields(json!({ "email": null })));
        assert!(store.update_if_exists(&collection, &id, plain).await.unwrap());
        let doc = store.get(&collection, &id).await.unwrap().unwrap();
        assert_eq!(doc.fields["email"], FieldValue::Null);
        let kept: DateTime<Utc> =
            serde_json::from_value(doc.fields["fechaActualizacion"].clone()).unwrap();
        assert_eq!(kept, stamp);

        assert!(store.delete_if_exists(&collection, &id).await.unwrap());
        assert!(!store.delete_if_exists(&collection, &id).await.unwrap());
        let missing = DocumentUpdate::new(Fields::new());
        assert!(!store.update_if_exists(&collection, &id, missing).await.unwrap());
    }

    #[tokio::test]
    #[ignore = "requires DATABASE_URL"]
    async fn list_without_limit_returns_every_document() {
        let store = connect().await;
        let collection = format!("test-{}", DocumentId::generate());

        for i in 0..4 {
            store.add(&collection, fields(json!({ "n": i }))).await.unwrap();
        }

        assert_eq!(store.list(&collection, Page::ALL).await.unwrap().len(), 4);
        let page = Page { limit: Some(3), offset: 2 };
        assert_eq!(store.list(&collection, page).await.unwrap().len(), 2);
    }
}
