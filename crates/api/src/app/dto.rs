use axum::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use serde::{Deserialize, Serialize};

use tienda_core::{DocumentId, DomainResult, FieldValue, Fields, Resource, UPDATED_AT_FIELD};
use tienda_infra::Document;

use crate::app::errors::ApiError;

// -------------------------
// Request DTOs
// -------------------------

/// Query parameters accepted by list routes.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

/// `Query<ListParams>` whose rejection renders as an `{error}` body.
#[derive(Debug)]
pub struct ListQuery(pub ListParams);

#[async_trait]
impl<S> FromRequestParts<S> for ListQuery
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<ListParams>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;
        Ok(Self(params))
    }
}

/// Raw `:id` path segment; undecodable segments render as an `{error}` body.
#[derive(Debug)]
pub struct RecordId(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for RecordId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;
        Ok(Self(id))
    }
}

/// A record body.
///
/// Fields are neither required nor type-checked. An empty body reads as `{}`,
/// so every field becomes `null`; only a body that is not a JSON object is
/// rejected. Alternate field spellings are resolved by
/// [`Resource::canonicalize_input`].
#[derive(Debug)]
pub struct RecordBody<R>(pub R);

#[async_trait]
impl<S, R> FromRequest<S> for RecordBody<R>
where
    S: Send + Sync,
    R: Resource,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;

        let fields = if bytes.iter().all(u8::is_ascii_whitespace) {
            Fields::new()
        } else {
            match serde_json::from_slice::<FieldValue>(&bytes)
                .map_err(|e| ApiError::BadRequest(e.to_string()))?
            {
                FieldValue::Object(map) => map,
                _ => {
                    return Err(ApiError::BadRequest(
                        "request body must be a JSON object".to_string(),
                    ));
                }
            }
        };

        R::from_input(fields)
            .map(RecordBody)
            .map_err(|e| ApiError::BadRequest(e.to_string()))
    }
}

// -------------------------
// Response DTOs
// -------------------------

/// Public projection of a stored record: its id, its field set, and the
/// update stamp once the record has been updated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordView<R> {
    pub id: DocumentId,
    #[serde(flatten)]
    pub record: R,
    #[serde(rename = "fechaActualizacion", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<FieldValue>,
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: DocumentId,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ChangedResponse {
    pub message: &'static str,
    pub id: DocumentId,
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn document_to_view<R: Resource>(doc: &Document) -> DomainResult<RecordView<R>> {
    Ok(RecordView {
        id: doc.id.clone(),
        record: R::from_fields(&doc.fields)?,
        updated_at: doc.fields.get(UPDATED_AT_FIELD).cloned(),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tienda_core::{Customer, SaleLineItem};

    use super::*;

    fn doc(fields: serde_json::Value) -> Document {
        let now = chrono::Utc::now();
        Document {
            id: "abc".parse().unwrap(),
            fields: match fields {
                serde_json::Value::Object(m) => m,
                _ => Fields::new(),
            },
            create_time: now,
            update_time: now,
        }
    }

    #[test]
    fn view_flattens_fields_next_to_id() {
        let d = doc(json!({ "nombre": "Ana", "email": "a@x.com", "telefono": "555", "extra": 1 }));
        let view = document_to_view::<Customer>(&d).unwrap();

        assert_eq!(
            serde_json::to_value(&view).unwrap(),
            json!({ "id": "abc", "nombre": "Ana", "email": "a@x.com", "telefono": "555" })
        );
    }

    #[test]
    fn view_carries_update_stamp_when_present() {
        let d = doc(json!({ "Cantidad": 2, "fechaActualizacion": "2024-03-01T00:00:00Z" }));
        let view = serde_json::to_value(document_to_view::<SaleLineItem>(&d).unwrap()).unwrap();

        assert_eq!(view["Cantidad"], json!(2));
        assert_eq!(view["Precio"], FieldValue::Null);
        assert_eq!(view["fechaActualizacion"], json!("2024-03-01T00:00:00Z"));
    }
}
