//! The five-operation contract shared by every record kind.
//!
//! Handlers are generic over `R: Resource`; the collection name, route noun,
//! and messages all come from the resource definition.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{HeaderName, HeaderValue},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};

use tienda_core::{DocumentId, Resource, UPDATED_AT_FIELD};
use tienda_infra::DocumentUpdate;

use crate::app::dto::{self, ChangedResponse, CreatedResponse, ListQuery, RecordBody, RecordId};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;

/// Set on list responses whose page came back full.
pub const NEXT_OFFSET_HEADER: HeaderName = HeaderName::from_static("x-next-offset");

pub fn router<R: Resource>() -> Router {
    Router::new()
        .route("/ver", get(list::<R>))
        .route("/add", post(create::<R>))
        .route("/:id", get(read::<R>))
        .route("/update/:id", put(update::<R>))
        .route("/delete/:id", delete(remove::<R>))
}

pub async fn list<R: Resource>(
    Extension(services): Extension<Arc<AppServices>>,
    ListQuery(params): ListQuery,
) -> Result<Response, ApiError> {
    let page = services.page(params.limit, params.offset);
    let docs = services.store().list(R::COLLECTION, page).await?;

    let views = docs
        .iter()
        .map(dto::document_to_view::<R>)
        .collect::<Result<Vec<_>, _>>()?;

    let mut response = Json(views).into_response();
    if let Some(next) = page.next_offset(docs.len()) {
        response
            .headers_mut()
            .insert(NEXT_OFFSET_HEADER, HeaderValue::from(next));
    }
    Ok(response)
}

pub async fn create<R: Resource>(
    Extension(services): Extension<Arc<AppServices>>,
    RecordBody(record): RecordBody<R>,
) -> Result<Json<CreatedResponse>, ApiError> {
    let fields = record.to_fields()?;
    let id = services.store().add(R::COLLECTION, fields).await?;
    tracing::info!(collection = R::COLLECTION, %id, "document created");

    Ok(Json(CreatedResponse {
        id,
        message: R::MESSAGES.created,
    }))
}

pub async fn read<R: Resource>(
    Extension(services): Extension<Arc<AppServices>>,
    RecordId(id): RecordId,
) -> Result<Json<dto::RecordView<R>>, ApiError> {
    let id = parse_id::<R>(&id)?;
    let doc = services
        .store()
        .get(R::COLLECTION, &id)
        .await?
        .ok_or(ApiError::NotFound(R::MESSAGES.not_found))?;

    Ok(Json(dto::document_to_view::<R>(&doc)?))
}

pub async fn update<R: Resource>(
    Extension(services): Extension<Arc<AppServices>>,
    RecordId(id): RecordId,
    RecordBody(record): RecordBody<R>,
) -> Result<Json<ChangedResponse>, ApiError> {
    let id = parse_id::<R>(&id)?;
    let update = DocumentUpdate::new(record.to_fields()?).with_server_timestamp(UPDATED_AT_FIELD);

    if !services.store().update_if_exists(R::COLLECTION, &id, update).await? {
        return Err(ApiError::NotFound(R::MESSAGES.not_found));
    }
    tracing::info!(collection = R::COLLECTION, %id, "document updated");

    Ok(Json(ChangedResponse {
        message: R::MESSAGES.updated,
        id,
    }))
}

pub async fn remove<R: Resource>(
    Extension(services): Extension<Arc<AppServices>>,
    RecordId(id): RecordId,
) -> Result<Json<ChangedResponse>, ApiError> {
    let id = parse_id::<R>(&id)?;

    if !services.store().delete_if_exists(R::COLLECTION, &id).await? {
        return Err(ApiError::NotFound(R::MESSAGES.not_found));
    }
    tracing::info!(collection = R::COLLECTION, %id, "document deleted");

    Ok(Json(ChangedResponse {
        message: R::MESSAGES.deleted,
        id,
    }))
}

/// An id that cannot name a document cannot exist either.
fn parse_id<R: Resource>(raw: &str) -> Result<DocumentId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::NotFound(R::MESSAGES.not_found))
}
