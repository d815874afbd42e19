use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use tienda_core::DomainError;
use tienda_infra::StoreError;

/// Handler error. Every variant renders as `{"error": <message>}`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The addressed document does not exist. Carries the resource's message.
    #[error("{0}")]
    NotFound(&'static str),

    /// The request body could not be read as a JSON object.
    #[error("{0}")]
    BadRequest(String),

    /// Any store failure; the store's message is passed through unchanged.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A stored document could not be mapped to its record kind.
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Store(_) | ApiError::Domain(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::NotFound(_) => tracing::debug!(error = %self, "not found"),
            ApiError::BadRequest(_) => tracing::info!(error = %self, "bad request"),
            ApiError::Store(_) | ApiError::Domain(_) => tracing::error!(error = %self, "request failed"),
        }

        json_error(self.status(), self.to_string())
    }
}

pub fn json_error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, axum::Json(json!({ "error": message.into() }))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_keep_raw_message() {
        let err = ApiError::from(StoreError::Unavailable("connection refused".to_string()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "connection refused");
    }

    #[test]
    fn not_found_is_404_with_resource_message() {
        let err = ApiError::NotFound("Venta no encontrada");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Venta no encontrada");
    }
}
