//! HTTP API application wiring (Axum router + store wiring).
//!
//! - `services.rs`: store selection and the shared handle injected into handlers
//! - `routes/`: HTTP routes + handlers (one generic resource router, plus system routes)
//! - `dto.rs`: request/response DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs` and tests).
pub fn build_app(services: AppServices) -> Router {
    let services = Arc::new(services);

    Router::new()
        .route("/", get(routes::system::root))
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .layer(Extension(services))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}
