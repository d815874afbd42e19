use axum::{routing::get, Router};

use tienda_core::{Customer, Product, Resource, Sale, SaleLineItem};

pub mod resource;
pub mod system;

/// Router for all record endpoints.
pub fn router() -> Router {
    let router = Router::new();
    let router = mount::<Customer>(router);
    let router = mount::<SaleLineItem>(router);
    let router = mount::<Product>(router);
    mount::<Sale>(router)
}

/// Mount one resource kind: `/{noun}/...` plus the plural list route `/{list_noun}/ver`.
fn mount<R: Resource>(router: Router) -> Router {
    router
        .nest(&format!("/{}", R::NOUN), resource::router::<R>())
        .route(&format!("/{}/ver", R::LIST_NOUN), get(resource::list::<R>))
}
