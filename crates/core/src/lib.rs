//! `tienda-core` — record types and the per-kind resource contract.
//!
//! This crate contains **pure domain** definitions (no IO, no HTTP, no storage).

pub mod customer;
pub mod entity;
pub mod error;
pub mod id;
pub mod product;
pub mod sale;
pub mod sale_line_item;

pub use customer::Customer;
pub use entity::{FieldValue, Fields, Resource, ResourceMessages, UPDATED_AT_FIELD};
pub use error::{DomainError, DomainResult};
pub use id::DocumentId;
pub use product::Product;
pub use sale::Sale;
pub use sale_line_item::SaleLineItem;
