//! Product records (`productos`).

use serde::{Deserialize, Serialize};

use crate::entity::{FieldValue, Resource, ResourceMessages};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Product {
    pub categoria: FieldValue,
    pub nombre: FieldValue,
    /// Units in stock.
    pub existencia: FieldValue,
    pub precio: FieldValue,
}

impl Resource for Product {
    const COLLECTION: &'static str = "productos";
    const NOUN: &'static str = "producto";
    const LIST_NOUN: &'static str = "productos";
    const MESSAGES: ResourceMessages = ResourceMessages {
        created: "producto agregado",
        not_found: "Producto no encontrado",
        updated: "Producto actualizado correctamente",
        deleted: "Producto eliminado correctamente",
    };
}
