//! Sale records (`ventas`).

use serde::{Deserialize, Serialize};

use crate::entity::{FieldValue, Resource, ResourceMessages};

/// A sale header. `total` is supplied by the caller, never derived from line items.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sale {
    /// Customer document id. Not checked against the customer collection.
    pub cliente: FieldValue,
    pub fecha: FieldValue,
    pub total: FieldValue,
}

impl Resource for Sale {
    const COLLECTION: &'static str = "ventas";
    const NOUN: &'static str = "venta";
    const LIST_NOUN: &'static str = "ventas";
    const MESSAGES: ResourceMessages = ResourceMessages {
        created: "venta agregada",
        not_found: "Venta no encontrada",
        updated: "Venta actualizada correctamente",
        deleted: "Venta eliminada correctamente",
    };
}
