//! Sale line items (`DetalleVentas`).
//!
//! Field names are capitalized in storage and in responses. The quantity is
//! also accepted as lower-case `cantidad` on input and is always stored and
//! returned as `Cantidad`. When a body carries both, `Cantidad` wins.

use serde::{Deserialize, Serialize};

use crate::entity::{FieldValue, Fields, Resource, ResourceMessages};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaleLineItem {
    #[serde(rename = "Precio")]
    pub precio: FieldValue,
    #[serde(rename = "Producto")]
    pub producto: FieldValue,
    #[serde(rename = "Vendido_el")]
    pub vendido_el: FieldValue,
    #[serde(rename = "Cantidad")]
    pub cantidad: FieldValue,
}

impl Resource for SaleLineItem {
    const COLLECTION: &'static str = "DetalleVentas";
    const NOUN: &'static str = "detalleventa";
    const LIST_NOUN: &'static str = "detalleventas";
    const MESSAGES: ResourceMessages = ResourceMessages {
        created: "detalle venta agregado",
        not_found: "Detalle venta no encontrado",
        updated: "Detalle venta actualizado correctamente",
        deleted: "Detalle venta eliminado correctamente",
    };

    fn canonicalize_input(fields: &mut Fields) {
        if let Some(quantity) = fields.remove("cantidad") {
            fields.entry("Cantidad").or_insert(quantity);
        }
    }
}
