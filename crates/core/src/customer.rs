//! Customer records (`clientes`).

use serde::{Deserialize, Serialize};

use crate::entity::{FieldValue, Resource, ResourceMessages};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Customer {
    pub nombre: FieldValue,
    pub email: FieldValue,
    pub telefono: FieldValue,
}

impl Resource for Customer {
    const COLLECTION: &'static str = "clientes";
    const NOUN: &'static str = "cliente";
    const LIST_NOUN: &'static str = "clientes";
    const MESSAGES: ResourceMessages = ResourceMessages {
        created: "cliente agregado",
        not_found: "Cliente no encontrado",
        updated: "Cliente actualizado correctamente",
        deleted: "Cliente eliminado correctamente",
    };
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn missing_fields_are_written_as_null() {
        let c: Customer = serde_json::from_value(json!({ "nombre": "Ana" })).unwrap();
        let fields = c.to_fields().unwrap();
        assert_eq!(fields.get("nombre"), Some(&json!("Ana")));
        assert_eq!(fields.get("email"), Some(&FieldValue::Null));
        assert_eq!(fields.get("telefono"), Some(&FieldValue::Null));
    }

    #[test]
    fn values_are_not_type_checked() {
        let c: Customer = serde_json::from_value(json!({ "telefono": 555 })).unwrap();
        assert_eq!(c.telefono, json!(555));
    }
}
