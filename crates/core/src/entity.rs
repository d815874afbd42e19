//! Resource trait: the per-kind contract every stored record kind implements.

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{DomainError, DomainResult};

/// A single field value. Values are stored as given: no presence or type checks.
pub type FieldValue = serde_json::Value;

/// Field map of one stored document.
pub type Fields = serde_json::Map<String, FieldValue>;

/// Field stamped with the store's clock on every update.
pub const UPDATED_AT_FIELD: &str = "fechaActualizacion";

/// User-facing messages for one resource kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceMessages {
    pub created: &'static str,
    pub not_found: &'static str,
    pub updated: &'static str,
    pub deleted: &'static str,
}

/// A flat record kind stored as one document per record in its own collection.
///
/// Implementors are plain serde structs whose serialized field names are the
/// stored (and returned) field names.
pub trait Resource: Serialize + DeserializeOwned + Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Name of the backing collection.
    const COLLECTION: &'static str;

    /// Singular route noun (`/{noun}/add`, `/{noun}/:id`, ...).
    const NOUN: &'static str;

    /// Plural route noun used by the list route (`/{list_noun}/ver`).
    const LIST_NOUN: &'static str;

    const MESSAGES: ResourceMessages;

    /// Rename accepted input spellings to their stored names, in place.
    ///
    /// Runs on request bodies only. The default keeps the map as is.
    fn canonicalize_input(_fields: &mut Fields) {}

    /// Build a record from a request body's field map.
    fn from_input(mut fields: Fields) -> DomainResult<Self> {
        Self::canonicalize_input(&mut fields);
        Self::from_fields(&fields)
    }

    /// Serialize the record into the field map written to the store.
    ///
    /// Every public field is present; absent input values are written as `null`.
    fn to_fields(&self) -> DomainResult<Fields> {
        match serde_json::to_value(self) {
            Ok(FieldValue::Object(map)) => Ok(map),
            Ok(other) => Err(DomainError::malformed(format!(
                "{} record serialized to non-object: {other}",
                Self::COLLECTION
            ))),
            Err(e) => Err(DomainError::malformed(e.to_string())),
        }
    }

    /// Project a stored field map onto the public field set.
    ///
    /// Fields outside the public set (including the update stamp) are ignored.
    fn from_fields(fields: &Fields) -> DomainResult<Self> {
        serde_json::from_value(FieldValue::Object(fields.clone()))
            .map_err(|e| DomainError::malformed(format!("{}: {e}", Self::COLLECTION)))
    }
}
