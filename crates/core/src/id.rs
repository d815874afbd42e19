//! Document identifiers.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Store-assigned identifier of a document within its collection.
///
/// Opaque to callers: any non-empty string without a `/` is accepted, since
/// the identifier travels as a single URL path segment.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Generate a fresh identifier.
    ///
    /// Uses UUIDv7 (time-ordered), so lexical order roughly follows creation order.
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl core::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for DocumentId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(DomainError::invalid_id("DocumentId: empty"));
        }
        if s.contains('/') {
            return Err(DomainError::invalid_id(format!("DocumentId: `{s}` contains '/'")));
        }
        Ok(Self(s.to_string()))
    }
}

impl AsRef<str> for DocumentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
