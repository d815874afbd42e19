//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Records carry no validation rules, so this only covers identifiers and
/// the mapping between records and stored field maps.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// An identifier was invalid (e.g. empty).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A record could not be mapped to or from its stored fields.
    #[error("malformed record: {0}")]
    Malformed(String),
}

impl DomainError {
    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }
}
