//! Model error types.

use crate::FieldType;
use thiserror::Error;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised by generic field access on a record.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("field `{field}` expects a {expected} value")]
    FieldType { field: String, expected: FieldType },

    #[error("unknown package type: {0}")]
    UnknownPackageKind(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
