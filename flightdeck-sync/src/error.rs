//! Error types for the sync layer.

use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur in sync operations.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),

    /// A body could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The server has no record at the requested URL.
    #[error("not found: {0}")]
    NotFound(String),

    /// The server rejected the credentials (401/403).
    #[error("authentication error: {0}")]
    Auth(String),

    /// Any other non-success status.
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },

    #[error("{record_type} declares no sync channel named `{channel}`")]
    UnknownChannel {
        record_type: &'static str,
        channel: String,
    },

    #[error("{record_type} has no primary key yet")]
    MissingPrimaryKey { record_type: &'static str },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl SyncError {
    /// Returns true if the server reported the record as missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, SyncError::NotFound(_))
    }
}
