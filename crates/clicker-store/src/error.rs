//! Error types for the persistence layer.
//!
//! All errors are propagated via [`StoreError`]. Every variant is
//! recoverable from the session's point of view: gameplay continues on
//! in-memory state.

/// Errors that can occur while loading, saving, or clearing a record.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A filesystem operation failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding the record failed, or the stored bytes are not JSON.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The stored document is JSON but not a record.
    #[error("malformed save data: {0}")]
    Malformed(String),

    /// The medium refused the operation (quota, locked, offline).
    #[error("persistence unavailable: {0}")]
    Unavailable(String),
}
