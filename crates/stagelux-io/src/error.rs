//! Error types for patch document I/O.

/// Result type alias for I/O operations.
pub type Result<T> = std::result::Result<T, IoError>;

/// Error type for patch document I/O.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Generic I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// RON serialization error
    #[error("RON error: {0}")]
    RonSerialize(#[from] ron::Error),

    /// RON deserialization error
    #[error("RON error: {0}")]
    RonDeserialize(#[from] ron::error::SpannedError),

    /// File format version does not match this build
    #[error("patch file version mismatch: expected {expected}, found {found}")]
    VersionMismatch {
        /// Version this build writes and reads.
        expected: String,
        /// Version found in the file.
        found: String,
    },

    /// Unknown file extension
    #[error("unsupported patch file format: {0}")]
    UnsupportedFormat(String),

    /// File exceeds the load size limit
    #[error("patch file too large: {size} bytes (limit {limit})")]
    FileTooLarge {
        /// Actual file size in bytes.
        size: u64,
        /// Configured limit in bytes.
        limit: u64,
    },

    /// A record in the document fails domain validation
    #[error("invalid patch record: {0}")]
    InvalidRecord(#[from] stagelux_core::CoreError),
}
