//! Error types for the output pipeline
use thiserror::Error;

/// Output pipeline errors
#[derive(Error, Debug)]
pub enum ControlError {
    /// DMX transport error
    #[error("DMX error: {0}")]
    DmxError(String),

    /// Sending on a sender that has no open socket
    #[error("Art-Net sender is not connected")]
    NotConnected,

    /// I/O error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Invalid parameter value
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type for control operations
pub type Result<T> = std::result::Result<T, ControlError>;
