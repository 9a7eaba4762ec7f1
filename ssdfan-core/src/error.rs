//! Error types for the ssdfan system

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for ssdfan operations
#[derive(Error, Debug)]
pub enum SsdFanError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// A required hwmon device was not present among the candidates
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    /// Candidate directory enumeration failed
    #[error("Discovery error: {0}")]
    Discovery(String),

    /// An attribute file could not be opened, read or written
    #[error("I/O error on {}: {source}", .path.display())]
    AttributeIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An attribute file did not contain a decimal integer
    #[error("Parse error in {}: invalid integer {content:?}", .path.display())]
    InvalidAttribute { path: PathBuf, content: String },

    /// Invalid input or arguments
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for ssdfan operations
pub type Result<T> = std::result::Result<T, SsdFanError>;
