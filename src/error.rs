//! Error types for perftest-props

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for perftest-props operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for perftest-props
#[derive(Error, Debug)]
pub enum Error {
    // -------------------------------------------------------------------------
    // Accessor Errors
    // -------------------------------------------------------------------------
    /// A caller-supplied value violates a documented constraint.
    ///
    /// Raised before the store is touched, so a failed setter never leaves a
    /// partial write behind.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A stored value is missing or cannot be parsed into the expected type.
    #[error("Malformed value for {key}: {reason}")]
    MalformedValue {
        key: String,
        value: Option<String>,
        reason: String,
    },

    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("Failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create directory '{path}': {source}")]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Failed to serialize data: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to parse properties: {0}")]
    Parse(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Build a `MalformedValue` for `key` holding the raw stored text
    pub(crate) fn malformed(
        key: impl Into<String>,
        value: Option<&str>,
        reason: impl Into<String>,
    ) -> Self {
        Error::MalformedValue {
            key: key.into(),
            value: value.map(str::to_owned),
            reason: reason.into(),
        }
    }

    /// Check if this error was raised by a setter rejecting its input
    #[must_use]
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Error::InvalidArgument(_))
    }

    /// Check if this error was raised by a getter failing to parse stored text
    #[must_use]
    pub fn is_malformed_value(&self) -> bool {
        matches!(self, Error::MalformedValue { .. })
    }

    /// Check if this is a filesystem error
    #[must_use]
    pub fn is_io_error(&self) -> bool {
        matches!(
            self,
            Error::FileRead { .. } | Error::FileWrite { .. } | Error::DirectoryCreate { .. }
        )
    }
}
