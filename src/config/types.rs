//! Core configuration types

use std::path::Path;

use crate::error::Result;
use crate::storage::{JsonStorage, PropertiesStorage, StorageBackend};
use crate::store::MemoryStore;

/// Source of environment variables
///
/// Abstracted so tests can inject variables without touching the process
/// environment.
pub trait EnvSource: Send + Sync {
    /// Look up a variable by name
    ///
    /// # Errors
    ///
    /// Returns an error if the variable is unset or not valid unicode.
    fn var(&self, key: &str) -> std::result::Result<String, std::env::VarError>;
}

/// Reads from the real process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultEnvSource;

impl EnvSource for DefaultEnvSource {
    fn var(&self, key: &str) -> std::result::Result<String, std::env::VarError> {
        std::env::var(key)
    }
}

/// On-disk format of a properties file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// `key=value` lines
    #[default]
    Properties,
    /// Flat JSON object of strings
    Json,
}

impl Format {
    /// Guess the format from a file extension; anything but `.json` is `Properties`
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Format::Json,
            _ => Format::Properties,
        }
    }

    /// Read a file in this format
    pub(crate) fn read(self, path: &Path) -> Result<MemoryStore> {
        match self {
            Format::Properties => PropertiesStorage::new().read(path),
            Format::Json => JsonStorage::new().read(path),
        }
    }
}
