//! Environment variable overrides
//!
//! Helper struct to encapsulate logic for overriding properties via env vars.

use crate::config::EnvSource;
use crate::properties::keys;
use crate::store::PropertyStore;
use log::debug;
use std::sync::Arc;

/// Handles environment variable lookups for the known property keys
pub struct EnvironmentHandler {
    prefix: Option<String>,
    source: Arc<dyn EnvSource>,
}

impl EnvironmentHandler {
    pub fn new(prefix: Option<String>, source: Arc<dyn EnvSource>) -> Self {
        Self { prefix, source }
    }

    /// Get the environment variable name for a property key
    ///
    /// Returns None if env var overrides are disabled.
    /// Format: {PREFIX}_{KEY} (all uppercase, dots become underscores)
    pub fn get_env_var_name(&self, key: &str) -> Option<String> {
        self.prefix.as_ref().map(|prefix| {
            let env_key = key.replace('.', "_").to_uppercase();
            format!("{}_{}", prefix.to_uppercase(), env_key)
        })
    }

    /// Raw override text for `key`, if the variable is set
    pub fn get_env_override(&self, key: &str) -> Option<String> {
        let env_var_name = self.get_env_var_name(key)?;
        self.source.var(&env_var_name).ok()
    }

    /// Write every available override into `store`, returning how many applied
    ///
    /// Values are stored verbatim; they are validated only when read.
    pub fn apply<S: PropertyStore + ?Sized>(&self, store: &mut S) -> usize {
        let mut applied = 0;
        for key in keys::ALL {
            if let Some(value) = self.get_env_override(key) {
                debug!("Environment override for {key}");
                store.set(key, value);
                applied += 1;
            }
        }
        applied
    }
}
