//! Layered loading of test properties
//!
//! Sources are applied lowest to highest priority:
//! files (in the order added), environment variables, explicit overrides.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use log::{debug, info};

use crate::config::env::EnvironmentHandler;
use crate::config::{DefaultEnvSource, EnvSource, Format};
use crate::error::Result;
use crate::properties::TestProperties;
use crate::store::{MemoryStore, PropertyStore};

struct FileSource {
    path: PathBuf,
    format: Option<Format>,
    required: bool,
}

/// Builder that assembles a [`TestProperties`] from files, env vars and overrides
///
/// # Example
/// ```rust,no_run
/// use perftest_props::PropertiesLoader;
///
/// let props = PropertiesLoader::new()
///     .file("~/.config/perftest/ingest.properties")
///     .with_env_prefix("PERF")
///     .set("gaffer.performancetesting.ingest.batchSize", "1000")
///     .load()?;
///
/// assert_eq!(props.batch_size()?, 1000);
/// # Ok::<(), perftest_props::Error>(())
/// ```
pub struct PropertiesLoader {
    files: Vec<FileSource>,
    env_prefix: Option<String>,
    env_source: Arc<dyn EnvSource>,
    overrides: Vec<(String, String)>,
}

impl fmt::Debug for PropertiesLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertiesLoader")
            .field(
                "files",
                &self.files.iter().map(|s| &s.path).collect::<Vec<_>>(),
            )
            .field("env_prefix", &self.env_prefix)
            .field("overrides", &self.overrides)
            .finish_non_exhaustive()
    }
}

impl Default for PropertiesLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl PropertiesLoader {
    /// Create a loader with no sources
    #[must_use]
    pub fn new() -> Self {
        Self {
            files: Vec::new(),
            env_prefix: None,
            env_source: Arc::new(DefaultEnvSource),
            overrides: Vec::new(),
        }
    }

    /// Add a required file; its format is inferred from the extension
    ///
    /// Supports `~` expansion for home directory.
    #[must_use]
    pub fn file(self, path: impl Into<PathBuf>) -> Self {
        self.push_file(path.into(), None, true)
    }

    /// Add a file that is skipped if it does not exist
    #[must_use]
    pub fn optional_file(self, path: impl Into<PathBuf>) -> Self {
        self.push_file(path.into(), None, false)
    }

    /// Add a required file with an explicit format
    #[must_use]
    pub fn file_with_format(self, path: impl Into<PathBuf>, format: Format) -> Self {
        self.push_file(path.into(), Some(format), true)
    }

    /// Enable environment variable overrides
    ///
    /// `PERF_GAFFER_PERFORMANCETESTING_INGEST_BATCHSIZE=500` overrides
    /// `gaffer.performancetesting.ingest.batchSize` when the prefix is `PERF`.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    /// Replace the environment variable source (defaults to the process env)
    #[must_use]
    pub fn with_env_source(mut self, source: Arc<dyn EnvSource>) -> Self {
        self.env_source = source;
        self
    }

    /// Set a raw value with the highest priority, as a command line flag would
    #[must_use]
    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.overrides.push((key.into(), value.into()));
        self
    }

    /// Read every source and build the properties
    ///
    /// # Errors
    ///
    /// Returns an error if a required file is missing or any file fails to parse.
    pub fn load(self) -> Result<TestProperties<MemoryStore>> {
        let mut store = MemoryStore::new();

        for source in &self.files {
            if !source.required && !source.path.exists() {
                debug!("Skipping missing optional file {}", source.path.display());
                continue;
            }
            let format = source
                .format
                .unwrap_or_else(|| Format::from_path(&source.path));
            store.merge(format.read(&source.path)?);
        }

        let env = EnvironmentHandler::new(self.env_prefix, self.env_source);
        let from_env = env.apply(&mut store);

        for (key, value) in self.overrides {
            store.set(&key, value);
        }

        info!(
            "Loaded {} test properties ({} from environment)",
            store.len(),
            from_env
        );
        Ok(TestProperties::from_store(store))
    }

    fn push_file(mut self, path: PathBuf, format: Option<Format>, required: bool) -> Self {
        self.files.push(FileSource {
            path: expand_home(path),
            format,
            required,
        });
        self
    }
}

fn expand_home(path: PathBuf) -> PathBuf {
    if !path.starts_with("~") {
        return path;
    }
    match dirs::home_dir() {
        Some(home) => home.join(path.strip_prefix("~").unwrap_or(&path)),
        None => path,
    }
}
