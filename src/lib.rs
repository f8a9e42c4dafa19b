//! # perftest-props
//!
//! Typed, validated settings for the graph ingest performance tests.
//!
//! ## Features
//!
//! - **Typed Accessors**: Batch size, metrics listener and R-MAT generator settings
//!   over a plain `key -> string` store
//! - **Validation on Write**: Setters reject bad values before the store is touched
//! - **Defined Fallbacks**: Missing probabilities use the standard R-MAT quadruple,
//!   a missing include-entities flag reads as `false`
//! - **Layered Loading**: `.properties` or JSON files, env vars and explicit overrides
//!
//! ## Quick Start
//!
//! ```rust
//! use perftest_props::TestProperties;
//!
//! let mut props = TestProperties::new();
//! props.set_batch_size(500)?;
//! props.set_rmat_max_node_id(1_000_000);
//!
//! assert_eq!(props.batch_size()?, 500);
//! // Never set: falls back to the built-in default
//! assert_eq!(props.rmat_probabilities()?, vec![0.57, 0.19, 0.19, 0.05]);
//! # Ok::<(), perftest_props::Error>(())
//! ```
//!
//! ## Loading From Files
//!
//! ```rust,no_run
//! use perftest_props::{PropertiesLoader, PropertiesStorage};
//!
//! let props = PropertiesLoader::new()
//!     .file("ingest.properties")
//!     .optional_file("~/.perftest/local.properties")
//!     .with_env_prefix("PERF")
//!     .load()?;
//!
//! println!("batch size: {}", props.batch_size()?);
//! props.save("effective.properties", &PropertiesStorage::new())?;
//! # Ok::<(), perftest_props::Error>(())
//! ```
//!
//! ## Wrapping an Existing Store
//!
//! Any [`PropertyStore`] works, including a borrowed one:
//!
//! ```rust
//! use perftest_props::{MemoryStore, PropertyStore, TestProperties};
//!
//! let mut store = MemoryStore::new();
//! TestProperties::from_store(&mut store).set_rmat_include_entities(true);
//! assert_eq!(store.get("gaffer.performancetesting.ingest.rmat.includeEntities"), Some("true"));
//! ```

mod constants;
mod error;
mod properties;
pub mod storage;
pub mod store;

pub mod config;

pub use config::{DefaultEnvSource, EnvSource, Format, PropertiesLoader};
pub use constants::{DEFAULT_RMAT_PROBABILITIES, RMAT_PROBABILITY_COUNT, RMAT_SUM_MAX, RMAT_SUM_MIN};
pub use error::{Error, Result};
pub use properties::{TestProperties, double_array_to_string, keys, string_to_double_array};
pub use storage::{JsonStorage, PropertiesStorage, StorageBackend};
pub use store::{MemoryStore, PropertyStore};
