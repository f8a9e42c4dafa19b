//! Loading configuration into a property store
//!
//! This module contains:
//! - `PropertiesLoader` - Builder layering files, env vars and explicit overrides
//! - `EnvSource` - Trait for environment variable lookup
//! - `Format` - On-disk format of a properties file

mod env;
mod loader;
mod types;

pub use env::EnvironmentHandler;
pub use loader::PropertiesLoader;
pub use types::{DefaultEnvSource, EnvSource, Format};
