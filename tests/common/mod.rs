//! Common test utilities for perftest-props integration tests
//!
//! Provides a temp-dir fixture, an in-memory env source and file helpers.

#![allow(dead_code)]

use perftest_props::EnvSource;
use std::collections::HashMap;
use std::env::VarError;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

// =============================================================================
// Env Source Double
// =============================================================================

/// Env source backed by a fixed map
#[derive(Default)]
pub struct MapEnv {
    vars: HashMap<String, String>,
}

impl MapEnv {
    pub fn with(vars: &[(&str, &str)]) -> Arc<Self> {
        Arc::new(Self {
            vars: vars
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        })
    }
}

impl EnvSource for MapEnv {
    fn var(&self, key: &str) -> Result<String, VarError> {
        self.vars.get(key).cloned().ok_or(VarError::NotPresent)
    }
}

// =============================================================================
// Test Fixture
// =============================================================================

/// Owns a temporary directory for config files
pub struct TestFixture {
    pub temp_dir: TempDir,
}

impl TestFixture {
    pub fn new() -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        Self {
            temp_dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }

    /// Write `contents` to `name` inside the temp dir and return its path
    pub fn write_file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.path(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        std::fs::write(&path, contents).expect("Failed to write test file");
        path
    }

    pub fn read_file(&self, name: &str) -> String {
        std::fs::read_to_string(self.path(name)).expect("Failed to read test file")
    }
}

/// A properties file setting every key
pub const FULL_PROPERTIES: &str = "\
# ingest performance test
gaffer.performancetesting.ingest.metricsListener=uk.example.LoggingListener
gaffer.performancetesting.ingest.batchSize=500
gaffer.performancetesting.ingest.rmat.probabilities=0.25,0.25,0.25,0.25
gaffer.performancetesting.ingest.rmat.includeEntities=true
gaffer.performancetesting.ingest.rmat.maxNodeId=1000000
";
