//! Property store trait and the in-memory implementation
//!
//! A property store is a plain `key -> string` mapping. It knows nothing about
//! the typed settings layered on top of it; see [`TestProperties`](crate::TestProperties).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Trait for string-keyed property stores
///
/// Implement this to back [`TestProperties`](crate::TestProperties) with your
/// own configuration source.
pub trait PropertyStore {
    /// Get the raw value for `key`, or `None` if it was never set
    fn get(&self, key: &str) -> Option<&str>;

    /// Insert or overwrite the raw value for `key`
    fn set(&mut self, key: &str, value: String);

    /// Remove `key`, returning the previous value if there was one
    fn remove(&mut self, key: &str) -> Option<String>;

    /// All keys currently present
    fn keys(&self) -> Vec<String>;

    /// Number of entries in the store
    fn len(&self) -> usize {
        self.keys().len()
    }

    /// Check if the store holds no entries
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<S: PropertyStore + ?Sized> PropertyStore for &mut S {
    fn get(&self, key: &str) -> Option<&str> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: String) {
        (**self).set(key, value);
    }

    fn remove(&mut self, key: &str) -> Option<String> {
        (**self).remove(key)
    }

    fn keys(&self) -> Vec<String> {
        (**self).keys()
    }

    fn len(&self) -> usize {
        (**self).len()
    }
}

// =============================================================================
// In-memory Store
// =============================================================================

/// Ordered in-memory property store (default)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Iterate over entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Copy every entry of `other` into this store, overwriting existing keys
    pub fn merge(&mut self, other: MemoryStore) {
        self.entries.extend(other.entries);
    }
}

impl PropertyStore for MemoryStore {
    fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    fn set(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_owned(), value);
    }

    fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.remove(key)
    }

    fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MemoryStore {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
