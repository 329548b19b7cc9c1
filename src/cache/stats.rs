//! Cache Statistics Module
//!
//! Introspection snapshot of the cache contents.

use serde::Serialize;

// == Cache Stats ==
/// Number of entries and the keys currently held.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Current number of entries in the cache
    pub count: usize,
    /// Keys present, sorted
    pub keys: Vec<String>,
}

impl CacheStats {
    // == Constructor ==
    /// Builds a snapshot from an unordered key iterator.
    pub fn from_keys<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        let mut keys: Vec<String> = keys.into_iter().map(Into::into).collect();
        keys.sort();
        Self {
            count: keys.len(),
            keys,
        }
    }

    /// Returns true if the snapshot holds the given key.
    pub fn contains(&self, key: &str) -> bool {
        self.keys.binary_search_by(|k| k.as_str().cmp(key)).is_ok()
    }
}
