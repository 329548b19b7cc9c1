//! Cache Store Module
//!
//! Key-value memoization with timestamped entries. Staleness is judged by the
//! reader; the store never evicts on its own.

use std::collections::HashMap;

use serde_json::Value;

use crate::cache::{CacheEntry, CacheStats};

// == Cache Store ==
/// In-memory mapping from cache key to the last written entry.
#[derive(Debug, Default)]
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
}

impl CacheStore {
    // == Constructor ==
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // == Get ==
    /// Returns the entry for `key`, fresh or not.
    pub fn get(&self, key: &str) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    // == Set ==
    /// Stores `value` under `key`, stamped with the current time.
    ///
    /// Any existing entry for the key is replaced.
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.insert_entry(key, CacheEntry::new(value));
    }

    /// Stores a pre-stamped entry under `key`.
    pub fn insert_entry(&mut self, key: impl Into<String>, entry: CacheEntry) {
        self.entries.insert(key.into(), entry);
    }

    // == Clear ==
    /// Removes all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    // == Stats ==
    /// Returns the entry count and keys.
    pub fn stats(&self) -> CacheStats {
        CacheStats::from_keys(self.entries.keys().cloned())
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
