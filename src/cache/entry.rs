//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with a write timestamp.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde_json::Value;

// == Cache Entry ==
/// A cached payload and the moment it was written.
///
/// Entries are never mutated; a refresh replaces the whole entry.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    /// The stored payload
    pub value: Value,
    /// Write timestamp (Unix milliseconds)
    pub stored_at: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry stamped with the current time.
    pub fn new(value: Value) -> Self {
        Self::stamped(value, current_timestamp_ms())
    }

    /// Creates an entry with an explicit write timestamp.
    pub fn stamped(value: Value, stored_at: u64) -> Self {
        Self { value, stored_at }
    }

    // == Age ==
    /// Milliseconds elapsed since the entry was written.
    pub fn age_ms(&self) -> u64 {
        current_timestamp_ms().saturating_sub(self.stored_at)
    }

    // == Is Fresh ==
    /// Checks the entry against a time-to-live.
    ///
    /// Boundary condition: an entry whose age equals the TTL is already stale.
    pub fn is_fresh(&self, ttl: Duration) -> bool {
        u128::from(self.age_ms()) < ttl.as_millis()
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::thread::sleep;

    #[test]
    fn test_entry_creation() {
        let entry = CacheEntry::new(json!({"status": "active"}));

        assert_eq!(entry.value["status"], "active");
        assert!(entry.age_ms() < 1_000);
        assert!(entry.is_fresh(Duration::from_secs(300)));
    }

    #[test]
    fn test_entry_goes_stale() {
        let entry = CacheEntry::new(json!(1));

        sleep(Duration::from_millis(60));

        assert!(!entry.is_fresh(Duration::from_millis(50)));
        assert!(entry.is_fresh(Duration::from_secs(60)));
    }

    #[test]
    fn test_backdated_entry_is_stale() {
        let six_minutes_ago = current_timestamp_ms() - 6 * 60 * 1000;
        let entry = CacheEntry::stamped(json!("old"), six_minutes_ago);

        assert!(entry.age_ms() >= 6 * 60 * 1000);
        assert!(!entry.is_fresh(Duration::from_secs(300)));
    }

    #[test]
    fn test_freshness_boundary_condition() {
        let entry = CacheEntry::new(json!(null));

        // Zero TTL: age 0 is not < 0
        assert!(!entry.is_fresh(Duration::ZERO));
    }

    #[test]
    fn test_future_timestamp_saturates() {
        let entry = CacheEntry::stamped(json!(null), current_timestamp_ms() + 60_000);
        assert_eq!(entry.age_ms(), 0);
    }
}
