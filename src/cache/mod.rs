//! Cache Module
//!
//! In-memory memoization of remote payloads with timestamped entries.

mod entry;
mod stats;
mod store;


// Re-export public types
pub use entry::{current_timestamp_ms, CacheEntry};
pub use stats::CacheStats;
pub use store::CacheStore;

// == Public Constants ==
/// Default time-to-live for cached payloads in seconds
pub const DEFAULT_TTL_SECS: u64 = 5 * 60;
