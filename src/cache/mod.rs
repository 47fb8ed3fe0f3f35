//! Cache Module
//!
//! Provides the shared in-memory response cache with freshness checks.

mod entry;
mod stats;
mod store;


// Re-export public types
pub use entry::{CacheEntry, CachedValue};
pub use stats::CacheStats;
pub use store::ResponseCache;
