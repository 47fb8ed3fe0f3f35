//! Cache Store Module
//!
//! Process-wide response cache shared by every poll subscription and handler.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::time::Duration;
use tracing::{debug, warn};

use crate::cache::{CacheEntry, CacheStats};

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<String, CacheEntry>,
    stats: CacheStats,
}

// == Response Cache ==
/// Shared `cache_key -> CacheEntry` map.
///
/// Cloning is cheap and every clone sees the same entries. The key is the only
/// identity: two URLs stored under one key overwrite each other. The lock is
/// never held across an await point; concurrent writers to the same key are
/// last-write-wins.
#[derive(Debug, Clone, Default)]
pub struct ResponseCache {
    state: Arc<Mutex<CacheState>>,
}

impl ResponseCache {
    // == Constructor ==
    /// Creates a new, empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // == Get Fresh ==
    /// Returns the value under `key` if it is younger than `max_age` and was
    /// stored as `T`. Records a hit or a miss.
    pub fn get_fresh<T>(&self, key: &str, max_age: Duration) -> Option<T>
    where
        T: Clone + 'static,
    {
        let mut state = self.lock();
        let found = match state.entries.get(key) {
            Some(entry) if entry.is_fresh(max_age) => {
                let value = entry.downcast::<T>();
                if value.is_none() {
                    warn!(key, "cached value has a different type, treating as miss");
                }
                value
            }
            _ => None,
        };

        if found.is_some() {
            debug!(key, "cache hit");
            state.stats.record_hit();
        } else {
            debug!(key, "cache miss");
            state.stats.record_miss();
        }
        found
    }

    // == Get Stale ==
    /// Returns the value under `key` regardless of age. Does not touch stats.
    pub fn get_stale<T>(&self, key: &str) -> Option<T>
    where
        T: Clone + 'static,
    {
        self.lock().entries.get(key).and_then(CacheEntry::downcast::<T>)
    }

    // == Insert ==
    /// Stores `value` under `key`, overwriting any previous entry.
    pub fn insert<T>(&self, key: impl Into<String>, value: T)
    where
        T: Send + Sync + 'static,
    {
        let mut state = self.lock();
        state.entries.insert(key.into(), CacheEntry::new(value));
        state.stats.record_write();
        let len = state.entries.len();
        state.stats.set_total_entries(len);
    }

    // == Entry ==
    /// Returns a clone of the raw entry under `key`, if any.
    pub fn entry(&self, key: &str) -> Option<CacheEntry> {
        self.lock().entries.get(key).cloned()
    }

    // == Clear ==
    /// Drops every entry and resets statistics.
    pub fn clear(&self) {
        let mut state = self.lock();
        state.entries.clear();
        state.stats = CacheStats::new();
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let state = self.lock();
        let mut stats = state.stats.clone();
        stats.set_total_entries(state.entries.len());
        stats
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    const FIVE_SECONDS: Duration = Duration::from_millis(5000);

    #[test]
    fn test_store_new() {
        let cache = ResponseCache::new();
        assert_eq!(cache.len(), 0);
        assert!(cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_insert_and_get_fresh() {
        let cache = ResponseCache::new();
        cache.insert("weather", vec![21.5f64]);

        assert_eq!(cache.get_fresh::<Vec<f64>>("weather", FIVE_SECONDS), Some(vec![21.5]));
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_fresh_expires() {
        let cache = ResponseCache::new();
        cache.insert("positions", 1u32);

        tokio::time::advance(Duration::from_millis(1000)).await;
        assert_eq!(cache.get_fresh::<u32>("positions", FIVE_SECONDS), Some(1));

        tokio::time::advance(Duration::from_millis(5000)).await;
        assert_eq!(cache.get_fresh::<u32>("positions", FIVE_SECONDS), None);

        // Stale data is still there for callers that want it
        assert_eq!(cache.get_stale::<u32>("positions"), Some(1));
    }

    #[test]
    fn test_get_missing_key() {
        let cache = ResponseCache::new();
        assert!(cache.get_fresh::<u32>("nope", FIVE_SECONDS).is_none());
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn test_type_mismatch_is_a_miss() {
        let cache = ResponseCache::new();
        cache.insert("shared", "text".to_string());
        assert!(cache.get_fresh::<u32>("shared", FIVE_SECONDS).is_none());
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn test_overwrite() {
        let cache = ResponseCache::new();
        cache.insert("k", 1u32);
        cache.insert("k", 2u32);

        assert_eq!(cache.get_fresh::<u32>("k", FIVE_SECONDS), Some(2));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.stats().writes, 2);
    }

    #[test]
    fn test_clones_share_entries() {
        let cache = ResponseCache::new();
        let other = cache.clone();
        other.insert("k", 9u8);
        assert_eq!(cache.get_fresh::<u8>("k", FIVE_SECONDS), Some(9));
    }

    #[test]
    fn test_clear_resets_entries_and_stats() {
        let cache = ResponseCache::new();
        cache.insert("a", 1u8);
        let _ = cache.get_fresh::<u8>("a", FIVE_SECONDS);
        cache.clear();

        assert!(cache.is_empty());
        let stats = cache.stats();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.writes, 0);
    }

    #[test]
    fn test_stats() {
        let cache = ResponseCache::new();
        cache.insert("a", 1u8);
        let _ = cache.get_fresh::<u8>("a", FIVE_SECONDS); // hit
        let _ = cache.get_fresh::<u8>("b", FIVE_SECONDS); // miss

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.writes, 1);
        assert_eq!(stats.total_entries, 1);
    }
}
