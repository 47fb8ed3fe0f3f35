//! Cache Entry Module
//!
//! Defines the structure for individual cached responses with freshness tracking.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::time::{Duration, Instant};

/// Type-erased cached value. Each cache key holds whatever its fetcher produced.
pub type CachedValue = Arc<dyn Any + Send + Sync>;

// == Cache Entry ==
/// A single cached response with the time it was stored.
#[derive(Clone)]
pub struct CacheEntry {
    /// The stored value
    pub value: CachedValue,
    /// Monotonic store time, used for freshness checks
    pub stored_at: Instant,
    /// Wall-clock store time, for reporting
    pub stored_at_utc: DateTime<Utc>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry stamped with the current time.
    pub fn new<T: Send + Sync + 'static>(value: T) -> Self {
        Self {
            value: Arc::new(value),
            stored_at: Instant::now(),
            stored_at_utc: Utc::now(),
        }
    }

    // == Age ==
    /// Time elapsed since the entry was stored.
    pub fn age(&self) -> Duration {
        Instant::now().saturating_duration_since(self.stored_at)
    }

    // == Is Fresh ==
    /// Checks whether the entry is younger than `max_age`.
    ///
    /// Boundary condition: an entry whose age equals `max_age` is stale, so a
    /// zero `max_age` never serves from cache.
    pub fn is_fresh(&self, max_age: Duration) -> bool {
        self.age() < max_age
    }

    // == Downcast ==
    /// Returns a clone of the value if it was stored as `T`.
    pub fn downcast<T: Clone + 'static>(&self) -> Option<T> {
        self.value.downcast_ref::<T>().cloned()
    }
}

impl fmt::Debug for CacheEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheEntry")
            .field("stored_at", &self.stored_at)
            .field("stored_at_utc", &self.stored_at_utc)
            .finish_non_exhaustive()
    }
}
