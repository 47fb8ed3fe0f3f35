//! Response DTOs for the dashboard API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStats;
use crate::tasks::FetchState;
use crate::telemetry::{ChartLine, Lap, LapSeries};

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Lookups served from a fresh entry
    pub hits: u64,
    /// Lookups that had to go upstream
    pub misses: u64,
    /// Successful fetches stored
    pub writes: u64,
    /// Current number of entries in cache
    pub total_entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            writes: stats.writes,
            total_entries: stats.total_entries,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Snapshot of a live feed: `data` is null while loading, after a failure,
/// or when upstream had nothing to show.
#[derive(Debug, Clone, Serialize)]
pub struct FeedResponse<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> From<FetchState<T>> for FeedResponse<T> {
    fn from(state: FetchState<T>) -> Self {
        Self {
            data: state.value,
            loading: state.loading,
            error: state.error.map(|e| e.to_string()),
        }
    }
}

/// A lap with its display time.
#[derive(Debug, Clone, Serialize)]
pub struct LapSummary {
    #[serde(flatten)]
    pub lap: Lap,
    pub lap_time: Option<String>,
}

impl From<Lap> for LapSummary {
    fn from(lap: Lap) -> Self {
        Self {
            lap_time: lap.formatted_time(),
            lap,
        }
    }
}

/// Response body for GET /api/telemetry
#[derive(Debug, Clone, Serialize)]
pub struct TelemetryResponse {
    pub session_key: String,
    pub driver_number: u32,
    pub laps: Vec<LapSeries>,
    /// Requested lap numbers that had no usable telemetry
    pub missing: Vec<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart: Option<Vec<ChartLine>>,
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
