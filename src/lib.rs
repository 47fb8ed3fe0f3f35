//! Paddock - Formula 1 dashboard backend
//!
//! Polls OpenF1 live timing through a shared response cache, aligns lap
//! telemetry for overlay charts, and serves standings and the race calendar.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod live;
pub mod models;
pub mod schedule;
pub mod standings;
pub mod tasks;
pub mod telemetry;

pub use api::{create_router, AppState};
pub use cache::ResponseCache;
pub use config::Config;
pub use error::{ApiError, FetchError};
pub use fetch::{Fetch, HttpFetcher};
pub use tasks::{FetchState, PollRequest, PollingCache, Subscription};
