//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::time::Duration;

/// Default OpenF1 live-timing API root
pub const DEFAULT_OPENF1_BASE_URL: &str = "https://api.openf1.org/v1";

/// Default Ergast historical-statistics API root
pub const DEFAULT_ERGAST_BASE_URL: &str = "http://ergast.com/api/f1";

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// OpenF1 API root, without trailing slash
    pub openf1_base_url: String,
    /// Ergast API root, without trailing slash
    pub ergast_base_url: String,
    /// Season used for the session list feed
    pub season_year: i32,
    /// Upstream request timeout in seconds
    pub request_timeout: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `OPENF1_BASE_URL` - OpenF1 API root (default: https://api.openf1.org/v1)
    /// - `ERGAST_BASE_URL` - Ergast API root (default: http://ergast.com/api/f1)
    /// - `SEASON_YEAR` - Season for the session list (default: 2024)
    /// - `REQUEST_TIMEOUT_SECS` - Upstream request timeout (default: 10)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
            openf1_base_url: env::var("OPENF1_BASE_URL")
                .ok()
                .map(|v| v.trim_end_matches('/').to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.openf1_base_url),
            ergast_base_url: env::var("ERGAST_BASE_URL")
                .ok()
                .map(|v| v.trim_end_matches('/').to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.ergast_base_url),
            season_year: env::var("SEASON_YEAR")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.season_year),
            request_timeout: env::var("REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|v| *v > 0)
                .unwrap_or(defaults.request_timeout),
        }
    }

    /// Upstream request timeout as a Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            openf1_base_url: DEFAULT_OPENF1_BASE_URL.to_string(),
            ergast_base_url: DEFAULT_ERGAST_BASE_URL.to_string(),
            season_year: 2024,
            request_timeout: 10,
        }
    }
}
