//! OpenF1 record types for the live feeds.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One `position` record: a driver's classified position at a moment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverPosition {
    pub date: DateTime<Utc>,
    pub driver_number: u32,
    pub meeting_key: u32,
    pub position: u32,
    pub session_key: u32,
}

/// One `weather` record, sampled about once a minute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    /// °C
    pub air_temperature: f64,
    pub date: DateTime<Utc>,
    /// Percent
    pub humidity: f64,
    pub meeting_key: u32,
    /// hPa
    pub pressure: f64,
    pub rainfall: f64,
    pub session_key: u32,
    /// °C
    pub track_temperature: f64,
    /// Degrees
    pub wind_direction: f64,
    /// m/s
    pub wind_speed: f64,
}

/// One `race_control` message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceControlMessage {
    pub category: String,
    pub date: DateTime<Utc>,
    pub message: String,
    #[serde(default)]
    pub driver_number: Option<u32>,
    #[serde(default)]
    pub flag: Option<String>,
    #[serde(default)]
    pub lap_number: Option<u32>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub sector: Option<u32>,
    pub session_key: u32,
}

/// One `sessions` record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub session_key: u32,
    pub session_name: String,
    pub session_type: String,
    pub meeting_key: u32,
    #[serde(default)]
    pub country_name: Option<String>,
    #[serde(default)]
    pub circuit_short_name: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub date_start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub date_end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub year: Option<i32>,
}

impl SessionInfo {
    /// "Country - Session", as shown in session pickers.
    pub fn label(&self) -> String {
        match &self.country_name {
            Some(country) => format!("{country} - {}", self.session_name),
            None => self.session_name.clone(),
        }
    }
}
