//! Request DTOs for the dashboard API
//!
//! Query-string parameters of the lap and telemetry endpoints.

use serde::Deserialize;

use crate::telemetry::{OverlayAxis, TelemetryChannel, MAX_OVERLAY_LAPS};

fn validate_session_key(session_key: &str) -> Option<String> {
    if session_key.is_empty() {
        return Some("session_key cannot be empty".to_string());
    }
    if session_key != "latest" && !session_key.chars().all(|c| c.is_ascii_digit()) {
        return Some("session_key must be numeric or 'latest'".to_string());
    }
    None
}

/// Query for GET /api/laps
#[derive(Debug, Clone, Deserialize)]
pub struct LapsQuery {
    /// OpenF1 session key, or `latest`
    pub session_key: String,
    pub driver_number: u32,
}

impl LapsQuery {
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        validate_session_key(&self.session_key)
    }
}

/// Query for GET /api/telemetry
///
/// `laps` is a comma-separated list of lap numbers, e.g. `12,15,31`.
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryQuery {
    pub session_key: String,
    pub driver_number: u32,
    pub laps: String,
    /// When set, the response also carries chart lines for this channel
    #[serde(default)]
    pub channel: Option<TelemetryChannel>,
    #[serde(default)]
    pub axis: Option<OverlayAxis>,
}

impl TelemetryQuery {
    /// Parses `laps`, keeping the first occurrence of each number.
    pub fn lap_numbers(&self) -> Result<Vec<u32>, String> {
        let mut numbers: Vec<u32> = Vec::new();
        for part in self.laps.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let number = part
                .parse::<u32>()
                .map_err(|_| format!("invalid lap number '{part}'"))?;
            if !numbers.contains(&number) {
                numbers.push(number);
            }
        }
        Ok(numbers)
    }

    pub fn validate(&self) -> Option<String> {
        if let Some(error) = validate_session_key(&self.session_key) {
            return Some(error);
        }
        match self.lap_numbers() {
            Err(error) => Some(error),
            Ok(numbers) if numbers.is_empty() => Some("at least one lap is required".to_string()),
            Ok(numbers) if numbers.len() > MAX_OVERLAY_LAPS => {
                Some(format!("at most {MAX_OVERLAY_LAPS} laps can be compared"))
            }
            Ok(_) => None,
        }
    }
}
