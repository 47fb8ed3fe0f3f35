//! Lap model and lap-scoped OpenF1 queries.

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// One OpenF1 `laps` record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lap {
    pub lap_number: u32,
    /// Seconds; missing for the first lap and for aborted laps
    #[serde(default)]
    pub lap_duration: Option<f64>,
    #[serde(default)]
    pub date_start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub duration_sector_1: Option<f64>,
    #[serde(default)]
    pub duration_sector_2: Option<f64>,
    #[serde(default)]
    pub duration_sector_3: Option<f64>,
    #[serde(default)]
    pub is_pit_out_lap: Option<bool>,
}

fn positive(value: Option<f64>) -> bool {
    value.is_some_and(|v| v > 0.0)
}

impl Lap {
    /// A lap worth comparing: timed start, full duration, all three sectors,
    /// and not an out-lap from the pits.
    pub fn is_comparable(&self) -> bool {
        self.is_pit_out_lap != Some(true)
            && self.date_start.is_some()
            && positive(self.lap_duration)
            && positive(self.duration_sector_1)
            && positive(self.duration_sector_2)
            && positive(self.duration_sector_3)
    }

    /// `[start, start + lap_duration]`, when both are known.
    pub fn telemetry_window(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let start = self.date_start?;
        let seconds = self.lap_duration?;
        let end = start + Duration::milliseconds((seconds * 1000.0).round() as i64);
        Some((start, end))
    }

    /// Lap time as `m:ss.mmm`.
    pub fn formatted_time(&self) -> Option<String> {
        self.lap_duration.map(format_lap_time)
    }
}

/// Keeps laps that can be overlaid, in their original order.
pub fn comparable_laps(laps: Vec<Lap>) -> Vec<Lap> {
    laps.into_iter().filter(Lap::is_comparable).collect()
}

/// Formats seconds as `m:ss.mmm`, e.g. `92.456` as `1:32.456`.
pub fn format_lap_time(seconds: f64) -> String {
    let minutes = (seconds / 60.0).floor();
    let rest = seconds - minutes * 60.0;
    format!("{}:{:06.3}", minutes as i64, rest)
}

/// OpenF1 laps query for one driver in one session.
pub fn laps_url(base: &str, session_key: &str, driver_number: u32) -> String {
    format!("{base}/laps?session_key={session_key}&driver_number={driver_number}")
}

/// OpenF1 car_data query bounded to the lap's time window.
pub fn car_data_url(base: &str, session_key: &str, driver_number: u32, lap: &Lap) -> Option<String> {
    let (start, end) = lap.telemetry_window()?;
    Some(format!(
        "{base}/car_data?session_key={session_key}&driver_number={driver_number}&date>={}&date<={}",
        start.to_rfc3339_opts(SecondsFormat::Millis, true),
        end.to_rfc3339_opts(SecondsFormat::Millis, true),
    ))
}

#[cfg(test)]
pub(crate) fn timed_lap(lap_number: u32, start: DateTime<Utc>, seconds: f64) -> Lap {
    Lap {
        lap_number,
        lap_duration: Some(seconds),
        date_start: Some(start),
        duration_sector_1: Some(seconds / 3.0),
        duration_sector_2: Some(seconds / 3.0),
        duration_sector_3: Some(seconds / 3.0),
        is_pit_out_lap: Some(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 2, 15, 5, 12).unwrap()
    }

    #[test]
    fn test_format_lap_time() {
        assert_eq!(format_lap_time(92.456), "1:32.456");
        assert_eq!(format_lap_time(61.05), "1:01.050");
        assert_eq!(format_lap_time(59.9), "0:59.900");
    }

    #[test]
    fn test_comparable_filter() {
        let good = timed_lap(5, start(), 95.2);
        let out_lap = Lap {
            is_pit_out_lap: Some(true),
            ..timed_lap(6, start(), 110.0)
        };
        let missing_sector = Lap {
            duration_sector_2: None,
            ..timed_lap(7, start(), 96.0)
        };
        let untimed = Lap {
            lap_duration: None,
            ..timed_lap(1, start(), 0.0)
        };

        let kept = comparable_laps(vec![untimed, good.clone(), out_lap, missing_sector]);
        assert_eq!(kept, vec![good]);
    }

    #[test]
    fn test_telemetry_window() {
        let lap = timed_lap(3, start(), 91.5);
        let (from, to) = lap.telemetry_window().unwrap();
        assert_eq!(from, start());
        assert_eq!(to, start() + Duration::milliseconds(91_500));
    }

    #[test]
    fn test_car_data_url() {
        let lap = timed_lap(3, start(), 91.5);
        let url = car_data_url("https://api.openf1.org/v1", "9472", 1, &lap).unwrap();
        assert_eq!(
            url,
            "https://api.openf1.org/v1/car_data?session_key=9472&driver_number=1\
             &date>=2024-03-02T15:05:12.000Z&date<=2024-03-02T15:06:43.500Z"
        );
    }

    #[test]
    fn test_car_data_url_needs_window() {
        let lap = Lap {
            date_start: None,
            ..timed_lap(1, start(), 90.0)
        };
        assert!(car_data_url("http://x", "1", 1, &lap).is_none());
    }

    #[test]
    fn test_lap_from_openf1_json() {
        let json = r#"{
            "date_start": null, "driver_number": 1, "duration_sector_1": null,
            "duration_sector_2": 39.521, "duration_sector_3": 21.456,
            "is_pit_out_lap": false, "lap_duration": null, "lap_number": 1,
            "meeting_key": 1229, "session_key": 9472
        }"#;
        let lap: Lap = serde_json::from_str(json).unwrap();
        assert_eq!(lap.lap_number, 1);
        assert!(!lap.is_comparable());
    }
}
