//! Lap Telemetry Aligner
//!
//! Puts the car samples of one lap on a shared axis so laps of different
//! length and sample count can be overlaid.
//!
//! `distance_percent` is the ordinal position of a sample within the lap
//! (`index / (count - 1) * 100`). It is not physical distance: it assumes a
//! roughly constant sampling rate. Overlay consumers rely on exactly this
//! mapping.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// == Raw Sample ==
/// One OpenF1 `car_data` reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSample {
    /// Time of the reading
    pub date: DateTime<Utc>,
    /// km/h
    pub speed: f64,
    pub rpm: f64,
    /// Pedal position, percent
    pub throttle: f64,
    /// 0 or 100 on current cars
    pub brake: f64,
    /// Raw DRS status code
    pub drs: u8,
    #[serde(alias = "n_gear")]
    pub gear: u8,
}

// == Aligned Sample ==
/// A raw sample annotated with its position in the lap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignedSample {
    #[serde(flatten)]
    pub sample: RawSample,
    /// 0 at the first sample, 100 at the last
    pub distance_percent: f64,
    /// Seconds since lap start; negative means the caller passed a sample
    /// from before the lap
    pub time_from_lap_start: f64,
}

/// Ordinal lap position of sample `index` out of `count`.
///
/// A single-sample lap sits at 0.
pub fn distance_percent(index: usize, count: usize) -> f64 {
    if count > 1 {
        index as f64 / (count - 1) as f64 * 100.0
    } else {
        0.0
    }
}

/// Seconds from `start` to `at`, millisecond resolution, sign preserved.
pub fn seconds_since(start: DateTime<Utc>, at: DateTime<Utc>) -> f64 {
    (at - start).num_milliseconds() as f64 / 1000.0
}

// == Align ==
/// Annotates every sample of one lap. Output order and length match the
/// input. Time-window filtering is the caller's job.
pub fn align(samples: Vec<RawSample>, lap_start: DateTime<Utc>) -> Vec<AlignedSample> {
    let count = samples.len();
    samples
        .into_iter()
        .enumerate()
        .map(|(index, sample)| AlignedSample {
            distance_percent: distance_percent(index, count),
            time_from_lap_start: seconds_since(lap_start, sample.date),
            sample,
        })
        .collect()
}

#[cfg(test)]
pub(crate) fn sample_at(start: DateTime<Utc>, offset_ms: i64, speed: f64) -> RawSample {
    RawSample {
        date: start + chrono::Duration::milliseconds(offset_ms),
        speed,
        rpm: 11_000.0,
        throttle: 100.0,
        brake: 0.0,
        drs: 0,
        gear: 7,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn lap_start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 2, 15, 3, 0).unwrap()
    }

    #[test]
    fn test_align_endpoints() {
        let start = lap_start();
        let samples = vec![
            sample_at(start, 0, 280.0),
            sample_at(start, 270, 284.0),
            sample_at(start, 510, 287.0),
            sample_at(start, 800, 290.0),
        ];

        let aligned = align(samples, start);
        let percents: Vec<f64> = aligned.iter().map(|s| s.distance_percent).collect();

        assert_eq!(percents[0], 0.0);
        assert_eq!(percents[3], 100.0);
        assert!((percents[1] - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_sample_is_zero_not_nan() {
        let start = lap_start();
        let aligned = align(vec![sample_at(start, 120, 250.0)], start);

        assert_eq!(aligned.len(), 1);
        assert_eq!(aligned[0].distance_percent, 0.0);
        assert_eq!(aligned[0].time_from_lap_start, 0.12);
    }

    #[test]
    fn test_empty_lap() {
        assert!(align(Vec::new(), lap_start()).is_empty());
    }

    #[test]
    fn test_time_from_lap_start_fractional_seconds() {
        let start = lap_start();
        let aligned = align(vec![sample_at(start, 0, 1.0), sample_at(start, 91_734, 2.0)], start);

        assert_eq!(aligned[0].time_from_lap_start, 0.0);
        assert_eq!(aligned[1].time_from_lap_start, 91.734);
    }

    #[test]
    fn test_sample_before_lap_start_is_passed_through() {
        let start = lap_start();
        let aligned = align(vec![sample_at(start, -250, 1.0), sample_at(start, 500, 2.0)], start);
        assert_eq!(aligned[0].time_from_lap_start, -0.25);
    }

    #[test]
    fn test_raw_sample_from_openf1_json() {
        let json = r#"{
            "brake": 0, "date": "2024-03-02T15:03:00.125000+00:00", "driver_number": 1,
            "drs": 12, "meeting_key": 1229, "n_gear": 8, "rpm": 11141,
            "session_key": 9472, "speed": 315, "throttle": 99
        }"#;
        let sample: RawSample = serde_json::from_str(json).unwrap();

        assert_eq!(sample.gear, 8);
        assert_eq!(sample.drs, 12);
        assert_eq!(sample.speed, 315.0);
        assert_eq!(sample.date, lap_start() + chrono::Duration::milliseconds(125));
    }

    #[test]
    fn test_aligned_sample_serializes_flat() {
        let start = lap_start();
        let aligned = align(vec![sample_at(start, 0, 300.0)], start);
        let value = serde_json::to_value(&aligned[0]).unwrap();

        assert_eq!(value["speed"], 300.0);
        assert_eq!(value["gear"], 7);
        assert_eq!(value["distance_percent"], 0.0);
    }
}
