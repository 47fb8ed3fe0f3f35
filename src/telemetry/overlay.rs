//! Multi-lap overlay
//!
//! Holds the aligned telemetry of up to [`MAX_OVERLAY_LAPS`] laps and turns
//! it into chart series on a shared x axis.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::align::AlignedSample;
use super::lap::Lap;

/// Laps that can be compared at once.
pub const MAX_OVERLAY_LAPS: usize = 5;

/// Line colour per overlay slot.
pub const LINE_COLORS: [&str; MAX_OVERLAY_LAPS] =
    ["#ef4444", "#3b82f6", "#22c55e", "#f59e0b", "#8b5cf6"];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OverlayError {
    #[error("at most 5 laps can be compared")]
    Full,

    #[error("lap {0} is already selected")]
    Duplicate(u32),
}

// == Telemetry Channel ==
/// Which sensor value a chart plots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TelemetryChannel {
    #[default]
    Speed,
    Rpm,
    Throttle,
    Brake,
    Gear,
    Drs,
}

impl TelemetryChannel {
    pub fn value_of(self, sample: &AlignedSample) -> f64 {
        let raw = &sample.sample;
        match self {
            TelemetryChannel::Speed => raw.speed,
            TelemetryChannel::Rpm => raw.rpm,
            TelemetryChannel::Throttle => raw.throttle,
            TelemetryChannel::Brake => raw.brake,
            TelemetryChannel::Gear => f64::from(raw.gear),
            TelemetryChannel::Drs => f64::from(raw.drs),
        }
    }
}

impl FromStr for TelemetryChannel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "speed" => Ok(Self::Speed),
            "rpm" => Ok(Self::Rpm),
            "throttle" => Ok(Self::Throttle),
            "brake" => Ok(Self::Brake),
            "gear" => Ok(Self::Gear),
            "drs" => Ok(Self::Drs),
            other => Err(format!("unknown telemetry channel '{other}'")),
        }
    }
}

/// Shared x axis of an overlay chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlayAxis {
    /// Lap progress, 0–100
    #[default]
    Distance,
    /// Seconds since lap start
    Time,
}

impl OverlayAxis {
    pub fn value_of(self, sample: &AlignedSample) -> f64 {
        match self {
            OverlayAxis::Distance => sample.distance_percent,
            OverlayAxis::Time => sample.time_from_lap_start,
        }
    }
}

// == Lap Series ==
/// Aligned telemetry of one selected lap.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LapSeries {
    pub lap_number: u32,
    pub lap_time: Option<String>,
    pub color: &'static str,
    pub samples: Vec<AlignedSample>,
}

/// One plotted line: `[x, y]` points for a lap.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartLine {
    pub lap_number: u32,
    pub color: &'static str,
    pub points: Vec<[f64; 2]>,
}

// == Lap Overlay ==
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LapOverlay {
    series: Vec<LapSeries>,
}

impl LapOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a lap in the next free slot.
    pub fn add(&mut self, lap: &Lap, samples: Vec<AlignedSample>) -> Result<(), OverlayError> {
        if self.contains(lap.lap_number) {
            return Err(OverlayError::Duplicate(lap.lap_number));
        }
        if self.series.len() >= MAX_OVERLAY_LAPS {
            return Err(OverlayError::Full);
        }
        self.series.push(LapSeries {
            lap_number: lap.lap_number,
            lap_time: lap.formatted_time(),
            color: LINE_COLORS[self.series.len()],
            samples,
        });
        Ok(())
    }

    /// Removes a lap; remaining laps shift down and take their slot's colour.
    pub fn remove(&mut self, lap_number: u32) -> bool {
        let before = self.series.len();
        self.series.retain(|s| s.lap_number != lap_number);
        for (slot, series) in self.series.iter_mut().enumerate() {
            series.color = LINE_COLORS[slot];
        }
        self.series.len() != before
    }

    pub fn contains(&self, lap_number: u32) -> bool {
        self.series.iter().any(|s| s.lap_number == lap_number)
    }

    pub fn series(&self) -> &[LapSeries] {
        &self.series
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Chart lines for `channel` against `axis`.
    pub fn chart(&self, channel: TelemetryChannel, axis: OverlayAxis) -> Vec<ChartLine> {
        self.series
            .iter()
            .map(|series| ChartLine {
                lap_number: series.lap_number,
                color: series.color,
                points: series
                    .samples
                    .iter()
                    .map(|s| [axis.value_of(s), channel.value_of(s)])
                    .collect(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::align::{align, sample_at};
    use crate::telemetry::lap::timed_lap;
    use chrono::{TimeZone, Utc};

    fn aligned(speeds: &[f64]) -> Vec<AlignedSample> {
        let start = Utc.with_ymd_and_hms(2024, 5, 26, 13, 10, 0).unwrap();
        let raw = speeds
            .iter()
            .enumerate()
            .map(|(i, s)| sample_at(start, i as i64 * 250, *s))
            .collect();
        align(raw, start)
    }

    fn lap(n: u32) -> Lap {
        let start = Utc.with_ymd_and_hms(2024, 5, 26, 13, 10, 0).unwrap();
        timed_lap(n, start, 74.165)
    }

    #[test]
    fn test_add_assigns_slot_colors() {
        let mut overlay = LapOverlay::new();
        overlay.add(&lap(10), aligned(&[200.0])).unwrap();
        overlay.add(&lap(12), aligned(&[210.0])).unwrap();

        assert_eq!(overlay.series()[0].color, LINE_COLORS[0]);
        assert_eq!(overlay.series()[1].color, LINE_COLORS[1]);
        assert_eq!(overlay.series()[0].lap_time.as_deref(), Some("1:14.165"));
    }

    #[test]
    fn test_bounded_to_five_laps() {
        let mut overlay = LapOverlay::new();
        for n in 1..=5 {
            overlay.add(&lap(n), aligned(&[1.0])).unwrap();
        }
        assert_eq!(overlay.add(&lap(6), aligned(&[1.0])), Err(OverlayError::Full));
        assert_eq!(overlay.len(), MAX_OVERLAY_LAPS);
    }

    #[test]
    fn test_rejects_duplicate_lap() {
        let mut overlay = LapOverlay::new();
        overlay.add(&lap(3), aligned(&[1.0])).unwrap();
        assert_eq!(overlay.add(&lap(3), aligned(&[2.0])), Err(OverlayError::Duplicate(3)));
    }

    #[test]
    fn test_remove_recolors() {
        let mut overlay = LapOverlay::new();
        for n in [4, 8, 15] {
            overlay.add(&lap(n), aligned(&[1.0])).unwrap();
        }

        assert!(overlay.remove(4));
        assert!(!overlay.remove(99));
        assert_eq!(overlay.series()[0].lap_number, 8);
        assert_eq!(overlay.series()[0].color, LINE_COLORS[0]);
        assert_eq!(overlay.series()[1].color, LINE_COLORS[1]);
    }

    #[test]
    fn test_chart_points() {
        let mut overlay = LapOverlay::new();
        overlay.add(&lap(1), aligned(&[100.0, 150.0, 200.0])).unwrap();

        let lines = overlay.chart(TelemetryChannel::Speed, OverlayAxis::Distance);
        assert_eq!(lines[0].points, vec![[0.0, 100.0], [50.0, 150.0], [100.0, 200.0]]);

        let lines = overlay.chart(TelemetryChannel::Gear, OverlayAxis::Time);
        assert_eq!(lines[0].points[2], [0.5, 7.0]);
    }

    #[test]
    fn test_channel_parse() {
        assert_eq!("RPM".parse::<TelemetryChannel>(), Ok(TelemetryChannel::Rpm));
        assert!("tyre".parse::<TelemetryChannel>().is_err());
    }
}
