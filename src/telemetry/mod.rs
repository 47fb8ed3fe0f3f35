//! Telemetry Module
//!
//! Lap telemetry alignment, historical lookups and multi-lap comparison.

mod align;
mod history;
mod lap;
mod overlay;


pub use align::{align, distance_percent, seconds_since, AlignedSample, RawSample};
pub use history::{car_data_request, laps_request, load_overlay, LoadedOverlay};
pub use lap::{car_data_url, comparable_laps, format_lap_time, laps_url, Lap};
pub use overlay::{
    ChartLine, LapOverlay, LapSeries, OverlayAxis, OverlayError, TelemetryChannel,
    LINE_COLORS, MAX_OVERLAY_LAPS,
};
