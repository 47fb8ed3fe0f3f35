//! Historical lap and car data lookups for one driver in one session.
//!
//! Finished sessions do not change, so results are cached for an hour and
//! never polled. The `latest` session is still running, so its laps and car
//! data are only reused for as long as a live feed would be.

use tokio::time::Duration;
use tracing::{debug, warn};

use super::align::{align, AlignedSample, RawSample};
use super::lap::{car_data_url, comparable_laps, laps_url, Lap};
use super::overlay::LapOverlay;
use crate::error::FetchError;
use crate::tasks::{PollRequest, PollingCache};

const HISTORY_CACHE: Duration = Duration::from_secs(60 * 60);
const LATEST_SESSION_CACHE: Duration = Duration::from_secs(10);

fn cache_duration(session_key: &str) -> Duration {
    if session_key == "latest" {
        LATEST_SESSION_CACHE
    } else {
        HISTORY_CACHE
    }
}

/// Comparable laps of `driver_number` in `session_key`.
pub fn laps_request(base: &str, session_key: &str, driver_number: u32) -> PollRequest<Vec<Lap>, Vec<Lap>> {
    PollRequest::new(
        laps_url(base, session_key, driver_number),
        format!("laps_{session_key}_{driver_number}"),
        cache_duration(session_key),
        cache_duration(session_key),
    )
    .with_transform(comparable_laps)
}

/// Aligned car data of one lap. `None` when the lap has no time window.
pub fn car_data_request(
    base: &str,
    session_key: &str,
    driver_number: u32,
    lap: &Lap,
) -> Option<PollRequest<Vec<RawSample>, Vec<AlignedSample>>> {
    let url = car_data_url(base, session_key, driver_number, lap)?;
    let lap_start = lap.date_start?;
    Some(
        PollRequest::new(
            url,
            format!("car_data_{session_key}_{driver_number}_{}", lap.lap_number),
            cache_duration(session_key),
            cache_duration(session_key),
        )
        .with_transform(move |samples: Vec<RawSample>| align(samples, lap_start)),
    )
}

/// An overlay plus the requested laps that could not be shown.
#[derive(Debug, Clone, Default)]
pub struct LoadedOverlay {
    pub overlay: LapOverlay,
    pub missing: Vec<u32>,
}

/// Builds an overlay of `lap_numbers`, in request order.
///
/// A lap is reported missing when it is not a comparable lap of the session
/// or upstream has no car data for it.
pub async fn load_overlay(
    poller: &PollingCache,
    base: &str,
    session_key: &str,
    driver_number: u32,
    lap_numbers: &[u32],
) -> Result<LoadedOverlay, FetchError> {
    let laps = poller
        .fetch_once(&laps_request(base, session_key, driver_number))
        .await?
        .unwrap_or_default();

    let mut loaded = LoadedOverlay::default();
    for &number in lap_numbers {
        let Some(lap) = laps.iter().find(|l| l.lap_number == number) else {
            loaded.missing.push(number);
            continue;
        };
        let Some(request) = car_data_request(base, session_key, driver_number, lap) else {
            loaded.missing.push(number);
            continue;
        };

        match poller.fetch_once(&request).await? {
            Some(samples) => {
                debug!(lap = number, samples = samples.len(), "lap telemetry loaded");
                if let Err(err) = loaded.overlay.add(lap, samples) {
                    warn!(lap = number, error = %err, "lap not added to overlay");
                }
            }
            None => loaded.missing.push(number),
        }
    }
    Ok(loaded)
}
