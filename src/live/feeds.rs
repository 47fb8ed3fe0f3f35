//! Long-running OpenF1 subscriptions kept by the server.

use tokio::time::Duration;
use tracing::info;

use super::models::{DriverPosition, RaceControlMessage, SessionInfo, WeatherReading};
use super::transforms::{
    current_session, latest_positions, latest_weather, race_control_newest_first,
    sessions_newest_first, RaceControlEntry,
};
use crate::tasks::{PollRequest, PollingCache, Subscription};

const POSITIONS_REFRESH: Duration = Duration::from_secs(10);
const WEATHER_REFRESH: Duration = Duration::from_secs(60);
const RACE_CONTROL_REFRESH: Duration = Duration::from_secs(10);
const CURRENT_SESSION_REFRESH: Duration = Duration::from_secs(30);
const SEASON_SESSIONS_REFRESH: Duration = Duration::from_secs(60 * 60);

pub fn positions_request(base: &str) -> PollRequest<Vec<DriverPosition>, Vec<DriverPosition>> {
    PollRequest::new(
        format!("{base}/position?session_key=latest"),
        "positions",
        POSITIONS_REFRESH,
        POSITIONS_REFRESH,
    )
    .with_transform(latest_positions)
}

pub fn weather_request(base: &str) -> PollRequest<Vec<WeatherReading>, Option<WeatherReading>> {
    PollRequest::new(
        format!("{base}/weather?session_key=latest"),
        "weather",
        WEATHER_REFRESH,
        WEATHER_REFRESH,
    )
    .with_transform(latest_weather)
}

pub fn race_control_request(
    base: &str,
) -> PollRequest<Vec<RaceControlMessage>, Vec<RaceControlEntry>> {
    PollRequest::new(
        format!("{base}/race_control?session_key=latest"),
        "racecontrol",
        RACE_CONTROL_REFRESH,
        RACE_CONTROL_REFRESH,
    )
    .with_transform(race_control_newest_first)
}

pub fn current_session_request(base: &str) -> PollRequest<Vec<SessionInfo>, Option<SessionInfo>> {
    PollRequest::new(
        format!("{base}/sessions?session_key=latest"),
        "current_session",
        CURRENT_SESSION_REFRESH,
        CURRENT_SESSION_REFRESH,
    )
    .with_transform(current_session)
}

pub fn season_sessions_request(base: &str, year: i32) -> PollRequest<Vec<SessionInfo>, Vec<SessionInfo>> {
    PollRequest::new(
        format!("{base}/sessions?year={year}"),
        format!("all_sessions_{year}"),
        SEASON_SESSIONS_REFRESH,
        SEASON_SESSIONS_REFRESH,
    )
    .with_transform(sessions_newest_first)
}

// == Live Feeds ==
/// Every feed the dashboard keeps warm. Dropping the set stops all polling.
#[derive(Debug)]
pub struct LiveFeeds {
    pub positions: Subscription<Vec<DriverPosition>>,
    pub weather: Subscription<Option<WeatherReading>>,
    pub race_control: Subscription<Vec<RaceControlEntry>>,
    pub current_session: Subscription<Option<SessionInfo>>,
    pub season_sessions: Subscription<Vec<SessionInfo>>,
}

impl LiveFeeds {
    /// Starts all feeds against the OpenF1 root `base`.
    pub fn start(poller: &PollingCache, base: &str, season_year: i32) -> Self {
        let feeds = Self {
            positions: poller.observe(positions_request(base)),
            weather: poller.observe(weather_request(base)),
            race_control: poller.observe(race_control_request(base)),
            current_session: poller.observe(current_session_request(base)),
            season_sessions: poller.observe(season_sessions_request(base, season_year)),
        };
        info!(season_year, "live feeds started");
        feeds
    }

    pub fn cancel_all(&self) {
        self.positions.cancel();
        self.weather.cancel();
        self.race_control.cancel();
        self.current_session.cancel();
        self.season_sessions.cancel();
        info!("live feeds stopped");
    }
}
