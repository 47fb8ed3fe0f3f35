//! Live Module
//!
//! OpenF1 live-timing feeds: record types, per-feed transforms, the driver
//! roster and the set of subscriptions the server keeps running.

mod drivers;
mod feeds;
mod models;
mod transforms;

pub use drivers::{roster, RosterDriver, RosterTeam};
pub use feeds::{
    current_session_request, positions_request, race_control_request, season_sessions_request,
    weather_request, LiveFeeds,
};
pub use models::{DriverPosition, RaceControlMessage, SessionInfo, WeatherReading};
pub use transforms::{
    current_session, latest_positions, latest_weather, race_control_newest_first,
    sessions_newest_first, MessageTone, RaceControlEntry,
};
