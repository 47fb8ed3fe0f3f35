//! API Handlers
//!
//! HTTP request handlers for each dashboard endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;

use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::live::{
    roster, DriverPosition, LiveFeeds, RaceControlEntry, RosterTeam, SessionInfo, WeatherReading,
};
use crate::models::{
    FeedResponse, HealthResponse, LapSummary, LapsQuery, StatsResponse, TelemetryQuery,
    TelemetryResponse,
};
use crate::schedule::{self, RaceWeekend};
use crate::standings::{self, Standings};
use crate::tasks::PollingCache;
use crate::telemetry::{laps_request, load_overlay};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Shared cache and fetcher
    pub poller: PollingCache,
    /// Long-running live subscriptions
    pub feeds: Arc<LiveFeeds>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Starts the live feeds and wraps everything for sharing.
    ///
    /// Must be called inside a tokio runtime.
    pub fn start(poller: PollingCache, config: Config) -> Self {
        let feeds = LiveFeeds::start(&poller, &config.openf1_base_url, config.season_year);
        Self {
            poller,
            feeds: Arc::new(feeds),
            config: Arc::new(config),
        }
    }
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(state.poller.cache().stats().into())
}

// == Live Feeds ==
/// Handler for GET /api/live
pub async fn current_session_handler(
    State(state): State<AppState>,
) -> Json<FeedResponse<Option<SessionInfo>>> {
    Json(state.feeds.current_session.state().into())
}

/// Handler for GET /api/live/positions
pub async fn positions_handler(
    State(state): State<AppState>,
) -> Json<FeedResponse<Vec<DriverPosition>>> {
    Json(state.feeds.positions.state().into())
}

/// Handler for GET /api/live/weather
pub async fn weather_handler(
    State(state): State<AppState>,
) -> Json<FeedResponse<Option<WeatherReading>>> {
    Json(state.feeds.weather.state().into())
}

/// Handler for GET /api/live/race-control
pub async fn race_control_handler(
    State(state): State<AppState>,
) -> Json<FeedResponse<Vec<RaceControlEntry>>> {
    Json(state.feeds.race_control.state().into())
}

/// Handler for GET /api/sessions
pub async fn sessions_handler(
    State(state): State<AppState>,
) -> Json<FeedResponse<Vec<SessionInfo>>> {
    Json(state.feeds.season_sessions.state().into())
}

/// Handler for GET /api/drivers
pub async fn drivers_handler() -> Json<Vec<RosterTeam>> {
    Json(roster())
}

// == Historical Telemetry ==
/// Handler for GET /api/laps
///
/// Laps of one driver that are complete enough to compare.
pub async fn laps_handler(
    State(state): State<AppState>,
    Query(query): Query<LapsQuery>,
) -> Result<Json<Vec<LapSummary>>> {
    if let Some(error_msg) = query.validate() {
        return Err(ApiError::InvalidRequest(error_msg));
    }

    let request = laps_request(
        &state.config.openf1_base_url,
        &query.session_key,
        query.driver_number,
    );
    let laps = state.poller.fetch_once(&request).await?.unwrap_or_default();

    Ok(Json(laps.into_iter().map(LapSummary::from).collect()))
}

/// Handler for GET /api/telemetry
///
/// Aligned telemetry of up to five laps; chart lines are included when a
/// channel is requested.
pub async fn telemetry_handler(
    State(state): State<AppState>,
    Query(query): Query<TelemetryQuery>,
) -> Result<Json<TelemetryResponse>> {
    if let Some(error_msg) = query.validate() {
        return Err(ApiError::InvalidRequest(error_msg));
    }
    let lap_numbers = query.lap_numbers().map_err(ApiError::InvalidRequest)?;

    let loaded = load_overlay(
        &state.poller,
        &state.config.openf1_base_url,
        &query.session_key,
        query.driver_number,
        &lap_numbers,
    )
    .await?;

    let chart = query
        .channel
        .map(|channel| loaded.overlay.chart(channel, query.axis.unwrap_or_default()));

    Ok(Json(TelemetryResponse {
        session_key: query.session_key,
        driver_number: query.driver_number,
        laps: loaded.overlay.series().to_vec(),
        missing: loaded.missing,
        chart,
    }))
}

// == Standings & Schedule ==
/// Handler for GET /api/standings
pub async fn standings_handler(State(state): State<AppState>) -> Result<Json<Standings>> {
    let standings = standings::load(&state.poller, &state.config.ergast_base_url).await?;
    Ok(Json(standings))
}

/// Handler for GET /api/schedule
pub async fn schedule_handler() -> Json<&'static [RaceWeekend]> {
    Json(schedule::calendar())
}

/// Handler for GET /api/schedule/next
pub async fn next_race_handler() -> Result<Json<&'static RaceWeekend>> {
    schedule::next_after(Utc::now())
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("no remaining race this season".to_string()))
}

/// Handler for GET /api/schedule/:round
pub async fn round_handler(Path(round): Path<String>) -> Result<Json<&'static RaceWeekend>> {
    let number: u32 = round
        .parse()
        .map_err(|_| ApiError::InvalidRequest(format!("invalid round '{round}'")))?;

    schedule::by_round(number)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("round {number}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_round_handler() {
        let Json(weekend) = round_handler(Path("8".to_string())).await.unwrap();
        assert_eq!(weekend.name, "Monaco Grand Prix");

        let err = round_handler(Path("monaco".to_string())).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidRequest(_)));

        let err = round_handler(Path("30".to_string())).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_drivers_handler() {
        let Json(teams) = drivers_handler().await;
        assert_eq!(teams[0].team, "Red Bull");
    }
}
