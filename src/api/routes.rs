//! API Routes
//!
//! Configures the Axum router with all dashboard endpoints.

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    current_session_handler, drivers_handler, health_handler, laps_handler, next_race_handler,
    positions_handler, race_control_handler, round_handler, schedule_handler, sessions_handler,
    standings_handler, stats_handler, telemetry_handler, weather_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - CORS: read-only endpoints, any origin
/// - Tracing: logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/stats", get(stats_handler))
        .route("/api/live", get(current_session_handler))
        .route("/api/live/positions", get(positions_handler))
        .route("/api/live/weather", get(weather_handler))
        .route("/api/live/race-control", get(race_control_handler))
        .route("/api/sessions", get(sessions_handler))
        .route("/api/drivers", get(drivers_handler))
        .route("/api/laps", get(laps_handler))
        .route("/api/telemetry", get(telemetry_handler))
        .route("/api/standings", get(standings_handler))
        .route("/api/schedule", get(schedule_handler))
        .route("/api/schedule/next", get(next_race_handler))
        .route("/api/schedule/:round", get(round_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
