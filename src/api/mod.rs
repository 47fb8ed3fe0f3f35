//! API Module
//!
//! HTTP handlers and routing for the dashboard REST API.
//!
//! # Endpoints
//! - `GET /health`, `GET /stats`
//! - `GET /api/live`, `/api/live/positions`, `/api/live/weather`,
//!   `/api/live/race-control` - live feed snapshots
//! - `GET /api/sessions`, `GET /api/drivers`
//! - `GET /api/laps`, `GET /api/telemetry` - historical lap comparison
//! - `GET /api/standings`
//! - `GET /api/schedule`, `/api/schedule/next`, `/api/schedule/:round`

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
