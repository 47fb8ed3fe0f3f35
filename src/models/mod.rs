//! Request and Response models for the dashboard API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! deserializing query strings and serializing HTTP response bodies.

pub mod requests;
pub mod responses;

pub use requests::{LapsQuery, TelemetryQuery};
pub use responses::{
    ErrorResponse, FeedResponse, HealthResponse, LapSummary, StatsResponse, TelemetryResponse,
};
