//! Error types for the dashboard backend
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Fetch Error Enum ==
/// Failure of a single upstream fetch attempt.
///
/// An empty upstream result is not an error; it surfaces as `Ok(None)`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    /// Transport-level failure (DNS, connect, timeout, reset)
    #[error("Network error: {0}")]
    Network(String),

    /// Upstream answered with a non-success status code
    #[error("Bad status {status} from {url}")]
    HttpStatus { status: u16, url: String },

    /// Upstream body is not in the expected structured format
    #[error("Unexpected content type '{content_type}' from {url}")]
    UnexpectedContentType { content_type: String, url: String },

    /// Body declared the right format but could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            FetchError::Decode(err.to_string())
        } else {
            FetchError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Decode(err.to_string())
    }
}

impl From<quick_xml::DeError> for FetchError {
    fn from(err: quick_xml::DeError) -> Self {
        FetchError::Decode(err.to_string())
    }
}

// == API Error Enum ==
/// Unified error type for the HTTP API.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Requested resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Upstream data provider failed
    #[error("Upstream error: {0}")]
    Upstream(#[from] FetchError),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the HTTP API.
pub type Result<T> = std::result::Result<T, ApiError>;
