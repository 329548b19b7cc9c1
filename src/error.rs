//! Error types for the live data service
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Live Data Error Enum ==
/// Unified error type for the client, the repository source and the HTTP API.
#[derive(Error, Debug)]
pub enum LiveDataError {
    /// Remote unreachable, connection reset, request aborted
    #[error("Transport failure: {0}")]
    Transport(String),

    /// Request exceeded its per-call timeout
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Remote reachable but answered with a non-success status
    #[error("HTTP error! status: {status} ({url})")]
    Status { status: u16, url: String },

    /// Payload could not be decoded
    #[error("Parse failure: {0}")]
    Parse(String),

    /// Webhook secret mismatch
    #[error("Unauthorized")]
    Unauthorized,

    /// No push channel available for real-time updates
    #[error("Push channel not supported")]
    PushUnsupported,

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LiveDataError {
    /// Returns true for failures where the remote never produced a response.
    pub fn is_transport(&self) -> bool {
        matches!(self, LiveDataError::Transport(_) | LiveDataError::Timeout(_))
    }
}

impl From<reqwest::Error> for LiveDataError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LiveDataError::Timeout(err.to_string())
        } else if err.is_decode() {
            LiveDataError::Parse(err.to_string())
        } else if let Some(status) = err.status() {
            LiveDataError::Status {
                status: status.as_u16(),
                url: err.url().map(|u| u.to_string()).unwrap_or_default(),
            }
        } else {
            LiveDataError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for LiveDataError {
    fn from(err: serde_json::Error) -> Self {
        LiveDataError::Parse(err.to_string())
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for LiveDataError {
    fn into_response(self) -> Response {
        let status = match &self {
            LiveDataError::Unauthorized => StatusCode::UNAUTHORIZED,
            LiveDataError::Transport(_)
            | LiveDataError::Timeout(_)
            | LiveDataError::Status { .. } => StatusCode::BAD_GATEWAY,
            LiveDataError::Parse(_)
            | LiveDataError::PushUnsupported
            | LiveDataError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the live data service.
pub type Result<T> = std::result::Result<T, LiveDataError>;
