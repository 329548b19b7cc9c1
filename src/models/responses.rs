//! Response DTOs for the HTTP API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

/// Response body for an accepted webhook (POST /api/projects)
#[derive(Debug, Clone, Serialize)]
pub struct WebhookResponse {
    pub message: String,
    /// ISO 8601
    pub timestamp: String,
}

impl WebhookResponse {
    pub fn processed() -> Self {
        Self {
            message: "Webhook processed successfully".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for handler-level failures
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Short error description
    pub error: String,
    /// Optional user-facing detail
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: None,
            timestamp: None,
        }
    }

    /// Adds a detail message and stamps the response with the current time.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self.timestamp = Some(chrono::Utc::now().to_rfc3339());
        self
    }
}
