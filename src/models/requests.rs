//! Request DTOs for the HTTP API
//!
//! Defines the query parameters accepted by incoming requests.

use serde::Deserialize;

/// Query string of the webhook receiver (POST /api/projects?secret=...)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookParams {
    /// Shared secret, compared against the configured one
    #[serde(default)]
    pub secret: Option<String>,
}

impl WebhookParams {
    /// Returns true when a secret is configured and the request carries it.
    ///
    /// With no configured secret every request is rejected, including one
    /// that carries no secret either. A plain equality check would let that
    /// request through; this one fails closed.
    pub fn is_authorized(&self, expected: Option<&str>) -> bool {
        match (self.secret.as_deref(), expected) {
            (Some(given), Some(expected)) => given == expected,
            _ => false,
        }
    }
}
