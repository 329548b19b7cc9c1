//! Payload and DTO models
//!
//! Domain payloads exchanged with the live data endpoints, plus the
//! request/response bodies of the HTTP API.

pub mod project;
pub mod requests;
pub mod responses;
pub mod telemetry;

// Re-export commonly used types
pub use project::{Project, ProjectLiveMetrics, SiteStatus};
pub use requests::WebhookParams;
pub use responses::{ErrorResponse, HealthResponse, WebhookResponse};
pub use telemetry::{
    DeploymentInfo, DeploymentStatus, LighthouseScore, LiveMetrics, MetricsStatus,
    OverallStatus, ProjectHealth, SslCertificate,
};
