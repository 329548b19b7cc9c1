//! Per-project telemetry payloads
//!
//! Shapes served by the metrics, deployments and health endpoints and by
//! the real-time push channel.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// == Live Metrics ==

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricsStatus {
    Active,
    Maintenance,
    Error,
    Deploying,
}

/// Timestamped live metrics snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveMetrics {
    pub timestamp: DateTime<Utc>,
    /// Percent
    pub uptime: f64,
    /// Milliseconds
    pub response_time: u64,
    pub status: MetricsStatus,
    pub concurrent_users: u32,
    pub api_calls_today: u64,
    /// Percent
    pub error_rate: f64,
    pub performance_score: u32,
}

// == Deployments ==

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentStatus {
    Building,
    Ready,
    Error,
    Canceled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentInfo {
    pub id: String,
    pub status: DeploymentStatus,
    pub url: String,
    pub created_at: DateTime<Utc>,
    /// Seconds
    pub duration: u64,
    pub commit_sha: String,
    pub commit_message: String,
    pub branch: String,
}

// == Health ==

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverallStatus {
    Healthy,
    Warning,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SslCertificate {
    pub valid: bool,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LighthouseScore {
    pub performance: u32,
    pub accessibility: u32,
    pub best_practices: u32,
    pub seo: u32,
    pub last_audit: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectHealth {
    pub overall_status: OverallStatus,
    pub last_check: DateTime<Utc>,
    pub uptime_24h: f64,
    pub avg_response_time: u64,
    pub ssl_certificate: SslCertificate,
    pub lighthouse_score: LighthouseScore,
}
