//! Project records
//!
//! Repository data as listed by the hosting API, plus the optional
//! enhancement fields added by the projects endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A portfolio project backed by a repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub html_url: String,
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub stargazers_count: u32,
    #[serde(default)]
    pub forks_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tech_stack: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live_metrics: Option<ProjectLiveMetrics>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demo_available: Option<bool>,
}

impl Project {
    /// Homepage URL if one is set and not blank.
    pub fn homepage_url(&self) -> Option<&str> {
        self.homepage
            .as_deref()
            .map(str::trim)
            .filter(|h| !h.is_empty())
    }
}

/// Site status reported inside an enhanced project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteStatus {
    Active,
    Maintenance,
    Error,
}

/// Live metrics snapshot embedded in an enhanced project record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectLiveMetrics {
    pub uptime: f64,
    /// Milliseconds
    pub response_time: u64,
    pub last_deployment: DateTime<Utc>,
    pub status: SiteStatus,
    pub visitors_today: u32,
    pub performance_score: u32,
}
