//! Live Data Module
//!
//! Cached access to project data and per-project telemetry, with mock
//! fallbacks and a real-time push channel.

mod client;
pub mod mock;
mod realtime;
mod sse;

pub use client::LiveDataClient;
pub use realtime::{RealtimeBridge, SubscriptionHandle};
pub use sse::EventStreamDecoder;

// == Cache Keys ==
pub const ALL_PROJECTS_KEY: &str = "all-projects";

pub fn project_key(name: &str) -> String {
    format!("project-{}", name)
}

pub fn metrics_key(project_id: &str) -> String {
    format!("metrics-{}", project_id)
}

pub fn deployments_key(project_id: &str) -> String {
    format!("deployments-{}", project_id)
}

pub fn health_key(project_id: &str) -> String {
    format!("health-{}", project_id)
}
