//! folio_live - Live project data for a portfolio site
//!
//! Cached access to project listings and per-project telemetry with
//! stale-if-error fallback, mock substitution and real-time push updates,
//! plus the small HTTP API that serves the enhanced project list.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod github;
pub mod live;
pub mod models;
pub mod projects;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use error::{LiveDataError, Result};
pub use live::{LiveDataClient, SubscriptionHandle};
pub use tasks::spawn_metrics_poller;
