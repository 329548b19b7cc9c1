//! Background Tasks Module
//!
//! Contains background tasks that run periodically alongside consumers.
//!
//! # Tasks
//! - Metrics Poller: Refreshes a project's live metrics at a fixed interval

mod poller;

pub use poller::spawn_metrics_poller;
