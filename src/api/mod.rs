//! API Module
//!
//! HTTP handlers and routing for the live data service.
//!
//! # Endpoints
//! - `GET /api/projects` - Enhanced project list
//! - `POST /api/projects?secret=...` - Webhook receiver
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
