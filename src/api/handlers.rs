//! API Handlers
//!
//! HTTP request handlers for the projects endpoint, the webhook receiver
//! and the health check.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, info};

use crate::error::{LiveDataError, Result};
use crate::github::{GithubClient, RepositorySource};
use crate::models::{ErrorResponse, HealthResponse, WebhookParams, WebhookResponse};
use crate::projects::ProjectEnhancer;

const LIVE_CACHE_CONTROL: &str = "public, s-maxage=60, stale-while-revalidate=300";
const FALLBACK_CACHE_CONTROL: &str = "no-cache";

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository listing backing `/api/projects`
    pub source: Arc<dyn RepositorySource>,
    /// Adds live data to repository records
    pub enhancer: ProjectEnhancer,
    /// Shared secret for the webhook receiver
    pub webhook_secret: Option<String>,
}

impl AppState {
    /// Creates a new AppState around a repository source.
    pub fn new(
        source: Arc<dyn RepositorySource>,
        enhancer: ProjectEnhancer,
        webhook_secret: Option<String>,
    ) -> Self {
        Self {
            source,
            enhancer,
            webhook_secret,
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Lists repositories from GitHub for the configured user.
    pub fn from_config(config: &crate::config::Config) -> Result<Self> {
        let source = GithubClient::from_config(config)?;
        Ok(Self::new(
            Arc::new(source),
            ProjectEnhancer::new()?,
            config.webhook_secret.clone(),
        ))
    }
}

/// Handler for GET /api/projects
///
/// Returns repositories enhanced with live data. When the listing fails it
/// is retried once and the raw records are returned with 206.
pub async fn projects_handler(State(state): State<AppState>) -> Response {
    info!("Fetching projects from GitHub API");

    match state.source.list_projects().await {
        Ok(projects) => {
            info!(count = projects.len(), "Retrieved projects from GitHub");
            let enhanced = state.enhancer.enhance_all(projects).await;
            (
                [
                    (header::CACHE_CONTROL, LIVE_CACHE_CONTROL),
                    (header::ACCESS_CONTROL_ALLOW_METHODS, "GET, OPTIONS"),
                ],
                Json(enhanced),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "Error fetching live project data");
            fallback_projects(&state).await
        }
    }
}

async fn fallback_projects(state: &AppState) -> Response {
    match state.source.list_projects().await {
        Ok(projects) => {
            info!(count = projects.len(), "Using fallback GitHub data");
            (
                StatusCode::PARTIAL_CONTENT,
                [(header::CACHE_CONTROL, FALLBACK_CACHE_CONTROL)],
                Json(projects),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "Fallback also failed");
            let body = ErrorResponse::new("Failed to fetch project data").with_message(
                "Unable to retrieve live project information. Please try again later.",
            );
            (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
        }
    }
}

/// Handler for POST /api/projects?secret=...
///
/// Acknowledges deployment/metrics webhooks. Nothing is persisted.
pub async fn webhook_handler(
    State(state): State<AppState>,
    Query(params): Query<WebhookParams>,
    body: Bytes,
) -> Result<Response> {
    if !params.is_authorized(state.webhook_secret.as_deref()) {
        return Err(LiveDataError::Unauthorized);
    }

    let payload: serde_json::Value = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            error!(error = %e, "Error processing webhook");
            let body = ErrorResponse::new("Failed to process webhook");
            return Ok((StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response());
        }
    };

    info!(%payload, "Received webhook data");
    Ok(Json(WebhookResponse::processed()).into_response())
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
