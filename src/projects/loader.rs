//! Project list loader
//!
//! Consumer side of `GET /api/projects`: prefers the enhanced list served by
//! the site and falls back to the raw repository listing when that endpoint
//! answers with an error status, an unreadable body or not at all. Independent
//! of [`LiveDataClient`](crate::live::LiveDataClient) and its cache.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderValue, CONTENT_TYPE};
use tracing::{debug, warn};
use url::Url;

use crate::config::Config;
use crate::error::{LiveDataError, Result};
use crate::github::{GithubClient, RepositorySource};
use crate::models::Project;

const LOAD_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct ProjectLoader {
    http: reqwest::Client,
    endpoint: Url,
    source: Arc<dyn RepositorySource>,
    timeout: Duration,
}

impl ProjectLoader {
    /// `base_url` is the site serving `/api/projects`; `source` is the
    /// repository listing used when it fails.
    pub fn new(base_url: &str, source: Arc<dyn RepositorySource>) -> Result<Self> {
        let mut endpoint = Url::parse(base_url)
            .map_err(|e| LiveDataError::Internal(format!("invalid base URL {base_url}: {e}")))?;
        endpoint
            .path_segments_mut()
            .map_err(|_| LiveDataError::Internal(format!("base URL cannot carry a path: {base_url}")))?
            .pop_if_empty()
            .extend(["api", "projects"]);
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| LiveDataError::Internal(e.to_string()))?;

        Ok(Self {
            http,
            endpoint,
            source,
            timeout: LOAD_TIMEOUT,
        })
    }

    /// Loader for the configured site, falling back to the configured
    /// GitHub account.
    pub fn from_config(config: &Config) -> Result<Self> {
        let source = GithubClient::from_config(config)?;
        Ok(Self::new(&config.app_url, Arc::new(source))?
            .with_timeout(config.project_timeout()))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Enhanced projects from the site, or the raw listing if that fails.
    ///
    /// Errors only when the fallback listing fails too.
    pub async fn load(&self) -> Result<Vec<Project>> {
        match self.fetch_live().await {
            Ok(projects) => {
                debug!(count = projects.len(), "Loaded live project data");
                Ok(projects)
            }
            Err(e) => {
                warn!(error = %e, "Live API failed, falling back to repository data");
                self.source.list_projects().await
            }
        }
    }

    async fn fetch_live(&self) -> Result<Vec<Project>> {
        let response = self
            .http
            .get(self.endpoint.clone())
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .timeout(self.timeout)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LiveDataError::Status {
                status: status.as_u16(),
                url: self.endpoint.to_string(),
            });
        }
        Ok(response.json().await?)
    }
}
