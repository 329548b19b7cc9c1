//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;
use std::time::Duration;

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Base URL of the site serving the live data endpoints
    pub app_url: String,
    /// Cache time-to-live in seconds
    pub cache_ttl: u64,
    /// Timeout for project list/detail requests in milliseconds
    pub project_timeout_ms: u64,
    /// Timeout for metrics, deployments and health requests in milliseconds
    pub live_timeout_ms: u64,
    /// Whether the push channel for real-time metrics is available
    pub realtime_enabled: bool,
    /// Shared secret guarding the webhook receiver
    pub webhook_secret: Option<String>,
    /// Owner of the repositories listed as projects
    pub github_username: String,
    /// Optional token for higher repository API rate limits
    pub github_token: Option<String>,
    /// Repository API base URL
    pub github_api_url: String,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `APP_URL` - Live data base URL (default: http://localhost:3000)
    /// - `CACHE_TTL` - Cache TTL in seconds (default: 300)
    /// - `PROJECT_TIMEOUT_MS` - Project request timeout (default: 10000)
    /// - `LIVE_TIMEOUT_MS` - Metrics/deployments/health timeout (default: 5000)
    /// - `REALTIME_ENABLED` - Push channel support (default: true)
    /// - `WEBHOOK_SECRET` - Webhook shared secret (default: unset, all webhooks rejected)
    /// - `GITHUB_USERNAME` - Repository owner (default: thenitishmind)
    /// - `GITHUB_TOKEN` - Repository API token (default: unset)
    /// - `GITHUB_API_URL` - Repository API base (default: https://api.github.com)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            app_url: env::var("APP_URL").unwrap_or(defaults.app_url),
            cache_ttl: parse_var("CACHE_TTL").unwrap_or(defaults.cache_ttl),
            project_timeout_ms: parse_var("PROJECT_TIMEOUT_MS")
                .unwrap_or(defaults.project_timeout_ms),
            live_timeout_ms: parse_var("LIVE_TIMEOUT_MS").unwrap_or(defaults.live_timeout_ms),
            realtime_enabled: parse_var("REALTIME_ENABLED").unwrap_or(defaults.realtime_enabled),
            webhook_secret: non_empty_var("WEBHOOK_SECRET"),
            github_username: env::var("GITHUB_USERNAME").unwrap_or(defaults.github_username),
            github_token: non_empty_var("GITHUB_TOKEN"),
            github_api_url: env::var("GITHUB_API_URL").unwrap_or(defaults.github_api_url),
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl)
    }

    pub fn project_timeout(&self) -> Duration {
        Duration::from_millis(self.project_timeout_ms)
    }

    pub fn live_timeout(&self) -> Duration {
        Duration::from_millis(self.live_timeout_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            app_url: "http://localhost:3000".to_string(),
            cache_ttl: 300,
            project_timeout_ms: 10_000,
            live_timeout_ms: 5_000,
            realtime_enabled: true,
            webhook_secret: None,
            github_username: "thenitishmind".to_string(),
            github_token: None,
            github_api_url: "https://api.github.com".to_string(),
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}
