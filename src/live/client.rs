//! Live Data Client
//!
//! Cache-aside wrapper over the live data endpoints. Every accessor goes
//! through [`LiveDataClient::resolve`]: serve fresh cache, otherwise fetch,
//! and fall back to the last good value when the fetch fails.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderValue, CONTENT_TYPE};
use serde::{de::DeserializeOwned, Serialize};
use tokio::runtime::Handle;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use url::Url;

use super::mock;
use super::realtime::{RealtimeBridge, SubscriptionHandle};
use super::{deployments_key, health_key, metrics_key, project_key, ALL_PROJECTS_KEY};
use crate::cache::{CacheStats, CacheStore, DEFAULT_TTL_SECS};
use crate::config::Config;
use crate::error::{LiveDataError, Result};
use crate::models::{DeploymentInfo, LiveMetrics, Project, ProjectHealth};

const DEFAULT_PROJECT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_LIVE_TIMEOUT: Duration = Duration::from_secs(5);

/// Cached client for project, metrics, deployment and health data.
///
/// Cloning is cheap and every clone shares the same cache, so one client
/// built at startup can be handed to every consumer.
#[derive(Debug, Clone)]
pub struct LiveDataClient {
    pub(super) http: reqwest::Client,
    base_url: Url,
    cache: Arc<RwLock<CacheStore>>,
    ttl: Duration,
    project_timeout: Duration,
    live_timeout: Duration,
    push_supported: bool,
}

impl LiveDataClient {
    // == Constructors ==
    /// Creates a client for the site at `base_url` with default TTL and timeouts.
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| LiveDataError::Internal(format!("invalid base URL {base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(LiveDataError::Internal(format!(
                "base URL cannot carry a path: {base_url}"
            )));
        }

        let http = reqwest::Client::builder()
            .user_agent(concat!("folio_live/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| LiveDataError::Internal(e.to_string()))?;

        Ok(Self {
            http,
            base_url,
            cache: Arc::new(RwLock::new(CacheStore::new())),
            ttl: Duration::from_secs(DEFAULT_TTL_SECS),
            project_timeout: DEFAULT_PROJECT_TIMEOUT,
            live_timeout: DEFAULT_LIVE_TIMEOUT,
            push_supported: true,
        })
    }

    /// Creates a client from service configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(&config.app_url)?
            .with_ttl(config.cache_ttl())
            .with_timeouts(config.project_timeout(), config.live_timeout())
            .with_push_support(config.realtime_enabled))
    }

    /// Sets how long cached data is considered fresh.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Sets the request timeouts for project data and for telemetry data.
    pub fn with_timeouts(mut self, project: Duration, live: Duration) -> Self {
        self.project_timeout = project;
        self.live_timeout = live;
        self
    }

    /// Declares whether the push channel is available.
    pub fn with_push_support(mut self, supported: bool) -> Self {
        self.push_supported = supported;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Shared handle to the underlying store.
    pub fn cache(&self) -> &Arc<RwLock<CacheStore>> {
        &self.cache
    }

    // == Resolve ==
    /// Serves `key` from cache when fresh, otherwise runs `producer`.
    ///
    /// A successful result is written through to the cache. A failed
    /// producer falls back to any cached value for `key`, however old; the
    /// error is returned only when nothing was ever cached.
    pub async fn resolve<T, F, Fut>(&self, key: &str, producer: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let cached = self.cache.read().await.get(key).cloned();
        if let Some(entry) = cached.filter(|e| e.is_fresh(self.ttl)) {
            match serde_json::from_value(entry.value) {
                Ok(value) => {
                    debug!(key, "Cache hit");
                    return Ok(value);
                }
                Err(e) => warn!(key, error = %e, "Cached entry has an unexpected shape"),
            }
        }

        match producer().await {
            Ok(value) => {
                self.store_value(key, &value).await?;
                Ok(value)
            }
            Err(err) => {
                let stale = self.cache.read().await.get(key).cloned();
                if let Some(value) = stale.and_then(|e| serde_json::from_value(e.value).ok()) {
                    warn!(key, error = %err, "Using expired cache due to fetch error");
                    return Ok(value);
                }
                Err(err)
            }
        }
    }

    /// Writes `value` under `key`, stamped now.
    pub(super) async fn store_value<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let value = serde_json::to_value(value)?;
        self.cache.write().await.set(key, value);
        Ok(())
    }

    // == Accessors ==
    /// All projects with live data (`GET /api/projects`).
    pub async fn get_projects(&self) -> Result<Vec<Project>> {
        let url = self.endpoint(&["api", "projects"])?;
        self.resolve(ALL_PROJECTS_KEY, || self.fetch_json(url, self.project_timeout))
            .await
    }

    /// One project by name (`GET /api/projects/{name}`).
    pub async fn get_project_details(&self, name: &str) -> Result<Project> {
        let url = self.endpoint(&["api", "projects", name])?;
        self.resolve(&project_key(name), || {
            self.fetch_json(url, self.project_timeout)
        })
        .await
    }

    /// Live metrics (`GET /api/metrics/{id}`), mocked on an error status.
    pub async fn get_live_metrics(&self, project_id: &str) -> Result<LiveMetrics> {
        let url = self.endpoint(&["api", "metrics", project_id])?;
        self.resolve(&metrics_key(project_id), || {
            self.fetch_or_mock(url, mock::generate_metrics)
        })
        .await
    }

    /// Recent deployments (`GET /api/deployments/{id}`), mocked on an error status.
    pub async fn get_deployments(&self, project_id: &str) -> Result<Vec<DeploymentInfo>> {
        let url = self.endpoint(&["api", "deployments", project_id])?;
        self.resolve(&deployments_key(project_id), || {
            self.fetch_or_mock(url, mock::generate_deployments)
        })
        .await
    }

    /// Health summary (`GET /api/health/{id}`), mocked on an error status.
    pub async fn get_project_health(&self, project_id: &str) -> Result<ProjectHealth> {
        let url = self.endpoint(&["api", "health", project_id])?;
        self.resolve(&health_key(project_id), || {
            self.fetch_or_mock(url, mock::generate_health)
        })
        .await
    }

    // == Real-Time ==
    /// Returns the push-channel bridge, or `PushUnsupported` when the client
    /// has no push channel or there is no tokio runtime to run one on.
    pub fn realtime(&self) -> Result<RealtimeBridge> {
        if !self.push_supported {
            return Err(LiveDataError::PushUnsupported);
        }
        let runtime = Handle::try_current().map_err(|_| LiveDataError::PushUnsupported)?;
        Ok(RealtimeBridge::new(self.clone(), runtime))
    }

    /// Opens a push channel for `project_id`; `None` when unsupported.
    pub fn subscribe<F>(&self, project_id: &str, on_update: F) -> Option<SubscriptionHandle>
    where
        F: FnMut(LiveMetrics) + Send + 'static,
    {
        match self.realtime() {
            Ok(bridge) => Some(bridge.subscribe(project_id, on_update)),
            Err(e) => {
                warn!(project_id, error = %e, "Real-time updates unavailable");
                None
            }
        }
    }

    // == Cache Management ==
    pub async fn clear_cache(&self) {
        self.cache.write().await.clear();
    }

    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.read().await.stats()
    }

    // == Transport ==
    /// Joins path segments onto the base URL, percent-encoding each one.
    pub(super) fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                LiveDataError::Internal(format!("base URL cannot carry a path: {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, url: Url, timeout: Duration) -> Result<reqwest::Response> {
        let response = self
            .http
            .get(url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .timeout(timeout)
            .send()
            .await?;
        Ok(response)
    }

    async fn fetch_json<T: DeserializeOwned>(&self, url: Url, timeout: Duration) -> Result<T> {
        let response = self.send(url.clone(), timeout).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LiveDataError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.json().await?)
    }

    /// Like `fetch_json`, but an error status yields `mock()` instead of failing.
    async fn fetch_or_mock<T, M>(&self, url: Url, mock: M) -> Result<T>
    where
        T: DeserializeOwned,
        M: FnOnce() -> T,
    {
        let response = self.send(url.clone(), self.live_timeout).await?;
        let status = response.status();
        if !status.is_success() {
            warn!(%url, status = status.as_u16(), "Live endpoint failed, using mock data");
            return Ok(mock());
        }
        Ok(response.json().await?)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{current_timestamp_ms, CacheEntry};
    use crate::models::MetricsStatus;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn client() -> LiveDataClient {
        LiveDataClient::new("http://localhost:3000").unwrap()
    }

    fn sample_metrics() -> LiveMetrics {
        serde_json::from_value(json!({
            "timestamp": "2024-03-01T10:00:00Z",
            "uptime": 99.95,
            "response_time": 120,
            "status": "active",
            "concurrent_users": 7,
            "api_calls_today": 640,
            "error_rate": 0.25,
            "performance_score": 93
        }))
        .unwrap()
    }

    async fn seed_aged(client: &LiveDataClient, key: &str, value: &LiveMetrics, age_ms: u64) {
        let entry = CacheEntry::stamped(
            serde_json::to_value(value).unwrap(),
            current_timestamp_ms() - age_ms,
        );
        client.cache().write().await.insert_entry(key, entry);
    }

    #[tokio::test]
    async fn test_resolve_stores_and_returns() {
        let client = client();
        let metrics = sample_metrics();
        let produced = metrics.clone();

        let got = client
            .resolve("metrics-42", || async move { Ok(produced) })
            .await
            .unwrap();

        assert_eq!(got, metrics);
        assert_eq!(client.cache_stats().await.keys, vec!["metrics-42"]);
    }

    #[tokio::test]
    async fn test_resolve_fresh_hit_skips_producer() {
        let client = client();
        let calls = &AtomicUsize::new(0);

        client
            .resolve("metrics-42", || async { Ok(sample_metrics()) })
            .await
            .unwrap();

        let got: LiveMetrics = client
            .resolve("metrics-42", || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(LiveDataError::Transport("connection refused".into()))
            })
            .await
            .unwrap();

        assert_eq!(got, sample_metrics());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    /// Collects the fields of every WARN event.
    #[derive(Clone, Default)]
    struct WarnRecorder {
        events: Arc<std::sync::Mutex<Vec<String>>>,
    }

    impl WarnRecorder {
        fn events(&self) -> Vec<String> {
            self.events.lock().unwrap().clone()
        }
    }

    #[derive(Default)]
    struct FieldText(String);

    impl tracing::field::Visit for FieldText {
        fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
            self.0.push_str(&format!("{}={:?} ", field.name(), value));
        }
    }

    impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for WarnRecorder {
        fn on_event(
            &self,
            event: &tracing::Event<'_>,
            _ctx: tracing_subscriber::layer::Context<'_, S>,
        ) {
            if *event.metadata().level() == tracing::Level::WARN {
                let mut text = FieldText::default();
                event.record(&mut text);
                self.events.lock().unwrap().push(text.0);
            }
        }
    }

    /// Runs `fut` to completion with `recorder` as the thread's subscriber.
    fn with_recorder<F: Future>(recorder: &WarnRecorder, fut: F) -> F::Output {
        use tracing_subscriber::layer::SubscriberExt;

        let subscriber = tracing_subscriber::registry().with(recorder.clone());
        tracing::subscriber::with_default(subscriber, || tokio_test::block_on(fut))
    }

    #[test]
    fn test_stale_fallback_warns_once() {
        let client = client();
        let recorder = WarnRecorder::default();

        let got: LiveMetrics = with_recorder(&recorder, async {
            seed_aged(&client, "metrics-42", &sample_metrics(), 6 * 60 * 1000).await;
            client
                .resolve("metrics-42", || async {
                    Err(LiveDataError::Transport("connection refused".into()))
                })
                .await
        })
        .unwrap();

        assert_eq!(got, sample_metrics());
        let events = recorder.events();
        assert_eq!(events.len(), 1, "warnings: {:?}", events);
        assert!(events[0].contains("metrics-42"));
    }

    #[test]
    fn test_fresh_hit_does_not_warn() {
        let client = client();
        let recorder = WarnRecorder::default();

        with_recorder(&recorder, async {
            client.cache().write().await.set(
                "metrics-42",
                serde_json::to_value(sample_metrics()).unwrap(),
            );
            client
                .resolve::<LiveMetrics, _, _>("metrics-42", || async {
                    Err(LiveDataError::Transport("connection refused".into()))
                })
                .await
        })
        .unwrap();

        assert!(recorder.events().is_empty());
    }

    #[tokio::test]
    async fn test_resolve_stale_on_error() {
        let client = client();
        let old = sample_metrics();
        seed_aged(&client, "metrics-42", &old, 6 * 60 * 1000).await;
        let calls = &AtomicUsize::new(0);

        let got: LiveMetrics = client
            .resolve("metrics-42", || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(LiveDataError::Timeout("5s elapsed".into()))
            })
            .await
            .unwrap();

        assert_eq!(got, old);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_resolve_stale_refreshed_on_success() {
        let client = client();
        seed_aged(&client, "metrics-42", &sample_metrics(), 6 * 60 * 1000).await;

        let mut fresh = sample_metrics();
        fresh.status = MetricsStatus::Deploying;
        let got = client
            .resolve("metrics-42", || async move { Ok(fresh) })
            .await
            .unwrap();

        assert_eq!(got.status, MetricsStatus::Deploying);
        let entry = client.cache().read().await.get("metrics-42").cloned().unwrap();
        assert!(entry.is_fresh(client.ttl()));
    }

    #[tokio::test]
    async fn test_resolve_propagates_when_never_cached() {
        let client = client();

        let result: Result<LiveMetrics> = client
            .resolve("metrics-42", || async {
                Err(LiveDataError::Status {
                    status: 500,
                    url: "http://localhost:3000/api/metrics/42".into(),
                })
            })
            .await;

        assert!(matches!(result, Err(LiveDataError::Status { status: 500, .. })));
        assert_eq!(client.cache_stats().await.count, 0);
    }

    #[tokio::test]
    async fn test_resolve_twice_calls_producer_once() {
        let client = client();
        let calls = &AtomicUsize::new(0);

        for _ in 0..2 {
            let got: u32 = client
                .resolve("counter", || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(7)
                })
                .await
                .unwrap();
            assert_eq!(got, 7);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_short_ttl_expires() {
        let client = client().with_ttl(Duration::from_millis(30));
        let calls = &AtomicUsize::new(0);

        let produce = || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, LiveDataError>(1u8)
        };
        client.resolve("k", produce).await.unwrap();
        tokio::time::sleep(Duration::from_millis(60)).await;
        client.resolve("k", produce).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_clear_cache() {
        let client = client();
        client.resolve("a", || async { Ok(1u8) }).await.unwrap();
        client.resolve("b", || async { Ok(2u8) }).await.unwrap();

        client.clear_cache().await;

        assert_eq!(client.cache_stats().await, CacheStats::default());
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let client = LiveDataClient::new("https://example.com/site/").unwrap();
        let url = client.endpoint(&["api", "projects", "my project/v2"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.com/site/api/projects/my%20project%2Fv2"
        );
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        assert!(LiveDataClient::new("not a url").is_err());
        assert!(LiveDataClient::new("mailto:someone@example.com").is_err());
    }

    #[test]
    fn test_realtime_capability_check() {
        let unsupported = client().with_push_support(false);
        assert!(matches!(
            unsupported.realtime(),
            Err(LiveDataError::PushUnsupported)
        ));
        assert!(unsupported.subscribe("42", |_| {}).is_none());
    }

    #[test]
    fn test_realtime_requires_runtime() {
        let client = client();
        assert!(matches!(
            client.realtime(),
            Err(LiveDataError::PushUnsupported)
        ));
        assert!(client.subscribe("42", |_| {}).is_none());
    }

    #[test]
    fn test_from_config() {
        let config = Config {
            app_url: "https://folio.example".to_string(),
            cache_ttl: 30,
            realtime_enabled: false,
            ..Config::default()
        };

        let client = LiveDataClient::from_config(&config).unwrap();

        assert_eq!(client.ttl(), Duration::from_secs(30));
        assert_eq!(client.live_timeout, Duration::from_secs(5));
        assert!(client.realtime().is_err());
        assert_eq!(
            client.endpoint(&["api", "metrics", "1"]).unwrap().as_str(),
            "https://folio.example/api/metrics/1"
        );
    }
}
