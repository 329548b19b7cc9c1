//! Metrics Polling Task
//!
//! Background task that refreshes a project's live metrics on a fixed
//! interval, for consumers without a push channel.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::live::LiveDataClient;
use crate::models::LiveMetrics;

/// Spawns a task that fetches live metrics every `interval`.
///
/// Each tick goes through the client's cache, so a tick within the TTL is
/// served from memory and an error status yields mock metrics. Failures are
/// logged and the loop carries on.
///
/// # Returns
/// A JoinHandle for the spawned task; abort it to stop polling.
///
/// # Example
/// ```ignore
/// let handle = spawn_metrics_poller(client.clone(), "42", Duration::from_secs(30), |m| {
///     println!("{} users online", m.concurrent_users);
/// });
/// // Later:
/// handle.abort();
/// ```
pub fn spawn_metrics_poller<F>(
    client: LiveDataClient,
    project_id: impl Into<String>,
    interval: Duration,
    mut on_update: F,
) -> JoinHandle<()>
where
    F: FnMut(LiveMetrics) + Send + 'static,
{
    let project_id = project_id.into();

    tokio::spawn(async move {
        info!(
            project_id = %project_id,
            "Starting metrics poller with interval of {:?}", interval
        );

        loop {
            match client.get_live_metrics(&project_id).await {
                Ok(metrics) => {
                    debug!(project_id = %project_id, status = ?metrics.status, "Polled metrics");
                    on_update(metrics);
                }
                Err(e) => warn!(project_id = %project_id, error = %e, "Metrics poll failed"),
            }

            tokio::time::sleep(interval).await;
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{current_timestamp_ms, CacheEntry};
    use crate::live::metrics_key;
    use crate::live::mock::generate_metrics;
    use std::sync::{Arc, Mutex};

    #[tokio::test]
    async fn test_poller_serves_cached_metrics() {
        // Unroutable base URL: any network call would fail
        let client = LiveDataClient::new("http://127.0.0.1:9").unwrap();
        let seeded = generate_metrics();
        client.cache().write().await.insert_entry(
            metrics_key("7"),
            CacheEntry::stamped(serde_json::to_value(&seeded).unwrap(), current_timestamp_ms()),
        );

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let handle = spawn_metrics_poller(client, "7", Duration::from_millis(20), move |m| {
            sink.lock().unwrap().push(m);
        });

        tokio::time::sleep(Duration::from_millis(150)).await;
        handle.abort();

        let seen = seen.lock().unwrap();
        assert!(seen.len() >= 2, "expected several ticks, got {}", seen.len());
        assert!(seen.iter().all(|m| *m == seeded));
    }

    #[tokio::test]
    async fn test_poller_survives_failures() {
        let client = LiveDataClient::new("http://127.0.0.1:9")
            .unwrap()
            .with_timeouts(Duration::from_millis(200), Duration::from_millis(200));

        let handle = spawn_metrics_poller(client, "7", Duration::from_millis(20), |_| {});
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert!(!handle.is_finished(), "Poller should keep running after errors");
        handle.abort();
    }

    #[tokio::test]
    async fn test_poller_can_be_aborted() {
        let client = LiveDataClient::new("http://localhost:3000").unwrap();
        let handle = spawn_metrics_poller(client, "1", Duration::from_secs(60), |_| {});

        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
