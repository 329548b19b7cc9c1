//! Real-Time Subscription Bridge
//!
//! Opens a Server-Sent Events channel per project and writes every pushed
//! metrics payload through to the cache before handing it to the caller.

use futures::StreamExt;
use reqwest::header::{HeaderValue, ACCEPT};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use super::client::LiveDataClient;
use super::metrics_key;
use super::sse::EventStreamDecoder;
use crate::error::{LiveDataError, Result};
use crate::models::LiveMetrics;

/// Push-channel access, obtained through [`LiveDataClient::realtime`].
#[derive(Debug, Clone)]
pub struct RealtimeBridge {
    client: LiveDataClient,
    runtime: Handle,
}

impl RealtimeBridge {
    pub(super) fn new(client: LiveDataClient, runtime: Handle) -> Self {
        Self { client, runtime }
    }

    /// Opens `GET /api/realtime/{project_id}` in a background task.
    ///
    /// Malformed messages are logged and dropped. A channel error closes the
    /// subscription; reconnecting is up to the caller.
    pub fn subscribe<F>(&self, project_id: &str, on_update: F) -> SubscriptionHandle
    where
        F: FnMut(LiveMetrics) + Send + 'static,
    {
        let client = self.client.clone();
        let id = project_id.to_string();

        let task = self.runtime.spawn(async move {
            match run_channel(&client, &id, on_update).await {
                Ok(()) => info!(project_id = %id, "Real-time channel closed by server"),
                Err(e) => error!(project_id = %id, error = %e, "Real-time connection error"),
            }
        });

        SubscriptionHandle {
            project_id: project_id.to_string(),
            task,
        }
    }
}

async fn run_channel<F>(client: &LiveDataClient, project_id: &str, mut on_update: F) -> Result<()>
where
    F: FnMut(LiveMetrics),
{
    let url = client.endpoint(&["api", "realtime", project_id])?;
    let key = metrics_key(project_id);

    let response = client
        .http
        .get(url.clone())
        .header(ACCEPT, HeaderValue::from_static("text/event-stream"))
        .send()
        .await?;
    let status = response.status();
    if !status.is_success() {
        return Err(LiveDataError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }
    debug!(project_id, "Real-time channel open");

    let mut decoder = EventStreamDecoder::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        for data in decoder.feed(&chunk) {
            match serde_json::from_str::<LiveMetrics>(&data) {
                Ok(metrics) => {
                    client.store_value(&key, &metrics).await?;
                    on_update(metrics);
                }
                Err(e) => error!(project_id, error = %e, "Error parsing real-time data"),
            }
        }
    }

    Ok(())
}

/// A live push channel. Dropping the handle closes the channel.
#[must_use = "dropping the handle closes the subscription"]
#[derive(Debug)]
pub struct SubscriptionHandle {
    project_id: String,
    task: JoinHandle<()>,
}

impl SubscriptionHandle {
    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Closes the channel. No further updates are delivered.
    pub fn close(&self) {
        self.task.abort();
    }

    /// True once the channel has ended, by error, by the server or by `close`.
    pub fn is_closed(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for SubscriptionHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
