use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use mood_core::{Classifier, Event, EventBuffer, RawItem, now_unix_secs};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use crate::config::SourceConfig;

/// A pollable producer of raw items.
pub trait EventSource: Send {
    fn fetch(&mut self) -> impl Future<Output = Result<Vec<RawItem>>> + Send;
}

/// Polls a JSON endpoint returning `{"data": [RawItem, ...]}`.
pub struct HttpSource {
    client: reqwest::Client,
    url: String,
    bearer_token: Option<String>,
    max_results: u32,
}

#[derive(Deserialize)]
struct FeedPage {
    #[serde(default)]
    data: Vec<serde_json::Value>,
}

impl HttpSource {
    pub fn new(url: &str, config: &SourceConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("mood/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            client,
            url: url.to_string(),
            bearer_token: config.bearer_token.clone(),
            max_results: config.max_results,
        })
    }
}

impl EventSource for HttpSource {
    async fn fetch(&mut self) -> Result<Vec<RawItem>> {
        let mut request = self
            .client
            .get(&self.url)
            .query(&[("max_results", self.max_results)]);
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }

        let page: FeedPage = request
            .send()
            .await
            .with_context(|| format!("request to {} failed", self.url))?
            .error_for_status()?
            .json()
            .await
            .context("invalid feed JSON")?;

        Ok(decode_items(page.data))
    }
}

/// Items that fail to decode are dropped individually.
fn decode_items(values: Vec<serde_json::Value>) -> Vec<RawItem> {
    values
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<RawItem>(value) {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::debug!("dropping undecodable item: {e}");
                None
            }
        })
        .collect()
}

/// Classify and buffer a batch. Returns how many were accepted.
pub fn ingest_batch(
    buffer: &EventBuffer,
    classifier: &dyn Classifier,
    items: &[RawItem],
    observed_at: f64,
) -> usize {
    let mut accepted = 0;
    for item in items {
        match Event::from_raw(item, classifier, observed_at) {
            Ok(event) => {
                buffer.append(event);
                accepted += 1;
            }
            Err(e) => tracing::debug!("rejected item: {e}"),
        }
    }
    accepted
}

/// Poll `source` until cancelled. Fetch errors are logged and retried after
/// the backoff; they never end the loop.
pub async fn run_ingestion<S: EventSource>(
    mut source: S,
    buffer: EventBuffer,
    classifier: Arc<dyn Classifier>,
    poll_interval: Duration,
    backoff: Duration,
    cancel: CancellationToken,
) {
    loop {
        let fetched = tokio::select! {
            _ = cancel.cancelled() => break,
            fetched = source.fetch() => fetched,
        };

        let delay = match fetched {
            Ok(items) => {
                let accepted = ingest_batch(&buffer, classifier.as_ref(), &items, now_unix_secs());
                tracing::debug!(fetched = items.len(), accepted, "ingested batch");
                poll_interval
            }
            Err(e) => {
                tracing::warn!("fetch failed, retrying in {:?}: {e:#}", backoff);
                backoff
            }
        };

        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(delay) => {}
        }
    }
    tracing::info!("ingestion stopped");
}
