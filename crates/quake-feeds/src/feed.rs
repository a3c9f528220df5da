//! FeedClient — one bounded GET against the summary feed, parsed into a
//! [`FeedSnapshot`].

use crate::error::{FeedError, TransportError};
use crate::transport::Transport;
use chrono::Utc;
use quake_core::normalizer::normalize_feed;
use quake_core::{FeedId, FeedSnapshot};
use std::sync::Arc;
use std::time::Duration;

/// Hard limit for a single feed fetch.
pub const FEED_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Clone)]
pub struct FeedClient {
    transport: Arc<dyn Transport>,
    base_url: String,
    timeout: Duration,
}

impl FeedClient {
    /// `base_url` is the directory holding the `<feed>.geojson` files, e.g.
    /// `https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary`.
    pub fn new(transport: Arc<dyn Transport>, base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn feed_url(&self, feed: FeedId) -> String {
        format!("{}/{}.geojson", self.base_url.trim_end_matches('/'), feed)
    }

    /// Fetch and parse one feed. Never retries.
    pub async fn fetch(&self, feed: FeedId) -> Result<FeedSnapshot, FeedError> {
        let url = self.feed_url(feed);
        tracing::debug!(%url, timeout_secs = self.timeout.as_secs(), "fetching feed");

        let body = tokio::time::timeout(self.timeout, self.transport.get(&url, self.timeout))
            .await
            .map_err(|_| TransportError::Timeout(self.timeout))??;

        let snapshot = normalize_feed(&body, Utc::now())?;
        tracing::debug!(feed = %feed, events = snapshot.len(), bytes = body.len(), "feed parsed");
        Ok(snapshot)
    }
}

impl std::fmt::Debug for FeedClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedClient")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
