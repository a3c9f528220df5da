//! Transport — the injected "GET this URL within this timeout" capability.
//!
//! [`FeedClient`](crate::feed::FeedClient) and
//! [`GeocodeClient`](crate::geocode::GeocodeClient) only ever see a
//! `dyn Transport`, so tests can script responses, delays and failures
//! without a network. [`HttpTransport`] is the production implementation.

use crate::error::TransportError;
use bytes::Bytes;
use futures::future::{BoxFuture, FutureExt};
use std::time::Duration;

/// One bounded GET returning the raw response body.
///
/// Implementations must treat non-2xx statuses as errors and should honour
/// `timeout`; callers additionally enforce it with `tokio::time::timeout`.
pub trait Transport: Send + Sync {
    fn get(&self, url: &str, timeout: Duration) -> BoxFuture<'static, Result<Bytes, TransportError>>;
}

/// `reqwest`-backed transport with rustls TLS.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build a client that identifies itself with `user_agent`. The public
    /// Nominatim instance rejects requests without one.
    pub fn new(user_agent: &str) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| TransportError::Network(e.to_string()))?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str, timeout: Duration) -> BoxFuture<'static, Result<Bytes, TransportError>> {
        let request = self.client.get(url).timeout(timeout);
        async move {
            let response = request.send().await.map_err(|e| classify(e, timeout))?;
            let status = response.status();
            if !status.is_success() {
                return Err(TransportError::Status(status.as_u16()));
            }
            response.bytes().await.map_err(|e| classify(e, timeout))
        }
        .boxed()
    }
}

fn classify(err: reqwest::Error, timeout: Duration) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout(timeout)
    } else {
        TransportError::Network(err.to_string())
    }
}
