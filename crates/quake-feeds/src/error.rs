//! Error taxonomy for the network-facing components.
//!
//! Every error is `Clone + PartialEq` because the scheduler and resolver keep
//! the last failure in their state for the shell to display. Nothing here is
//! ever propagated past its owning component.

use quake_core::normalizer::NormalizeError;
use std::time::Duration;

/// Failure of a single GET through a [`Transport`](crate::transport::Transport).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("request timed out after {}s", .0.as_secs())]
    Timeout(Duration),
    #[error("server responded with HTTP {0}")]
    Status(u16),
    #[error("{0}")]
    Network(String),
}

/// Failure of a feed refresh.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FeedError {
    #[error("feed request failed: {0}")]
    Network(String),
    #[error("feed request timed out after {}s", .0.as_secs())]
    Timeout(Duration),
    /// The body arrived but was not a GeoJSON FeatureCollection.
    #[error("feed body could not be parsed: {0}")]
    Decode(String),
}

impl From<TransportError> for FeedError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Timeout(after) => FeedError::Timeout(after),
            other => FeedError::Network(other.to_string()),
        }
    }
}

impl From<NormalizeError> for FeedError {
    fn from(err: NormalizeError) -> Self {
        FeedError::Decode(err.to_string())
    }
}

/// Failure of a place-name lookup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeocodeError {
    /// The geocoder answered with an empty result list.
    #[error("Not found")]
    NotFound,
    /// Transport failure, timeout, or an unusable response body.
    #[error("Search failed: {0}")]
    Lookup(String),
}

impl From<TransportError> for GeocodeError {
    fn from(err: TransportError) -> Self {
        GeocodeError::Lookup(err.to_string())
    }
}
