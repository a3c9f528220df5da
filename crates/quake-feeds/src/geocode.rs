//! GeocodeClient — resolves a free-text country name to a [`Region`] through
//! a Nominatim-compatible search endpoint.
//!
//! The geocoder reports bounding boxes as `[south, north, west, east]`
//! numeric strings; [`parse_first_place`] reorders them into the canonical
//! `(south, west, north, east)` [`BoundingBox`].

use crate::error::{GeocodeError, TransportError};
use crate::transport::Transport;
use quake_core::BoundingBox;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

pub const GEOCODE_TIMEOUT: Duration = Duration::from_secs(15);

/// A successfully geocoded place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Region {
    pub bbox: BoundingBox,
    pub display_name: String,
}

#[derive(Debug, Deserialize)]
struct Place {
    boundingbox: Vec<String>,
    #[serde(default)]
    display_name: Option<String>,
}

#[derive(Clone)]
pub struct GeocodeClient {
    transport: Arc<dyn Transport>,
    endpoint: String,
    timeout: Duration,
}

impl GeocodeClient {
    pub fn new(transport: Arc<dyn Transport>, endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            transport,
            endpoint: endpoint.into(),
            timeout,
        }
    }

    /// `endpoint?country=<query>&format=json&limit=1`, percent-encoded.
    pub fn lookup_url(&self, query: &str) -> Result<String, GeocodeError> {
        url::Url::parse_with_params(
            &self.endpoint,
            &[("country", query), ("format", "json"), ("limit", "1")],
        )
        .map(String::from)
        .map_err(|e| GeocodeError::Lookup(format!("invalid geocoder endpoint {:?}: {e}", self.endpoint)))
    }

    /// Look up one place name. Never retries.
    pub async fn lookup(&self, query: &str) -> Result<Region, GeocodeError> {
        let url = self.lookup_url(query)?;
        tracing::debug!(%url, "geocoding");

        let body = tokio::time::timeout(self.timeout, self.transport.get(&url, self.timeout))
            .await
            .map_err(|_| TransportError::Timeout(self.timeout))??;

        parse_first_place(&body, query)
    }
}

impl std::fmt::Debug for GeocodeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeocodeClient")
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// Parse a geocoder response array and take the first match. `query` is
/// used as the display name when the geocoder did not send one.
pub fn parse_first_place(body: &[u8], query: &str) -> Result<Region, GeocodeError> {
    let places: Vec<Place> = serde_json::from_slice(body)
        .map_err(|e| GeocodeError::Lookup(format!("unexpected geocoder response: {e}")))?;

    let place = places.into_iter().next().ok_or(GeocodeError::NotFound)?;

    let edges = place
        .boundingbox
        .iter()
        .map(|s| s.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| GeocodeError::Lookup(format!("non-numeric bounding box: {e}")))?;

    let [south, north, west, east] = edges[..] else {
        return Err(GeocodeError::Lookup(format!(
            "bounding box has {} values, expected 4",
            edges.len()
        )));
    };

    let bbox = BoundingBox::new(south, west, north, east)
        .map_err(|e| GeocodeError::Lookup(e.to_string()))?;

    Ok(Region {
        bbox,
        display_name: place.display_name.unwrap_or_else(|| query.to_string()),
    })
}
