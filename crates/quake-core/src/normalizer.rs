//! Normalizer — parses a GeoJSON summary feed body into a [`FeedSnapshot`].
//!
//! Each feature becomes a fully-defaulted [`SeismicEvent`]: a missing or
//! `null` magnitude becomes `0.0`, the tsunami flag accepts `0/1` as well as
//! booleans. Features that cannot be placed on a map or a timeline (no id,
//! no longitude/latitude, no origin time) are skipped with a warning instead
//! of failing the whole snapshot, as is any single feature whose shape does
//! not decode. Duplicate ids keep their first occurrence.

use crate::types::{FeedSnapshot, SeismicEvent};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizeError {
    #[error("feed body is not valid GeoJSON: {0}")]
    Json(String),
    #[error("expected a FeatureCollection, got {0:?}")]
    NotFeatureCollection(String),
}

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(rename = "type")]
    kind: Option<String>,
    /// Decoded one at a time so a single odd feature cannot sink the feed.
    features: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    geometry: Option<Geometry>,
    #[serde(default)]
    properties: Option<Properties>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    #[serde(default)]
    coordinates: Vec<Option<f64>>,
}

#[derive(Debug, Default, Deserialize)]
struct Properties {
    #[serde(default)]
    mag: Option<f64>,
    #[serde(default)]
    place: Option<String>,
    #[serde(default)]
    time: Option<i64>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    tsunami: Option<TsunamiFlag>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TsunamiFlag {
    Bool(bool),
    Int(i64),
}

impl TsunamiFlag {
    fn is_set(&self) -> bool {
        match self {
            TsunamiFlag::Bool(b) => *b,
            TsunamiFlag::Int(n) => *n != 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Parse a feed body fetched at `fetched_at` into a snapshot.
pub fn normalize_feed(body: &[u8], fetched_at: DateTime<Utc>) -> Result<FeedSnapshot, NormalizeError> {
    let collection: FeatureCollection =
        serde_json::from_slice(body).map_err(|e| NormalizeError::Json(e.to_string()))?;

    if let Some(kind) = collection.kind.as_deref() {
        if kind != "FeatureCollection" {
            return Err(NormalizeError::NotFeatureCollection(kind.to_string()));
        }
    }

    let mut seen = HashSet::with_capacity(collection.features.len());
    let mut events = Vec::with_capacity(collection.features.len());
    for (index, raw) in collection.features.into_iter().enumerate() {
        let feature = match serde_json::from_value::<Feature>(raw) {
            Ok(feature) => feature,
            Err(error) => {
                tracing::warn!(index, %error, "skipping undecodable feature");
                continue;
            }
        };
        let Some(event) = normalize_feature(feature) else {
            tracing::warn!(index, "skipping feature without id, position or time");
            continue;
        };
        if !seen.insert(event.id.clone()) {
            tracing::warn!(id = %event.id, "skipping duplicate feature id");
            continue;
        }
        events.push(event);
    }

    Ok(FeedSnapshot::new(events, fetched_at))
}

fn normalize_feature(feature: Feature) -> Option<SeismicEvent> {
    let id = feature.id.filter(|id| !id.is_empty())?;
    let coords = feature.geometry?.coordinates;
    let longitude = coords.first().copied().flatten()?;
    let latitude = coords.get(1).copied().flatten()?;
    let depth_km = coords.get(2).copied().flatten();
    let props = feature.properties?;
    let timestamp = DateTime::from_timestamp_millis(props.time?)?;

    Some(SeismicEvent {
        id,
        longitude,
        latitude,
        depth_km,
        magnitude: props.mag.unwrap_or(0.0),
        place: props.place,
        timestamp,
        detail_url: props.url,
        tsunami: props.tsunami.as_ref().is_some_and(TsunamiFlag::is_set),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
