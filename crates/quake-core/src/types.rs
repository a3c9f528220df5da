//! Core types for quake-core.
//!
//! This module defines the data structures shared across all layers: the
//! normalised [`SeismicEvent`], the [`FeedSnapshot`] holding one successful
//! fetch, the [`FeedId`] time-window selector and the [`BoundingBox`] used to
//! restrict events to a region.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A single earthquake record, normalised at parse time.
///
/// Optional feed fields that take part in filtering are defaulted by the
/// normalizer, so downstream code never has to check for their absence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeismicEvent {
    /// Feed-assigned identifier, unique within a snapshot.
    pub id: String,
    /// Degrees east, signed.
    pub longitude: f64,
    /// Degrees north, signed.
    pub latitude: f64,
    /// Hypocentre depth. Absent when the feed sends only two coordinates.
    pub depth_km: Option<f64>,
    /// Magnitude; `0.0` when the feed omitted it or sent `null`.
    pub magnitude: f64,
    /// Human-readable location, e.g. `"10 km SSW of Ridgecrest, CA"`.
    pub place: Option<String>,
    /// Origin time (UTC).
    pub timestamp: DateTime<Utc>,
    /// Link to the event page on the feed publisher's site.
    pub detail_url: Option<String>,
    pub tsunami: bool,
}

/// One successful fetch of a feed. Replaced wholesale on the next success,
/// never merged.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedSnapshot {
    /// Events in feed order. Never re-sorted.
    pub events: Vec<SeismicEvent>,
    /// When the fetch completed.
    pub fetched_at: DateTime<Utc>,
}

impl FeedSnapshot {
    pub fn new(events: Vec<SeismicEvent>, fetched_at: DateTime<Utc>) -> Self {
        Self { events, fetched_at }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

// ---------------------------------------------------------------------------
// FeedId
// ---------------------------------------------------------------------------

/// Time window of the summary feed to pull.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FeedId {
    #[serde(rename = "all_hour", alias = "hour")]
    Hour,
    #[default]
    #[serde(rename = "all_day", alias = "day")]
    Day,
    #[serde(rename = "all_week", alias = "week")]
    Week,
    #[serde(rename = "all_month", alias = "month")]
    Month,
}

impl FeedId {
    pub const ALL: [FeedId; 4] = [FeedId::Hour, FeedId::Day, FeedId::Week, FeedId::Month];

    /// Identifier used in the feed URL path.
    pub fn as_str(self) -> &'static str {
        match self {
            FeedId::Hour => "all_hour",
            FeedId::Day => "all_day",
            FeedId::Week => "all_week",
            FeedId::Month => "all_month",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FeedId::Hour => "Last hour",
            FeedId::Day => "Last 24 hours",
            FeedId::Week => "Last 7 days",
            FeedId::Month => "Last 30 days",
        }
    }
}

impl std::fmt::Display for FeedId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown feed {0:?} (expected one of all_hour, all_day, all_week, all_month)")]
pub struct UnknownFeed(pub String);

impl FromStr for FeedId {
    type Err = UnknownFeed;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all_hour" | "hour" => Ok(FeedId::Hour),
            "all_day" | "day" => Ok(FeedId::Day),
            "all_week" | "week" => Ok(FeedId::Week),
            "all_month" | "month" => Ok(FeedId::Month),
            _ => Err(UnknownFeed(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// BoundingBox
// ---------------------------------------------------------------------------

/// Axis-aligned latitude/longitude rectangle in canonical
/// `(south, west, north, east)` order.
///
/// `south <= north` is enforced. `west <= east` is not: boxes that cross the
/// antimeridian are accepted but never match anything in between, because
/// [`BoundingBox::contains`] does no wraparound.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BoundingBoxError {
    #[error("bounding box edge is not a finite number")]
    NotFinite,
    #[error("south edge {south} lies north of north edge {north}")]
    Inverted { south: f64, north: f64 },
}

impl BoundingBox {
    pub fn new(south: f64, west: f64, north: f64, east: f64) -> Result<Self, BoundingBoxError> {
        if ![south, west, north, east].iter().all(|v| v.is_finite()) {
            return Err(BoundingBoxError::NotFinite);
        }
        if south > north {
            return Err(BoundingBoxError::Inverted { south, north });
        }
        Ok(Self { south, west, north, east })
    }

    /// True when the point lies inside the box, edges included.
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        latitude >= self.south
            && latitude <= self.north
            && longitude >= self.west
            && longitude <= self.east
    }
}

impl std::fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "S {:.2} W {:.2} N {:.2} E {:.2}",
            self.south, self.west, self.north, self.east
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
