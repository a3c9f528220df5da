//! Test builders — ergonomic constructors for events, snapshots and feed
//! bodies.
//!
//! These builders are designed for readability in test assertions, not for
//! production use. They panic on invalid input rather than returning `Result`.

use chrono::{DateTime, Utc};
use quake_core::{BoundingBox, FeedSnapshot, SeismicEvent};

// ---------------------------------------------------------------------------
// SeismicEventBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`SeismicEvent`] fixtures.
///
/// ```rust,ignore
/// let event = SeismicEventBuilder::new("ci40000001")
///     .magnitude(4.5)
///     .at(35.6, -117.6)
///     .place("10 km SSW of Ridgecrest, CA")
///     .build();
/// ```
pub struct SeismicEventBuilder {
    event: SeismicEvent,
}

impl SeismicEventBuilder {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            event: SeismicEvent {
                id: id.into(),
                longitude: 0.0,
                latitude: 0.0,
                depth_km: Some(10.0),
                magnitude: 0.0,
                place: None,
                timestamp: DateTime::<Utc>::UNIX_EPOCH,
                detail_url: None,
                tsunami: false,
            },
        }
    }

    pub fn magnitude(mut self, magnitude: f64) -> Self {
        self.event.magnitude = magnitude;
        self
    }

    /// Position as latitude, longitude.
    pub fn at(mut self, latitude: f64, longitude: f64) -> Self {
        self.event.latitude = latitude;
        self.event.longitude = longitude;
        self
    }

    pub fn depth(mut self, depth_km: Option<f64>) -> Self {
        self.event.depth_km = depth_km;
        self
    }

    pub fn place(mut self, place: impl Into<String>) -> Self {
        self.event.place = Some(place.into());
        self
    }

    /// Origin time in milliseconds since the epoch.
    pub fn time_ms(mut self, millis: i64) -> Self {
        self.event.timestamp = DateTime::from_timestamp_millis(millis).expect("valid timestamp");
        self
    }

    pub fn tsunami(mut self) -> Self {
        self.event.tsunami = true;
        self
    }

    pub fn build(self) -> SeismicEvent {
        self.event
    }
}

/// `n` events `ev-0 .. ev-{n-1}` with magnitudes cycling through 0.0..=9.9
/// and positions spread over the globe.
pub fn make_events(n: usize) -> Vec<SeismicEvent> {
    (0..n)
        .map(|i| {
            let lat = ((i * 37) % 180) as f64 - 90.0;
            let lon = ((i * 53) % 360) as f64 - 180.0;
            SeismicEventBuilder::new(format!("ev-{i}"))
                .magnitude((i % 100) as f64 / 10.0)
                .at(lat, lon)
                .time_ms(1_705_312_800_000 + i as i64 * 1_000)
                .build()
        })
        .collect()
}

pub fn snapshot(events: Vec<SeismicEvent>) -> FeedSnapshot {
    FeedSnapshot::new(events, DateTime::<Utc>::UNIX_EPOCH)
}

pub fn bbox(south: f64, west: f64, north: f64, east: f64) -> BoundingBox {
    BoundingBox::new(south, west, north, east).expect("valid bounding box")
}

// ---------------------------------------------------------------------------
// Feed bodies
// ---------------------------------------------------------------------------

/// Serialize events back into a USGS-shaped GeoJSON body.
pub fn feed_body(events: &[SeismicEvent]) -> String {
    let features: Vec<serde_json::Value> = events
        .iter()
        .map(|e| {
            let mut coordinates = vec![serde_json::json!(e.longitude), serde_json::json!(e.latitude)];
            coordinates.push(serde_json::json!(e.depth_km));
            serde_json::json!({
                "type": "Feature",
                "id": e.id,
                "properties": {
                    "mag": e.magnitude,
                    "place": e.place,
                    "time": e.timestamp.timestamp_millis(),
                    "url": e.detail_url,
                    "tsunami": if e.tsunami { 1 } else { 0 },
                },
                "geometry": {"type": "Point", "coordinates": coordinates},
            })
        })
        .collect();
    serde_json::json!({"type": "FeatureCollection", "features": features}).to_string()
}
