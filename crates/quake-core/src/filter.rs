//! Filter pipeline — projects a [`FeedSnapshot`] through a [`FilterCriteria`].
//!
//! Two independent predicates, both boundary-inclusive:
//!
//! - magnitude: `event.magnitude >= criteria.min_magnitude`
//! - region: `event` lies inside `criteria.bbox` (only when a box is set)
//!
//! Each predicate looks at one event at a time and the pipeline only ever
//! drops events, so the predicates commute and feed order is preserved. The
//! snapshot is never mutated; results borrow from it.

use crate::types::{BoundingBox, FeedSnapshot, SeismicEvent};

/// Largest magnitude floor a user may set.
pub const MAX_MAGNITUDE: f64 = 10.0;

/// Whether `m` is an acceptable magnitude floor: finite and within
/// `0.0..=MAX_MAGNITUDE`.
pub fn is_valid_min_magnitude(m: f64) -> bool {
    m.is_finite() && (0.0..=MAX_MAGNITUDE).contains(&m)
}

/// User-adjustable filter state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FilterCriteria {
    /// Inclusive magnitude floor. Defaults to `0.0`.
    pub min_magnitude: f64,
    /// Region restriction; `None` means magnitude-only filtering.
    pub bbox: Option<BoundingBox>,
}

impl FilterCriteria {
    pub fn new(min_magnitude: f64) -> Self {
        Self { min_magnitude, bbox: None }
    }

    pub fn with_bbox(mut self, bbox: Option<BoundingBox>) -> Self {
        self.bbox = bbox;
        self
    }
}

pub fn matches_magnitude(event: &SeismicEvent, min_magnitude: f64) -> bool {
    event.magnitude >= min_magnitude
}

/// An absent box matches everything.
pub fn matches_bbox(event: &SeismicEvent, bbox: Option<&BoundingBox>) -> bool {
    bbox.map_or(true, |b| b.contains(event.latitude, event.longitude))
}

pub fn matches(event: &SeismicEvent, criteria: &FilterCriteria) -> bool {
    matches_magnitude(event, criteria.min_magnitude) && matches_bbox(event, criteria.bbox.as_ref())
}

/// Run the pipeline over a snapshot.
pub fn apply<'a>(snapshot: &'a FeedSnapshot, criteria: &FilterCriteria) -> Vec<&'a SeismicEvent> {
    apply_events(&snapshot.events, criteria)
}

/// Run the pipeline over any ordered slice of events.
pub fn apply_events<'a>(events: &'a [SeismicEvent], criteria: &FilterCriteria) -> Vec<&'a SeismicEvent> {
    events.iter().filter(|e| matches(e, criteria)).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
