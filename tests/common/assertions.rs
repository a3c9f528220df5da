//! Domain-specific assertion macros for quakewatch harnesses.
//!
//! These wrap `pretty_assertions` and add failure messages that name the
//! offending events instead of dumping whole structs.

// ---------------------------------------------------------------------------
// Result set assertions
// ---------------------------------------------------------------------------

/// Assert the exact ids, in order, of a list of events. Works for
/// `Vec<&SeismicEvent>`, `&[SeismicEvent]` and snapshots' `events`.
///
/// ```rust,ignore
/// assert_ids!(filter::apply(&snap, &criteria), ["a", "c"]);
/// ```
#[macro_export]
macro_rules! assert_ids {
    ($events:expr, [$($id:expr),* $(,)?]) => {{
        let actual: Vec<String> = $events.iter().map(|e| e.id.clone()).collect();
        let expected: Vec<String> = vec![$($id.to_string()),*];
        pretty_assertions::assert_eq!(actual, expected, "assert_ids! failed");
    }};
}

/// Assert that every event satisfies a predicate.
///
/// ```rust,ignore
/// assert_all_events!(out, |e| e.magnitude >= 4.0, "magnitude >= 4.0");
/// ```
#[macro_export]
macro_rules! assert_all_events {
    ($events:expr, |$e:ident| $pred:expr, $desc:expr) => {{
        let failing: Vec<(String, f64, f64, f64)> = $events
            .iter()
            .filter(|$e| !$pred)
            .map(|ev| (ev.id.clone(), ev.magnitude, ev.latitude, ev.longitude))
            .collect();
        if !failing.is_empty() {
            panic!(
                "assert_all_events! failed: {} event(s) violate {:?}\n  (id, mag, lat, lon): {:?}",
                failing.len(),
                $desc,
                failing
            );
        }
    }};
}

// ---------------------------------------------------------------------------
// State assertions
// ---------------------------------------------------------------------------

/// Assert the ids of the scheduler's cached snapshot.
#[macro_export]
macro_rules! assert_snapshot_ids {
    ($scheduler:expr, [$($id:expr),* $(,)?]) => {{
        match &$scheduler.state().snapshot {
            Some(snapshot) => $crate::assert_ids!(snapshot.events, [$($id),*]),
            None => panic!("assert_snapshot_ids! failed: scheduler has no snapshot yet"),
        }
    }};
}
