//! GeocodeResolver — turns a stream of user-typed place names into the
//! "current region" the filter pipeline reads.
//!
//! Every call to [`resolve`](GeocodeResolver::resolve) takes the next
//! sequence number. Lookups run as spawned tasks and may finish in any order;
//! [`next_event`](GeocodeResolver::next_event) commits a finished lookup only
//! if its sequence number is still the latest one issued. Anything older is
//! dropped without touching state, so a slow early query can never overwrite
//! a later one.
//!
//! A blank query clears the region synchronously. It also takes a sequence
//! number, which supersedes lookups still in flight.

use crate::error::GeocodeError;
use crate::geocode::{GeocodeClient, Region};
use quake_core::BoundingBox;
use tokio::sync::mpsc;

/// Committed region state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeocodeState {
    pub bbox: Option<BoundingBox>,
    pub display_name: Option<String>,
    pub error: Option<GeocodeError>,
    /// True while the latest issued lookup has not been committed.
    pub searching: bool,
}

/// Immediate outcome of [`GeocodeResolver::resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolve {
    /// Blank query: region cleared, no lookup issued.
    Cleared,
    /// Lookup issued with this sequence number.
    Issued(u64),
}

/// A lookup that was committed to [`GeocodeState`].
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub seq: u64,
    pub query: String,
    pub outcome: Result<Region, GeocodeError>,
}

struct Finished {
    seq: u64,
    query: String,
    outcome: Result<Region, GeocodeError>,
}

pub struct GeocodeResolver {
    client: GeocodeClient,
    latest: u64,
    state: GeocodeState,
    done_tx: mpsc::UnboundedSender<Finished>,
    done_rx: mpsc::UnboundedReceiver<Finished>,
}

impl GeocodeResolver {
    pub fn new(client: GeocodeClient) -> Self {
        let (done_tx, done_rx) = mpsc::unbounded_channel();
        Self {
            client,
            latest: 0,
            state: GeocodeState::default(),
            done_tx,
            done_rx,
        }
    }

    pub fn state(&self) -> &GeocodeState {
        &self.state
    }

    /// The region the filter pipeline should use right now.
    pub fn bbox(&self) -> Option<BoundingBox> {
        self.state.bbox
    }

    /// Highest sequence number handed out so far.
    pub fn latest_seq(&self) -> u64 {
        self.latest
    }

    /// Issue a lookup for `query`, or clear the region if it is blank. Must
    /// be called inside a tokio runtime.
    pub fn resolve(&mut self, query: &str) -> Resolve {
        self.latest += 1;
        let seq = self.latest;
        let query = query.trim();

        if query.is_empty() {
            tracing::debug!(seq, "region cleared");
            self.state = GeocodeState::default();
            return Resolve::Cleared;
        }

        let client = self.client.clone();
        let done_tx = self.done_tx.clone();
        let owned = query.to_string();
        tokio::spawn(async move {
            let outcome = client.lookup(&owned).await;
            let _ = done_tx.send(Finished { seq, query: owned, outcome });
        });

        self.state.searching = true;
        self.state.error = None;
        tracing::debug!(seq, query, "geocode lookup issued");
        Resolve::Issued(seq)
    }

    /// Wait for the latest lookup to finish and commit it. Superseded
    /// lookups finishing in the meantime are dropped.
    ///
    /// Cancel-safe. Pends forever when nothing current is in flight.
    pub async fn next_event(&mut self) -> Resolution {
        loop {
            let Some(done) = self.done_rx.recv().await else {
                // We hold a sender, so the channel never closes.
                return std::future::pending().await;
            };

            if done.seq != self.latest {
                tracing::debug!(seq = done.seq, latest = self.latest, query = %done.query, "dropping superseded geocode response");
                continue;
            }

            self.state.searching = false;
            match &done.outcome {
                Ok(region) => {
                    tracing::info!(seq = done.seq, name = %region.display_name, bbox = %region.bbox, "region resolved");
                    self.state.bbox = Some(region.bbox);
                    self.state.display_name = Some(region.display_name.clone());
                    self.state.error = None;
                }
                Err(error) => {
                    tracing::warn!(seq = done.seq, query = %done.query, %error, "region lookup failed");
                    self.state.bbox = None;
                    self.state.display_name = None;
                    self.state.error = Some(error.clone());
                }
            }

            return Resolution {
                seq: done.seq,
                query: done.query,
                outcome: done.outcome,
            };
        }
    }
}

impl std::fmt::Debug for GeocodeResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeocodeResolver")
            .field("latest", &self.latest)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
