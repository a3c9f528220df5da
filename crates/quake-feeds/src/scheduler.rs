//! RefreshScheduler — owns the cached feed snapshot and keeps it fresh.
//!
//! # Lifecycle
//!
//! - [`configure`](RefreshScheduler::configure) selects the feed and the
//!   auto-refresh mode. A feed change aborts the old feed's fetch, fetches the
//!   new feed immediately and restarts the repeating timer from that moment.
//! - [`refresh`](RefreshScheduler::refresh) starts a fetch unless one is
//!   already outstanding (single-flight; the call is then a no-op).
//! - [`stop`](RefreshScheduler::stop) cancels the timer. An outstanding fetch
//!   still completes and still updates state.
//!
//! # Driving
//!
//! Fetches run as spawned tasks and report back over a channel. The owner
//! awaits [`next_event`](RefreshScheduler::next_event), which fires the timer
//! and applies completed fetches to [`RefreshState`]. All state changes
//! happen there or in the `&mut self` methods above, on the owner's task.
//!
//! A failed fetch only sets `error`; the last good snapshot and its
//! `last_updated` stay in place.

use crate::error::FeedError;
use crate::feed::FeedClient;
use chrono::{DateTime, Utc};
use quake_core::{FeedId, FeedSnapshot};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, Interval, MissedTickBehavior};

/// Auto-refresh period.
pub const REFRESH_PERIOD: Duration = Duration::from_secs(5 * 60);

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Everything consumers may read about the feed cache.
#[derive(Debug, Clone, Default)]
pub struct RefreshState {
    /// Last successful snapshot; `None` until the first success.
    pub snapshot: Option<Arc<FeedSnapshot>>,
    /// True exactly while a fetch is outstanding.
    pub loading: bool,
    /// Failure of the most recent fetch, cleared when the next one starts.
    pub error: Option<FeedError>,
    /// Completion time of the last successful fetch.
    pub last_updated: Option<DateTime<Utc>>,
}

/// What [`RefreshScheduler::next_event`] did.
#[derive(Debug, Clone, PartialEq)]
pub enum SchedulerEvent {
    /// The repeating timer fired. `started` is false when a fetch was
    /// already outstanding and the tick was coalesced into it.
    Tick { started: bool },
    /// A fetch succeeded and replaced the snapshot.
    Updated { feed: FeedId, events: usize },
    /// A fetch failed; the previous snapshot was kept.
    Failed { feed: FeedId, error: FeedError },
    /// A fetch for a feed that has since been switched away from completed
    /// anyway and was ignored.
    Discarded { feed: FeedId },
}

struct Completion {
    generation: u64,
    feed: FeedId,
    result: Result<FeedSnapshot, FeedError>,
}

struct InFlight {
    generation: u64,
    feed: FeedId,
    task: JoinHandle<()>,
}

// ---------------------------------------------------------------------------
// RefreshScheduler
// ---------------------------------------------------------------------------

pub struct RefreshScheduler {
    client: FeedClient,
    period: Duration,
    feed: FeedId,
    auto_refresh: bool,
    configured: bool,
    /// Bumped on every feed switch; completions from older generations are
    /// discarded.
    generation: u64,
    state: RefreshState,
    timer: Option<Interval>,
    in_flight: Option<InFlight>,
    done_tx: mpsc::UnboundedSender<Completion>,
    done_rx: mpsc::UnboundedReceiver<Completion>,
}

impl RefreshScheduler {
    /// A scheduler with no feed configured yet and the timer stopped.
    pub fn new(client: FeedClient, period: Duration) -> Self {
        let (done_tx, done_rx) = mpsc::unbounded_channel();
        Self {
            client,
            period,
            feed: FeedId::default(),
            auto_refresh: false,
            configured: false,
            generation: 0,
            state: RefreshState::default(),
            timer: None,
            in_flight: None,
            done_tx,
            done_rx,
        }
    }

    pub fn state(&self) -> &RefreshState {
        &self.state
    }

    pub fn feed(&self) -> FeedId {
        self.feed
    }

    pub fn auto_refresh(&self) -> bool {
        self.auto_refresh
    }

    pub fn is_timer_running(&self) -> bool {
        self.timer.is_some()
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Select the feed and auto-refresh mode. Must be called inside a tokio
    /// runtime.
    ///
    /// The first call, and every call that changes the feed, aborts any
    /// fetch for the previous feed, starts a fetch for the new one and
    /// restarts the timer. Toggling only `auto_refresh` starts or stops the
    /// timer without fetching. Returns whether a fetch was started.
    pub fn configure(&mut self, feed: FeedId, auto_refresh: bool) -> bool {
        let feed_changed = !self.configured || feed != self.feed;
        let auto_changed = auto_refresh != self.auto_refresh;

        if feed_changed {
            tracing::debug!(from = %self.feed, to = %feed, "switching feed");
            self.abort_in_flight();
            self.generation += 1;
            self.feed = feed;
            self.configured = true;
        }
        self.auto_refresh = auto_refresh;

        if !auto_refresh {
            self.stop();
        } else if feed_changed || auto_changed || self.timer.is_none() {
            self.start_timer();
        }

        feed_changed && self.refresh()
    }

    /// Switch feeds keeping the current auto-refresh mode.
    pub fn set_feed(&mut self, feed: FeedId) -> bool {
        self.configure(feed, self.auto_refresh)
    }

    /// Enable or disable auto-refresh keeping the current feed.
    pub fn set_auto_refresh(&mut self, enabled: bool) {
        self.configure(self.feed, enabled);
    }

    /// Start a fetch of the current feed. Must be called inside a tokio
    /// runtime. Returns false, and does nothing, if a fetch is already
    /// outstanding.
    pub fn refresh(&mut self) -> bool {
        if let Some(in_flight) = &self.in_flight {
            tracing::debug!(feed = %in_flight.feed, "refresh coalesced into in-flight fetch");
            return false;
        }

        let generation = self.generation;
        let feed = self.feed;
        let client = self.client.clone();
        let done_tx = self.done_tx.clone();
        let task = tokio::spawn(async move {
            let result = client.fetch(feed).await;
            // The scheduler may have been dropped meanwhile.
            let _ = done_tx.send(Completion { generation, feed, result });
        });

        self.in_flight = Some(InFlight { generation, feed, task });
        self.state.loading = true;
        self.state.error = None;
        tracing::debug!(feed = %feed, generation, "refresh started");
        true
    }

    /// Cancel the repeating timer. Cached data and any outstanding fetch are
    /// left alone.
    pub fn stop(&mut self) {
        if self.timer.take().is_some() {
            tracing::debug!(feed = %self.feed, "auto-refresh timer stopped");
        }
    }

    /// Wait for the next timer tick or fetch completion and apply it.
    ///
    /// Cancel-safe: can be used as a `tokio::select!` branch. Pends forever
    /// when the timer is stopped and nothing is in flight.
    pub async fn next_event(&mut self) -> SchedulerEvent {
        enum Wake {
            Done(Completion),
            Tick,
        }

        let wake = tokio::select! {
            Some(done) = self.done_rx.recv() => Wake::Done(done),
            () = next_tick(self.timer.as_mut()) => Wake::Tick,
        };

        match wake {
            Wake::Tick => {
                tracing::debug!(feed = %self.feed, "auto-refresh tick");
                SchedulerEvent::Tick { started: self.refresh() }
            }
            Wake::Done(done) => self.apply(done),
        }
    }

    fn apply(&mut self, done: Completion) -> SchedulerEvent {
        let current = done.generation == self.generation
            && self
                .in_flight
                .as_ref()
                .is_some_and(|f| f.generation == done.generation);
        if !current {
            tracing::debug!(feed = %done.feed, "discarding fetch for superseded feed");
            return SchedulerEvent::Discarded { feed: done.feed };
        }

        self.in_flight = None;
        self.state.loading = false;

        match done.result {
            Ok(snapshot) => {
                let events = snapshot.len();
                self.state.last_updated = Some(snapshot.fetched_at);
                self.state.snapshot = Some(Arc::new(snapshot));
                self.state.error = None;
                tracing::info!(feed = %done.feed, events, "feed refreshed");
                SchedulerEvent::Updated { feed: done.feed, events }
            }
            Err(error) => {
                tracing::warn!(feed = %done.feed, %error, "feed refresh failed, keeping cached snapshot");
                self.state.error = Some(error.clone());
                SchedulerEvent::Failed { feed: done.feed, error }
            }
        }
    }

    fn start_timer(&mut self) {
        let mut timer = tokio::time::interval_at(Instant::now() + self.period, self.period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
        self.timer = Some(timer);
        tracing::debug!(feed = %self.feed, period_secs = self.period.as_secs(), "auto-refresh timer started");
    }

    fn abort_in_flight(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            tracing::debug!(feed = %in_flight.feed, "aborting fetch for previous feed");
            in_flight.task.abort();
            self.state.loading = false;
        }
    }
}

async fn next_tick(timer: Option<&mut Interval>) {
    match timer {
        Some(timer) => {
            timer.tick().await;
        }
        None => std::future::pending().await,
    }
}

impl std::fmt::Debug for RefreshScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshScheduler")
            .field("feed", &self.feed)
            .field("auto_refresh", &self.auto_refresh)
            .field("timer_running", &self.timer.is_some())
            .field("in_flight", &self.in_flight.is_some())
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
