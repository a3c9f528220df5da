//! quakewatch — cached, auto-refreshing view of the USGS earthquake feed.
//!
//! This crate re-exports the workspace members so that integration tests and
//! benches can import them from one place.
//!
//! # Architecture
//!
//! ```text
//! Transport ──► FeedClient ──► RefreshScheduler ──► FeedSnapshot ─┐
//!     │                                                            ├──► filter ──► shell
//!     └──────► GeocodeClient ──► GeocodeResolver ──► BoundingBox ─┘
//! ```
//!
//! Everything runs on one tokio task: the shell owns the scheduler and the
//! resolver and applies their results as `next_event()` yields them.

pub use quake_cli;
pub use quake_core;
pub use quake_feeds;
