//! quake-core — quakewatch core library.
//!
//! Shared data model, the feed normalizer, the filter pipeline and the
//! layered configuration. Nothing in here performs network I/O.
//!
//! # Architecture
//!
//! ```text
//! FeedClient ──► RefreshScheduler ──► FeedSnapshot ──┐
//!                                                     ├──► filter::apply ──► shell
//! GeocodeClient ──► GeocodeResolver ──► BoundingBox ──┘
//! ```
//!
//! The clients, scheduler and resolver live in `quake-feeds`.

pub mod config;
pub mod filter;
pub mod normalizer;
pub mod types;

pub use filter::FilterCriteria;
pub use types::{BoundingBox, FeedId, FeedSnapshot, SeismicEvent};
