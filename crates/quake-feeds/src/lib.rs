//! quake-feeds — network-facing components for quakewatch.
//!
//! [`FeedClient`] and [`GeocodeClient`] each perform one bounded GET through
//! an injected [`Transport`]. [`RefreshScheduler`] keeps the feed cache fresh
//! and [`GeocodeResolver`] tracks the current region; both are driven by
//! their owner awaiting `next_event()`.

pub mod error;
pub mod feed;
pub mod geocode;
pub mod resolver;
pub mod scheduler;
pub mod transport;

pub use error::{FeedError, GeocodeError, TransportError};
pub use feed::FeedClient;
pub use geocode::{GeocodeClient, Region};
pub use resolver::{GeocodeResolver, GeocodeState, Resolution, Resolve};
pub use scheduler::{RefreshScheduler, RefreshState, SchedulerEvent};
pub use transport::{HttpTransport, Transport};
