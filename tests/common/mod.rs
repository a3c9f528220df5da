//! Shared test utilities for quakewatch integration harnesses.
//!
//! Import everything you need via `mod common; use common::*;` at the top of
//! each harness file. The in-process fakes are deterministic under
//! `tokio::time::pause()`; the HTTP fake binds a real loopback port.

pub mod assertions;
pub mod builders;
pub mod fake_api;
pub mod fake_transport;

pub use assertions::*;
pub use builders::*;
pub use fake_transport::{FakeTransport, Reply};
pub use fixtures::*;
