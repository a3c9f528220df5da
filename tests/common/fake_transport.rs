//! FakeTransport — an in-process [`Transport`] answering from a script.
//!
//! Requests are matched against routes by URL substring, first match wins.
//! Each route holds a queue of [`Reply`]s: replies are consumed in order and
//! the last one repeats forever. Unmatched URLs get HTTP 404.
//!
//! Every reply may carry a delay, slept with `tokio::time::sleep`, so
//! ordering and timeout scenarios are deterministic with
//! `#[tokio::test(start_paused = true)]`.
//!
//! ```rust,ignore
//! let transport = FakeTransport::new();
//! transport.route("all_day", Reply::ok(FEED_DAY));
//! transport.route("country=Chile", Reply::ok(PLACE_CHILE).after(Duration::from_secs(2)));
//! ```

use bytes::Bytes;
use futures::future::{BoxFuture, FutureExt};
use quake_feeds::{Transport, TransportError};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One scripted response.
#[derive(Debug, Clone)]
pub struct Reply {
    delay: Duration,
    result: Result<Bytes, TransportError>,
}

impl Reply {
    pub fn ok(body: impl Into<Bytes>) -> Self {
        Self { delay: Duration::ZERO, result: Ok(body.into()) }
    }

    pub fn status(code: u16) -> Self {
        Self { delay: Duration::ZERO, result: Err(TransportError::Status(code)) }
    }

    pub fn network(message: &str) -> Self {
        Self { delay: Duration::ZERO, result: Err(TransportError::Network(message.to_string())) }
    }

    /// A reply that never arrives within any sane timeout.
    pub fn hang() -> Self {
        Self::ok("").after(Duration::from_secs(24 * 60 * 60))
    }

    /// Deliver this reply only after `delay`.
    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

struct Route {
    pattern: String,
    replies: VecDeque<Reply>,
}

#[derive(Default)]
pub struct FakeTransport {
    routes: Mutex<Vec<Route>>,
    calls: Mutex<Vec<String>>,
}

impl FakeTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue `reply` for URLs containing `pattern`.
    pub fn route(&self, pattern: &str, reply: Reply) -> &Self {
        let mut routes = self.routes.lock().unwrap();
        match routes.iter_mut().find(|r| r.pattern == pattern) {
            Some(route) => route.replies.push_back(reply),
            None => routes.push(Route {
                pattern: pattern.to_string(),
                replies: VecDeque::from([reply]),
            }),
        }
        self
    }

    /// Every URL requested so far, in request order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of requests whose URL contains `pattern`.
    pub fn call_count(&self, pattern: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|url| url.contains(pattern)).count()
    }

    fn next_reply(&self, url: &str) -> Reply {
        let mut routes = self.routes.lock().unwrap();
        let Some(route) = routes.iter_mut().find(|r| url.contains(&r.pattern)) else {
            return Reply::status(404);
        };
        if route.replies.len() > 1 {
            route.replies.pop_front().unwrap()
        } else {
            route.replies.front().cloned().unwrap()
        }
    }
}

impl Transport for FakeTransport {
    fn get(&self, url: &str, _timeout: Duration) -> BoxFuture<'static, Result<Bytes, TransportError>> {
        self.calls.lock().unwrap().push(url.to_string());
        let reply = self.next_reply(url);
        async move {
            if !reply.delay.is_zero() {
                tokio::time::sleep(reply.delay).await;
            }
            reply.result
        }
        .boxed()
    }
}
