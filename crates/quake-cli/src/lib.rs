//! quakewatch shell — wires config, transport, clients, scheduler and
//! resolver together and hands them to the [`App`] event loop.

pub mod app;
pub mod commands;
pub mod render;

pub use app::{App, Startup};
pub use render::OutputFormat;

use quake_core::config::Config;
use quake_core::FeedId;
use quake_feeds::{FeedClient, GeocodeClient, GeocodeResolver, HttpTransport, RefreshScheduler, Transport};
use std::sync::Arc;

/// Per-run choices, already merged from config and command-line flags.
#[derive(Debug, Clone, Default)]
pub struct Options {
    pub feed: FeedId,
    pub auto_refresh: bool,
    pub min_magnitude: f64,
    pub country: Option<String>,
    pub format: OutputFormat,
    /// Fetch, print and exit instead of reading commands.
    pub once: bool,
}

impl Options {
    /// Defaults taken from the `[feed]` and `[filter]` config sections.
    pub fn from_config(config: &Config) -> Self {
        Self {
            feed: config.feed.default_feed,
            auto_refresh: config.feed.auto_refresh,
            min_magnitude: config.filter.min_magnitude,
            ..Self::default()
        }
    }
}

/// Build the app against the real network and run it on stdin/stdout.
pub async fn run(config: &Config, options: Options) -> anyhow::Result<()> {
    let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new(&config.geocode.user_agent)?);
    let feed = FeedClient::new(transport.clone(), config.feed.base_url.clone(), config.feed.timeout());
    let geocode = GeocodeClient::new(transport, config.geocode.endpoint.clone(), config.geocode.timeout());

    let app = App::new(
        RefreshScheduler::new(feed, config.feed.refresh_interval()),
        GeocodeResolver::new(geocode),
        options.min_magnitude,
        options.format,
    );
    let startup = Startup {
        feed: options.feed,
        auto_refresh: options.auto_refresh,
        country: options.country,
    };

    tracing::debug!(feed = %startup.feed, once = options.once, "starting");
    let mut out = std::io::stdout();
    if options.once {
        app.run_once(&mut out, startup).await
    } else {
        let input = tokio::io::BufReader::new(tokio::io::stdin());
        app.run_interactive(input, &mut out, startup).await
    }
}
