//! Top-level application state and the main event loop.
//!
//! [`App`] owns the [`RefreshScheduler`] and the [`GeocodeResolver`] and is
//! the only place their state changes. [`App::run_interactive`] multiplexes
//! stdin commands, scheduler events and region lookups on one task;
//! [`App::run_once`] fetches, resolves and prints a single time.

use crate::commands::{Command, HELP};
use crate::render::{self, OutputFormat};
use anyhow::bail;
use chrono::Local;
use quake_core::{filter, FeedId, FilterCriteria, SeismicEvent};
use quake_feeds::{GeocodeResolver, RefreshScheduler, Resolution, Resolve, SchedulerEvent};
use std::io::{self, Write};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// What to do before the first command is read.
#[derive(Debug, Clone, Default)]
pub struct Startup {
    pub feed: FeedId,
    pub auto_refresh: bool,
    pub country: Option<String>,
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App {
    scheduler: RefreshScheduler,
    resolver: GeocodeResolver,
    min_magnitude: f64,
    format: OutputFormat,
    quit: bool,
}

impl App {
    pub fn new(
        scheduler: RefreshScheduler,
        resolver: GeocodeResolver,
        min_magnitude: f64,
        format: OutputFormat,
    ) -> Self {
        Self {
            scheduler,
            resolver,
            min_magnitude,
            format,
            quit: false,
        }
    }

    pub fn scheduler(&self) -> &RefreshScheduler {
        &self.scheduler
    }

    pub fn resolver(&self) -> &GeocodeResolver {
        &self.resolver
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria::new(self.min_magnitude).with_bbox(self.resolver.bbox())
    }

    /// Filtered events of the cached snapshot plus the unfiltered total.
    pub fn filtered(&self) -> (Vec<&SeismicEvent>, usize) {
        match &self.scheduler.state().snapshot {
            Some(snapshot) => (filter::apply(snapshot, &self.criteria()), snapshot.len()),
            None => (Vec::new(), 0),
        }
    }

    // -----------------------------------------------------------------------
    // Event loops
    // -----------------------------------------------------------------------

    /// Read commands from `input` until `quit` or end of input, applying
    /// refreshes and region lookups as they complete.
    pub async fn run_interactive<R, W>(mut self, input: R, out: &mut W, startup: Startup) -> anyhow::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        enum Wake {
            Line(Option<String>),
            Scheduler(SchedulerEvent),
            Region(Resolution),
        }

        writeln!(out, "quakewatch — type `help` for commands")?;
        self.start(&startup, out)?;
        out.flush()?;

        let mut lines = input.lines();
        while !self.quit {
            let wake = tokio::select! {
                line = lines.next_line() => Wake::Line(line?),
                event = self.scheduler.next_event() => Wake::Scheduler(event),
                resolution = self.resolver.next_event() => Wake::Region(resolution),
            };

            match wake {
                Wake::Line(Some(line)) => self.handle_line(&line, out)?,
                Wake::Line(None) => {
                    tracing::debug!("input closed");
                    break;
                }
                Wake::Scheduler(event) => self.on_scheduler_event(event, out)?,
                Wake::Region(resolution) => self.on_resolution(resolution, out)?,
            }
            out.flush()?;
        }

        self.scheduler.stop();
        Ok(())
    }

    /// Fetch the feed once, resolve the startup country if any, print the
    /// filtered events and return. Fails if either network call fails.
    pub async fn run_once<W: Write>(mut self, out: &mut W, startup: Startup) -> anyhow::Result<()> {
        self.scheduler.configure(startup.feed, false);
        let region_pending = match startup.country.as_deref() {
            Some(query) => matches!(self.resolver.resolve(query), Resolve::Issued(_)),
            None => false,
        };

        loop {
            match self.scheduler.next_event().await {
                SchedulerEvent::Updated { .. } => break,
                SchedulerEvent::Failed { feed, error } => bail!("refresh of {feed} failed: {error}"),
                other => tracing::debug!(event = ?other, "ignoring scheduler event"),
            }
        }

        if region_pending {
            let resolution = self.resolver.next_event().await;
            if let Err(error) = resolution.outcome {
                bail!("region {:?}: {error}", resolution.query);
            }
        }

        let (events, _) = self.filtered();
        render::write_events(out, &events, self.format, &Local)?;
        out.flush()?;
        Ok(())
    }

    fn start<W: Write>(&mut self, startup: &Startup, out: &mut W) -> io::Result<()> {
        writeln!(out, "loading {} ({})…", startup.feed.label(), startup.feed)?;
        self.scheduler.configure(startup.feed, startup.auto_refresh);
        if let Some(query) = startup.country.as_deref() {
            self.execute(Command::Country(query.to_string()), out)?;
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Handlers
    // -----------------------------------------------------------------------

    /// Parse and execute one input line.
    pub fn handle_line<W: Write>(&mut self, line: &str, out: &mut W) -> io::Result<()> {
        match Command::parse(line) {
            Ok(cmd) => {
                tracing::debug!(command = ?cmd, "executing command");
                self.execute(cmd, out)
            }
            Err(msg) if msg.is_empty() => Ok(()),
            Err(msg) => writeln!(out, "error: {msg}"),
        }
    }

    /// Execute a parsed [`Command`] against the application state.
    pub fn execute<W: Write>(&mut self, cmd: Command, out: &mut W) -> io::Result<()> {
        match cmd {
            Command::Quit => {
                self.quit = true;
                Ok(())
            }
            Command::Help => writeln!(out, "{HELP}"),
            Command::MinMagnitude(m) => {
                self.min_magnitude = m;
                self.write_summary(out)
            }
            Command::Country(query) => match self.resolver.resolve(&query) {
                Resolve::Cleared => {
                    writeln!(out, "region cleared")?;
                    self.write_summary(out)
                }
                Resolve::Issued(_) => writeln!(out, "searching for {:?}…", query.trim()),
            },
            Command::Feed(feed) => {
                if self.scheduler.set_feed(feed) {
                    writeln!(out, "loading {} ({feed})…", feed.label())
                } else {
                    writeln!(out, "already showing {feed}")
                }
            }
            Command::Auto(enabled) => {
                self.scheduler.set_auto_refresh(enabled);
                let state = if enabled { "on" } else { "off" };
                writeln!(out, "auto-refresh {state}")
            }
            Command::Refresh => {
                if self.scheduler.refresh() {
                    writeln!(out, "refreshing {}…", self.scheduler.feed())
                } else {
                    writeln!(out, "refresh already in progress")
                }
            }
            Command::List => {
                let (events, _) = self.filtered();
                render::write_events(out, &events, self.format, &Local)?;
                self.write_summary(out)
            }
            Command::Status => self.write_status(out),
        }
    }

    pub fn on_scheduler_event<W: Write>(&mut self, event: SchedulerEvent, out: &mut W) -> io::Result<()> {
        match event {
            SchedulerEvent::Updated { feed, .. } => {
                let updated = render::format_time(self.scheduler.state().last_updated, &Local);
                writeln!(out, "[{updated}] {feed} refreshed")?;
                self.write_summary(out)
            }
            SchedulerEvent::Failed { feed, error } => {
                let cached = self
                    .scheduler
                    .state()
                    .snapshot
                    .as_ref()
                    .map_or(0, |s| s.len());
                writeln!(out, "{feed} refresh failed: {error} (keeping {cached} cached events)")
            }
            SchedulerEvent::Tick { .. } | SchedulerEvent::Discarded { .. } => Ok(()),
        }
    }

    pub fn on_resolution<W: Write>(&mut self, resolution: Resolution, out: &mut W) -> io::Result<()> {
        match &resolution.outcome {
            Ok(region) => writeln!(out, "region: {} ({})", region.display_name, region.bbox)?,
            Err(error) => writeln!(out, "region {:?}: {error}", resolution.query)?,
        }
        self.write_summary(out)
    }

    fn write_summary<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let (events, total) = self.filtered();
        let line = render::summary_line(
            events.len(),
            total,
            &self.criteria(),
            self.resolver.state().display_name.as_deref(),
        );
        writeln!(out, "{line}")
    }

    fn write_status<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let state = self.scheduler.state();
        let region = self.resolver.state();
        writeln!(out, "feed:         {} ({})", self.scheduler.feed().label(), self.scheduler.feed())?;
        writeln!(out, "auto-refresh: {}", if self.scheduler.is_timer_running() { "on" } else { "off" })?;
        writeln!(out, "loading:      {}", state.loading)?;
        writeln!(out, "last update:  {}", render::format_time(state.last_updated, &Local))?;
        match &state.error {
            Some(error) => writeln!(out, "error:        {error}")?,
            None => writeln!(out, "error:        {}", render::PLACEHOLDER)?,
        }
        writeln!(out, "min mag:      {:.1}", self.min_magnitude)?;
        let region_line = match (&region.display_name, &region.error, region.searching) {
            (_, _, true) => "searching…".to_string(),
            (Some(name), _, _) => name.clone(),
            (None, Some(error), _) => error.to_string(),
            (None, None, _) => render::PLACEHOLDER.to_string(),
        };
        writeln!(out, "region:       {region_line}")?;
        self.write_summary(out)
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("scheduler", &self.scheduler)
            .field("resolver", &self.resolver)
            .field("min_magnitude", &self.min_magnitude)
            .field("format", &self.format)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
