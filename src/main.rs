use clap::{Parser, ValueEnum};
use quake_cli::{Options, OutputFormat};
use quake_core::{config::Config, filter, FeedId};
use std::path::PathBuf;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Text,
    Jsonl,
}

#[derive(Parser)]
#[command(name = "quakewatch", about = "quakewatch — live USGS earthquake feed with magnitude and region filters")]
struct Cli {
    /// Feed window: hour, day, week or month (all_* forms accepted).
    #[arg(long)]
    feed: Option<FeedId>,

    /// Minimum magnitude, inclusive (0–10).
    #[arg(long, value_parser = parse_min_mag, allow_negative_numbers = true)]
    min_mag: Option<f64>,

    /// Restrict events to this country's bounding box.
    #[arg(long)]
    country: Option<String>,

    /// Do not refresh every five minutes.
    #[arg(long)]
    no_auto_refresh: bool,

    /// Override the feed base URL (directory holding `<feed>.geojson`).
    #[arg(long)]
    feed_url: Option<String>,

    /// Override the geocoder search endpoint.
    #[arg(long)]
    geocode_url: Option<String>,

    /// Fetch once, print matching events and exit.
    #[arg(long)]
    once: bool,

    /// Output format for event listings.
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Config file to use instead of ~/.config/quakewatch/config.toml.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write debug logs to /tmp/quakewatch-debug.log (tail -f to inspect).
    #[arg(long)]
    debug: bool,
}

fn parse_min_mag(s: &str) -> Result<f64, String> {
    let m: f64 = s.trim().parse().map_err(|_| format!("{s:?} is not a number"))?;
    if filter::is_valid_min_magnitude(m) {
        Ok(m)
    } else {
        Err(format!("magnitude must be between 0 and {}", filter::MAX_MAGNITUDE))
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.debug {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open("/tmp/quakewatch-debug.log")?;
        tracing_subscriber::fmt()
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .init();
        tracing::info!("quakewatch debug log started — tail -f /tmp/quakewatch-debug.log");
    }

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load().unwrap_or_else(|_| Config::defaults()),
    };
    if let Some(url) = cli.feed_url {
        config.feed.base_url = url;
    }
    if let Some(url) = cli.geocode_url {
        config.geocode.endpoint = url;
    }

    let mut options = Options::from_config(&config);
    if let Some(feed) = cli.feed {
        options.feed = feed;
    }
    if let Some(min_mag) = cli.min_mag {
        options.min_magnitude = min_mag;
    }
    if cli.no_auto_refresh {
        options.auto_refresh = false;
    }
    options.country = cli.country;
    options.once = cli.once;
    options.format = match cli.format {
        Format::Text => OutputFormat::Text,
        Format::Jsonl => OutputFormat::Jsonl,
    };

    quake_cli::run(&config, options).await
}
