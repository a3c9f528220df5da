//! Plain-text and JSON-lines projection of the filtered events.
//!
//! Only a textual listing lives here; map tiles, marker styling, charts and
//! legends belong to richer front ends.

use chrono::{DateTime, TimeZone, Utc};
use quake_core::{FilterCriteria, SeismicEvent};
use std::fmt::Display;
use std::io::{self, Write};

/// Shown for absent values.
pub const PLACEHOLDER: &str = "—";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Jsonl,
}

pub fn format_time<Tz>(ts: Option<DateTime<Utc>>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match ts {
        Some(ts) => ts.with_timezone(tz).format("%Y-%m-%d %H:%M:%S").to_string(),
        None => PLACEHOLDER.to_string(),
    }
}

/// One human-readable line per event.
pub fn event_line<Tz>(event: &SeismicEvent, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let depth = event
        .depth_km
        .map_or_else(|| PLACEHOLDER.to_string(), |d| format!("{d:.0} km"));
    let place = event.place.as_deref().unwrap_or("unknown location");
    let tsunami = if event.tsunami { "  [tsunami]" } else { "" };
    format!(
        "{}  M{:.1}  {}  {}{}",
        format_time(Some(event.timestamp), tz),
        event.magnitude,
        depth,
        place,
        tsunami
    )
}

pub fn write_events<W, Tz>(
    out: &mut W,
    events: &[&SeismicEvent],
    format: OutputFormat,
    tz: &Tz,
) -> io::Result<()>
where
    W: Write,
    Tz: TimeZone,
    Tz::Offset: Display,
{
    for event in events {
        match format {
            OutputFormat::Text => writeln!(out, "{}", event_line(event, tz))?,
            OutputFormat::Jsonl => {
                serde_json::to_writer(&mut *out, event)?;
                writeln!(out)?;
            }
        }
    }
    Ok(())
}

/// `"37 of 245 events (M >= 4.0, region: Japan)"`.
pub fn summary_line(shown: usize, total: usize, criteria: &FilterCriteria, region: Option<&str>) -> String {
    let mut line = format!("{shown} of {total} events (M >= {:.1}", criteria.min_magnitude);
    match (region, criteria.bbox) {
        (Some(name), _) => line.push_str(&format!(", region: {name}")),
        (None, Some(bbox)) => line.push_str(&format!(", region: {bbox}")),
        (None, None) => {}
    }
    line.push(')');
    line
}
