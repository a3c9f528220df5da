// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

use quake_core::filter::is_valid_min_magnitude;
use quake_core::FeedId;

/// A parsed, validated shell command ready to be executed by the app.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    // Leave the shell
    Quit,
    // Print the command summary
    Help,
    // Set the inclusive magnitude floor
    MinMagnitude(f64),
    // Resolve a region; an empty string clears it
    Country(String),
    // Switch feeds, refreshing immediately
    Feed(FeedId),
    // Toggle the auto-refresh timer
    Auto(bool),
    // Manual refresh
    Refresh,
    // Print the filtered events
    List,
    // Print feed and filter state
    Status,
}

pub const HELP: &str = "\
commands:
  mag <0-10>          minimum magnitude (inclusive)
  country [name]      restrict to a country's bounding box; no name clears it
  feed <id>           hour | day | week | month (refreshes immediately)
  auto on|off         toggle the 5 minute auto-refresh
  refresh, r          refresh now
  list, ls            print matching events
  status              feed, loading, error and filter state
  help                this text
  q, quit             exit";

impl Command {
    /// Parse one input line.
    ///
    /// Returns `Ok(cmd)` on success, `Err(message)` on failure. An empty
    /// line returns `Err("")` as a sentinel meaning "do nothing".
    pub fn parse(input: &str) -> Result<Command, String> {
        let input = input.trim();
        if input.is_empty() {
            return Err(String::new());
        }

        let (word, rest) = input
            .split_once(char::is_whitespace)
            .map(|(w, r)| (w, r.trim()))
            .unwrap_or((input, ""));

        match word {
            "q" | "quit" | "exit" => Ok(Command::Quit),
            "help" | "?" => Ok(Command::Help),
            "r" | "refresh" => Ok(Command::Refresh),
            "ls" | "list" => Ok(Command::List),
            "status" => Ok(Command::Status),
            "country" => Ok(Command::Country(rest.to_string())),
            "mag" => match rest.parse::<f64>() {
                Ok(m) if is_valid_min_magnitude(m) => Ok(Command::MinMagnitude(m)),
                Ok(_) => Err("magnitude must be 0–10".to_string()),
                Err(_) => Err("usage: mag <0-10>".to_string()),
            },
            "feed" => {
                if rest.is_empty() {
                    Err("usage: feed <hour|day|week|month>".to_string())
                } else {
                    rest.parse::<FeedId>().map(Command::Feed).map_err(|e| e.to_string())
                }
            }
            "auto" => match rest {
                "on" | "true" | "1" => Ok(Command::Auto(true)),
                "off" | "false" | "0" => Ok(Command::Auto(false)),
                _ => Err("usage: auto on|off".to_string()),
            },
            other => Err(format!("unknown command: {other}")),
        }
    }
}
