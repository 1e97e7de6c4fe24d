//! The slash-command adapter over a [`WorldClock`].
//!
//! The host hands this module the raw text a player typed; it tokenizes,
//! validates, executes against a clock instance, and renders a printable
//! reply. Malformed input never propagates an error out of here: it is
//! turned into the usage text or a plain message, because the reply goes
//! straight back to a chat window.

use crate::common::UnixSeconds;
use crate::engine::WorldClock;

/// The fixed usage text printed for `help` and unrecognized input.
pub const USAGE: &str = "\
Usage: /clock [time|date|moon] [timestamp]
  (no arguments)     current world time
  time [timestamp]   world time, now or at a 10-digit UNIX timestamp
  date [timestamp]   calendar date, now or at a 10-digit UNIX timestamp
  moon [timestamp]   moon phase, now or at a 10-digit UNIX timestamp
  help               this message";

const BAD_TIMESTAMP: &str =
    "That timestamp doesn't look right; expected 10 digits of UNIX seconds.";

/// A parsed clock command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// World time, now or at an explicit timestamp.
    Time(Option<UnixSeconds>),
    /// Calendar date, now or at an explicit timestamp.
    Date(Option<UnixSeconds>),
    /// Moon descriptor, now or at an explicit timestamp.
    Moon(Option<UnixSeconds>),
    /// The usage text, for `help` and anything unrecognized.
    Help,
    /// A second token that failed the 10-digit check. Nothing is computed.
    BadTimestamp,
}

impl Command {
    /// Tokenizes one line of input.
    ///
    /// Zero tokens read the current time; one names a snapshot kind; a
    /// second must be a 10-digit timestamp. The first token is
    /// case-normalized. More than two tokens is a usage error.
    pub fn parse(input: &str) -> Command {
        let tokens: Vec<&str> = input.split_whitespace().collect();
        if tokens.len() > 2 {
            return Command::Help;
        }

        let timestamp = match tokens.get(1) {
            Some(raw) => match parse_timestamp(raw) {
                Some(ts) => Some(ts),
                None => return Command::BadTimestamp,
            },
            None => None,
        };

        match tokens.first().map(|token| token.to_lowercase()).as_deref() {
            None => Command::Time(None),
            Some("time") => Command::Time(timestamp),
            Some("date") => Command::Date(timestamp),
            Some("moon") => Command::Moon(timestamp),
            _ => Command::Help,
        }
    }

    /// Executes this command against `clock` and renders the reply.
    pub fn execute(&self, clock: &WorldClock) -> String {
        match self {
            Command::Time(None) => render_time(clock.clock()),
            Command::Time(Some(ts)) => match clock.clock_at(*ts) {
                Ok(snapshot) => render_time(snapshot),
                Err(_) => BAD_TIMESTAMP.to_string(),
            },
            Command::Date(None) => clock.date().to_string(),
            Command::Date(Some(ts)) => match clock.date_at(*ts) {
                Ok(snapshot) => snapshot.to_string(),
                Err(_) => BAD_TIMESTAMP.to_string(),
            },
            Command::Moon(None) => render_moon(clock.moon()),
            Command::Moon(Some(ts)) => match clock.moon_at(*ts) {
                Ok(snapshot) => render_moon(snapshot),
                Err(_) => BAD_TIMESTAMP.to_string(),
            },
            Command::Help => USAGE.to_string(),
            Command::BadTimestamp => BAD_TIMESTAMP.to_string(),
        }
    }

    /// Parses and executes in one step.
    pub fn run(input: &str, clock: &WorldClock) -> String {
        Command::parse(input).execute(clock)
    }
}

/// Accepts exactly ten ASCII digits.
fn parse_timestamp(raw: &str) -> Option<UnixSeconds> {
    if raw.len() != 10 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

fn render_time(snapshot: crate::snapshot::ClockSnapshot) -> String {
    format!("It is {} ({})", snapshot, snapshot.segment())
}

fn render_moon(snapshot: crate::snapshot::MoonSnapshot) -> String {
    format!(
        "{}\nNext phase in {:.1} days; full moon in {:.1} days.",
        snapshot, snapshot.days_to_next_phase, snapshot.days_to_full_moon
    )
}
