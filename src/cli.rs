//! Command-line surface: argument parsing and duration syntax.

use clap::Parser;
use std::fmt;

const AFTER_HELP: &str = "\
Controls:
  0-9         Type time (HH:MM:SS)
  Enter       Start timer / Stop alarm (Reset)
  Space       Pause / Resume
  q           Reset to input (if running) / Quit (if at input)
  Ctrl+C      Force quit

Hidden shortcuts (input mode):
  p           Pomodoro (25m)
  s           Short break (5m)
  l           Long break (15m)

Configuration:
  Place alarm.mp3 (or .wav/.ogg) in <config dir>/tuimer/";

/// Tuimer - Minimal TUI Timer.
#[derive(Debug, Parser)]
#[command(name = "tuimer", version, about = "Tuimer - Minimal TUI Timer", after_help = AFTER_HELP)]
pub struct Args {
    /// Countdown duration, e.g. "10m", "1h30m", "45s".
    /// Omit to start in interactive input mode.
    pub duration: Vec<String>,
}

/// Error for a duration argument that doesn't follow `<number><unit>`
/// syntax.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DurationError(String);

impl fmt::Display for DurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid duration {:?}", self.0)
    }
}

impl std::error::Error for DurationError {}

/// Parses a duration string like "10m", "1h30m", or "45s" into whole
/// seconds.
///
/// The syntax is one or more `<number><unit>` groups with units `h`, `m`,
/// and `s`. A trailing number without a unit is an error, as is an empty
/// input.
pub fn parse_duration(input: &str) -> Result<u64, DurationError> {
    let err = || DurationError(input.to_string());

    let mut total: u64 = 0;
    let mut digits = String::new();
    let mut saw_group = false;

    for ch in input.chars() {
        if ch.is_ascii_digit() {
            digits.push(ch);
            continue;
        }
        let unit: u64 = match ch {
            'h' => 3600,
            'm' => 60,
            's' => 1,
            _ => return Err(err()),
        };
        let value: u64 = digits.parse().map_err(|_| err())?;
        total = total.saturating_add(value.saturating_mul(unit));
        digits.clear();
        saw_group = true;
    }

    if !digits.is_empty() || !saw_group {
        return Err(err());
    }
    Ok(total)
}
