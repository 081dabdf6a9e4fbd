//! Tick scheduling and HH:MM:SS digit-buffer handling.
//!
//! The countdown is not a self-sustaining interval: [`tick`] schedules a
//! single message one second out, and the session re-arms it after each
//! tick while the timer should keep counting. Pausing or finishing simply
//! stops re-arming, so no separate cancellation is needed.

use bubbletea_rs::{tick as bubbletea_tick, Cmd, Msg};
use std::time::Duration;

/// Message delivered one second after [`tick`] is armed.
#[derive(Debug, Clone)]
pub struct TickMsg;

/// Schedules a single tick one second out.
pub fn tick() -> Cmd {
    bubbletea_tick(Duration::from_secs(1), |_| Box::new(TickMsg) as Msg)
}

fn pad(buf: &str) -> String {
    format!("{:0>6}", buf)
}

/// Renders a raw digit buffer as a zero-padded `HH:MM:SS` string.
///
/// Total for any buffer of 0-6 digits.
pub fn format_buffer(buf: &str) -> String {
    let padded = pad(buf);
    format!("{}:{}:{}", &padded[0..2], &padded[2..4], &padded[4..6])
}

/// Converts a digit buffer into total seconds.
///
/// Minutes and seconds clamp to 59; hours are unclamped so arbitrarily
/// long timers stay representable. Zero means "nothing valid entered" and
/// callers must not start a timer from it.
pub fn parse_and_validate(buf: &str) -> u64 {
    let padded = pad(buf);
    let h: u64 = padded[0..2].parse().unwrap_or(0);
    let m: u64 = padded[2..4].parse::<u64>().unwrap_or(0).min(59);
    let s: u64 = padded[4..6].parse::<u64>().unwrap_or(0).min(59);
    h * 3600 + m * 60 + s
}

/// Formats a remaining-seconds count as `HH:MM:SS`.
pub fn format_seconds(total: u64) -> String {
    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}
