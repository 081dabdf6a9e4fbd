//! Lipgloss style set shared by the renderer.

use lipgloss_extras::lipgloss::{Color, Style};

const PRIMARY: &str = "#36968e";
const SUBTLE: &str = "241";
const ALERT: &str = "196";

/// Normal time display, both while typing and while counting down.
pub fn time() -> Style {
    Style::new().foreground(Color::from(PRIMARY)).bold(true)
}

/// Muted time display while paused.
pub fn paused() -> Style {
    Style::new().foreground(Color::from(SUBTLE)).bold(true)
}

/// Attention-grabbing time display once the timer has finished.
pub fn alarm() -> Style {
    Style::new()
        .foreground(Color::from(ALERT))
        .bold(true)
        .blink(true)
}

/// Filled portion of the progress bar.
pub fn bar_filled() -> Style {
    Style::new().foreground(Color::from(PRIMARY))
}

/// Empty portion of the progress bar.
pub fn bar_empty() -> Style {
    Style::new().foreground(Color::from(SUBTLE))
}
