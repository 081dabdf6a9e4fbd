//! Frame rendering: a pure function from session state and terminal size
//! to a text frame.
//!
//! The bar geometry branches on terminal size through an explicit
//! [`Layout`] decision table so every small-terminal edge case stays
//! enumerable. Whatever the size, fill is proportional to the elapsed
//! fraction and clamped; no layout renders negative or over-full
//! segments.

use crate::clock;
use crate::session::Session;
use crate::styles;
use lipgloss_extras::lipgloss::{self, CENTER};

const MIN_BAR_WIDTH: usize = 10;
const MAX_BAR_WIDTH: usize = 100;
const MIN_BAR_HEIGHT: usize = 3;
const MAX_BAR_HEIGHT: usize = 20;
const MAX_INLINE_BAR: usize = 40;

/// How a frame arranges the time text and progress bar for a given
/// terminal size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Horizontal bar under the time text. The default.
    Horizontal,
    /// One-column bar under the time text, for narrow terminals.
    Vertical,
    /// Bar halves flanking the time text on a single line, for short
    /// terminals.
    Inline,
    /// The terminal fits nothing more than the time; the bar is
    /// suppressed.
    TimeOnly,
}

/// Decision table keyed by terminal size buckets.
pub fn layout_for(width: u16, height: u16) -> Layout {
    match (width, height) {
        (w, h) if h < 5 && w < 30 => Layout::TimeOnly,
        (_, h) if h < 5 => Layout::Inline,
        (w, _) if w < 24 => Layout::Vertical,
        _ => Layout::Horizontal,
    }
}

/// Renders the whole frame for the current session state.
///
/// Returns an empty frame while quitting so the runtime can tear the
/// screen down cleanly.
pub fn render(s: &Session) -> String {
    if s.quitting {
        return String::new();
    }

    let time_str = time_text(s);

    // The bar only exists while a timer is actively counting down.
    if s.entering || s.finished {
        return centered(s, &time_str);
    }

    let percent = s.percent.clamp(0.0, 1.0);
    let content = match layout_for(s.width, s.height) {
        Layout::Horizontal => {
            let bar = horizontal_bar(s.width, percent);
            lipgloss::join_vertical(CENTER, &[&time_str, "", &bar])
        }
        Layout::Vertical => {
            let bar = vertical_bar(s.height, percent);
            lipgloss::join_vertical(CENTER, &[&time_str, "", &bar])
        }
        Layout::Inline => inline_line(s.width, &time_str, percent),
        Layout::TimeOnly => time_str,
    };

    centered(s, &content)
}

fn centered(s: &Session, content: &str) -> String {
    lipgloss::place(
        s.width as i32,
        s.height as i32,
        CENTER,
        CENTER,
        content,
        &[],
    )
}

fn time_text(s: &Session) -> String {
    if s.entering {
        return styles::time().render(&clock::format_buffer(&s.input_buffer));
    }
    let raw = clock::format_seconds(s.remaining);
    if s.finished {
        styles::alarm().render(&raw)
    } else if s.paused {
        styles::paused().render(&format!("{} [PAUSED]", raw))
    } else {
        styles::time().render(&raw)
    }
}

/// Truncating-proportional fill, clamped to the bar size.
fn filled_cells(total: usize, percent: f64) -> usize {
    ((total as f64 * percent) as usize).min(total)
}

fn horizontal_bar(width: u16, percent: f64) -> String {
    let bar_width = ((width as f64 * 0.6) as usize).clamp(MIN_BAR_WIDTH, MAX_BAR_WIDTH);
    let filled = filled_cells(bar_width, percent);
    format!(
        "{}{}",
        styles::bar_filled().render(&"█".repeat(filled)),
        styles::bar_empty().render(&"░".repeat(bar_width - filled)),
    )
}

fn vertical_bar(height: u16, percent: f64) -> String {
    let bar_height = ((height as f64 * 0.6) as usize).clamp(MIN_BAR_HEIGHT, MAX_BAR_HEIGHT);
    let filled = filled_cells(bar_height, percent);
    let mut lines = Vec::with_capacity(bar_height);
    for row in 0..bar_height {
        // The bar drains downward: empty rows accumulate at the top.
        if bar_height - row <= filled {
            lines.push(styles::bar_filled().render("█"));
        } else {
            lines.push(styles::bar_empty().render("░"));
        }
    }
    lines.join("\n")
}

/// Single-line layout: the bar is split into halves flanking the time
/// text, filling left to right across both halves.
fn inline_line(width: u16, time_str: &str, percent: f64) -> String {
    let time_width = lipgloss::width_visible(time_str);
    let total = (width as usize)
        .saturating_sub(time_width + 2)
        .min(MAX_INLINE_BAR);
    if total < 4 {
        return time_str.to_string();
    }

    let filled = filled_cells(total, percent);
    let left_len = total / 2;
    let right_len = total - left_len;
    let left_filled = filled.min(left_len);
    let right_filled = filled - left_filled;

    format!(
        "{}{} {} {}{}",
        styles::bar_filled().render(&"█".repeat(left_filled)),
        styles::bar_empty().render(&"░".repeat(left_len - left_filled)),
        time_str,
        styles::bar_filled().render(&"█".repeat(right_filled)),
        styles::bar_empty().render(&"░".repeat(right_len - right_filled)),
    )
}
