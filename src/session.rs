//! The session state machine.
//!
//! One owned [`Session`] struct holds every piece of mutable UI state and
//! is driven exclusively through `update` — keys, ticks, and resizes each
//! run to completion before the next event is processed. The alarm is the
//! only concurrent collaborator, and it talks back solely through a
//! one-shot cancellation channel.

use crate::alarm;
use crate::clock::{self, TickMsg};
use crate::view;
use bubbletea_rs::{quit, Cmd, KeyMsg, Model, Msg, WindowSizeMsg};
use crossterm::event::{KeyCode, KeyModifiers};
use once_cell::sync::OnceCell;
use std::sync::mpsc::{self, SyncSender};

const MAX_INPUT_DIGITS: usize = 6;

const POMODORO_SECS: u64 = 25 * 60;
const SHORT_BREAK_SECS: u64 = 5 * 60;
const LONG_BREAK_SECS: u64 = 15 * 60;

// Model::init is an associated function, so the duration parsed from the
// command line rides in here before the program starts.
static START_SECONDS: OnceCell<u64> = OnceCell::new();

/// Records the CLI start duration for [`Model::init`] to pick up.
pub fn set_start_seconds(seconds: u64) {
    let _ = START_SECONDS.set(seconds);
}

/// The entire UI state.
///
/// Exactly one of entering-duration and timer-active holds at any time
/// (`entering`); `finished` and `paused` are sub-states of timer-active.
#[derive(Debug)]
pub struct Session {
    pub width: u16,
    pub height: u16,
    /// Raw typed digits, at most [`MAX_INPUT_DIGITS`] of them. Only
    /// meaningful while entering.
    pub input_buffer: String,
    pub entering: bool,
    /// Configured countdown length in seconds.
    pub duration: u64,
    /// Seconds left; always <= `duration`.
    pub remaining: u64,
    /// `remaining / duration`; drives the bar fill.
    pub percent: f64,
    pub quitting: bool,
    pub finished: bool,
    pub paused: bool,
    pub sound_playing: bool,
    stop_sound: Option<SyncSender<()>>,
}

impl Session {
    fn new(start_seconds: u64) -> Self {
        let mut s = Session {
            width: 0,
            height: 0,
            input_buffer: String::new(),
            entering: true,
            duration: 0,
            remaining: 0,
            percent: 0.0,
            quitting: false,
            finished: false,
            paused: false,
            sound_playing: false,
            stop_sound: None,
        };
        if start_seconds > 0 {
            s.entering = false;
            s.duration = start_seconds;
            s.remaining = start_seconds;
            s.percent = 1.0;
        }
        s
    }

    fn start_timer(&mut self, seconds: u64) -> Option<Cmd> {
        self.duration = seconds;
        self.remaining = seconds;
        self.entering = false;
        self.percent = 1.0;
        Some(clock::tick())
    }

    /// Best-effort alarm cancellation.
    ///
    /// The zero-capacity channel makes the send non-blocking: if the
    /// playback thread isn't at its receive point yet the signal is
    /// dropped rather than stalling the UI. Dropping the sender still
    /// lets an in-flight playback thread observe the disconnect.
    fn stop_alarm(&mut self) {
        if self.sound_playing {
            if let Some(tx) = self.stop_sound.take() {
                let _ = tx.try_send(());
            }
            self.sound_playing = false;
        }
    }

    /// Shared reset path for `q`-while-running and enter-while-finished.
    fn reset_to_entering(&mut self) {
        self.stop_alarm();
        self.finished = false;
        self.paused = false;
        self.entering = true;
        self.input_buffer.clear();
        self.duration = 0;
        self.remaining = 0;
        self.percent = 0.0;
    }

    fn handle_key(&mut self, key: &KeyMsg) -> Option<Cmd> {
        if key.key == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.stop_alarm();
            self.quitting = true;
            return Some(quit());
        }

        match key.key {
            KeyCode::Char('q') => {
                if self.entering {
                    self.quitting = true;
                    Some(quit())
                } else {
                    self.reset_to_entering();
                    None
                }
            }

            KeyCode::Char(' ') => {
                if !self.entering && !self.finished {
                    self.paused = !self.paused;
                    if !self.paused {
                        return Some(clock::tick());
                    }
                }
                None
            }

            KeyCode::Enter => {
                if self.entering {
                    let seconds = clock::parse_and_validate(&self.input_buffer);
                    if seconds > 0 {
                        return self.start_timer(seconds);
                    }
                } else if self.finished {
                    self.reset_to_entering();
                }
                None
            }

            // Hidden Pomodoro shortcuts, live only while entering.
            KeyCode::Char('p') if self.entering => self.start_timer(POMODORO_SECS),
            KeyCode::Char('s') if self.entering => self.start_timer(SHORT_BREAK_SECS),
            KeyCode::Char('l') if self.entering => self.start_timer(LONG_BREAK_SECS),

            KeyCode::Char(c) if c.is_ascii_digit() => {
                if self.entering && self.input_buffer.len() < MAX_INPUT_DIGITS {
                    self.input_buffer.push(c);
                }
                None
            }

            KeyCode::Backspace => {
                if self.entering {
                    self.input_buffer.pop();
                }
                None
            }

            // Any key not explicitly bound is a no-op.
            _ => None,
        }
    }

    fn handle_tick(&mut self) -> Option<Cmd> {
        // Paused ticks don't re-arm; resuming arms a fresh one. A stale
        // tick that lands after a reset is likewise a no-op.
        if self.paused || self.entering {
            return None;
        }

        if self.remaining > 0 {
            self.remaining -= 1;
            self.percent = self.remaining as f64 / self.duration as f64;
            if self.remaining > 0 {
                return Some(clock::tick());
            }
        }

        if self.remaining == 0 && !self.finished {
            self.finished = true;
            self.sound_playing = true;
            let (tx, rx) = mpsc::sync_channel(0);
            self.stop_sound = Some(tx);
            std::thread::spawn(alarm::notify);
            std::thread::spawn(move || alarm::play(rx));
        }
        None
    }

    #[cfg(test)]
    pub fn for_tests(width: u16, height: u16) -> Self {
        let mut s = Session::new(0);
        s.width = width;
        s.height = height;
        s
    }
}

impl Model for Session {
    fn init() -> (Self, Option<Cmd>) {
        let start = START_SECONDS.get().copied().unwrap_or(0);
        let session = Session::new(start);
        let cmd = if session.entering {
            None
        } else {
            Some(clock::tick())
        };
        (session, cmd)
    }

    fn update(&mut self, msg: Msg) -> Option<Cmd> {
        if let Some(size) = msg.downcast_ref::<WindowSizeMsg>() {
            self.width = size.width;
            self.height = size.height;
            return None;
        }
        if let Some(key) = msg.downcast_ref::<KeyMsg>() {
            return self.handle_key(key);
        }
        if msg.downcast_ref::<TickMsg>().is_some() {
            return self.handle_tick();
        }
        None
    }

    fn view(&self) -> String {
        view::render(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyMsg {
        KeyMsg {
            key: code,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn type_digits(s: &mut Session, digits: &str) {
        for d in digits.chars() {
            s.handle_key(&key(KeyCode::Char(d)));
        }
    }

    #[test]
    fn starts_entering_with_empty_buffer() {
        let s = Session::new(0);
        assert!(s.entering);
        assert!(s.input_buffer.is_empty());
        assert_eq!(s.duration, 0);
    }

    #[test]
    fn cli_start_skips_entering_mode() {
        let s = Session::new(5400);
        assert!(!s.entering);
        assert_eq!(s.duration, 5400);
        assert_eq!(s.remaining, 5400);
        assert_eq!(s.percent, 1.0);
    }

    #[test]
    fn buffer_caps_at_six_digits() {
        let mut s = Session::new(0);
        type_digits(&mut s, "000000000");
        assert_eq!(s.input_buffer, "000000");
    }

    #[test]
    fn backspace_drops_last_digit() {
        let mut s = Session::new(0);
        type_digits(&mut s, "123");
        s.handle_key(&key(KeyCode::Backspace));
        assert_eq!(s.input_buffer, "12");
        // Empty buffer stays empty.
        s.handle_key(&key(KeyCode::Backspace));
        s.handle_key(&key(KeyCode::Backspace));
        s.handle_key(&key(KeyCode::Backspace));
        assert_eq!(s.input_buffer, "");
    }

    #[test]
    fn digits_are_ignored_while_running() {
        let mut s = Session::new(0);
        s.start_timer(60);
        type_digits(&mut s, "42");
        assert!(s.input_buffer.is_empty());
    }

    #[test]
    fn confirm_with_empty_buffer_is_a_noop() {
        let mut s = Session::new(0);
        let cmd = s.handle_key(&key(KeyCode::Enter));
        assert!(cmd.is_none());
        assert!(s.entering);
    }

    #[test]
    fn confirm_starts_timer_from_buffer() {
        let mut s = Session::new(0);
        type_digits(&mut s, "001000");
        let cmd = s.handle_key(&key(KeyCode::Enter));
        assert!(cmd.is_some());
        assert!(!s.entering);
        assert_eq!(s.duration, 600);
        assert_eq!(s.remaining, 600);
        assert_eq!(s.percent, 1.0);
    }

    #[test]
    fn presets_start_fixed_durations() {
        for (code, want) in [
            (KeyCode::Char('p'), 1500),
            (KeyCode::Char('s'), 300),
            (KeyCode::Char('l'), 900),
        ] {
            let mut s = Session::new(0);
            let cmd = s.handle_key(&key(code));
            assert!(cmd.is_some());
            assert!(!s.entering);
            assert_eq!(s.duration, want);
            assert_eq!(s.percent, 1.0);
        }
    }

    #[test]
    fn presets_are_dead_while_running() {
        let mut s = Session::new(0);
        s.start_timer(60);
        let cmd = s.handle_key(&key(KeyCode::Char('p')));
        assert!(cmd.is_none());
        assert_eq!(s.duration, 60);
    }

    #[test]
    fn tick_decrements_and_rearms() {
        let mut s = Session::new(0);
        s.start_timer(10);
        let cmd = s.handle_tick();
        assert!(cmd.is_some());
        assert_eq!(s.remaining, 9);
        assert_eq!(s.percent, 0.9);
    }

    #[test]
    fn tick_while_paused_changes_nothing() {
        let mut s = Session::new(0);
        s.start_timer(10);
        s.handle_key(&key(KeyCode::Char(' ')));
        assert!(s.paused);
        let cmd = s.handle_tick();
        assert!(cmd.is_none());
        assert_eq!(s.remaining, 10);
        assert_eq!(s.percent, 1.0);
    }

    #[test]
    fn resume_rearms_the_tick() {
        let mut s = Session::new(0);
        s.start_timer(10);
        s.handle_key(&key(KeyCode::Char(' ')));
        let cmd = s.handle_key(&key(KeyCode::Char(' ')));
        assert!(!s.paused);
        assert!(cmd.is_some());
    }

    #[test]
    fn pause_is_dead_while_entering_and_finished() {
        let mut s = Session::new(0);
        s.handle_key(&key(KeyCode::Char(' ')));
        assert!(!s.paused);

        s.start_timer(1);
        s.handle_tick();
        assert!(s.finished);
        s.handle_key(&key(KeyCode::Char(' ')));
        assert!(!s.paused);
    }

    #[test]
    fn final_tick_finishes_exactly_once() {
        let mut s = Session::new(0);
        s.start_timer(1);
        let cmd = s.handle_tick();
        assert!(cmd.is_none(), "countdown over, no re-arm");
        assert!(s.finished);
        assert!(s.sound_playing);
        assert!(s.stop_sound.is_some());

        // A second tick at zero must not re-trigger the alarm dispatch.
        s.sound_playing = false;
        let cmd = s.handle_tick();
        assert!(cmd.is_none());
        assert!(!s.sound_playing);
    }

    #[test]
    fn stale_tick_after_reset_is_a_noop() {
        let mut s = Session::new(0);
        s.start_timer(10);
        s.handle_key(&key(KeyCode::Char('q')));
        assert!(s.entering);
        let cmd = s.handle_tick();
        assert!(cmd.is_none());
        assert_eq!(s.remaining, 0);
        assert!(!s.finished);
    }

    #[test]
    fn quit_key_while_entering_quits() {
        let mut s = Session::new(0);
        let cmd = s.handle_key(&key(KeyCode::Char('q')));
        assert!(cmd.is_some());
        assert!(s.quitting);
    }

    #[test]
    fn quit_key_while_running_resets_instead() {
        let mut s = Session::new(0);
        s.start_timer(600);
        s.handle_tick();
        let cmd = s.handle_key(&key(KeyCode::Char('q')));
        assert!(cmd.is_none());
        assert!(!s.quitting);
        assert!(s.entering);
        assert!(s.input_buffer.is_empty());
        assert_eq!(s.duration, 0);
        assert_eq!(s.remaining, 0);
        assert_eq!(s.percent, 0.0);
    }

    #[test]
    fn enter_while_finished_resets_and_cancels_alarm() {
        let mut s = Session::new(0);
        s.start_timer(1);
        s.handle_tick();
        assert!(s.finished);

        s.handle_key(&key(KeyCode::Enter));
        assert!(s.entering);
        assert!(!s.finished);
        assert!(!s.sound_playing);
        assert!(s.stop_sound.is_none());
        assert_eq!(s.duration, 0);
    }

    #[test]
    fn force_quit_cancels_alarm() {
        let mut s = Session::new(0);
        s.start_timer(1);
        s.handle_tick();

        let cmd = s.handle_key(&KeyMsg {
            key: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
        });
        assert!(cmd.is_some());
        assert!(s.quitting);
        assert!(s.stop_sound.is_none());
    }

    #[test]
    fn resize_updates_dimensions_only() {
        let mut s = Session::new(0);
        type_digits(&mut s, "42");
        s.update(Box::new(WindowSizeMsg {
            width: 120,
            height: 40,
        }));
        assert_eq!((s.width, s.height), (120, 40));
        assert_eq!(s.input_buffer, "42");
        assert!(s.entering);
    }

    #[test]
    fn unbound_keys_are_noops() {
        let mut s = Session::new(0);
        for code in [KeyCode::Char('x'), KeyCode::Esc, KeyCode::Tab, KeyCode::Up] {
            assert!(s.handle_key(&key(code)).is_none());
        }
        assert!(s.entering);
        assert!(s.input_buffer.is_empty());
    }

    #[test]
    fn full_countdown_scenario() {
        // "001000" -> 10 minutes -> 600 ticks -> finished -> reset.
        let mut s = Session::new(0);
        type_digits(&mut s, "001000");
        s.handle_key(&key(KeyCode::Enter));
        assert_eq!((s.duration, s.remaining), (600, 600));
        assert_eq!(s.percent, 1.0);

        for _ in 0..600 {
            s.handle_tick();
        }
        assert_eq!(s.remaining, 0);
        assert!(s.finished);

        s.handle_key(&key(KeyCode::Char('q')));
        assert!(s.entering);
        assert!(s.input_buffer.is_empty());
        assert_eq!((s.duration, s.remaining), (0, 0));
        assert_eq!(s.percent, 0.0);
    }
}
