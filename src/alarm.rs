//! Alarm boundary: desktop notification and looping audio playback.
//!
//! Everything here is best-effort. Failures are swallowed, and a missing
//! audio file simply means a silent alarm.

use notify_rust::{Notification, Urgency};
use rodio::{Decoder, OutputStream, Sink, Source};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Receiver;

const APP_NAME: &str = "Tuimer";
const NOTIFY_TITLE: &str = "Tuimer";
const NOTIFY_BODY: &str = "Time is up!";

/// Fires the "time is up" desktop notification. Fire-and-forget.
pub fn notify() {
    let _ = Notification::new()
        .appname(APP_NAME)
        .summary(NOTIFY_TITLE)
        .body(NOTIFY_BODY)
        .urgency(Urgency::Critical)
        .show();
}

fn is_alarm_file(path: &Path) -> bool {
    matches!(
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref(),
        Some("mp3") | Some("wav") | Some("ogg")
    )
}

/// First file in `dir` with an extension rodio is built to decode.
/// Ties among multiple matches go to directory order.
fn find_alarm_file(dir: &Path) -> Option<PathBuf> {
    for entry in std::fs::read_dir(dir).ok()?.flatten() {
        let path = entry.path();
        if is_alarm_file(&path) {
            return Some(path);
        }
    }
    None
}

fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("tuimer"))
}

/// Loops the user-supplied alarm sound until a stop signal arrives.
///
/// Runs on a dedicated thread. A `recv` error means the session dropped
/// the sender without reaching us in time; playback stops then as well.
pub fn play(stop: Receiver<()>) {
    let Some(path) = config_dir().and_then(|dir| find_alarm_file(&dir)) else {
        return;
    };
    let Ok((_stream, handle)) = OutputStream::try_default() else {
        return;
    };
    let Ok(file) = File::open(&path) else {
        return;
    };
    let Ok(source) = Decoder::new(BufReader::new(file)) else {
        return;
    };
    let Ok(sink) = Sink::try_new(&handle) else {
        return;
    };

    sink.append(source.repeat_infinite());
    let _ = stop.recv();
    sink.stop();
}
