//! Mode state channel
//!
//! The only shared-mutable boundary between the render loop and whatever
//! drives it. Controllers write `(mode, status text)` pairs and the stop
//! flag; the render loop reads the latest pair once per frame.
//!
//! Last write wins: there is no queue, a mode that is overwritten before
//! the next frame is never displayed.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::signal::Signal;
use heapless::String;
use portable_atomic::{AtomicBool, Ordering};

use crate::state::Mode;

/// Maximum status override length (longer text is truncated)
pub const MAX_STATUS_LEN: usize = arclight_protocol::MAX_TEXT_LEN;

/// Uppercased status override
pub type StatusText = String<MAX_STATUS_LEN>;

/// Latest `(mode, status override)` pair
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ModeSnapshot {
    /// Current mode
    pub mode: Mode,
    /// Custom status text set with the mode, if any
    pub status_override: Option<StatusText>,
}

impl ModeSnapshot {
    /// Snapshot for the initial state: idle, default text
    pub const fn new() -> Self {
        Self {
            mode: Mode::Idle,
            status_override: None,
        }
    }

    /// Text the HUD shows on its status line
    pub fn status_text(&self) -> &str {
        match &self.status_override {
            Some(text) => text.as_str(),
            None => self.mode.default_status(),
        }
    }
}

/// Cross-thread mode channel
///
/// All methods take `&self` and never block beyond a short critical
/// section, so the channel can be shared behind an `Arc` or placed in a
/// `static`.
pub struct ModeStateChannel {
    /// The pair lives under one lock so readers never see a torn update
    state: Mutex<CriticalSectionRawMutex, RefCell<ModeSnapshot>>,
    /// Latest mode written, for consumers that want change notification
    changed: Signal<CriticalSectionRawMutex, Mode>,
    running: AtomicBool,
    ready: AtomicBool,
}

impl Default for ModeStateChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl ModeStateChannel {
    /// Create a channel in the idle, running, not-yet-ready state
    pub const fn new() -> Self {
        Self {
            state: Mutex::new(RefCell::new(ModeSnapshot::new())),
            changed: Signal::new(),
            running: AtomicBool::new(true),
            ready: AtomicBool::new(false),
        }
    }

    /// Set the displayed mode
    ///
    /// `text` is trimmed of surrounding whitespace; what remains becomes
    /// the status override, uppercased. Blank `text` clears any previous
    /// override so the mode's default shows.
    pub fn set_mode(&self, mode: Mode, text: &str) {
        let status_override = normalize_status(text);
        self.state.lock(|cell| {
            *cell.borrow_mut() = ModeSnapshot {
                mode,
                status_override,
            };
        });
        self.changed.signal(mode);
    }

    /// Set the mode from a raw wire value, clamping invalid values to idle
    pub fn set_mode_raw(&self, raw: u8, text: &str) {
        self.set_mode(Mode::from_raw(raw), text);
    }

    /// Most recently written pair
    pub fn snapshot(&self) -> ModeSnapshot {
        self.state.lock(|cell| cell.borrow().clone())
    }

    /// Take the pending change notification, if any
    pub fn take_change(&self) -> Option<Mode> {
        self.changed.try_take()
    }

    /// Ask the render loop to stop at the top of its next frame
    pub fn request_stop(&self) {
        self.running.store(false, Ordering::Release);
    }

    /// Whether the render loop should keep running
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Called by the render loop once its window is up
    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    /// Whether the render loop has started presenting frames
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }
}

/// Uppercase and bound a status override; blank text means no override
fn normalize_status(text: &str) -> Option<StatusText> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let mut out = StatusText::new();
    'outer: for ch in text.chars() {
        for upper in ch.to_uppercase() {
            if out.push(upper).is_err() {
                break 'outer;
            }
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_initial_state() {
        let channel = ModeStateChannel::new();
        let snap = channel.snapshot();
        assert_eq!(snap.mode, Mode::Idle);
        assert_eq!(snap.status_text(), "SYSTEM ONLINE");
        assert!(channel.is_running());
        assert!(!channel.is_ready());
        assert_eq!(channel.take_change(), None);
    }

    #[test]
    fn test_set_mode_uppercases_override() {
        let channel = ModeStateChannel::new();
        channel.set_mode(Mode::Listening, "foo");
        let snap = channel.snapshot();
        assert_eq!(snap.mode, Mode::Listening);
        assert_eq!(snap.status_text(), "FOO");
    }

    #[test]
    fn test_empty_text_clears_override() {
        let channel = ModeStateChannel::new();
        channel.set_mode(Mode::Idle, "Awaiting Input");
        assert_eq!(channel.snapshot().status_text(), "AWAITING INPUT");

        channel.set_mode(Mode::Speaking, "");
        let snap = channel.snapshot();
        assert_eq!(snap.status_override, None);
        assert_eq!(snap.status_text(), "PROCESSING / SPEAKING");

        channel.set_mode(Mode::Listening, "   ");
        assert_eq!(channel.snapshot().status_text(), "LISTENING...");
    }

    #[test]
    fn test_unicode_uppercase_and_truncation() {
        let channel = ModeStateChannel::new();
        channel.set_mode(Mode::Idle, "straße");
        assert_eq!(channel.snapshot().status_text(), "STRASSE");

        let long = "x".repeat(MAX_STATUS_LEN + 10);
        channel.set_mode(Mode::Idle, &long);
        assert_eq!(channel.snapshot().status_text().len(), MAX_STATUS_LEN);
    }

    #[test]
    fn test_raw_mode_is_clamped() {
        let channel = ModeStateChannel::new();
        channel.set_mode(Mode::Speaking, "");
        channel.set_mode_raw(42, "");
        assert_eq!(channel.snapshot().mode, Mode::Idle);
        channel.set_mode_raw(1, "");
        assert_eq!(channel.snapshot().mode, Mode::Listening);
    }

    #[test]
    fn test_change_signal_is_last_write_wins() {
        let channel = ModeStateChannel::new();
        channel.set_mode(Mode::Listening, "");
        channel.set_mode(Mode::Speaking, "");
        assert_eq!(channel.take_change(), Some(Mode::Speaking));
        assert_eq!(channel.take_change(), None);
        assert_eq!(channel.snapshot().mode, Mode::Speaking);
    }

    #[test]
    fn test_stop_and_ready_flags() {
        let channel = ModeStateChannel::new();
        channel.mark_ready();
        channel.request_stop();
        assert!(channel.is_ready());
        assert!(!channel.is_running());
    }

    #[test]
    fn test_concurrent_writes_never_tear() {
        let channel = Arc::new(ModeStateChannel::new());

        let writers: std::vec::Vec<_> = Mode::ALL
            .iter()
            .map(|&mode| {
                let channel = Arc::clone(&channel);
                thread::spawn(move || {
                    for _ in 0..500 {
                        channel.set_mode(mode, mode.name());
                    }
                })
            })
            .collect();

        // Every observed pair must carry the text written with its mode
        for _ in 0..2000 {
            let snap = channel.snapshot();
            if let Some(text) = &snap.status_override {
                let mut expected = StatusText::new();
                for ch in snap.mode.name().chars() {
                    let _ = expected.push(ch.to_ascii_uppercase());
                }
                assert_eq!(text, &expected);
            }
        }

        for writer in writers {
            writer.join().unwrap();
        }
        let last = channel.snapshot();
        assert!(last.status_text().eq_ignore_ascii_case(last.mode.name()));
    }
}
