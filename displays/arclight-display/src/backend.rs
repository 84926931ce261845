//! Display backend trait
//!
//! A backend owns whatever actually shows the frames: a desktop window,
//! or nothing at all for headless runs. The render loop creates it, feeds
//! it one finished `Canvas` per frame, and releases it exactly once.

use std::sync::{Arc, Mutex, PoisonError};

use arclight_core::config::ConfigError;
use embedded_graphics::prelude::*;
use log::debug;

use crate::canvas::Canvas;

/// Display backend errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayError {
    /// The window or graphics context could not be created
    WindowUnavailable,
    /// The backend surface does not match the configured canvas
    SizeMismatch { expected: Size, actual: Size },
    /// A finished frame could not be shown
    PresentFailed,
    /// The render thread could not be spawned
    ThreadSpawn,
    /// The render thread panicked
    RenderThreadPanicked,
    /// The HUD configuration was rejected
    InvalidConfig(ConfigError),
}

impl core::fmt::Display for DisplayError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DisplayError::WindowUnavailable => write!(f, "display window unavailable"),
            DisplayError::SizeMismatch { expected, actual } => write!(
                f,
                "backend is {}x{}, expected {}x{}",
                actual.width, actual.height, expected.width, expected.height
            ),
            DisplayError::PresentFailed => write!(f, "failed to present frame"),
            DisplayError::ThreadSpawn => write!(f, "failed to spawn render thread"),
            DisplayError::RenderThreadPanicked => write!(f, "render thread panicked"),
            DisplayError::InvalidConfig(e) => write!(f, "invalid configuration: {}", e),
        }
    }
}

impl std::error::Error for DisplayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DisplayError::InvalidConfig(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for DisplayError {
    fn from(e: ConfigError) -> Self {
        DisplayError::InvalidConfig(e)
    }
}

/// Input events the render loop cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendEvent {
    /// The user closed the window
    Close,
    /// Anything else (ignored)
    Other,
}

/// Display backend trait
///
/// Provides a platform-agnostic interface for presenting frames.
/// Implementations must be created on the thread that runs the render loop.
pub trait DisplayBackend {
    /// Surface size in pixels
    fn size(&self) -> Size;

    /// Show a finished frame
    fn present(&mut self, frame: &Canvas) -> Result<(), DisplayError>;

    /// Drain pending input events
    fn poll_events(&mut self) -> Vec<BackendEvent>;

    /// Tear down the window or context
    ///
    /// Consumes the backend, so it cannot be released twice.
    fn release(self)
    where
        Self: Sized;
}

/// What a `HeadlessBackend` has seen
#[derive(Debug, Clone, Default)]
pub struct HeadlessState {
    /// Frames presented
    pub frames: u64,
    /// Times `release` ran
    pub releases: u32,
    /// Copy of the last frame, when recording is on
    pub last_frame: Option<Canvas>,
}

/// Shared view of a `HeadlessBackend` that outlives it
#[derive(Debug, Clone, Default)]
pub struct HeadlessProbe(Arc<Mutex<HeadlessState>>);

impl HeadlessProbe {
    /// Snapshot of the recorded state
    pub fn state(&self) -> HeadlessState {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn frames(&self) -> u64 {
        self.with(|s| s.frames)
    }

    pub fn releases(&self) -> u32 {
        self.with(|s| s.releases)
    }

    fn with<T>(&self, f: impl FnOnce(&mut HeadlessState) -> T) -> T {
        f(&mut self.0.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

/// Backend without a window
///
/// Counts frames and optionally asks the loop to close after a fixed
/// number of them.
#[derive(Debug)]
pub struct HeadlessBackend {
    size: Size,
    frame_limit: Option<u64>,
    record: bool,
    presented: u64,
    probe: HeadlessProbe,
}

impl HeadlessBackend {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            frame_limit: None,
            record: false,
            presented: 0,
            probe: HeadlessProbe::default(),
        }
    }

    /// Emit `Close` once `limit` frames have been presented
    pub fn with_frame_limit(mut self, limit: u64) -> Self {
        self.frame_limit = Some(limit);
        self
    }

    /// Keep a copy of the most recent frame in the probe
    pub fn recording(mut self) -> Self {
        self.record = true;
        self
    }

    /// Handle for inspecting the backend after the loop consumed it
    pub fn probe(&self) -> HeadlessProbe {
        self.probe.clone()
    }
}

impl DisplayBackend for HeadlessBackend {
    fn size(&self) -> Size {
        self.size
    }

    fn present(&mut self, frame: &Canvas) -> Result<(), DisplayError> {
        if frame.size() != self.size {
            return Err(DisplayError::SizeMismatch {
                expected: self.size,
                actual: frame.size(),
            });
        }
        self.presented += 1;
        let record = self.record;
        self.probe.with(|s| {
            s.frames += 1;
            if record {
                s.last_frame = Some(frame.clone());
            }
        });
        Ok(())
    }

    fn poll_events(&mut self) -> Vec<BackendEvent> {
        match self.frame_limit {
            Some(limit) if self.presented >= limit => vec![BackendEvent::Close],
            _ => Vec::new(),
        }
    }

    fn release(self) {
        debug!("Headless backend released after {} frames", self.presented);
        self.probe.with(|s| s.releases += 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_limit() {
        let mut backend = HeadlessBackend::new(Size::new(8, 8)).with_frame_limit(2);
        let probe = backend.probe();
        let frame = Canvas::new(8, 8);

        assert!(backend.poll_events().is_empty());
        backend.present(&frame).unwrap();
        assert!(backend.poll_events().is_empty());
        backend.present(&frame).unwrap();
        assert_eq!(backend.poll_events(), vec![BackendEvent::Close]);

        backend.release();
        assert_eq!(probe.frames(), 2);
        assert_eq!(probe.releases(), 1);
        assert!(probe.state().last_frame.is_none());
    }

    #[test]
    fn test_wrong_size_rejected() {
        let mut backend = HeadlessBackend::new(Size::new(8, 8));
        let err = backend.present(&Canvas::new(4, 4)).unwrap_err();
        assert_eq!(
            err,
            DisplayError::SizeMismatch {
                expected: Size::new(8, 8),
                actual: Size::new(4, 4)
            }
        );
        assert_eq!(err.to_string(), "backend is 4x4, expected 8x8");
    }

    #[test]
    fn test_recording() {
        let mut backend = HeadlessBackend::new(Size::new(2, 2)).recording();
        let probe = backend.probe();
        let mut frame = Canvas::new(2, 2);
        frame.fill(embedded_graphics::pixelcolor::Rgb888::RED);
        backend.present(&frame).unwrap();
        assert_eq!(probe.state().last_frame, Some(frame));
    }
}
