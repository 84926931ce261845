//! SDL window backend
//!
//! Copies each finished frame into an embedded-graphics-simulator display
//! and shows it in a desktop window.

use arclight_core::config::WindowConfig;
use arclight_display::{BackendEvent, Canvas, DisplayBackend, DisplayError};
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::{OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window};
use log::{debug, info};

pub struct SimulatorBackend {
    display: SimulatorDisplay<Rgb888>,
    window: Window,
    /// The window only exists after the first update
    shown: bool,
}

impl SimulatorBackend {
    pub fn new(config: &WindowConfig) -> Result<Self, DisplayError> {
        if config.width == 0 || config.height == 0 || config.scale == 0 {
            return Err(DisplayError::WindowUnavailable);
        }

        let output_settings = OutputSettingsBuilder::new().scale(config.scale).build();
        let window = Window::new(&config.title, &output_settings);
        info!(
            "Simulator window {}x{} (scale {})",
            config.width, config.height, config.scale
        );

        Ok(Self {
            display: SimulatorDisplay::new(Size::new(config.width, config.height)),
            window,
            shown: false,
        })
    }
}

impl DisplayBackend for SimulatorBackend {
    fn size(&self) -> Size {
        self.display.size()
    }

    fn present(&mut self, frame: &Canvas) -> Result<(), DisplayError> {
        if frame.size() != self.display.size() {
            return Err(DisplayError::SizeMismatch {
                expected: self.display.size(),
                actual: frame.size(),
            });
        }

        let area = self.display.bounding_box();
        let colors = frame.pixels().iter().map(|p| p.rgb());
        self.display
            .fill_contiguous(&area, colors)
            .unwrap_or_else(|never| match never {});

        self.window.update(&self.display);
        self.shown = true;
        Ok(())
    }

    fn poll_events(&mut self) -> Vec<BackendEvent> {
        if !self.shown {
            return Vec::new();
        }
        self.window
            .events()
            .map(|event| match event {
                SimulatorEvent::Quit => BackendEvent::Close,
                _ => BackendEvent::Other,
            })
            .collect()
    }

    fn release(self) {
        debug!("Simulator window released");
    }
}

/// Closes any backend after a fixed number of frames
pub struct FrameLimit<B> {
    inner: B,
    remaining: u64,
}

impl<B: DisplayBackend> FrameLimit<B> {
    pub fn new(inner: B, frames: u64) -> Self {
        Self {
            inner,
            remaining: frames,
        }
    }
}

impl<B: DisplayBackend> DisplayBackend for FrameLimit<B> {
    fn size(&self) -> Size {
        self.inner.size()
    }

    fn present(&mut self, frame: &Canvas) -> Result<(), DisplayError> {
        self.inner.present(frame)?;
        self.remaining = self.remaining.saturating_sub(1);
        Ok(())
    }

    fn poll_events(&mut self) -> Vec<BackendEvent> {
        let mut events = self.inner.poll_events();
        if self.remaining == 0 {
            events.push(BackendEvent::Close);
        }
        events
    }

    fn release(self) {
        self.inner.release();
    }
}
