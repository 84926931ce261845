//! Text overlay
//!
//! Title, subtitle, status line, wall clock and the decorative telemetry
//! column. Fonts are embedded-graphics built-in mono fonts picked by name.

use core::fmt::Write;

use arclight_core::config::{OverlayConfig, MAX_LABEL_LEN, MAX_TELEMETRY_ROWS};
use embedded_graphics::mono_font::{ascii, MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};
use heapless::{String, Vec};
use log::warn;
use rand::Rng;

use crate::canvas::Canvas;

/// Telemetry values are drawn from this inclusive range
pub const TELEMETRY_MIN: u16 = 1000;
pub const TELEMETRY_MAX: u16 = 9999;

/// Subtitle distance below the HUD center
const SUBTITLE_OFFSET: i32 = 25;

/// Formatted overlay line
type Line = String<64>;

/// Built-in font choice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontId {
    Font4x6,
    Font5x8,
    Font6x10,
    Font6x13,
    Font6x13Bold,
    Font7x13,
    Font8x13,
    Font9x15,
    Font9x18Bold,
    Font10x20,
}

impl FontId {
    pub const ALL: [FontId; 10] = [
        FontId::Font4x6,
        FontId::Font5x8,
        FontId::Font6x10,
        FontId::Font6x13,
        FontId::Font6x13Bold,
        FontId::Font7x13,
        FontId::Font8x13,
        FontId::Font9x15,
        FontId::Font9x18Bold,
        FontId::Font10x20,
    ];

    /// Config name, e.g. "6x13_bold"
    pub const fn name(self) -> &'static str {
        match self {
            FontId::Font4x6 => "4x6",
            FontId::Font5x8 => "5x8",
            FontId::Font6x10 => "6x10",
            FontId::Font6x13 => "6x13",
            FontId::Font6x13Bold => "6x13_bold",
            FontId::Font7x13 => "7x13",
            FontId::Font8x13 => "8x13",
            FontId::Font9x15 => "9x15",
            FontId::Font9x18Bold => "9x18_bold",
            FontId::Font10x20 => "10x20",
        }
    }

    /// Look up a font by config name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|id| id.name().eq_ignore_ascii_case(name))
    }

    pub fn font(self) -> &'static MonoFont<'static> {
        match self {
            FontId::Font4x6 => &ascii::FONT_4X6,
            FontId::Font5x8 => &ascii::FONT_5X8,
            FontId::Font6x10 => &ascii::FONT_6X10,
            FontId::Font6x13 => &ascii::FONT_6X13,
            FontId::Font6x13Bold => &ascii::FONT_6X13_BOLD,
            FontId::Font7x13 => &ascii::FONT_7X13,
            FontId::Font8x13 => &ascii::FONT_8X13,
            FontId::Font9x15 => &ascii::FONT_9X15,
            FontId::Font9x18Bold => &ascii::FONT_9X18_BOLD,
            FontId::Font10x20 => &ascii::FONT_10X20,
        }
    }
}

/// Title font and the small font used for everything else
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontSet {
    pub main: FontId,
    pub small: FontId,
}

impl Default for FontSet {
    fn default() -> Self {
        Self {
            main: FontId::Font10x20,
            small: FontId::Font6x10,
        }
    }
}

impl FontSet {
    /// Resolve configured font names, falling back to the defaults
    pub fn resolve(main: &str, small: &str) -> Self {
        let defaults = Self::default();
        Self {
            main: resolve_one(main, defaults.main),
            small: resolve_one(small, defaults.small),
        }
    }
}

fn resolve_one(name: &str, fallback: FontId) -> FontId {
    FontId::from_name(name).unwrap_or_else(|| {
        warn!("Unknown font '{}', using {}", name, fallback.name());
        fallback
    })
}

/// Decorative telemetry numbers, resampled every frame
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Telemetry {
    values: Vec<u16, { MAX_TELEMETRY_ROWS as usize }>,
}

impl Telemetry {
    /// Draw `rows` values (capped at `MAX_TELEMETRY_ROWS`)
    pub fn sample<R: Rng>(rng: &mut R, rows: u8) -> Self {
        let mut values = Vec::new();
        for _ in 0..rows.min(MAX_TELEMETRY_ROWS) {
            let _ = values.push(rng.gen_range(TELEMETRY_MIN..=TELEMETRY_MAX));
        }
        Self { values }
    }

    pub fn values(&self) -> &[u16] {
        &self.values
    }
}

/// Per-frame inputs to the overlay that do not come from the mode
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OverlayData {
    /// Seconds since the render loop started; drives the core pulse
    pub elapsed_s: f32,
    /// Local time as `HH:MM:SS`
    pub wall_clock: String<8>,
    pub telemetry: Telemetry,
}

impl OverlayData {
    /// Capture the clock and sample telemetry for one frame
    pub fn capture<R: Rng>(elapsed_s: f32, rows: u8, rng: &mut R) -> Self {
        let mut wall_clock = String::new();
        let _ = write!(wall_clock, "{}", chrono::Local::now().format("%H:%M:%S"));
        Self {
            elapsed_s,
            wall_clock,
            telemetry: Telemetry::sample(rng, rows),
        }
    }
}

/// Static overlay text and layout
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    fonts: FontSet,
    title: String<MAX_LABEL_LEN>,
    subtitle: String<MAX_LABEL_LEN>,
    telemetry_rows: u8,
    text_color: Rgb888,
    structural_color: Rgb888,
}

impl Overlay {
    pub fn new(config: &OverlayConfig, fonts: FontSet, text_color: Rgb888, structural_color: Rgb888) -> Self {
        Self {
            fonts,
            title: config.title.clone(),
            subtitle: config.subtitle.clone(),
            telemetry_rows: config.telemetry_rows,
            text_color,
            structural_color,
        }
    }

    pub fn fonts(&self) -> FontSet {
        self.fonts
    }

    pub fn telemetry_rows(&self) -> u8 {
        self.telemetry_rows
    }

    /// Draw all overlay text
    ///
    /// The title sits on the HUD `center` with the subtitle just below it,
    /// tinted with `accent`. Status, clock and telemetry are placed from
    /// the frame edges.
    pub fn draw(&self, target: &mut Canvas, center: Point, status: &str, accent: Rgb888, data: &OverlayData) {
        let size = target.size();
        let (w, h) = (size.width as i32, size.height as i32);

        let main = MonoTextStyle::new(self.fonts.main.font(), self.text_color);
        let small_text = MonoTextStyle::new(self.fonts.small.font(), self.text_color);
        let small_accent = MonoTextStyle::new(self.fonts.small.font(), accent);
        let small_dim = MonoTextStyle::new(self.fonts.small.font(), self.structural_color);

        let centered = TextStyleBuilder::new()
            .alignment(Alignment::Center)
            .baseline(Baseline::Middle)
            .build();

        let _ = Text::with_text_style(&self.title, center, main, centered).draw(target);
        let _ = Text::with_text_style(
            &self.subtitle,
            center + Point::new(0, SUBTITLE_OFFSET),
            small_accent,
            centered,
        )
        .draw(target);

        let mut line = Line::new();
        let _ = write!(line, "STATUS: {}", status);
        let _ = Text::with_baseline(&line, Point::new(20, h - 40), small_text, Baseline::Top).draw(target);

        line.clear();
        let _ = write!(line, "TIME: {}", data.wall_clock);
        let _ = Text::with_baseline(&line, Point::new(w - 120, h - 40), small_text, Baseline::Top)
            .draw(target);

        for (i, value) in data.telemetry.values().iter().enumerate() {
            line.clear();
            let _ = write!(line, "DAT_{}: {}", i, value);
            let y = 100 + 20 * i as i32;
            let _ = Text::with_baseline(&line, Point::new(20, y), small_dim, Baseline::Top).draw(target);
        }
    }
}
