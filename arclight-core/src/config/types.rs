//! Configuration type definitions
//!
//! `Default` for every type reproduces the stock HUD, so a config file only
//! needs to name what it changes.

use heapless::{String, Vec};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// RGB triple
pub type Rgb = [u8; 3];

/// Maximum ring layers
pub const MAX_RINGS: usize = 8;

/// Maximum title/subtitle length
pub const MAX_LABEL_LEN: usize = 32;

/// Maximum font name length
pub const MAX_FONT_NAME_LEN: usize = 16;

/// Maximum decorative telemetry rows
pub const MAX_TELEMETRY_ROWS: u8 = 8;

/// Smallest reactor radius whose inner glow layer stays positive
pub const MIN_CORE_RADIUS: u32 = 15;

/// Largest ring or core radius in pixels
pub const MAX_RADIUS: u32 = 4096;

/// Largest ring stroke width in pixels
pub const MAX_STROKE: u32 = 64;

/// Largest window width or height in pixels
pub const MAX_WINDOW_SIDE: u32 = 8192;

/// Ring geometry variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RingKind {
    /// 60 short dashes around the full circle
    #[default]
    Dashed,
    /// Three thick arcs
    Segmented,
    /// Thin outline with radial tick marks
    Tech,
}

/// Rotation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Direction {
    #[default]
    Clockwise,
    CounterClockwise,
}

impl Direction {
    /// +1 for clockwise, -1 for counter-clockwise
    pub const fn sign(self) -> f64 {
        match self {
            Direction::Clockwise => 1.0,
            Direction::CounterClockwise => -1.0,
        }
    }
}

/// Whether a ring follows the mode palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Tint {
    /// Recolored with the mode palette, in lock-step with the core
    #[default]
    Dynamic,
    /// Permanently drawn in the structural color
    Fixed,
}

/// One ring layer
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RingConfig {
    /// Geometry variant
    pub kind: RingKind,
    /// Radius in pixels
    pub radius: u32,
    /// Degrees advanced per frame
    pub speed: f32,
    /// Stroke width in pixels
    pub stroke: u32,
    /// Rotation direction
    pub direction: Direction,
    /// Palette behavior
    pub tint: Tint,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            kind: RingKind::Dashed,
            radius: 100,
            speed: 1.0,
            stroke: 2,
            direction: Direction::Clockwise,
            tint: Tint::Dynamic,
        }
    }
}

impl RingConfig {
    /// Shorthand used by the stock layout
    pub const fn new(
        kind: RingKind,
        radius: u32,
        speed: f32,
        stroke: u32,
        direction: Direction,
        tint: Tint,
    ) -> Self {
        Self {
            kind,
            radius,
            speed,
            stroke,
            direction,
            tint,
        }
    }
}

/// Reactor core configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CoreConfig {
    /// Base radius in pixels (glow oscillates ±5 around it)
    pub radius: u32,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self { radius: 80 }
    }
}

/// Window configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WindowConfig {
    /// Canvas width in pixels
    pub width: u32,
    /// Canvas height in pixels
    pub height: u32,
    /// Window title, fixed at construction
    pub title: String<MAX_LABEL_LEN>,
    /// Target frame rate
    pub fps: u32,
    /// Simulator pixel scale
    pub scale: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            title: label("ARCLIGHT PROTOCOL"),
            fps: 60,
            scale: 1,
        }
    }
}

impl WindowConfig {
    /// HUD center point
    pub const fn center(&self) -> (i32, i32) {
        ((self.width / 2) as i32, (self.height / 2) as i32)
    }
}

/// Font selection by built-in font name (e.g. "10x20")
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FontConfig {
    /// Title font
    pub main: String<MAX_FONT_NAME_LEN>,
    /// Status, clock and telemetry font
    pub small: String<MAX_FONT_NAME_LEN>,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            main: label("10x20"),
            small: label("6x10"),
        }
    }
}

/// HUD colors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PaletteConfig {
    /// Idle mode (cyan)
    pub idle: Rgb,
    /// Listening mode (orange)
    pub listening: Rgb,
    /// Speaking mode (red)
    pub speaking: Rgb,
    /// Fixed-tint rings and telemetry (dim blue)
    pub structural: Rgb,
    /// Title, status and clock
    pub text: Rgb,
    /// Frame background
    pub background: Rgb,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            idle: [0, 255, 255],
            listening: [255, 165, 0],
            speaking: [255, 50, 50],
            structural: [0, 100, 150],
            text: [255, 255, 255],
            background: [0, 0, 0],
        }
    }
}

/// Text overlay configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct OverlayConfig {
    /// Centered title
    pub title: String<MAX_LABEL_LEN>,
    /// Subtitle below the title, tinted with the core color
    pub subtitle: String<MAX_LABEL_LEN>,
    /// Number of decorative telemetry rows
    pub telemetry_rows: u8,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            title: label("A.R.C.L.I.G.H.T"),
            subtitle: label("MARK II UI"),
            telemetry_rows: 5,
        }
    }
}

/// Complete HUD configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HudConfig {
    pub window: WindowConfig,
    pub fonts: FontConfig,
    pub palette: PaletteConfig,
    pub core: CoreConfig,
    /// Ring layers, outermost first (back-to-front draw order)
    pub rings: Vec<RingConfig, MAX_RINGS>,
    pub overlay: OverlayConfig,
}

impl Default for HudConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            fonts: FontConfig::default(),
            palette: PaletteConfig::default(),
            core: CoreConfig::default(),
            rings: default_rings(),
            overlay: OverlayConfig::default(),
        }
    }
}

/// Stock five-layer ring stack
pub fn default_rings() -> Vec<RingConfig, MAX_RINGS> {
    use Direction::*;
    use RingKind::*;
    use Tint::*;

    let stock = [
        RingConfig::new(Dashed, 250, 0.2, 2, Clockwise, Fixed),
        RingConfig::new(Segmented, 220, 0.5, 3, CounterClockwise, Dynamic),
        RingConfig::new(Tech, 180, 0.8, 1, Clockwise, Dynamic),
        RingConfig::new(Dashed, 140, 1.5, 2, CounterClockwise, Fixed),
        RingConfig::new(Segmented, 110, 2.0, 4, Clockwise, Dynamic),
    ];

    let mut rings = Vec::new();
    for ring in stock {
        // Capacity exceeds the stock layout
        let _ = rings.push(ring);
    }
    rings
}

/// Build a bounded label, truncating on a char boundary
pub fn label<const N: usize>(text: &str) -> String<N> {
    let mut s = String::new();
    for ch in text.chars() {
        if s.push(ch).is_err() {
            break;
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let config = HudConfig::default();
        assert_eq!(config.rings.len(), 5);
        assert_eq!(config.core.radius, 80);
        assert_eq!(config.window.center(), (400, 300));

        // Outermost first
        let radii: [u32; 5] = core::array::from_fn(|i| config.rings[i].radius);
        assert_eq!(radii, [250, 220, 180, 140, 110]);

        let fixed = config
            .rings
            .iter()
            .filter(|r| r.tint == Tint::Fixed)
            .count();
        assert_eq!(fixed, 2);
    }

    #[test]
    fn test_direction_sign() {
        assert_eq!(Direction::Clockwise.sign(), 1.0);
        assert_eq!(Direction::CounterClockwise.sign(), -1.0);
    }

    #[test]
    fn test_label_truncates() {
        let s: String<4> = label("abcdef");
        assert_eq!(s.as_str(), "abcd");
        let s: String<3> = label("aéb");
        assert_eq!(s.as_str(), "aé");
    }
}
