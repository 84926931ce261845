//! Mode definition

use arclight_protocol::{MODE_IDLE, MODE_LISTENING, MODE_SPEAKING};

use crate::config::{PaletteConfig, Rgb};

/// Operating modes driving palette and status text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Mode {
    /// Waiting for a wake word
    #[default]
    Idle = MODE_IDLE,
    /// Capturing a command
    Listening = MODE_LISTENING,
    /// Thinking or talking back
    Speaking = MODE_SPEAKING,
}

impl Mode {
    /// All modes in wire order
    pub const ALL: [Mode; 3] = [Mode::Idle, Mode::Listening, Mode::Speaking];

    /// Decode a wire value, if it names a mode
    pub fn try_from_raw(raw: u8) -> Option<Self> {
        match raw {
            MODE_IDLE => Some(Mode::Idle),
            MODE_LISTENING => Some(Mode::Listening),
            MODE_SPEAKING => Some(Mode::Speaking),
            _ => None,
        }
    }

    /// Decode a wire value, clamping anything out of range to `Idle`
    ///
    /// An out-of-range mode is a caller bug, not something to surface on
    /// the HUD.
    pub fn from_raw(raw: u8) -> Self {
        Self::try_from_raw(raw).unwrap_or(Mode::Idle)
    }

    /// Wire value
    pub const fn as_raw(self) -> u8 {
        self as u8
    }

    /// Lowercase name used by the controller protocol
    pub const fn name(self) -> &'static str {
        match self {
            Mode::Idle => "idle",
            Mode::Listening => "listening",
            Mode::Speaking => "speaking",
        }
    }

    /// Status line shown when no custom text is set
    pub const fn default_status(self) -> &'static str {
        match self {
            Mode::Idle => "SYSTEM ONLINE",
            Mode::Listening => "LISTENING...",
            Mode::Speaking => "PROCESSING / SPEAKING",
        }
    }

    /// Palette color for dynamic rings and the reactor core
    pub fn color(self, palette: &PaletteConfig) -> Rgb {
        match self {
            Mode::Idle => palette.idle,
            Mode::Listening => palette.listening,
            Mode::Speaking => palette.speaking,
        }
    }
}
