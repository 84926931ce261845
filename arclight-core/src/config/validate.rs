//! Configuration validation

use core::fmt;

use super::types::{
    HudConfig, MAX_RADIUS, MAX_STROKE, MAX_TELEMETRY_ROWS, MAX_WINDOW_SIDE, MIN_CORE_RADIUS,
};

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Window width or height is zero
    ZeroWindowSize,
    /// Window width or height above `MAX_WINDOW_SIDE`
    WindowTooLarge,
    /// Frame rate is zero
    ZeroFrameRate,
    /// Simulator scale is zero
    ZeroScale,
    /// Ring at this index has a zero radius or one above `MAX_RADIUS`
    InvalidRingRadius(usize),
    /// Ring at this index has a stroke above `MAX_STROKE`
    InvalidRingStroke(usize),
    /// Ring at this index has a negative or non-finite speed
    InvalidRingSpeed(usize),
    /// Core radius below `MIN_CORE_RADIUS`
    CoreRadiusTooSmall(u32),
    /// Core radius above `MAX_RADIUS`
    CoreRadiusTooLarge(u32),
    /// More telemetry rows than `MAX_TELEMETRY_ROWS`
    TooManyTelemetryRows(u8),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroWindowSize => f.write_str("window width and height must be non-zero"),
            ConfigError::WindowTooLarge => {
                write!(f, "window width and height must not exceed {}", MAX_WINDOW_SIDE)
            }
            ConfigError::ZeroFrameRate => f.write_str("fps must be non-zero"),
            ConfigError::ZeroScale => f.write_str("window scale must be non-zero"),
            ConfigError::InvalidRingRadius(i) => {
                write!(f, "ring {} radius must be between 1 and {}", i, MAX_RADIUS)
            }
            ConfigError::InvalidRingStroke(i) => {
                write!(f, "ring {} stroke must not exceed {}", i, MAX_STROKE)
            }
            ConfigError::InvalidRingSpeed(i) => {
                write!(f, "ring {} speed must be finite and non-negative", i)
            }
            ConfigError::CoreRadiusTooSmall(r) => {
                write!(f, "core radius {} is below the minimum of {}", r, MIN_CORE_RADIUS)
            }
            ConfigError::CoreRadiusTooLarge(r) => {
                write!(f, "core radius {} exceeds the maximum of {}", r, MAX_RADIUS)
            }
            ConfigError::TooManyTelemetryRows(n) => {
                write!(f, "{} telemetry rows exceeds the maximum of {}", n, MAX_TELEMETRY_ROWS)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

impl HudConfig {
    /// Check the configuration for values the renderer cannot honor
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::ZeroWindowSize);
        }
        if self.window.width > MAX_WINDOW_SIDE || self.window.height > MAX_WINDOW_SIDE {
            return Err(ConfigError::WindowTooLarge);
        }
        if self.window.fps == 0 {
            return Err(ConfigError::ZeroFrameRate);
        }
        if self.window.scale == 0 {
            return Err(ConfigError::ZeroScale);
        }

        for (i, ring) in self.rings.iter().enumerate() {
            if ring.radius == 0 || ring.radius > MAX_RADIUS {
                return Err(ConfigError::InvalidRingRadius(i));
            }
            if ring.stroke > MAX_STROKE {
                return Err(ConfigError::InvalidRingStroke(i));
            }
            if !ring.speed.is_finite() || ring.speed < 0.0 {
                return Err(ConfigError::InvalidRingSpeed(i));
            }
        }

        if self.core.radius < MIN_CORE_RADIUS {
            return Err(ConfigError::CoreRadiusTooSmall(self.core.radius));
        }
        if self.core.radius > MAX_RADIUS {
            return Err(ConfigError::CoreRadiusTooLarge(self.core.radius));
        }

        if self.overlay.telemetry_rows > MAX_TELEMETRY_ROWS {
            return Err(ConfigError::TooManyTelemetryRows(self.overlay.telemetry_rows));
        }

        Ok(())
    }
}
