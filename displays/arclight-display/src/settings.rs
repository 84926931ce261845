//! Configuration loading
//!
//! Reads a `HudConfig` from TOML. Every section and field is optional;
//! whatever is missing keeps the stock HUD value. Falls back to the
//! built-in defaults when no file is given.

use std::fs;
use std::path::Path;

use arclight_core::config::{ConfigError, HudConfig};
use log::info;

/// Configuration loading errors
#[derive(Debug)]
pub enum SettingsError {
    /// The file could not be read
    Io(std::io::Error),
    /// The file is not valid TOML for a `HudConfig`
    Parse(toml::de::Error),
    /// The values parsed but cannot be rendered
    Invalid(ConfigError),
}

impl core::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SettingsError::Io(e) => write!(f, "cannot read config: {}", e),
            SettingsError::Parse(e) => write!(f, "cannot parse config: {}", e),
            SettingsError::Invalid(e) => write!(f, "invalid config: {}", e),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::Io(e) => Some(e),
            SettingsError::Parse(e) => Some(e),
            SettingsError::Invalid(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for SettingsError {
    fn from(e: std::io::Error) -> Self {
        SettingsError::Io(e)
    }
}

impl From<toml::de::Error> for SettingsError {
    fn from(e: toml::de::Error) -> Self {
        SettingsError::Parse(e)
    }
}

impl From<ConfigError> for SettingsError {
    fn from(e: ConfigError) -> Self {
        SettingsError::Invalid(e)
    }
}

/// Parse and validate a TOML configuration
///
/// # Example
///
/// ```toml
/// [window]
/// fps = 30
///
/// [palette]
/// idle = [0, 200, 255]
///
/// [[rings]]
/// kind = "tech"
/// radius = 180
/// speed = 0.8
/// direction = "counter_clockwise"
/// ```
///
/// A `[[rings]]` array replaces the whole stock ring stack.
pub fn parse_config(input: &str) -> Result<HudConfig, SettingsError> {
    let config: HudConfig = toml::from_str(input)?;
    config.validate()?;
    Ok(config)
}

/// Load the configuration from `path`, or the defaults when `None`
pub fn load_config(path: Option<&Path>) -> Result<HudConfig, SettingsError> {
    let Some(path) = path else {
        info!("No config file given, using defaults");
        return Ok(HudConfig::default());
    };

    let text = fs::read_to_string(path)?;
    let config = parse_config(&text)?;
    info!(
        "Loaded config from {} ({} rings)",
        path.display(),
        config.rings.len()
    );
    Ok(config)
}
