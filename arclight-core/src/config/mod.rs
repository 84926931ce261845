//! Configuration types
//!
//! Ring layout, palette and window settings. Parsed from TOML by the
//! display crate when the `serde` feature is enabled.

pub mod types;
pub mod validate;

pub use types::*;
pub use validate::ConfigError;
