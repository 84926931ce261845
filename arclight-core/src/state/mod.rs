//! Operating modes
//!
//! The HUD never changes mode on its own; modes are written by an external
//! controller through the mode state channel.

pub mod mode;

pub use mode::Mode;
