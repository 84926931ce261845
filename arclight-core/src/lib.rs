//! Renderer-agnostic core logic for the Arclight HUD
//!
//! This crate contains everything that does not touch pixels:
//!
//! - Operating modes and their default status text
//! - The mode state channel shared between the render loop and controllers
//! - Configuration type definitions (ring layout, palette, window)
//! - Frame pacing for the fixed-rate render loop

#![no_std]
#![deny(unsafe_code)]

#[cfg(any(test, feature = "std"))]
extern crate std;

pub mod channel;
pub mod config;
pub mod scheduler;
pub mod state;

pub use channel::{ModeSnapshot, ModeStateChannel, StatusText, MAX_STATUS_LEN};
pub use state::Mode;
