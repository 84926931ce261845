//! Rendering engine for the Arclight HUD
//!
//! This crate provides:
//! - `Canvas`, an RGBA pixel buffer usable as an embedded-graphics draw target
//! - Screen-space arcs and center-preserving rotation
//! - HUD elements: rotating rings and the pulsing reactor core
//! - `DisplayController`, which composes a frame from the current mode
//! - The fixed-rate render loop and its start/stop lifecycle
//! - `DisplayBackend` trait for whatever presents the frames
//!
//! # Architecture
//!
//! The render loop owns the controller, every element buffer and the
//! backend. The only state it shares is the `ModeStateChannel` from
//! `arclight-core`, which controllers write and the loop reads once per
//! frame.

pub mod backend;
pub mod canvas;
pub mod controller;
pub mod elements;
pub mod geometry;
pub mod overlay;
pub mod runtime;
pub mod settings;

// Re-export key types
pub use backend::{BackendEvent, DisplayBackend, DisplayError, HeadlessBackend, HeadlessProbe};
pub use canvas::{Canvas, Rgba8};
pub use controller::DisplayController;
pub use elements::{CoreReactor, RingElement};
pub use overlay::{FontId, FontSet, OverlayData, Telemetry};
pub use runtime::{FrameStats, HudHandle};
pub use settings::{load_config, parse_config, SettingsError};
