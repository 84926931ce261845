//! Frame scheduler
//!
//! Holds the render loop at a fixed rate by sleeping only what is left of
//! each frame interval after the frame's work.

pub mod pacing;

pub use pacing::{FrameScheduler, DEFAULT_FPS};
