//! HUD elements
//!
//! Each element owns a transparent buffer sized to its own extent and is
//! composited onto the frame around the HUD center.

mod reactor;
mod ring;

pub use reactor::{CoreReactor, GLOW_INNER_ALPHA, GLOW_OUTER_ALPHA, PULSE_AMPLITUDE, PULSE_RATE};
pub use ring::{RingElement, BUFFER_MARGIN, DASH_COUNT, SEGMENT_ARCS, TICK_COUNT, TICK_LENGTH};
