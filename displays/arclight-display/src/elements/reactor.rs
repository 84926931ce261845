//! Pulsing reactor core
//!
//! Drawn straight onto the frame every time: it changes every frame, so
//! there is nothing worth caching.

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, PrimitiveStyle};

use crate::canvas::Canvas;
use crate::geometry::diameter;

/// Glow oscillation amplitude in pixels
pub const PULSE_AMPLITUDE: f32 = 5.0;

/// Glow oscillation rate in radians per second (about 0.8 Hz)
pub const PULSE_RATE: f32 = 5.0;

/// Opacity of the outer glow layer
pub const GLOW_OUTER_ALPHA: u8 = 50;

/// Opacity of the inner glow layer
pub const GLOW_INNER_ALPHA: u8 = 100;

/// Inset of the solid inner ring from the base radius
const SOLID_INSET: u32 = 5;

/// Inset of the inner glow layer from the glow radius
const INNER_GLOW_INSET: u32 = 10;

const SOLID_STROKE: u32 = 2;
const GLOW_STROKE: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoreReactor {
    radius: u32,
    color: Rgb888,
}

impl CoreReactor {
    pub fn new(radius: u32, color: Rgb888) -> Self {
        Self { radius, color }
    }

    /// The core never rotates
    pub fn update(&mut self) {}

    /// Recolor; the core has no buffer so this always takes effect
    pub fn set_color(&mut self, color: Rgb888) {
        self.color = color;
    }

    pub fn color(&self) -> Rgb888 {
        self.color
    }

    pub fn radius(&self) -> u32 {
        self.radius
    }

    /// Glow radius `elapsed_s` seconds after the render loop started
    ///
    /// Always within `radius ± PULSE_AMPLITUDE`.
    pub fn glow_radius(&self, elapsed_s: f32) -> u32 {
        let pulse = (elapsed_s * PULSE_RATE).sin() * PULSE_AMPLITUDE;
        let pulse = if pulse.is_finite() { pulse } else { 0.0 };
        let base = self.radius as f32;
        (base + pulse)
            .trunc()
            .clamp((base - PULSE_AMPLITUDE).max(0.0), base + PULSE_AMPLITUDE) as u32
    }

    /// Draw the solid ring and the two translucent glow layers
    pub fn draw(&self, target: &mut Canvas, center: Point, elapsed_s: f32) {
        let glow = self.glow_radius(elapsed_s);

        let solid = ring(center, self.radius.saturating_sub(SOLID_INSET))
            .into_styled(PrimitiveStyle::with_stroke(self.color, SOLID_STROKE))
            .draw(target);
        let outer = ring(center, glow)
            .into_styled(PrimitiveStyle::with_stroke(self.color, GLOW_STROKE))
            .draw(&mut target.blended(GLOW_OUTER_ALPHA));
        let inner = ring(center, glow.saturating_sub(INNER_GLOW_INSET))
            .into_styled(PrimitiveStyle::with_stroke(self.color, GLOW_STROKE))
            .draw(&mut target.blended(GLOW_INNER_ALPHA));

        solid
            .and(outer)
            .and(inner)
            .unwrap_or_else(|never| match never {});
    }
}

fn ring(center: Point, radius: u32) -> Circle {
    Circle::with_center(center, diameter(radius))
}
