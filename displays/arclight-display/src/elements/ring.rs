//! Rotating ring element
//!
//! A ring renders its geometry once at angle 0 into a private buffer and
//! only rotates and composites that buffer per frame. The buffer is
//! redrawn only when the ring's color changes.

use arclight_core::config::{Direction, RingConfig, RingKind, Tint};
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, Line, PrimitiveStyle};
use log::trace;

use crate::canvas::Canvas;
use crate::geometry::{diameter, draw_arc, rotate};

/// Dashes around a dashed ring
pub const DASH_COUNT: u32 = 60;

/// Sweep of each dash in degrees
const DASH_SWEEP: f32 = 2.0;

/// Arc spans of a segmented ring, in degrees
pub const SEGMENT_ARCS: [(f32, f32); 3] = [(0.0, 90.0), (120.0, 200.0), (240.0, 330.0)];

/// Extra stroke a segmented ring gets over its configured width
const SEGMENT_BOLD: u32 = 5;

/// Radial tick marks on a tech ring
pub const TICK_COUNT: u32 = 8;

/// Tick reach inside and outside the tech ring's radius
pub const TICK_LENGTH: u32 = 10;

const TICK_STROKE: u32 = 2;

/// Padding around the geometry in each buffer
pub const BUFFER_MARGIN: u32 = 10;

/// One ring layer of the HUD
#[derive(Debug, Clone)]
pub struct RingElement {
    kind: RingKind,
    radius: u32,
    stroke: u32,
    speed: f64,
    direction: Direction,
    tint: Tint,
    /// Current rotation in degrees, always in [0, 360)
    angle: f64,
    color: Rgb888,
    buffer: Canvas,
    redraws: u32,
}

impl RingElement {
    /// Build a ring and render its structure in `color`
    pub fn new(config: &RingConfig, color: Rgb888) -> Self {
        let mut ring = Self {
            kind: config.kind,
            radius: config.radius,
            stroke: config.stroke.max(1),
            speed: f64::from(config.speed),
            direction: config.direction,
            tint: config.tint,
            angle: 0.0,
            color,
            buffer: Canvas::new(0, 0),
            redraws: 0,
        };
        ring.buffer = Canvas::square(diameter(ring.extent().saturating_add(BUFFER_MARGIN)));
        ring.draw_structure();
        ring
    }

    /// Farthest pixel from the center this ring's geometry can reach
    fn extent(&self) -> u32 {
        match self.kind {
            RingKind::Dashed => self.radius.saturating_add(self.stroke.div_ceil(2)),
            RingKind::Segmented => self
                .radius
                .saturating_add(self.stroke.saturating_add(SEGMENT_BOLD).div_ceil(2)),
            RingKind::Tech => self.radius.saturating_add(TICK_LENGTH + TICK_STROKE),
        }
    }

    /// Render the static geometry at angle 0 in the current color
    fn draw_structure(&mut self) {
        let center = self.buffer.center();
        let color = self.color;
        let target = &mut self.buffer;

        let result = match self.kind {
            RingKind::Dashed => (0..DASH_COUNT).try_for_each(|i| {
                let start = (i * 360 / DASH_COUNT) as f32;
                draw_arc(target, color, center, self.radius, start, start + DASH_SWEEP, self.stroke)
            }),
            RingKind::Segmented => SEGMENT_ARCS.iter().try_for_each(|&(start, end)| {
                draw_arc(target, color, center, self.radius, start, end, self.stroke.saturating_add(SEGMENT_BOLD))
            }),
            RingKind::Tech => Circle::with_center(center, diameter(self.radius))
                .into_styled(PrimitiveStyle::with_stroke(color, 1))
                .draw(target)
                .and_then(|()| {
                    (0..TICK_COUNT).try_for_each(|i| {
                        let (sin, cos) = ((i * 360 / TICK_COUNT) as f32).to_radians().sin_cos();
                        let at = |r: f32| center + Point::new((r * cos).round() as i32, (r * sin).round() as i32);
                        let inner = self.radius as f32 - TICK_LENGTH as f32;
                        let outer = (self.radius + TICK_LENGTH) as f32;
                        Line::new(at(inner), at(outer))
                            .into_styled(PrimitiveStyle::with_stroke(color, TICK_STROKE))
                            .draw(target)
                    })
                }),
        };
        result.unwrap_or_else(|never| match never {});

        self.redraws += 1;
        trace!("Ring r={} redrawn ({:?})", self.radius, self.kind);
    }

    /// Advance the rotation by one frame
    pub fn update(&mut self) {
        let next = (self.angle + self.speed * self.direction.sign()).rem_euclid(360.0);
        // rem_euclid can round up to exactly 360 for tiny negative inputs
        self.angle = if next >= 360.0 { 0.0 } else { next };
    }

    /// Composite the ring, rotated by its current angle, centered on `center`
    pub fn draw(&self, target: &mut Canvas, center: Point) {
        let rotated = rotate(&self.buffer, self.angle as f32);
        target.blit_centered(&rotated, center);
    }

    /// Change the ring's color, redrawing its buffer
    ///
    /// Returns `true` if the buffer was redrawn. Fixed-tint rings and
    /// unchanged colors are no-ops.
    pub fn set_color(&mut self, color: Rgb888) -> bool {
        if self.tint == Tint::Fixed || color == self.color {
            return false;
        }
        self.color = color;
        self.buffer.clear_transparent();
        self.draw_structure();
        true
    }

    pub fn kind(&self) -> RingKind {
        self.kind
    }

    pub fn radius(&self) -> u32 {
        self.radius
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn color(&self) -> Rgb888 {
        self.color
    }

    pub fn tint(&self) -> Tint {
        self.tint
    }

    /// Whether the ring follows the mode palette
    pub fn is_dynamic(&self) -> bool {
        self.tint == Tint::Dynamic
    }

    /// Cached angle-0 geometry
    pub fn buffer(&self) -> &Canvas {
        &self.buffer
    }

    /// Number of times the geometry has been rendered, including construction
    pub fn redraw_count(&self) -> u32 {
        self.redraws
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ring(kind: RingKind, radius: u32, speed: f32, direction: Direction, tint: Tint) -> RingElement {
        let config = RingConfig::new(kind, radius, speed, 2, direction, tint);
        RingElement::new(&config, Rgb888::CYAN)
    }

    fn lit(canvas: &Canvas, p: Point) -> bool {
        canvas.pixel(p.x, p.y).is_some_and(|px| !px.is_transparent())
    }

    #[test]
    fn test_buffer_holds_geometry() {
        for kind in [RingKind::Dashed, RingKind::Segmented, RingKind::Tech] {
            let ring = ring(kind, 40, 1.0, Direction::Clockwise, Tint::Dynamic);
            let buffer = ring.buffer();
            assert_eq!(buffer.width(), buffer.height());
            assert_eq!(buffer.width() % 2, 1);
            assert!(buffer.covered_pixels() > 0, "{:?} drew nothing", kind);
            assert_eq!(ring.redraw_count(), 1);

            // Nothing touches the buffer edge
            let last = buffer.width() as i32 - 1;
            for i in 0..=last {
                assert!(!lit(buffer, Point::new(i, 0)) && !lit(buffer, Point::new(i, last)));
                assert!(!lit(buffer, Point::new(0, i)) && !lit(buffer, Point::new(last, i)));
            }
        }
    }

    #[test]
    fn test_segmented_gaps() {
        let ring = ring(RingKind::Segmented, 60, 1.0, Direction::Clockwise, Tint::Dynamic);
        let c = ring.buffer().center();
        // 45° is inside the first arc, 105° is in the gap after it
        let on = |deg: f32| {
            let (sin, cos) = deg.to_radians().sin_cos();
            lit(ring.buffer(), c + Point::new((60.0 * cos).round() as i32, (60.0 * sin).round() as i32))
        };
        assert!(on(45.0));
        assert!(!on(105.0));
        assert!(on(160.0));
        assert!(!on(225.0));
        assert!(on(300.0));
        assert!(!on(345.0));
    }

    #[test]
    fn test_tech_ticks_reach_past_outline() {
        let ring = ring(RingKind::Tech, 50, 1.0, Direction::Clockwise, Tint::Dynamic);
        let c = ring.buffer().center();
        // Thick lines may grow to either side of their centerline
        let near = |p: Point| (-1..=1).any(|d| lit(ring.buffer(), p + Point::new(d, 0)) || lit(ring.buffer(), p + Point::new(0, d)));
        assert!(near(c + Point::new(50 + TICK_LENGTH as i32 - 1, 0)));
        assert!(near(c + Point::new(0, -(50 - TICK_LENGTH as i32 + 1))));
        assert!(!lit(ring.buffer(), c + Point::new(20, 0)));
    }

    #[test]
    fn test_update_wraps_both_directions() {
        let mut cw = ring(RingKind::Dashed, 30, 150.0, Direction::Clockwise, Tint::Dynamic);
        cw.update();
        cw.update();
        cw.update();
        assert!((cw.angle() - 90.0).abs() < 1e-9);

        let mut ccw = ring(RingKind::Dashed, 30, 0.5, Direction::CounterClockwise, Tint::Dynamic);
        ccw.update();
        assert!((ccw.angle() - 359.5).abs() < 1e-9);
    }

    #[test]
    fn test_update_leaves_buffer_alone() {
        let mut ring = ring(RingKind::Segmented, 30, 3.0, Direction::Clockwise, Tint::Dynamic);
        let before = ring.buffer().clone();
        for _ in 0..10 {
            ring.update();
        }
        assert_eq!(ring.buffer(), &before);
        assert_eq!(ring.redraw_count(), 1);
    }

    #[test]
    fn test_set_color_redraws_once() {
        let mut ring = ring(RingKind::Dashed, 30, 1.0, Direction::Clockwise, Tint::Dynamic);
        assert!(!ring.set_color(Rgb888::CYAN));
        assert_eq!(ring.redraw_count(), 1);

        let orange = Rgb888::new(255, 165, 0);
        assert!(ring.set_color(orange));
        assert_eq!(ring.redraw_count(), 2);
        assert!(!ring.set_color(orange));
        assert_eq!(ring.redraw_count(), 2);

        assert!(ring
            .buffer()
            .pixels()
            .iter()
            .filter(|p| !p.is_transparent())
            .all(|p| p.rgb() == orange));
    }

    #[test]
    fn test_fixed_ring_ignores_color() {
        let mut ring = ring(RingKind::Dashed, 30, 1.0, Direction::Clockwise, Tint::Fixed);
        let before = ring.buffer().clone();
        assert!(!ring.set_color(Rgb888::RED));
        assert_eq!(ring.color(), Rgb888::CYAN);
        assert_eq!(ring.buffer(), &before);
        assert_eq!(ring.redraw_count(), 1);
    }

    #[test]
    fn test_draw_composites_at_center() {
        let ring = ring(RingKind::Tech, 20, 1.0, Direction::Clockwise, Tint::Dynamic);
        let mut frame = Canvas::new(100, 80);
        ring.draw(&mut frame, Point::new(50, 40));
        assert!(lit(&frame, Point::new(70, 40)));
        assert!(lit(&frame, Point::new(50, 20)));
        assert!(!lit(&frame, Point::new(50, 40)));
    }

    proptest! {
        #[test]
        fn prop_angle_tracks_steps(
            speed in 0.0f32..720.0,
            ccw in any::<bool>(),
            steps in 1usize..200,
        ) {
            let direction = if ccw { Direction::CounterClockwise } else { Direction::Clockwise };
            let mut ring = ring(RingKind::Dashed, 5, speed, direction, Tint::Dynamic);
            for _ in 0..steps {
                ring.update();
                prop_assert!(ring.angle() >= 0.0 && ring.angle() < 360.0);
            }

            let expected = (steps as f64 * f64::from(speed) * direction.sign()).rem_euclid(360.0);
            let diff = (ring.angle() - expected).abs();
            // Compare on the circle: 359.9999 and 0.0 are neighbours
            prop_assert!(diff.min(360.0 - diff) < 1e-6, "angle {} expected {}", ring.angle(), expected);
        }
    }
}
