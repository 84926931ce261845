//! Arcs and rotation
//!
//! Angles are in degrees. Arc angles are measured clockwise from the
//! positive x axis in screen space (y grows downward), so 90° points
//! straight down. This is embedded-graphics' own `Arc` convention, so no
//! conversion is needed. Rotation uses the same convention: a positive
//! angle turns content clockwise on screen.

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Arc, PrimitiveStyle};

use crate::canvas::{Canvas, Rgba8};

/// Odd diameter of a circle centered on a pixel, `2 * radius + 1`
pub fn diameter(radius: u32) -> u32 {
    radius.saturating_mul(2).saturating_add(1)
}

/// Draw an arc of `width` pixels sweeping clockwise from `start_deg` to `end_deg`
///
/// A sweep of 360° or more draws the full circle; an inverted range draws
/// nothing.
pub fn draw_arc<D>(
    target: &mut D,
    color: Rgb888,
    center: Point,
    radius: u32,
    start_deg: f32,
    end_deg: f32,
    width: u32,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    let sweep = end_deg - start_deg;
    if sweep <= 0.0 {
        return Ok(());
    }
    Arc::with_center(center, diameter(radius), start_deg.deg(), sweep.deg())
        .into_styled(PrimitiveStyle::with_stroke(color, width.max(1)))
        .draw(target)
}

/// Size of the box that holds `size` rotated by `angle_deg`
///
/// Each side keeps the parity of the source so both centers stay on
/// integer pixels.
pub fn rotated_size(size: Size, angle_deg: f32) -> Size {
    let (sin, cos) = angle_deg.to_radians().sin_cos();
    let (sin, cos) = (sin.abs(), cos.abs());
    let (w, h) = (size.width as f32, size.height as f32);
    Size::new(
        grow_to_parity(size.width, w * cos + h * sin),
        grow_to_parity(size.height, w * sin + h * cos),
    )
}

/// Rotated side length of a square
pub fn rotated_side(side: u32, angle_deg: f32) -> u32 {
    rotated_size(Size::new(side, side), angle_deg).width
}

fn grow_to_parity(base: u32, exact: f32) -> u32 {
    // Absorb float noise at multiples of 90°
    let mut out = (exact - 1e-3).ceil().max(1.0) as u32;
    if out % 2 != base % 2 {
        out += 1;
    }
    out
}

/// Rotate a canvas about its center
///
/// Positive angles turn the content clockwise. The result is enlarged to
/// the rotated bounding box and shares its center with `src`, so blitting
/// it with `Canvas::blit_centered` keeps the content in place. Sampling is
/// nearest-neighbor from the inverse mapping; pixels with no source stay
/// transparent.
pub fn rotate(src: &Canvas, angle_deg: f32) -> Canvas {
    let angle = angle_deg.rem_euclid(360.0);
    if angle == 0.0 || angle >= 360.0 {
        return src.clone();
    }

    let size = rotated_size(src.size(), angle);
    let mut out = Canvas::new(size.width, size.height);

    let src_center = src.center();
    let dst_center = out.center();
    let (sin, cos) = angle.to_radians().sin_cos();

    for y in 0..out.height() as i32 {
        let dy = (y - dst_center.y) as f32;
        for x in 0..out.width() as i32 {
            let dx = (x - dst_center.x) as f32;
            // Inverse of the clockwise screen rotation
            let sx = (dx * cos + dy * sin).round() as i32 + src_center.x;
            let sy = (-dx * sin + dy * cos).round() as i32 + src_center.y;
            if let Some(value) = src.pixel(sx, sy) {
                if value != Rgba8::TRANSPARENT {
                    out.set_pixel(x, y, value);
                }
            }
        }
    }
    out
}
