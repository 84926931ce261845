//! RGBA pixel buffer
//!
//! Every HUD element renders into its own transparent `Canvas`, which is
//! then rotated and alpha-composited onto the frame canvas. A `Canvas` is
//! an embedded-graphics `DrawTarget<Color = Rgb888>`, so the stock
//! primitives and text renderers draw straight into it with full opacity;
//! `Canvas::blended` gives a view that draws with a fixed alpha instead.

use core::convert::Infallible;

use arclight_core::config::Rgb;
use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
use embedded_graphics::prelude::*;

/// 8-bit straight-alpha RGBA pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    /// Fully transparent black
    pub const TRANSPARENT: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    /// Fully opaque pixel of `color`
    pub fn opaque(color: Rgb888) -> Self {
        Self::with_alpha(color, u8::MAX)
    }

    pub fn with_alpha(color: Rgb888, a: u8) -> Self {
        Self {
            r: color.r(),
            g: color.g(),
            b: color.b(),
            a,
        }
    }

    /// Color channels, ignoring alpha
    pub fn rgb(self) -> Rgb888 {
        Rgb888::new(self.r, self.g, self.b)
    }

    pub fn is_transparent(self) -> bool {
        self.a == 0
    }

    /// Composite `self` over `dst`
    pub fn over(self, dst: Rgba8) -> Rgba8 {
        match (self.a, dst.a) {
            (0, _) => dst,
            (u8::MAX, _) | (_, 0) => self,
            (a, da) => Rgba8 {
                r: mix(self.r, dst.r, a),
                g: mix(self.g, dst.g, a),
                b: mix(self.b, dst.b, a),
                a: a.saturating_add(scale(da, u8::MAX - a)),
            },
        }
    }
}

/// `src * a + dst * (1 - a)` in 8-bit fixed point
fn mix(src: u8, dst: u8, a: u8) -> u8 {
    let a = u16::from(a);
    ((u16::from(src) * a + u16::from(dst) * (255 - a) + 127) / 255) as u8
}

fn scale(value: u8, factor: u8) -> u8 {
    ((u16::from(value) * u16::from(factor) + 127) / 255) as u8
}

/// Convert a configured RGB triple
pub fn rgb888(color: Rgb) -> Rgb888 {
    Rgb888::new(color[0], color[1], color[2])
}

/// Owned RGBA surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<Rgba8>,
}

impl Canvas {
    /// Create a fully transparent canvas
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgba8::TRANSPARENT; (width as usize) * (height as usize)],
        }
    }

    /// Square transparent canvas, the shape every element buffer uses
    pub fn square(side: u32) -> Self {
        Self::new(side, side)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel at the integer center (`width / 2`, `height / 2`)
    pub fn center(&self) -> Point {
        Point::new((self.width / 2) as i32, (self.height / 2) as i32)
    }

    /// Raw pixels, row-major
    pub fn pixels(&self) -> &[Rgba8] {
        &self.pixels
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    /// Pixel at `(x, y)`, `None` outside the canvas
    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgba8> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Overwrite one pixel; out-of-bounds writes are dropped
    pub fn set_pixel(&mut self, x: i32, y: i32, value: Rgba8) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = value;
        }
    }

    /// Alpha-composite one pixel over the existing content
    pub fn blend_pixel(&mut self, x: i32, y: i32, value: Rgba8) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = value.over(self.pixels[i]);
        }
    }

    /// Reset every pixel to fully transparent
    pub fn clear_transparent(&mut self) {
        self.pixels.fill(Rgba8::TRANSPARENT);
    }

    /// Fill with an opaque color
    pub fn fill(&mut self, color: Rgb888) {
        self.pixels.fill(Rgba8::opaque(color));
    }

    /// Number of pixels with any coverage
    pub fn covered_pixels(&self) -> usize {
        self.pixels.iter().filter(|p| !p.is_transparent()).count()
    }

    /// View that draws every pixel with a fixed `alpha`
    pub fn blended(&mut self, alpha: u8) -> Blended<'_> {
        Blended {
            canvas: self,
            alpha,
        }
    }

    /// Composite `src` so that its center lands on `center`
    ///
    /// `src` is clipped against this canvas; transparent source pixels
    /// leave the destination untouched.
    pub fn blit_centered(&mut self, src: &Canvas, center: Point) {
        let origin = center - src.center();

        let x0 = origin.x.max(0);
        let y0 = origin.y.max(0);
        let x1 = (origin.x + src.width as i32).min(self.width as i32);
        let y1 = (origin.y + src.height as i32).min(self.height as i32);

        for y in y0..y1 {
            let src_row = (y - origin.y) as usize * src.width as usize;
            let dst_row = y as usize * self.width as usize;
            for x in x0..x1 {
                let value = src.pixels[src_row + (x - origin.x) as usize];
                if value.is_transparent() {
                    continue;
                }
                let dst = &mut self.pixels[dst_row + x as usize];
                *dst = value.over(*dst);
            }
        }
    }
}

impl OriginDimensions for Canvas {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for Canvas {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.set_pixel(point.x, point.y, Rgba8::opaque(color));
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill(color);
        Ok(())
    }
}

/// Draw target that composites at a fixed opacity
pub struct Blended<'a> {
    canvas: &'a mut Canvas,
    alpha: u8,
}

impl OriginDimensions for Blended<'_> {
    fn size(&self) -> Size {
        self.canvas.size()
    }
}

impl DrawTarget for Blended<'_> {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.canvas
                .blend_pixel(point.x, point.y, Rgba8::with_alpha(color, self.alpha));
        }
        Ok(())
    }
}
