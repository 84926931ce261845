//! Display controller
//!
//! Owns every HUD element and composes one frame at a time. The mode is
//! never changed from in here: the controller only follows whatever the
//! mode channel says at the start of each frame.

use arclight_core::config::{HudConfig, PaletteConfig, Tint, WindowConfig};
use arclight_core::{Mode, ModeSnapshot, StatusText};
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use log::{debug, info};

use crate::backend::DisplayError;
use crate::canvas::{rgb888, Canvas};
use crate::elements::{CoreReactor, RingElement};
use crate::overlay::{FontSet, Overlay, OverlayData};

/// HUD frame composer
#[derive(Debug, Clone)]
pub struct DisplayController {
    window: WindowConfig,
    palette: PaletteConfig,
    center: Point,
    /// Outermost first, which is also draw order
    rings: Vec<RingElement>,
    core: CoreReactor,
    overlay: Overlay,
    mode: Mode,
    status: StatusText,
}

impl DisplayController {
    /// Build every element from `config`
    ///
    /// Rings start in their idle colors and render their geometry once
    /// here. Unknown font names fall back to the defaults.
    pub fn new(config: &HudConfig) -> Result<Self, DisplayError> {
        config.validate()?;

        let palette = config.palette;
        let idle = rgb888(Mode::Idle.color(&palette));
        let structural = rgb888(palette.structural);

        let rings = config
            .rings
            .iter()
            .map(|ring| {
                let color = match ring.tint {
                    Tint::Fixed => structural,
                    Tint::Dynamic => idle,
                };
                RingElement::new(ring, color)
            })
            .collect::<Vec<_>>();

        let fonts = FontSet::resolve(&config.fonts.main, &config.fonts.small);
        let overlay = Overlay::new(&config.overlay, fonts, rgb888(palette.text), structural);

        let (cx, cy) = config.window.center();
        info!(
            "HUD initialized: {}x{}, {} rings, core r={}",
            config.window.width,
            config.window.height,
            rings.len(),
            config.core.radius
        );

        let mut status = StatusText::new();
        let _ = status.push_str(Mode::Idle.default_status());

        Ok(Self {
            window: config.window.clone(),
            palette,
            center: Point::new(cx, cy),
            rings,
            core: CoreReactor::new(config.core.radius, idle),
            overlay,
            mode: Mode::Idle,
            status,
        })
    }

    /// Follow the latest mode: recolor dynamic rings and the core, and
    /// pick up the status text
    ///
    /// Returns the number of ring buffers redrawn. Steady state is zero.
    pub fn update_colors(&mut self, snapshot: &ModeSnapshot) -> usize {
        let color = rgb888(snapshot.mode.color(&self.palette));

        let mut redrawn = 0;
        for ring in self.rings.iter_mut().filter(|r| r.is_dynamic()) {
            if ring.set_color(color) {
                redrawn += 1;
            }
        }
        self.core.set_color(color);

        if snapshot.mode != self.mode {
            debug!("Colors -> {} ({} rings redrawn)", snapshot.mode.name(), redrawn);
            self.mode = snapshot.mode;
        }
        let text = snapshot.status_text();
        if self.status.as_str() != text {
            self.status.clear();
            let _ = self.status.push_str(text);
        }

        redrawn
    }

    /// Compose one frame: background, rings back to front, core, overlay
    ///
    /// Advances every ring by one step.
    pub fn draw_frame(&mut self, frame: &mut Canvas, data: &OverlayData) {
        frame.fill(rgb888(self.palette.background));

        for ring in &mut self.rings {
            ring.update();
            ring.draw(frame, self.center);
        }

        self.core.update();
        self.core.draw(frame, self.center, data.elapsed_s);

        self.overlay
            .draw(frame, self.center, &self.status, self.core.color(), data);
    }

    /// Blank frame of the configured size
    pub fn new_frame(&self) -> Canvas {
        Canvas::new(self.window.width, self.window.height)
    }

    pub fn size(&self) -> Size {
        Size::new(self.window.width, self.window.height)
    }

    pub fn window(&self) -> &WindowConfig {
        &self.window
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn rings(&self) -> &[RingElement] {
        &self.rings
    }

    pub fn core(&self) -> &CoreReactor {
        &self.core
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    /// Mode the colors currently reflect
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Status line text currently shown
    pub fn status_text(&self) -> &str {
        &self.status
    }

    /// Color the dynamic elements currently use
    pub fn accent(&self) -> Rgb888 {
        self.core.color()
    }
}

/// Small HUD that renders quickly in tests
#[cfg(test)]
pub(crate) fn test_config() -> HudConfig {
    use arclight_core::config::{Direction, RingConfig, RingKind};

    let mut config = HudConfig::default();
    config.window.width = 240;
    config.window.height = 200;
    config.window.fps = 200;
    config.core.radius = 20;
    config.overlay.telemetry_rows = 2;
    config.rings.clear();
    for ring in [
        RingConfig::new(RingKind::Dashed, 90, 0.2, 2, Direction::Clockwise, Tint::Fixed),
        RingConfig::new(RingKind::Segmented, 70, 0.5, 3, Direction::CounterClockwise, Tint::Dynamic),
        RingConfig::new(RingKind::Tech, 50, 0.8, 1, Direction::Clockwise, Tint::Dynamic),
        RingConfig::new(RingKind::Segmented, 32, 2.0, 4, Direction::Clockwise, Tint::Dynamic),
    ] {
        let _ = config.rings.push(ring);
    }
    config
}
