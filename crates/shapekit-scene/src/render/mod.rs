//! Rendering-surface contract and the built-in surfaces.
//!
//! Shapes draw through [`RenderContext`], a canvas-2D style interface:
//! path construction in the current transform, fill/stroke, an explicit
//! affine setter, pixel readback and a point-in-current-path query. The
//! generic hit-test fallback traces shapes into a probe context and asks
//! it whether the point is inside; a probe that cannot answer is rejected
//! when the scene is built.
//!
//! - [`PathProbe`]: headless, lyon-backed; the default probe.
//! - [`PixmapContext`]: tiny-skia raster surface with pixel readback.
//! - [`NullContext`]: accepts and discards everything.

mod path;
mod pixmap;
mod probe;

pub use path::{PathOp, PathRecorder};
pub use pixmap::PixmapContext;
pub use probe::PathProbe;

use image::RgbaImage;
use shapekit_core::Affine;

use crate::style::{Font, Style};

pub trait RenderContext {
    /// Short implementation name used in logs and capability errors.
    fn name(&self) -> &'static str;
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    fn save(&mut self);
    fn restore(&mut self);
    fn set_transform(&mut self, transform: Affine);
    fn transform(&self) -> Affine;

    /// Post-multiply the current transform by a scale.
    fn scale(&mut self, sx: f64, sy: f64) {
        let m = self.transform().compose(&Affine::scale(sx, sy));
        self.set_transform(m);
    }

    fn apply_style(&mut self, style: &Style);

    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn quadratic_curve_to(&mut self, cx: f64, cy: f64, x: f64, y: f64);
    fn bezier_curve_to(&mut self, c1x: f64, c1y: f64, c2x: f64, c2y: f64, x: f64, y: f64);
    /// Angles in radians, as on a canvas.
    fn arc(&mut self, cx: f64, cy: f64, radius: f64, start: f64, end: f64, anticlockwise: bool);
    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    fn close_path(&mut self);

    fn fill(&mut self);
    fn stroke(&mut self);

    fn fill_text(&mut self, text: &str, x: f64, y: f64);
    fn stroke_text(&mut self, text: &str, x: f64, y: f64);
    fn measure_text(&mut self, text: &str, font: &Font) -> f64;

    fn draw_image(&mut self, image: &RgbaImage, x: f64, y: f64);
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64);

    /// Copy of the surface pixels, if the surface keeps any.
    fn read_pixels(&self) -> Option<RgbaImage>;
    /// Replace the surface pixels. Returns false when unsupported or the
    /// size does not match.
    fn put_pixels(&mut self, image: &RgbaImage) -> bool;

    fn supports_point_in_path(&self) -> bool;
    /// Whether the device-space point lies inside the current path.
    fn is_point_in_path(&self, x: f64, y: f64) -> bool;
}

/// Average-advance text width for surfaces without font metrics.
pub fn estimate_text_width(text: &str, font: &Font) -> f64 {
    text.chars().count() as f64 * font.size * shapekit_core::constants::AVERAGE_GLYPH_ADVANCE
}

/// A surface that draws nothing and answers no queries.
///
/// Useful as the visible surface of a scene that is only hit-tested, and
/// as the probe in tests of the capability check.
#[derive(Debug, Clone)]
pub struct NullContext {
    width: u32,
    height: u32,
    transform: Affine,
    stack: Vec<Affine>,
}

impl NullContext {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            transform: Affine::identity(),
            stack: Vec::new(),
        }
    }
}

impl RenderContext for NullContext {
    fn name(&self) -> &'static str {
        "null"
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn save(&mut self) {
        self.stack.push(self.transform);
    }

    fn restore(&mut self) {
        if let Some(m) = self.stack.pop() {
            self.transform = m;
        }
    }

    fn set_transform(&mut self, transform: Affine) {
        self.transform = transform;
    }

    fn transform(&self) -> Affine {
        self.transform
    }

    fn apply_style(&mut self, _style: &Style) {}
    fn begin_path(&mut self) {}
    fn move_to(&mut self, _x: f64, _y: f64) {}
    fn line_to(&mut self, _x: f64, _y: f64) {}
    fn quadratic_curve_to(&mut self, _cx: f64, _cy: f64, _x: f64, _y: f64) {}
    fn bezier_curve_to(&mut self, _c1x: f64, _c1y: f64, _c2x: f64, _c2y: f64, _x: f64, _y: f64) {}
    fn arc(&mut self, _cx: f64, _cy: f64, _r: f64, _start: f64, _end: f64, _ccw: bool) {}
    fn rect(&mut self, _x: f64, _y: f64, _width: f64, _height: f64) {}
    fn close_path(&mut self) {}
    fn fill(&mut self) {}
    fn stroke(&mut self) {}
    fn fill_text(&mut self, _text: &str, _x: f64, _y: f64) {}
    fn stroke_text(&mut self, _text: &str, _x: f64, _y: f64) {}

    fn measure_text(&mut self, text: &str, font: &Font) -> f64 {
        estimate_text_width(text, font)
    }

    fn draw_image(&mut self, _image: &RgbaImage, _x: f64, _y: f64) {}
    fn clear_rect(&mut self, _x: f64, _y: f64, _width: f64, _height: f64) {}

    fn read_pixels(&self) -> Option<RgbaImage> {
        None
    }

    fn put_pixels(&mut self, _image: &RgbaImage) -> bool {
        false
    }

    fn supports_point_in_path(&self) -> bool {
        false
    }

    fn is_point_in_path(&self, _x: f64, _y: f64) -> bool {
        false
    }
}
