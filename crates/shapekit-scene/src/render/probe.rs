use image::RgbaImage;
use shapekit_core::Affine;

use super::path::PathRecorder;
use super::{estimate_text_width, RenderContext};
use crate::style::{Font, Style};

/// Curve flattening tolerance for containment queries, in device pixels.
const PROBE_TOLERANCE: f32 = 0.05;

/// Headless surface that only builds paths.
///
/// Fill and stroke are no-ops; the interesting part is
/// [`RenderContext::is_point_in_path`], answered with lyon's non-zero
/// hit test over the recorded device-space path.
#[derive(Debug, Clone)]
pub struct PathProbe {
    width: u32,
    height: u32,
    transform: Affine,
    stack: Vec<Affine>,
    path: PathRecorder,
}

impl PathProbe {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            transform: Affine::identity(),
            stack: Vec::new(),
            path: PathRecorder::new(),
        }
    }

    pub fn path(&self) -> &PathRecorder {
        &self.path
    }
}

impl Default for PathProbe {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

impl RenderContext for PathProbe {
    fn name(&self) -> &'static str {
        "path-probe"
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

    fn begin_path(&mut self) {
        self.path.clear();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.path.move_to(&self.transform, x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.path.line_to(&self.transform, x, y);
    }

    fn quadratic_curve_to(&mut self, cx: f64, cy: f64, x: f64, y: f64) {
        self.path.quadratic_curve_to(&self.transform, cx, cy, x, y);
    }

    fn bezier_curve_to(&mut self, c1x: f64, c1y: f64, c2x: f64, c2y: f64, x: f64, y: f64) {
        self.path
            .bezier_curve_to(&self.transform, c1x, c1y, c2x, c2y, x, y);
    }

    fn arc(&mut self, cx: f64, cy: f64, radius: f64, start: f64, end: f64, anticlockwise: bool) {
        self.path
            .arc(&self.transform, cx, cy, radius, start, end, anticlockwise);
    }

    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.path.rect(&self.transform, x, y, width, height);
    }

    fn close_path(&mut self) {
        self.path.close_path();
    }

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
        true
    }

    fn is_point_in_path(&self, x: f64, y: f64) -> bool {
        self.path.contains(x, y, PROBE_TOLERANCE)
    }
}
