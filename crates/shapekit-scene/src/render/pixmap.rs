//! Raster surface backed by tiny-skia.

use image::{Rgba, RgbaImage};
use shapekit_core::{Affine, Error, Result};
use std::path::Path as FsPath;
use tiny_skia::{
    BlendMode, Color as SkiaColor, FillRule, IntSize, LineCap as SkiaCap, LineJoin as SkiaJoin,
    Paint, Pixmap, PixmapPaint, Rect, Stroke, Transform,
};

use super::path::PathRecorder;
use super::{estimate_text_width, RenderContext};
use crate::style::{Color, Composite, Font, LineCap, LineJoin, Style};

const PIXMAP_TOLERANCE: f32 = 0.1;

#[derive(Debug, Clone)]
struct DrawState {
    transform: Affine,
    fill: Option<Color>,
    stroke: Option<Color>,
    line_width: f64,
    line_join: LineJoin,
    line_cap: LineCap,
    alpha: f64,
    composite: Composite,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            transform: Affine::identity(),
            fill: Some(Color::BLACK),
            stroke: None,
            line_width: 1.0,
            line_join: LineJoin::Miter,
            line_cap: LineCap::Butt,
            alpha: 1.0,
            composite: Composite::SourceOver,
        }
    }
}

/// Anti-aliased RGBA surface.
///
/// Paths are recorded in device space and filled with an identity
/// transform; stroke widths are scaled by the transform current at stroke
/// time. Text is measured but not rasterized.
pub struct PixmapContext {
    pixmap: Pixmap,
    state: DrawState,
    stack: Vec<DrawState>,
    path: PathRecorder,
}

impl PixmapContext {
    /// A transparent surface, or `None` for a zero-sized one.
    pub fn new(width: u32, height: u32) -> Option<Self> {
        Some(Self {
            pixmap: Pixmap::new(width, height)?,
            state: DrawState::default(),
            stack: Vec::new(),
            path: PathRecorder::new(),
        })
    }

    pub fn fill_background(&mut self, color: Color) {
        self.pixmap.fill(skia_color(color, 1.0));
    }

    pub fn to_image(&self) -> RgbaImage {
        let width = self.pixmap.width();
        let mut image = RgbaImage::new(width, self.pixmap.height());
        for (i, px) in self.pixmap.pixels().iter().enumerate() {
            let c = px.demultiply();
            let x = i as u32 % width;
            let y = i as u32 / width;
            image.put_pixel(x, y, Rgba([c.red(), c.green(), c.blue(), c.alpha()]));
        }
        image
    }

    pub fn save_png(&self, path: &FsPath) -> Result<()> {
        self.to_image()
            .save(path)
            .map_err(|e| Error::other(format!("Failed to write {}: {}", path.display(), e)))
    }

    fn paint(&self, color: Color) -> Paint<'static> {
        let mut paint = Paint::default();
        paint.set_color(skia_color(color, self.state.alpha));
        paint.anti_alias = true;
        paint.blend_mode = blend_mode(self.state.composite);
        paint
    }
}

fn skia_color(color: Color, alpha: f64) -> SkiaColor {
    let a = (color.a as f64 * alpha.clamp(0.0, 1.0)).round() as u8;
    SkiaColor::from_rgba8(color.r, color.g, color.b, a)
}

fn skia_transform(m: &Affine) -> Transform {
    Transform::from_row(
        m.a as f32, m.b as f32, m.c as f32, m.d as f32, m.e as f32, m.f as f32,
    )
}

fn blend_mode(composite: Composite) -> BlendMode {
    match composite {
        Composite::SourceOver => BlendMode::SourceOver,
        Composite::SourceIn => BlendMode::SourceIn,
        Composite::SourceOut => BlendMode::SourceOut,
        Composite::SourceAtop => BlendMode::SourceAtop,
        Composite::DestinationOver => BlendMode::DestinationOver,
        Composite::DestinationIn => BlendMode::DestinationIn,
        Composite::DestinationOut => BlendMode::DestinationOut,
        Composite::DestinationAtop => BlendMode::DestinationAtop,
        Composite::Lighter => BlendMode::Plus,
        Composite::Copy => BlendMode::Source,
        Composite::Xor => BlendMode::Xor,
    }
}

/// Straight-alpha image into a premultiplied pixmap.
fn image_to_pixmap(image: &RgbaImage) -> Option<Pixmap> {
    let size = IntSize::from_wh(image.width(), image.height())?;
    let mut data = Vec::with_capacity(image.as_raw().len());
    for px in image.pixels() {
        let [r, g, b, a] = px.0;
        let premul = |c: u8| ((c as u16 * a as u16 + 127) / 255) as u8;
        data.extend_from_slice(&[premul(r), premul(g), premul(b), a]);
    }
    Pixmap::from_vec(data, size)
}

impl RenderContext for PixmapContext {
    fn name(&self) -> &'static str {
        "tiny-skia"
    }

    fn width(&self) -> u32 {
        self.pixmap.width()
    }

    fn height(&self) -> u32 {
        self.pixmap.height()
    }

    fn save(&mut self) {
        self.stack.push(self.state.clone());
    }

    fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
    }

    fn set_transform(&mut self, transform: Affine) {
        self.state.transform = transform;
    }

    fn transform(&self) -> Affine {
        self.state.transform
    }

    fn apply_style(&mut self, style: &Style) {
        self.state.fill = style.fill;
        self.state.stroke = style.stroke;
        self.state.line_width = style.line_width;
        self.state.line_join = style.line_join;
        self.state.line_cap = style.line_cap;
        self.state.alpha = style.alpha;
        self.state.composite = style.composite;
    }

    fn begin_path(&mut self) {
        self.path.clear();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.path.move_to(&self.state.transform, x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.path.line_to(&self.state.transform, x, y);
    }

    fn quadratic_curve_to(&mut self, cx: f64, cy: f64, x: f64, y: f64) {
        self.path
            .quadratic_curve_to(&self.state.transform, cx, cy, x, y);
    }

    fn bezier_curve_to(&mut self, c1x: f64, c1y: f64, c2x: f64, c2y: f64, x: f64, y: f64) {
        self.path
            .bezier_curve_to(&self.state.transform, c1x, c1y, c2x, c2y, x, y);
    }

    fn arc(&mut self, cx: f64, cy: f64, radius: f64, start: f64, end: f64, anticlockwise: bool) {
        self.path
            .arc(&self.state.transform, cx, cy, radius, start, end, anticlockwise);
    }

    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.path.rect(&self.state.transform, x, y, width, height);
    }

    fn close_path(&mut self) {
        self.path.close_path();
    }

    fn fill(&mut self) {
        let Some(color) = self.state.fill else {
            return;
        };
        let Some(path) = self.path.to_skia() else {
            return;
        };
        let paint = self.paint(color);
        self.pixmap
            .fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
    }

    fn stroke(&mut self) {
        let Some(color) = self.state.stroke else {
            return;
        };
        let Some(path) = self.path.to_skia() else {
            return;
        };
        let paint = self.paint(color);
        let scale = self.state.transform.determinant().abs().sqrt();
        let stroke = Stroke {
            width: (self.state.line_width * scale) as f32,
            line_cap: match self.state.line_cap {
                LineCap::Butt => SkiaCap::Butt,
                LineCap::Round => SkiaCap::Round,
                LineCap::Square => SkiaCap::Square,
            },
            line_join: match self.state.line_join {
                LineJoin::Miter => SkiaJoin::Miter,
                LineJoin::Round => SkiaJoin::Round,
                LineJoin::Bevel => SkiaJoin::Bevel,
            },
            ..Stroke::default()
        };
        self.pixmap
            .stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        tracing::trace!("Text '{}' at ({}, {}) not rasterized", text, x, y);
    }

    fn stroke_text(&mut self, text: &str, x: f64, y: f64) {
        tracing::trace!("Text outline '{}' at ({}, {}) not rasterized", text, x, y);
    }

    fn measure_text(&mut self, text: &str, font: &Font) -> f64 {
        estimate_text_width(text, font)
    }

    fn draw_image(&mut self, image: &RgbaImage, x: f64, y: f64) {
        let Some(source) = image_to_pixmap(image) else {
            return;
        };
        let m = self.state.transform.compose(&Affine::translation(x, y));
        let paint = PixmapPaint {
            opacity: self.state.alpha.clamp(0.0, 1.0) as f32,
            blend_mode: blend_mode(self.state.composite),
            ..PixmapPaint::default()
        };
        self.pixmap
            .draw_pixmap(0, 0, source.as_ref(), &paint, skia_transform(&m), None);
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let full = x <= 0.0
            && y <= 0.0
            && x + width >= self.pixmap.width() as f64
            && y + height >= self.pixmap.height() as f64;
        if full && self.state.transform.is_identity() {
            self.pixmap.fill(SkiaColor::TRANSPARENT);
            return;
        }
        let Some(rect) = Rect::from_xywh(x as f32, y as f32, width as f32, height as f32) else {
            return;
        };
        let mut paint = Paint::default();
        paint.blend_mode = BlendMode::Clear;
        self.pixmap
            .fill_rect(rect, &paint, skia_transform(&self.state.transform), None);
    }

    fn read_pixels(&self) -> Option<RgbaImage> {
        Some(self.to_image())
    }

    fn put_pixels(&mut self, image: &RgbaImage) -> bool {
        if image.width() != self.pixmap.width() || image.height() != self.pixmap.height() {
            return false;
        }
        match image_to_pixmap(image) {
            Some(source) => {
                self.pixmap.data_mut().copy_from_slice(source.data());
                true
            }
            None => false,
        }
    }

    fn supports_point_in_path(&self) -> bool {
        true
    }

    fn is_point_in_path(&self, x: f64, y: f64) -> bool {
        self.path.contains(x, y, PIXMAP_TOLERANCE)
    }
}
