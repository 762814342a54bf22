use ::image::RgbaImage;
use shapekit_core::{Point, ShapeError};
use std::rc::Rc;

use super::base::{self, expect_text};
use super::{AttrValue, Geometry, HitProbe, Property, ShapeBase};
use crate::render::RenderContext;

/// Bitmap identified by a source key.
///
/// Pixels arrive asynchronously through the scene; until then the image is
/// 0×0, draws nothing and is never hit.
#[derive(Debug, Clone, Default)]
pub struct ImageShape {
    pub source: String,
    pixels: Option<Rc<RgbaImage>>,
}

impl ImageShape {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            pixels: None,
        }
    }

    pub fn with_pixels(mut self, pixels: RgbaImage) -> Self {
        self.set_pixels(Rc::new(pixels));
        self
    }

    pub fn set_pixels(&mut self, pixels: Rc<RgbaImage>) {
        self.pixels = Some(pixels);
    }

    pub fn pixels(&self) -> Option<&RgbaImage> {
        self.pixels.as_deref()
    }

    pub fn is_loaded(&self) -> bool {
        self.pixels.is_some()
    }

    pub fn width(&self) -> f64 {
        self.pixels.as_ref().map_or(0.0, |p| p.width() as f64)
    }

    pub fn height(&self) -> f64 {
        self.pixels.as_ref().map_or(0.0, |p| p.height() as f64)
    }
}

impl Geometry for ImageShape {
    fn type_tag(&self) -> &'static str {
        "image"
    }

    fn trace(&self, base: &ShapeBase, ctx: &mut dyn RenderContext) {
        ctx.rect(base.x, base.y, self.width(), self.height());
    }

    fn draw(&self, base: &ShapeBase, ctx: &mut dyn RenderContext, zoom: f64) {
        let Some(pixels) = self.pixels.as_deref() else {
            return;
        };
        ctx.save();
        ctx.apply_style(&base.style);
        base::apply_transform(base, ctx, zoom);
        ctx.draw_image(pixels, base.x, base.y);
        ctx.restore();
    }

    fn hit_test(&self, base: &ShapeBase, point: Point, probe: &mut HitProbe<'_>) -> bool {
        let (w, h) = (self.width(), self.height());
        if w == 0.0 || h == 0.0 {
            return false;
        }
        if base.transform.is_skewed() {
            return base::probe_hit_test(self, base, point, probe);
        }
        base::box_hit_test(base, point, w, h)
    }

    fn relative_move(&mut self, base: &mut ShapeBase, dx: f64, dy: f64) {
        base::relative_move(base, dx, dy);
    }

    fn attr(&self, name: &str) -> Option<AttrValue> {
        match name {
            "source" => Some(self.source.clone().into()),
            "width" => Some(self.width().into()),
            "height" => Some(self.height().into()),
            "loaded" => Some(self.is_loaded().into()),
            _ => None,
        }
    }

    /// Changing the source drops the current pixels. The size attributes
    /// follow the pixels and cannot be written.
    fn set_attr(&mut self, name: &str, value: &AttrValue) -> Option<Result<(), ShapeError>> {
        match name {
            "source" => Some(expect_text(name, value).map(|v| {
                if v != self.source {
                    self.source = v.to_string();
                    self.pixels = None;
                }
            })),
            "width" | "height" | "loaded" => Some(Err(ShapeError::InvalidAttributeValue {
                name: name.to_string(),
                expected: "read-only attribute".to_string(),
            })),
            _ => None,
        }
    }

    fn properties(&self, out: &mut Vec<Property>) {
        out.push(Property::new("source", self.source.as_str()));
        out.push(Property::new("width", self.width()));
        out.push(Property::new("height", self.height()));
        out.push(Property::new("loaded", self.is_loaded()));
    }
}
