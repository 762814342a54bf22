use shapekit_core::{Point, ShapeError};

use super::base::{self, expect_text};
use super::{AttrValue, Geometry, HitProbe, Property, ShapeBase};
use crate::render::RenderContext;

/// A single line of text whose box has its top-left corner at the shape
/// origin. The box is as tall as the font size and as wide as the
/// surface measures the string.
#[derive(Debug, Clone, PartialEq)]
pub struct TextShape {
    pub text: String,
}

impl TextShape {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    fn measure(&self, base: &ShapeBase, ctx: &mut dyn RenderContext) -> (f64, f64) {
        (ctx.measure_text(&self.text, &base.style.font), base.style.font.size)
    }
}

impl Geometry for TextShape {
    fn type_tag(&self) -> &'static str {
        "text"
    }

    fn trace(&self, base: &ShapeBase, ctx: &mut dyn RenderContext) {
        let (w, h) = self.measure(base, ctx);
        ctx.rect(base.x, base.y, w, h);
    }

    fn draw(&self, base: &ShapeBase, ctx: &mut dyn RenderContext, zoom: f64) {
        let (_, h) = self.measure(base, ctx);
        ctx.save();
        ctx.apply_style(&base.style);
        base::apply_transform(base, ctx, zoom);
        if base.style.fill.is_some() {
            ctx.fill_text(&self.text, base.x, base.y + h);
        }
        if base.style.stroke.is_some() {
            ctx.stroke_text(&self.text, base.x, base.y + h);
        }
        ctx.restore();
    }

    fn hit_test(&self, base: &ShapeBase, point: Point, probe: &mut HitProbe<'_>) -> bool {
        if base.transform.is_skewed() {
            return base::probe_hit_test(self, base, point, probe);
        }
        let (w, h) = self.measure(base, &mut *probe.ctx);
        base::box_hit_test(base, point, w, h)
    }

    fn relative_move(&mut self, base: &mut ShapeBase, dx: f64, dy: f64) {
        base::relative_move(base, dx, dy);
    }

    fn attr(&self, name: &str) -> Option<AttrValue> {
        match name {
            "text" => Some(self.text.clone().into()),
            _ => None,
        }
    }

    fn set_attr(&mut self, name: &str, value: &AttrValue) -> Option<Result<(), ShapeError>> {
        match name {
            "text" => Some(expect_text(name, value).map(|v| self.text = v.to_string())),
            _ => None,
        }
    }

    fn properties(&self, out: &mut Vec<Property>) {
        out.push(Property::new("text", self.text.as_str()));
    }
}
