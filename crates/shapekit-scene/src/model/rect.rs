use shapekit_core::{Point, ShapeError};

use super::base::{self, expect_number};
use super::{AttrValue, Geometry, HitProbe, Property, ShapeBase};
use crate::render::RenderContext;

/// Rectangle anchored at its top-left corner, optionally with rounded corners.
#[derive(Debug, Clone, PartialEq)]
pub struct RectShape {
    pub width: f64,
    pub height: f64,
    pub radius: f64,
}

impl RectShape {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            radius: 0.0,
        }
    }

    /// Square of side `width`; the default rectangle is 5×5.
    pub fn square(width: f64) -> Self {
        Self::new(width, width)
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }
}

impl Default for RectShape {
    fn default() -> Self {
        Self::square(5.0)
    }
}

/// Rounded-corner outline, corners clamped to half the shorter side.
pub(crate) fn trace_rounded(
    ctx: &mut dyn RenderContext,
    x: f64,
    y: f64,
    w: f64,
    h: f64,
    radius: f64,
) {
    use std::f64::consts::{FRAC_PI_2, PI};

    let r = radius.min(w.abs() / 2.0).min(h.abs() / 2.0).max(0.0);
    ctx.move_to(x + r, y);
    ctx.line_to(x + w - r, y);
    ctx.arc(x + w - r, y + r, r, -FRAC_PI_2, 0.0, false);
    ctx.line_to(x + w, y + h - r);
    ctx.arc(x + w - r, y + h - r, r, 0.0, FRAC_PI_2, false);
    ctx.line_to(x + r, y + h);
    ctx.arc(x + r, y + h - r, r, FRAC_PI_2, PI, false);
    ctx.line_to(x, y + r);
    ctx.arc(x + r, y + r, r, PI, PI + FRAC_PI_2, false);
    ctx.close_path();
}

impl Geometry for RectShape {
    fn type_tag(&self) -> &'static str {
        "rect"
    }

    fn trace(&self, base: &ShapeBase, ctx: &mut dyn RenderContext) {
        if self.radius != 0.0 {
            trace_rounded(ctx, base.x, base.y, self.width, self.height, self.radius);
        } else {
            ctx.rect(base.x, base.y, self.width, self.height);
        }
    }

    fn draw(&self, base: &ShapeBase, ctx: &mut dyn RenderContext, zoom: f64) {
        base::draw_path(self, base, ctx, zoom);
    }

    fn hit_test(&self, base: &ShapeBase, point: Point, probe: &mut HitProbe<'_>) -> bool {
        if base.transform.is_skewed() || self.radius != 0.0 {
            return base::probe_hit_test(self, base, point, probe);
        }
        base::box_hit_test(base, point, self.width, self.height)
    }

    fn relative_move(&mut self, base: &mut ShapeBase, dx: f64, dy: f64) {
        base::relative_move(base, dx, dy);
    }

    fn attr(&self, name: &str) -> Option<AttrValue> {
        match name {
            "width" => Some(self.width.into()),
            "height" => Some(self.height.into()),
            "radius" => Some(self.radius.into()),
            _ => None,
        }
    }

    fn set_attr(&mut self, name: &str, value: &AttrValue) -> Option<Result<(), ShapeError>> {
        let slot = match name {
            "width" => &mut self.width,
            "height" => &mut self.height,
            "radius" => &mut self.radius,
            _ => return None,
        };
        Some(expect_number(name, value).map(|v| *slot = v))
    }

    fn properties(&self, out: &mut Vec<Property>) {
        out.push(Property::new("width", self.width));
        out.push(Property::new("height", self.height));
        out.push(Property::new("radius", self.radius));
    }
}
