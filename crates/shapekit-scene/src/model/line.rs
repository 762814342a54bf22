use shapekit_core::{Point, ShapeError};

use super::base::{self, expect_number};
use super::{AttrValue, Geometry, HitProbe, Property, ShapeBase};
use crate::render::RenderContext;
use crate::transform::device_transform;

/// Segment from the shape origin `(x, y)` to `(x2, y2)`.
#[derive(Debug, Clone, PartialEq)]
pub struct LineShape {
    pub x2: f64,
    pub y2: f64,
}

impl LineShape {
    pub fn new(x2: f64, y2: f64) -> Self {
        Self { x2, y2 }
    }
}

impl Geometry for LineShape {
    fn type_tag(&self) -> &'static str {
        "line"
    }

    fn trace(&self, base: &ShapeBase, ctx: &mut dyn RenderContext) {
        ctx.move_to(base.x, base.y);
        ctx.line_to(self.x2, self.y2);
    }

    fn draw(&self, base: &ShapeBase, ctx: &mut dyn RenderContext, zoom: f64) {
        ctx.save();
        ctx.apply_style(&base.style);
        base::apply_transform(base, ctx, zoom);
        ctx.begin_path();
        self.trace(base, ctx);
        ctx.stroke();
        ctx.restore();
    }

    fn hit_test(&self, base: &ShapeBase, point: Point, probe: &mut HitProbe<'_>) -> bool {
        let m = device_transform(&base.transform, 1.0);
        let a = m.transform_point(Point::new(base.x, base.y));
        let b = m.transform_point(Point::new(self.x2, self.y2));
        match point.distance_to_segment(&a, &b) {
            Some(d) => d <= base.style.line_width + probe.line_tolerance,
            None => false,
        }
    }

    fn relative_move(&mut self, base: &mut ShapeBase, dx: f64, dy: f64) {
        base.x += dx;
        base.y += dy;
        self.x2 += dx;
        self.y2 += dy;
    }

    fn attr(&self, name: &str) -> Option<AttrValue> {
        match name {
            "x2" => Some(self.x2.into()),
            "y2" => Some(self.y2.into()),
            _ => None,
        }
    }

    fn set_attr(&mut self, name: &str, value: &AttrValue) -> Option<Result<(), ShapeError>> {
        let slot = match name {
            "x2" => &mut self.x2,
            "y2" => &mut self.y2,
            _ => return None,
        };
        Some(expect_number(name, value).map(|v| *slot = v))
    }

    fn properties(&self, out: &mut Vec<Property>) {
        out.push(Property::new("x2", self.x2));
        out.push(Property::new("y2", self.y2));
    }
}
