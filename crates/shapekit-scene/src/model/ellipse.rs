use shapekit_core::constants::ELLIPSE_KAPPA;
use shapekit_core::{rotate_point, Point, ShapeError};

use super::base::{self, expect_number};
use super::{AttrValue, Geometry, HitProbe, Property, ShapeBase};
use crate::render::RenderContext;

/// Ellipse centred on the shape origin. `width` and `height` are the
/// horizontal and vertical radii.
#[derive(Debug, Clone, PartialEq)]
pub struct EllipseShape {
    pub width: f64,
    pub height: f64,
}

impl EllipseShape {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Geometry for EllipseShape {
    fn type_tag(&self) -> &'static str {
        "ellipse"
    }

    fn trace(&self, base: &ShapeBase, ctx: &mut dyn RenderContext) {
        let (x, y) = (base.x, base.y);
        let (w, h) = (self.width, self.height);
        let cx = ELLIPSE_KAPPA * w;
        let cy = ELLIPSE_KAPPA * h;

        ctx.move_to(x + w, y);
        ctx.bezier_curve_to(x + w, y - cy, x + cx, y - h, x, y - h);
        ctx.bezier_curve_to(x - cx, y - h, x - w, y - cy, x - w, y);
        ctx.bezier_curve_to(x - w, y + cy, x - cx, y + h, x, y + h);
        ctx.bezier_curve_to(x + cx, y + h, x + w, y + cy, x + w, y);
        ctx.close_path();
    }

    fn draw(&self, base: &ShapeBase, ctx: &mut dyn RenderContext, zoom: f64) {
        base::draw_path(self, base, ctx, zoom);
    }

    fn hit_test(&self, base: &ShapeBase, point: Point, probe: &mut HitProbe<'_>) -> bool {
        let t = &base.transform;
        if t.is_skewed() || !t.has_uniform_scale() || t.scale_x <= 0.0 {
            return base::probe_hit_test(self, base, point, probe);
        }
        if self.width == 0.0 || self.height == 0.0 {
            return false;
        }
        let pos = base.position();
        let local = rotate_point(
            Point::new(point.x - pos.x, point.y - pos.y),
            Point::default(),
            -t.rotation,
        );
        let u = local.x / (self.width * t.scale_x);
        let v = local.y / (self.height * t.scale_y);
        u * u + v * v <= 1.0
    }

    fn relative_move(&mut self, base: &mut ShapeBase, dx: f64, dy: f64) {
        base::relative_move(base, dx, dy);
    }

    fn attr(&self, name: &str) -> Option<AttrValue> {
        match name {
            "width" => Some(self.width.into()),
            "height" => Some(self.height.into()),
            _ => None,
        }
    }

    fn set_attr(&mut self, name: &str, value: &AttrValue) -> Option<Result<(), ShapeError>> {
        let slot = match name {
            "width" => &mut self.width,
            "height" => &mut self.height,
            _ => return None,
        };
        Some(expect_number(name, value).map(|v| *slot = v))
    }

    fn properties(&self, out: &mut Vec<Property>) {
        out.push(Property::new("width", self.width));
        out.push(Property::new("height", self.height));
    }
}
