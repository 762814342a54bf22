use shapekit_core::{Point, ShapeError};

use super::base::{self, expect_number};
use super::{AttrValue, Geometry, HitProbe, Property, ShapeBase};
use crate::render::RenderContext;

#[derive(Debug, Clone, PartialEq)]
pub struct CircleShape {
    pub radius: f64,
}

impl CircleShape {
    pub fn new(radius: f64) -> Self {
        Self { radius }
    }
}

impl Default for CircleShape {
    fn default() -> Self {
        Self::new(5.0)
    }
}

/// Distance test against the effective position, widened by half the
/// stroke when the shape is stroked.
pub(crate) fn within_radius(base: &ShapeBase, point: Point, radius: f64) -> bool {
    let reach = (radius + base.style.stroke_extent() / 2.0) * base.transform.scale_x.abs();
    base.position().distance_to(&point) <= reach
}

impl Geometry for CircleShape {
    fn type_tag(&self) -> &'static str {
        "circle"
    }

    fn trace(&self, base: &ShapeBase, ctx: &mut dyn RenderContext) {
        ctx.arc(base.x, base.y, self.radius, 0.0, std::f64::consts::TAU, false);
        ctx.close_path();
    }

    fn draw(&self, base: &ShapeBase, ctx: &mut dyn RenderContext, zoom: f64) {
        base::draw_path(self, base, ctx, zoom);
    }

    fn hit_test(&self, base: &ShapeBase, point: Point, probe: &mut HitProbe<'_>) -> bool {
        let t = &base.transform;
        if t.is_skewed() || !t.has_uniform_scale() {
            return base::probe_hit_test(self, base, point, probe);
        }
        within_radius(base, point, self.radius)
    }

    fn relative_move(&mut self, base: &mut ShapeBase, dx: f64, dy: f64) {
        base::relative_move(base, dx, dy);
    }

    fn attr(&self, name: &str) -> Option<AttrValue> {
        match name {
            "radius" => Some(self.radius.into()),
            _ => None,
        }
    }

    fn set_attr(&mut self, name: &str, value: &AttrValue) -> Option<Result<(), ShapeError>> {
        match name {
            "radius" => Some(expect_number(name, value).map(|v| self.radius = v)),
            _ => None,
        }
    }

    fn properties(&self, out: &mut Vec<Property>) {
        out.push(Property::new("radius", self.radius));
    }
}
