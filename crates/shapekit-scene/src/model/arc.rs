use shapekit_core::{rotate_point, Point, ShapeError};

use super::base::{self, expect_bool, expect_number};
use super::circle::within_radius;
use super::{AttrValue, Geometry, HitProbe, Property, ShapeBase};
use crate::render::RenderContext;

/// Closed wedge from the centre through an arc of the circle.
///
/// Angles are in degrees, measured clockwise from the positive x axis on a
/// y-down surface.
#[derive(Debug, Clone, PartialEq)]
pub struct ArcShape {
    pub radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    pub anticlockwise: bool,
}

impl ArcShape {
    pub fn new(radius: f64, start_angle: f64, end_angle: f64) -> Self {
        Self {
            radius,
            start_angle,
            end_angle,
            anticlockwise: false,
        }
    }

    pub fn anticlockwise(mut self, anticlockwise: bool) -> Self {
        self.anticlockwise = anticlockwise;
        self
    }

    /// Whether a direction (degrees) falls inside the swept range.
    pub fn contains_angle(&self, angle: f64) -> bool {
        let (from, span) = if self.anticlockwise {
            (self.end_angle, self.start_angle - self.end_angle)
        } else {
            (self.start_angle, self.end_angle - self.start_angle)
        };
        if span >= 360.0 {
            return true;
        }
        (angle - from).rem_euclid(360.0) <= span.rem_euclid(360.0)
    }

    /// A stroked wedge also reaches half the line width past its two
    /// straight edges. `local` is relative to the centre, unrotated.
    fn near_edge(&self, base: &ShapeBase, local: Point) -> bool {
        let half = base.style.stroke_extent() / 2.0;
        if half <= 0.0 {
            return false;
        }
        let scale = base.transform.scale_x.abs();
        let reach = self.radius * scale;
        let centre = Point::default();
        [self.start_angle, self.end_angle].iter().any(|angle| {
            let (sin, cos) = angle.to_radians().sin_cos();
            let rim = Point::new(cos * reach, sin * reach);
            local
                .distance_to_segment(&centre, &rim)
                .is_some_and(|d| d <= half * scale)
        })
    }
}

impl Default for ArcShape {
    fn default() -> Self {
        Self::new(5.0, 0.0, 360.0)
    }
}

impl Geometry for ArcShape {
    fn type_tag(&self) -> &'static str {
        "arc"
    }

    fn trace(&self, base: &ShapeBase, ctx: &mut dyn RenderContext) {
        ctx.move_to(base.x, base.y);
        ctx.arc(
            base.x,
            base.y,
            self.radius,
            self.start_angle.to_radians(),
            self.end_angle.to_radians(),
            self.anticlockwise,
        );
        ctx.close_path();
    }

    fn draw(&self, base: &ShapeBase, ctx: &mut dyn RenderContext, zoom: f64) {
        base::draw_path(self, base, ctx, zoom);
    }

    fn hit_test(&self, base: &ShapeBase, point: Point, probe: &mut HitProbe<'_>) -> bool {
        let t = &base.transform;
        if t.is_skewed() || !t.has_uniform_scale() || t.scale_x < 0.0 {
            return base::probe_hit_test(self, base, point, probe);
        }
        if !within_radius(base, point, self.radius) {
            return false;
        }
        let pos = base.position();
        let local = rotate_point(
            Point::new(point.x - pos.x, point.y - pos.y),
            Point::default(),
            -t.rotation,
        );
        if local.x == 0.0 && local.y == 0.0 {
            return true;
        }
        self.contains_angle(local.y.atan2(local.x).to_degrees()) || self.near_edge(base, local)
    }

    fn relative_move(&mut self, base: &mut ShapeBase, dx: f64, dy: f64) {
        base::relative_move(base, dx, dy);
    }

    fn attr(&self, name: &str) -> Option<AttrValue> {
        match name {
            "radius" => Some(self.radius.into()),
            "start_angle" => Some(self.start_angle.into()),
            "end_angle" => Some(self.end_angle.into()),
            "anticlockwise" => Some(self.anticlockwise.into()),
            _ => None,
        }
    }

    fn set_attr(&mut self, name: &str, value: &AttrValue) -> Option<Result<(), ShapeError>> {
        let slot = match name {
            "radius" => &mut self.radius,
            "start_angle" => &mut self.start_angle,
            "end_angle" => &mut self.end_angle,
            "anticlockwise" => {
                return Some(expect_bool(name, value).map(|v| self.anticlockwise = v));
            }
            _ => return None,
        };
        Some(expect_number(name, value).map(|v| *slot = v))
    }

    fn properties(&self, out: &mut Vec<Property>) {
        out.push(Property::new("radius", self.radius));
        out.push(Property::new("start_angle", self.start_angle));
        out.push(Property::new("end_angle", self.end_angle));
        out.push(Property::new("anticlockwise", self.anticlockwise));
    }
}
