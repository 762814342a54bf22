use serde::{Deserialize, Serialize};
use shapekit_core::{Point, ShapeError};

use super::base;
use super::{AttrValue, Geometry, HitProbe, Property, ShapeBase};
use crate::render::RenderContext;

/// One path command. Arc angles are in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PathCommand {
    MoveTo {
        x: f64,
        y: f64,
    },
    LineTo {
        x: f64,
        y: f64,
    },
    QuadTo {
        cx: f64,
        cy: f64,
        x: f64,
        y: f64,
    },
    CubicTo {
        c1x: f64,
        c1y: f64,
        c2x: f64,
        c2y: f64,
        x: f64,
        y: f64,
    },
    Arc {
        cx: f64,
        cy: f64,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        #[serde(default)]
        anticlockwise: bool,
    },
    Close,
}

/// Free-form outline.
///
/// The commands are written in their own coordinate space; the first
/// `MoveTo` is pinned to the shape origin, so moving `(x, y)` moves the
/// whole path.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PathShape {
    pub commands: Vec<PathCommand>,
}

impl PathShape {
    pub fn new(commands: Vec<PathCommand>) -> Self {
        Self { commands }
    }

    /// Position of the first `MoveTo`, the default shape origin.
    pub fn origin(&self) -> Option<Point> {
        self.commands.iter().find_map(|c| match *c {
            PathCommand::MoveTo { x, y } => Some(Point::new(x, y)),
            _ => None,
        })
    }
}

impl Geometry for PathShape {
    fn type_tag(&self) -> &'static str {
        "path"
    }

    fn trace(&self, base: &ShapeBase, ctx: &mut dyn RenderContext) {
        let origin = self.origin().unwrap_or_default();
        let dx = base.x - origin.x;
        let dy = base.y - origin.y;
        for command in &self.commands {
            match *command {
                PathCommand::MoveTo { x, y } => ctx.move_to(x + dx, y + dy),
                PathCommand::LineTo { x, y } => ctx.line_to(x + dx, y + dy),
                PathCommand::QuadTo { cx, cy, x, y } => {
                    ctx.quadratic_curve_to(cx + dx, cy + dy, x + dx, y + dy)
                }
                PathCommand::CubicTo {
                    c1x,
                    c1y,
                    c2x,
                    c2y,
                    x,
                    y,
                } => ctx.bezier_curve_to(c1x + dx, c1y + dy, c2x + dx, c2y + dy, x + dx, y + dy),
                PathCommand::Arc {
                    cx,
                    cy,
                    radius,
                    start_angle,
                    end_angle,
                    anticlockwise,
                } => ctx.arc(
                    cx + dx,
                    cy + dy,
                    radius,
                    start_angle.to_radians(),
                    end_angle.to_radians(),
                    anticlockwise,
                ),
                PathCommand::Close => ctx.close_path(),
            }
        }
    }

    fn draw(&self, base: &ShapeBase, ctx: &mut dyn RenderContext, zoom: f64) {
        base::draw_path(self, base, ctx, zoom);
    }

    fn hit_test(&self, base: &ShapeBase, point: Point, probe: &mut HitProbe<'_>) -> bool {
        base::probe_hit_test(self, base, point, probe)
    }

    fn relative_move(&mut self, base: &mut ShapeBase, dx: f64, dy: f64) {
        base::relative_move(base, dx, dy);
    }

    fn attr(&self, name: &str) -> Option<AttrValue> {
        match name {
            "commands" => Some((self.commands.len() as f64).into()),
            _ => None,
        }
    }

    fn set_attr(&mut self, name: &str, _value: &AttrValue) -> Option<Result<(), ShapeError>> {
        match name {
            "commands" => Some(Err(ShapeError::InvalidAttributeValue {
                name: name.to_string(),
                expected: "read-only attribute".to_string(),
            })),
            _ => None,
        }
    }

    fn properties(&self, out: &mut Vec<Property>) {
        out.push(Property::new("commands", self.commands.len() as f64));
    }
}
