//! Device-space path recording shared by the built-in surfaces.
//!
//! Points are mapped through the transform current at the time each
//! segment is added, which is how a canvas context builds its path. The
//! recorded path can then be handed to lyon for containment queries or to
//! tiny-skia for rasterization.

use lyon::algorithms::hit_test::hit_test_path;
use lyon::math::point;
use lyon::path::{FillRule, Path};
use shapekit_core::{Affine, Point};
use std::f64::consts::{FRAC_PI_2, TAU};

/// One recorded path segment, in device space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathOp {
    Begin(Point),
    Line(Point),
    Quad(Point, Point),
    Cubic(Point, Point, Point),
    End { close: bool },
}

#[derive(Debug, Clone, Default)]
pub struct PathRecorder {
    ops: Vec<PathOp>,
    open: bool,
    subpath_start: Option<Point>,
    /// Where the next implicit subpath starts after a close or rect.
    pending_start: Option<Point>,
}

impl PathRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[PathOp] {
        &self.ops
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn clear(&mut self) {
        self.ops.clear();
        self.open = false;
        self.subpath_start = None;
        self.pending_start = None;
    }

    fn end_open_subpath(&mut self) {
        if self.open {
            self.ops.push(PathOp::End { close: false });
            self.open = false;
        }
    }

    fn ensure_subpath(&mut self, fallback: Point) {
        if !self.open {
            let at = self.pending_start.take().unwrap_or(fallback);
            self.ops.push(PathOp::Begin(at));
            self.open = true;
            self.subpath_start = Some(at);
        }
    }

    pub fn move_to(&mut self, m: &Affine, x: f64, y: f64) {
        self.end_open_subpath();
        self.pending_start = None;
        let p = m.transform_point(Point::new(x, y));
        self.ops.push(PathOp::Begin(p));
        self.open = true;
        self.subpath_start = Some(p);
    }

    pub fn line_to(&mut self, m: &Affine, x: f64, y: f64) {
        let p = m.transform_point(Point::new(x, y));
        self.ensure_subpath(p);
        self.ops.push(PathOp::Line(p));
    }

    pub fn quadratic_curve_to(&mut self, m: &Affine, cx: f64, cy: f64, x: f64, y: f64) {
        let c = m.transform_point(Point::new(cx, cy));
        let p = m.transform_point(Point::new(x, y));
        self.ensure_subpath(c);
        self.ops.push(PathOp::Quad(c, p));
    }

    #[allow(clippy::too_many_arguments)]
    pub fn bezier_curve_to(
        &mut self,
        m: &Affine,
        c1x: f64,
        c1y: f64,
        c2x: f64,
        c2y: f64,
        x: f64,
        y: f64,
    ) {
        let c1 = m.transform_point(Point::new(c1x, c1y));
        let c2 = m.transform_point(Point::new(c2x, c2y));
        let p = m.transform_point(Point::new(x, y));
        self.ensure_subpath(c1);
        self.ops.push(PathOp::Cubic(c1, c2, p));
    }

    /// Canvas-style arc: connects from the current point with a line, then
    /// sweeps in at most quarter-turn cubic segments.
    #[allow(clippy::too_many_arguments)]
    pub fn arc(
        &mut self,
        m: &Affine,
        cx: f64,
        cy: f64,
        radius: f64,
        start: f64,
        end: f64,
        anticlockwise: bool,
    ) {
        let radius = radius.abs();
        let sweep = arc_sweep(start, end, anticlockwise);
        let at = |angle: f64| Point::new(cx + radius * angle.cos(), cy + radius * angle.sin());

        let first = at(start);
        if self.open {
            let p = m.transform_point(first);
            self.ops.push(PathOp::Line(p));
        } else {
            self.move_to(m, first.x, first.y);
        }

        if sweep == 0.0 || radius == 0.0 {
            return;
        }

        let segments = (sweep.abs() / FRAC_PI_2).ceil().max(1.0) as usize;
        let step = sweep / segments as f64;
        let k = 4.0 / 3.0 * (step / 4.0).tan();
        let mut a0 = start;
        for _ in 0..segments {
            let a1 = a0 + step;
            let (s0, c0) = a0.sin_cos();
            let (s1, c1) = a1.sin_cos();
            let ctrl1 = Point::new(cx + radius * (c0 - k * s0), cy + radius * (s0 + k * c0));
            let ctrl2 = Point::new(cx + radius * (c1 + k * s1), cy + radius * (s1 - k * c1));
            let to = at(a1);
            self.ops.push(PathOp::Cubic(
                m.transform_point(ctrl1),
                m.transform_point(ctrl2),
                m.transform_point(to),
            ));
            a0 = a1;
        }
    }

    pub fn rect(&mut self, m: &Affine, x: f64, y: f64, width: f64, height: f64) {
        self.move_to(m, x, y);
        self.line_to(m, x + width, y);
        self.line_to(m, x + width, y + height);
        self.line_to(m, x, y + height);
        self.close_path();
    }

    pub fn close_path(&mut self) {
        if self.open {
            self.ops.push(PathOp::End { close: true });
            self.open = false;
            self.pending_start = self.subpath_start;
        }
    }

    pub fn to_lyon(&self) -> Path {
        let mut builder = Path::builder();
        let mut open = false;
        for op in &self.ops {
            match *op {
                PathOp::Begin(p) => {
                    builder.begin(point(p.x as f32, p.y as f32));
                    open = true;
                }
                PathOp::Line(p) => {
                    builder.line_to(point(p.x as f32, p.y as f32));
                }
                PathOp::Quad(c, p) => {
                    builder.quadratic_bezier_to(point(c.x as f32, c.y as f32), point(p.x as f32, p.y as f32));
                }
                PathOp::Cubic(c1, c2, p) => {
                    builder.cubic_bezier_to(
                        point(c1.x as f32, c1.y as f32),
                        point(c2.x as f32, c2.y as f32),
                        point(p.x as f32, p.y as f32),
                    );
                }
                PathOp::End { close } => {
                    builder.end(close);
                    open = false;
                }
            }
        }
        if open {
            builder.end(false);
        }
        builder.build()
    }

    /// Non-zero containment test against the recorded path.
    pub fn contains(&self, x: f64, y: f64, tolerance: f32) -> bool {
        if self.ops.is_empty() {
            return false;
        }
        let path = self.to_lyon();
        hit_test_path(
            &point(x as f32, y as f32),
            path.iter(),
            FillRule::NonZero,
            tolerance,
        )
    }

    pub fn to_skia(&self) -> Option<tiny_skia::Path> {
        let mut pb = tiny_skia::PathBuilder::new();
        for op in &self.ops {
            match *op {
                PathOp::Begin(p) => pb.move_to(p.x as f32, p.y as f32),
                PathOp::Line(p) => pb.line_to(p.x as f32, p.y as f32),
                PathOp::Quad(c, p) => pb.quad_to(c.x as f32, c.y as f32, p.x as f32, p.y as f32),
                PathOp::Cubic(c1, c2, p) => pb.cubic_to(
                    c1.x as f32,
                    c1.y as f32,
                    c2.x as f32,
                    c2.y as f32,
                    p.x as f32,
                    p.y as f32,
                ),
                PathOp::End { close: true } => pb.close(),
                PathOp::End { close: false } => {}
            }
        }
        pb.finish()
    }
}

/// Signed sweep of a canvas arc, in radians.
fn arc_sweep(start: f64, end: f64, anticlockwise: bool) -> f64 {
    if !anticlockwise {
        if end - start >= TAU {
            TAU
        } else {
            (end - start).rem_euclid(TAU)
        }
    } else if start - end >= TAU {
        -TAU
    } else {
        -(start - end).rem_euclid(TAU)
    }
}
