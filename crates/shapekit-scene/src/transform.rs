//! Per-shape affine transform.
//!
//! Drawing and matrix-based hit-testing both go through
//! [`device_transform`]; hit-tests pass a zoom of 1 because they work on
//! local (pre-zoom) coordinates.

use serde::{Deserialize, Serialize};
use shapekit_core::{rotate_point, Affine, Point};

/// Translation, scale, skew and rotation of a shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformAttrs {
    pub tx: f64,
    pub ty: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub skew_x: f64,
    pub skew_y: f64,
    /// Degrees.
    pub rotation: f64,
}

impl Default for TransformAttrs {
    fn default() -> Self {
        Self {
            tx: 0.0,
            ty: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            skew_x: 0.0,
            skew_y: 0.0,
            rotation: 0.0,
        }
    }
}

impl TransformAttrs {
    pub fn is_skewed(&self) -> bool {
        self.skew_x != 0.0 || self.skew_y != 0.0
    }

    pub fn has_uniform_scale(&self) -> bool {
        self.scale_x == self.scale_y
    }
}

/// Where the shape's local origin `(x, y)` lands on the surface, before zoom.
pub fn effective_position(x: f64, y: f64, attrs: &TransformAttrs) -> Point {
    let p = rotate_point(
        Point::new(x * attrs.scale_x, y * attrs.scale_y),
        Point::default(),
        attrs.rotation,
    );
    Point::new(p.x + attrs.tx, p.y + attrs.ty)
}

/// Matrix mapping shape-local coordinates to device pixels at `zoom`.
///
/// Rotation is applied to the combined scale/skew map, then the result is
/// translated by the zoomed `(tx, ty)`.
pub fn device_transform(attrs: &TransformAttrs, zoom: f64) -> Affine {
    let scale_x = attrs.scale_x * zoom;
    let scale_y = attrs.scale_y * zoom;
    let skew_x = attrs.skew_x * zoom;
    let skew_y = attrs.skew_y * zoom;
    let angle = attrs.rotation.to_radians();
    let (s, c) = angle.sin_cos();

    let m11 = c * scale_x - s * skew_y;
    let m21 = c * skew_x - s * scale_y;
    let m12 = s * scale_x + c * skew_y;
    let m22 = s * skew_x + c * scale_y;

    Affine::new(m11, m12, m21, m22, attrs.tx * zoom, attrs.ty * zoom)
}

/// Surface-local coordinate of a raw device coordinate.
pub fn to_local(raw: f64, origin: f64, zoom: f64) -> f64 {
    (raw - origin) / zoom
}
