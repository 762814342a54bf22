//! Shape model.
//!
//! A [`Shape`] is the common attribute block ([`ShapeBase`]: origin,
//! transform, style, optional name) plus one [`ShapeKind`] variant that
//! supplies geometry. Variants implement [`Geometry`]; where a variant
//! behaves like the generic shape it calls the matching function in
//! [`base`] explicitly.

pub mod arc;
pub mod base;
pub mod circle;
pub mod ellipse;
pub mod image;
pub mod line;
pub mod path;
pub mod rect;
pub mod text;

pub use arc::ArcShape;
pub use circle::CircleShape;
pub use ellipse::EllipseShape;
pub use image::ImageShape;
pub use line::LineShape;
pub use path::{PathCommand, PathShape};
pub use rect::RectShape;
pub use text::TextShape;

use serde::{Deserialize, Serialize};
use shapekit_core::{Point, Result, ShapeError};
use std::fmt;

use crate::render::RenderContext;
use crate::style::Style;
use crate::transform::{effective_position, TransformAttrs};

/// Opaque handle assigned when a shape is registered with a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShapeId(pub(crate) u64);

impl ShapeId {
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "shape#{}", self.0)
    }
}

/// Attribute value; plain JSON/TOML scalars in serialized form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Number(f64),
    Text(String),
    Bool(bool),
}

impl AttrValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            AttrValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttrValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        AttrValue::Number(value)
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Text(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Text(value)
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Bool(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    pub value: AttrValue,
}

impl Property {
    pub fn new(name: &str, value: impl Into<AttrValue>) -> Self {
        Self {
            name: name.to_string(),
            value: value.into(),
        }
    }
}

/// Attributes every shape carries.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeBase {
    /// Identifier matched by `#name` selectors.
    pub name: Option<String>,
    pub x: f64,
    pub y: f64,
    pub transform: TransformAttrs,
    pub style: Style,
}

impl ShapeBase {
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            ..Self::default()
        }
    }

    pub fn position(&self) -> Point {
        effective_position(self.x, self.y, &self.transform)
    }
}

/// Probe context and tolerances handed to hit-tests.
pub struct HitProbe<'a> {
    pub ctx: &'a mut dyn RenderContext,
    pub line_tolerance: f64,
}

/// Per-variant geometry and rendering.
///
/// `point` arguments are local (pre-zoom) surface coordinates.
pub trait Geometry {
    fn type_tag(&self) -> &'static str;

    /// Append the outline to the current path, in shape-local coordinates.
    fn trace(&self, base: &ShapeBase, ctx: &mut dyn RenderContext);

    fn draw(&self, base: &ShapeBase, ctx: &mut dyn RenderContext, zoom: f64);

    fn hit_test(&self, base: &ShapeBase, point: Point, probe: &mut HitProbe<'_>) -> bool;

    fn relative_move(&mut self, base: &mut ShapeBase, dx: f64, dy: f64);

    /// Variant-specific attribute, `None` if the name is not one of ours.
    fn attr(&self, name: &str) -> Option<AttrValue>;

    /// `None` if the name is not one of ours.
    fn set_attr(
        &mut self,
        name: &str,
        value: &AttrValue,
    ) -> Option<std::result::Result<(), ShapeError>>;

    fn properties(&self, out: &mut Vec<Property>);
}

#[derive(Debug, Clone)]
pub enum ShapeKind {
    Rect(RectShape),
    Ellipse(EllipseShape),
    Circle(CircleShape),
    Arc(ArcShape),
    Line(LineShape),
    Text(TextShape),
    Image(ImageShape),
    Path(PathShape),
}

impl ShapeKind {
    pub fn geometry(&self) -> &dyn Geometry {
        match self {
            ShapeKind::Rect(s) => s,
            ShapeKind::Ellipse(s) => s,
            ShapeKind::Circle(s) => s,
            ShapeKind::Arc(s) => s,
            ShapeKind::Line(s) => s,
            ShapeKind::Text(s) => s,
            ShapeKind::Image(s) => s,
            ShapeKind::Path(s) => s,
        }
    }

    pub fn geometry_mut(&mut self) -> &mut dyn Geometry {
        match self {
            ShapeKind::Rect(s) => s,
            ShapeKind::Ellipse(s) => s,
            ShapeKind::Circle(s) => s,
            ShapeKind::Arc(s) => s,
            ShapeKind::Line(s) => s,
            ShapeKind::Text(s) => s,
            ShapeKind::Image(s) => s,
            ShapeKind::Path(s) => s,
        }
    }
}

macro_rules! impl_from_kind {
    ($($variant:ident($ty:ty)),+) => {
        $(impl From<$ty> for ShapeKind {
            fn from(shape: $ty) -> Self {
                ShapeKind::$variant(shape)
            }
        })+
    };
}

impl_from_kind!(
    Rect(RectShape),
    Ellipse(EllipseShape),
    Circle(CircleShape),
    Arc(ArcShape),
    Line(LineShape),
    Text(TextShape),
    Image(ImageShape),
    Path(PathShape)
);

/// A registered shape.
#[derive(Debug, Clone)]
pub struct Shape {
    id: ShapeId,
    pub base: ShapeBase,
    pub kind: ShapeKind,
}

impl Shape {
    pub(crate) fn new(id: ShapeId, base: ShapeBase, kind: ShapeKind) -> Self {
        Self { id, base, kind }
    }

    pub fn id(&self) -> ShapeId {
        self.id
    }

    pub fn type_tag(&self) -> &'static str {
        self.kind.geometry().type_tag()
    }

    pub fn name(&self) -> Option<&str> {
        self.base.name.as_deref()
    }

    /// Effective on-surface position of the local origin, before zoom.
    pub fn position(&self) -> Point {
        self.base.position()
    }

    pub fn draw(&self, ctx: &mut dyn RenderContext, zoom: f64) {
        self.kind.geometry().draw(&self.base, ctx, zoom);
    }

    pub fn hit_test(&self, point: Point, probe: &mut HitProbe<'_>) -> bool {
        self.kind.geometry().hit_test(&self.base, point, probe)
    }

    pub fn relative_move(&mut self, dx: f64, dy: f64) {
        self.kind
            .geometry_mut()
            .relative_move(&mut self.base, dx, dy);
    }

    pub fn attr(&self, name: &str) -> Option<AttrValue> {
        self.kind
            .geometry()
            .attr(name)
            .or_else(|| base::attr(&self.base, name))
    }

    pub fn set_attr(&mut self, name: &str, value: impl Into<AttrValue>) -> Result<()> {
        let value = value.into();
        if let Some(result) = self.kind.geometry_mut().set_attr(name, &value) {
            return result.map_err(Into::into);
        }
        match base::set_attr(&mut self.base, name, &value) {
            Some(result) => result.map_err(Into::into),
            None => Err(ShapeError::UnknownAttribute {
                kind: self.type_tag().to_string(),
                name: name.to_string(),
            }
            .into()),
        }
    }

    pub fn properties(&self) -> Vec<Property> {
        let mut out = Vec::new();
        base::properties(&self.base, &mut out);
        self.kind.geometry().properties(&mut out);
        out
    }
}
