//! Generic shape behavior that variants call into explicitly.

use shapekit_core::{rotate_point, Affine, Point, ShapeError};

use super::{AttrValue, Geometry, HitProbe, Property, ShapeBase};
use crate::render::RenderContext;
use crate::style::Color;
use crate::transform::device_transform;

type AttrResult = Option<Result<(), ShapeError>>;

pub fn apply_transform(base: &ShapeBase, ctx: &mut dyn RenderContext, zoom: f64) {
    ctx.set_transform(device_transform(&base.transform, zoom));
}

pub fn fill_or_stroke(base: &ShapeBase, ctx: &mut dyn RenderContext) {
    if base.style.fill.is_some() {
        ctx.fill();
    }
    if base.style.stroke.is_some() {
        ctx.stroke();
    }
}

/// Style, transform, trace, then fill and/or stroke.
pub fn draw_path(geometry: &dyn Geometry, base: &ShapeBase, ctx: &mut dyn RenderContext, zoom: f64) {
    ctx.save();
    ctx.apply_style(&base.style);
    apply_transform(base, ctx, zoom);
    ctx.begin_path();
    geometry.trace(base, ctx);
    fill_or_stroke(base, ctx);
    ctx.restore();
}

/// Trace the shape into the probe and ask whether `point` is inside.
pub fn probe_hit_test(
    geometry: &dyn Geometry,
    base: &ShapeBase,
    point: Point,
    probe: &mut HitProbe<'_>,
) -> bool {
    let ctx = &mut *probe.ctx;
    ctx.save();
    apply_transform(base, ctx, 1.0);
    ctx.begin_path();
    geometry.trace(base, ctx);
    ctx.set_transform(Affine::identity());
    let hit = ctx.is_point_in_path(point.x, point.y);
    ctx.restore();
    tracing::trace!("{} probe hit at ({}, {}): {}", geometry.type_tag(), point.x, point.y, hit);
    hit
}

/// Axis-aligned box test in the shape's rotated frame, anchored at the
/// effective position.
pub fn box_hit_test(base: &ShapeBase, point: Point, width: f64, height: f64) -> bool {
    let pos = base.position();
    let local = rotate_point(
        Point::new(point.x - pos.x, point.y - pos.y),
        Point::default(),
        -base.transform.rotation,
    );
    let w = width * base.transform.scale_x;
    let h = height * base.transform.scale_y;
    within(local.x, w) && within(local.y, h)
}

fn within(v: f64, extent: f64) -> bool {
    if extent >= 0.0 {
        v >= 0.0 && v <= extent
    } else {
        v <= 0.0 && v >= extent
    }
}

pub fn relative_move(base: &mut ShapeBase, dx: f64, dy: f64) {
    base.transform.tx += dx;
    base.transform.ty += dy;
}

fn paint_text(color: Option<Color>) -> AttrValue {
    AttrValue::Text(color.map(|c| c.to_string()).unwrap_or_default())
}

pub fn attr(base: &ShapeBase, name: &str) -> Option<AttrValue> {
    let t = &base.transform;
    let s = &base.style;
    let value = match name {
        "id" => AttrValue::Text(base.name.clone().unwrap_or_default()),
        "x" => base.x.into(),
        "y" => base.y.into(),
        "tx" => t.tx.into(),
        "ty" => t.ty.into(),
        "scale_x" => t.scale_x.into(),
        "scale_y" => t.scale_y.into(),
        "skew_x" => t.skew_x.into(),
        "skew_y" => t.skew_y.into(),
        "rotation" => t.rotation.into(),
        "fill" => paint_text(s.fill),
        "stroke" => paint_text(s.stroke),
        "line_width" => s.line_width.into(),
        "line_join" => s.line_join.as_str().into(),
        "line_cap" => s.line_cap.as_str().into(),
        "alpha" => s.alpha.into(),
        "composite" => s.composite.as_str().into(),
        "shadow_color" => s.shadow.color.to_string().into(),
        "shadow_offset_x" => s.shadow.offset_x.into(),
        "shadow_offset_y" => s.shadow.offset_y.into(),
        "shadow_blur" => s.shadow.blur.into(),
        "font_style" => s.font.style.clone().into(),
        "font_weight" => s.font.weight.clone().into(),
        "font_size" => s.font.size.into(),
        "font_family" => s.font.family.clone().into(),
        _ => return None,
    };
    Some(value)
}

pub(crate) fn expect_number(name: &str, value: &AttrValue) -> Result<f64, ShapeError> {
    value.as_number().ok_or_else(|| ShapeError::InvalidAttributeValue {
        name: name.to_string(),
        expected: "number".to_string(),
    })
}

pub(crate) fn expect_text<'v>(name: &str, value: &'v AttrValue) -> Result<&'v str, ShapeError> {
    value.as_text().ok_or_else(|| ShapeError::InvalidAttributeValue {
        name: name.to_string(),
        expected: "text".to_string(),
    })
}

pub(crate) fn expect_bool(name: &str, value: &AttrValue) -> Result<bool, ShapeError> {
    value.as_bool().ok_or_else(|| ShapeError::InvalidAttributeValue {
        name: name.to_string(),
        expected: "bool".to_string(),
    })
}

fn parse_keyword<T: std::str::FromStr>(name: &str, value: &AttrValue) -> Result<T, ShapeError> {
    expect_text(name, value)?
        .parse()
        .map_err(|_| ShapeError::InvalidAttributeValue {
            name: name.to_string(),
            expected: format!("{} keyword", name),
        })
}

fn parse_paint(name: &str, value: &AttrValue) -> Result<Option<Color>, ShapeError> {
    Color::parse_paint(expect_text(name, value)?).map_err(|_| ShapeError::InvalidAttributeValue {
        name: name.to_string(),
        expected: "colour".to_string(),
    })
}

pub fn set_attr(base: &mut ShapeBase, name: &str, value: &AttrValue) -> AttrResult {
    let result = (|| -> Result<bool, ShapeError> {
        let t = &mut base.transform;
        let s = &mut base.style;
        match name {
            "id" => {
                let id = expect_text(name, value)?;
                base.name = (!id.is_empty()).then(|| id.to_string());
            }
            "x" => base.x = expect_number(name, value)?,
            "y" => base.y = expect_number(name, value)?,
            "tx" => t.tx = expect_number(name, value)?,
            "ty" => t.ty = expect_number(name, value)?,
            "scale_x" => t.scale_x = expect_number(name, value)?,
            "scale_y" => t.scale_y = expect_number(name, value)?,
            "skew_x" => t.skew_x = expect_number(name, value)?,
            "skew_y" => t.skew_y = expect_number(name, value)?,
            "rotation" => t.rotation = expect_number(name, value)?,
            "fill" => s.fill = parse_paint(name, value)?,
            "stroke" => s.stroke = parse_paint(name, value)?,
            "line_width" => s.line_width = expect_number(name, value)?,
            "line_join" => s.line_join = parse_keyword(name, value)?,
            "line_cap" => s.line_cap = parse_keyword(name, value)?,
            "alpha" => s.alpha = expect_number(name, value)?,
            "composite" => s.composite = parse_keyword(name, value)?,
            "shadow_color" => {
                s.shadow.color = parse_paint(name, value)?.unwrap_or(Color::TRANSPARENT)
            }
            "shadow_offset_x" => s.shadow.offset_x = expect_number(name, value)?,
            "shadow_offset_y" => s.shadow.offset_y = expect_number(name, value)?,
            "shadow_blur" => s.shadow.blur = expect_number(name, value)?,
            "font_style" => s.font.style = expect_text(name, value)?.to_string(),
            "font_weight" => s.font.weight = expect_text(name, value)?.to_string(),
            "font_size" => s.font.size = expect_number(name, value)?,
            "font_family" => s.font.family = expect_text(name, value)?.to_string(),
            _ => return Ok(false),
        }
        Ok(true)
    })();

    match result {
        Ok(true) => Some(Ok(())),
        Ok(false) => None,
        Err(e) => Some(Err(e)),
    }
}

const BASE_ATTRS: &[&str] = &[
    "id",
    "x",
    "y",
    "tx",
    "ty",
    "scale_x",
    "scale_y",
    "skew_x",
    "skew_y",
    "rotation",
    "fill",
    "stroke",
    "line_width",
    "line_join",
    "line_cap",
    "alpha",
    "composite",
    "shadow_color",
    "shadow_offset_x",
    "shadow_offset_y",
    "shadow_blur",
    "font_style",
    "font_weight",
    "font_size",
    "font_family",
];

pub fn properties(base: &ShapeBase, out: &mut Vec<Property>) {
    for name in BASE_ATTRS {
        if let Some(value) = attr(base, name) {
            out.push(Property::new(name, value));
        }
    }
}
