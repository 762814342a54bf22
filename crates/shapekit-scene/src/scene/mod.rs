//! One drawing surface and the shapes registered on it.
//!
//! `Scene` owns the paint-ordered shape list, the zoom factor, the drawing
//! surface and the off-surface hit-test probe, and ties the event router,
//! drag controller and key router together. Operations that act on "the
//! last selection" apply to the shapes most recently added or found.

mod animation;
mod operations;

pub use animation::{FrameTicket, LoopCallback};
pub use operations::DrawHook;

use ::image::RgbaImage;
use shapekit_core::{CapabilityError, Point, Result, Shared};

use crate::event_router::SurfaceState;
use crate::input::{InputContext, SurfaceId};
use crate::model::{
    ArcShape, CircleShape, EllipseShape, ImageShape, LineShape, PathCommand, PathShape,
    RectShape, Shape, ShapeBase, ShapeId, ShapeKind, TextShape,
};
use crate::render::{PathProbe, RenderContext};
use crate::selector::Selector;
use crate::side_table::{Owner, SideTable};
use crate::style::Color;

/// Raster of the shapes painted below the dragged one, reused while it
/// moves.
pub(crate) struct DragSnapshot {
    pub(crate) shape: ShapeId,
    pub(crate) pixels: RgbaImage,
}

pub struct Scene {
    id: SurfaceId,
    pub(crate) input: Shared<InputContext>,
    pub(crate) surface: Box<dyn RenderContext>,
    pub(crate) probe: Box<dyn RenderContext>,
    pub(crate) shapes: Vec<Shape>,
    next_shape: u64,
    pub(crate) side_table: SideTable,
    last: Vec<ShapeId>,
    pub(crate) zoom: f64,
    pub(crate) origin: Point,
    pub(crate) state: SurfaceState,
    pub(crate) global_key_events: bool,
    pub(crate) before_draw: Option<DrawHook>,
    pub(crate) after_draw: Option<DrawHook>,
    pub(crate) play: Option<u64>,
    pub(crate) loop_callback: Option<LoopCallback>,
    pub(crate) frame_count: u64,
    pub(crate) drag_snapshot: Option<DragSnapshot>,
}

impl Scene {
    /// A scene drawing into `surface`, with its own input context.
    pub fn new(surface: impl RenderContext + 'static) -> Result<Self> {
        Self::with_context(surface, InputContext::new().shared())
    }

    /// A scene sharing `input` with other scenes.
    pub fn with_context(
        surface: impl RenderContext + 'static,
        input: Shared<InputContext>,
    ) -> Result<Self> {
        let probe = PathProbe::new(surface.width(), surface.height());
        Self::with_probe(Box::new(surface), Box::new(probe), input)
    }

    /// A scene with an explicit hit-test probe. The probe must answer
    /// point-in-path queries.
    pub fn with_probe(
        surface: Box<dyn RenderContext>,
        probe: Box<dyn RenderContext>,
        input: Shared<InputContext>,
    ) -> Result<Self> {
        if !probe.supports_point_in_path() {
            return Err(CapabilityError::PointInPathUnsupported {
                surface: probe.name().to_string(),
            }
            .into());
        }
        Ok(Self::assemble(surface, probe, input))
    }

    /// A scene with no raster output, drawing into a path probe.
    pub fn headless(width: u32, height: u32) -> Self {
        Self::assemble(
            Box::new(PathProbe::new(width, height)),
            Box::new(PathProbe::new(width, height)),
            InputContext::new().shared(),
        )
    }

    fn assemble(
        surface: Box<dyn RenderContext>,
        probe: Box<dyn RenderContext>,
        input: Shared<InputContext>,
    ) -> Self {
        let (id, zoom, global_key_events) = {
            let mut ctx = input.borrow_mut();
            let id = ctx.register_surface();
            let settings = ctx.settings();
            (id, settings.initial_zoom, settings.global_key_events)
        };
        tracing::info!(
            "Created {} on a {}x{} '{}' surface",
            id,
            surface.width(),
            surface.height(),
            surface.name()
        );
        Self {
            id,
            input,
            surface,
            probe,
            shapes: Vec::new(),
            next_shape: 0,
            side_table: SideTable::new(),
            last: Vec::new(),
            zoom,
            origin: Point::default(),
            state: SurfaceState::default(),
            global_key_events,
            before_draw: None,
            after_draw: None,
            play: None,
            loop_callback: None,
            frame_count: 0,
            drag_snapshot: None,
        }
    }

    pub fn surface_id(&self) -> SurfaceId {
        self.id
    }

    pub fn input_context(&self) -> Shared<InputContext> {
        self.input.clone()
    }

    /// The drawing surface, for custom painting inside handlers and hooks.
    pub fn context_mut(&mut self) -> &mut dyn RenderContext {
        self.surface.as_mut()
    }

    pub fn context(&self) -> &dyn RenderContext {
        self.surface.as_ref()
    }

    pub fn side_table(&self) -> &SideTable {
        &self.side_table
    }

    pub(crate) fn side_table_mut(&mut self) -> &mut SideTable {
        &mut self.side_table
    }

    // --- registration ---

    /// Register a shape on top of the paint order and select it.
    pub fn add(&mut self, base: ShapeBase, kind: impl Into<ShapeKind>) -> ShapeId {
        self.next_shape += 1;
        let id = ShapeId(self.next_shape);
        let shape = Shape::new(id, base, kind.into());
        tracing::debug!("Added {} {}", shape.type_tag(), id);
        self.shapes.push(shape);
        self.last = vec![id];
        self.drag_snapshot = None;
        id
    }

    pub fn add_rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> ShapeId {
        self.add(ShapeBase::at(x, y), RectShape::new(width, height))
    }

    pub fn add_ellipse(&mut self, x: f64, y: f64, width: f64, height: f64) -> ShapeId {
        self.add(ShapeBase::at(x, y), EllipseShape::new(width, height))
    }

    pub fn add_circle(&mut self, x: f64, y: f64, radius: f64) -> ShapeId {
        self.add(ShapeBase::at(x, y), CircleShape::new(radius))
    }

    /// Angles in degrees.
    pub fn add_arc(&mut self, x: f64, y: f64, radius: f64, start: f64, end: f64) -> ShapeId {
        self.add(ShapeBase::at(x, y), ArcShape::new(radius, start, end))
    }

    /// Lines are stroked black by default.
    pub fn add_line(&mut self, x: f64, y: f64, x2: f64, y2: f64) -> ShapeId {
        let mut base = ShapeBase::at(x, y);
        base.style.stroke = Some(Color::BLACK);
        self.add(base, LineShape::new(x2, y2))
    }

    pub fn add_text(&mut self, x: f64, y: f64, text: &str) -> ShapeId {
        self.add(ShapeBase::at(x, y), TextShape::new(text))
    }

    /// The image stays empty until [`Scene::notify_image_ready`] delivers
    /// pixels for `source`.
    pub fn add_image(&mut self, x: f64, y: f64, source: &str) -> ShapeId {
        self.add(ShapeBase::at(x, y), ImageShape::new(source))
    }

    /// The shape origin defaults to the first `MoveTo`.
    pub fn add_path(&mut self, commands: Vec<PathCommand>) -> ShapeId {
        let path = PathShape::new(commands);
        let origin = path.origin().unwrap_or_default();
        self.add(ShapeBase::at(origin.x, origin.y), path)
    }

    // --- removal ---

    /// Remove a shape. Pending mouseout/blur handlers fire first; the
    /// shape's side-table entries go with it and a drag targeting it is
    /// dropped. Returns `false` for an unknown id.
    pub fn remove(&mut self, id: ShapeId) -> Result<bool> {
        if self.index_of(id).is_none() {
            return Ok(false);
        }
        self.fire_departure(id)?;

        // A departure handler may already have removed it.
        let Some(index) = self.index_of(id) else {
            return Ok(true);
        };
        self.shapes.remove(index);
        self.side_table.release(Owner::Shape(id));
        self.last.retain(|s| *s != id);
        if self.state.hover == Some(id) {
            self.state.hover = None;
        }
        if self.state.focused == Some(id) {
            self.state.focused = None;
        }
        self.cancel_drag_of(id);
        self.drag_snapshot = None;
        tracing::debug!("Removed {}", id);

        self.redraw();
        Ok(true)
    }

    /// Remove every shape matching `selector`; returns how many went.
    pub fn remove_matching(&mut self, selector: &str) -> Result<usize> {
        let mut removed = 0;
        for id in self.find_all(selector) {
            if self.remove(id)? {
                removed += 1;
            }
        }
        Ok(removed)
    }

    // --- lookup ---

    pub(crate) fn index_of(&self, id: ShapeId) -> Option<usize> {
        self.shapes.iter().position(|s| s.id() == id)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Shape at a paint-order index; negative indices count from the top.
    pub fn get(&self, index: isize) -> Option<&Shape> {
        let index = if index < 0 {
            self.shapes.len().checked_sub(index.unsigned_abs())?
        } else {
            index as usize
        };
        self.shapes.get(index)
    }

    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id() == id)
    }

    /// Writing through this to any shape but the dragged one invalidates the
    /// drag snapshot.
    pub fn shape_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        if self.drag_snapshot.as_ref().is_some_and(|s| s.shape != id) {
            self.drag_snapshot = None;
        }
        self.shapes.iter_mut().find(|s| s.id() == id)
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Ids in paint order.
    pub fn ids(&self) -> Vec<ShapeId> {
        self.shapes.iter().map(Shape::id).collect()
    }

    /// Ids matching `selector` in paint order; empty for a malformed
    /// selector.
    pub fn find_all(&self, selector: &str) -> Vec<ShapeId> {
        match Selector::parse(selector) {
            Some(selector) => self
                .shapes
                .iter()
                .filter(|s| selector.matches(s))
                .map(Shape::id)
                .collect(),
            None => {
                tracing::debug!("Selector '{}' matches nothing", selector);
                Vec::new()
            }
        }
    }

    /// Select every shape matching `selector`.
    pub fn find(&mut self, selector: &str) -> &mut Self {
        self.last = self.find_all(selector);
        self
    }

    /// Select the given shapes; unknown ids are dropped.
    pub fn select(&mut self, ids: &[ShapeId]) -> &mut Self {
        self.last = ids
            .iter()
            .copied()
            .filter(|id| self.index_of(*id).is_some())
            .collect();
        self
    }

    /// The last selection.
    pub fn selection(&self) -> &[ShapeId] {
        &self.last
    }
}
