//! Attribute, zoom, binding and drawing operations.

use ::image::RgbaImage;
use shapekit_core::{Affine, CapabilityError, Point, Result, ShapeError};
use std::rc::Rc;

use super::{DragSnapshot, Scene};
use crate::drag::DragPhase;
use crate::event::{handler, EventType, Handler};
use crate::model::{AttrValue, ShapeId, ShapeKind};
use crate::render::RenderContext;
use crate::selector::{is_identifier, Selector};
use crate::side_table::Owner;

/// Callback run before or after the shapes are painted.
pub type DrawHook = Rc<dyn Fn(&mut dyn RenderContext)>;

impl Scene {
    // --- attributes of the last selection ---

    /// Name the selected shapes for `#name` selectors. Anything that is not
    /// a bare identifier is ignored.
    pub fn set_name(&mut self, name: &str) -> &mut Self {
        if !is_identifier(name) {
            tracing::warn!("Ignoring invalid shape name '{}'", name);
            return self;
        }
        for id in self.last.clone() {
            if let Some(shape) = self.shape_mut(id) {
                shape.base.name = Some(name.to_string());
            }
        }
        self
    }

    pub fn clear_name(&mut self) -> &mut Self {
        for id in self.last.clone() {
            if let Some(shape) = self.shape_mut(id) {
                shape.base.name = None;
            }
        }
        self
    }

    /// Write one attribute on every selected shape.
    pub fn attr(&mut self, name: &str, value: impl Into<AttrValue>) -> Result<&mut Self> {
        let value = value.into();
        for id in self.last.clone() {
            if let Some(shape) = self.shape_mut(id) {
                shape.set_attr(name, value.clone())?;
            }
        }
        Ok(self)
    }

    fn attrs(&mut self, pairs: &[(&str, f64)]) -> &mut Self {
        for id in self.last.clone() {
            if let Some(shape) = self.shape_mut(id) {
                for (name, value) in pairs {
                    if let Err(e) = shape.set_attr(name, *value) {
                        tracing::warn!("{}: {}", id, e);
                    }
                }
            }
        }
        self
    }

    /// Degrees.
    pub fn rotate(&mut self, angle: f64) -> &mut Self {
        self.attrs(&[("rotation", angle)])
    }

    pub fn translate(&mut self, tx: f64, ty: f64) -> &mut Self {
        self.attrs(&[("tx", tx), ("ty", ty)])
    }

    pub fn scale(&mut self, sx: f64, sy: f64) -> &mut Self {
        self.attrs(&[("scale_x", sx), ("scale_y", sy)])
    }

    pub fn skew_x(&mut self, value: f64) -> &mut Self {
        self.attrs(&[("skew_x", value)])
    }

    pub fn skew_y(&mut self, value: f64) -> &mut Self {
        self.attrs(&[("skew_y", value)])
    }

    // --- zoom and origin ---

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn zoom_to(&mut self, zoom: f64) -> Result<&mut Self> {
        if !zoom.is_finite() || zoom <= 0.0 {
            tracing::warn!("Rejected zoom factor {}", zoom);
            return Err(ShapeError::InvalidZoom(zoom).into());
        }
        self.zoom = zoom;
        self.drag_snapshot = None;
        Ok(self)
    }

    pub fn zoom_in(&mut self) -> &mut Self {
        let step = self.input.borrow().settings().zoom_step;
        self.step_zoom(step)
    }

    /// Stops short of zero.
    pub fn zoom_out(&mut self) -> &mut Self {
        let step = self.input.borrow().settings().zoom_step;
        self.step_zoom(-step)
    }

    fn step_zoom(&mut self, delta: f64) -> &mut Self {
        let target = self.zoom + delta;
        if target > 0.0 && target.is_finite() {
            self.zoom = target;
            self.drag_snapshot = None;
        } else {
            tracing::debug!("Zoom stays at {}", self.zoom);
        }
        self
    }

    /// Device position of the surface's local origin.
    pub fn set_origin(&mut self, x: f64, y: f64) -> &mut Self {
        self.origin = Point::new(x, y);
        self
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    // --- binding ---

    /// Bind `handler` to `event_type` on every selected shape. Key event
    /// types bind to any key on this surface instead.
    pub fn bind(&mut self, event_type: EventType, handler: Handler) -> &mut Self {
        if let Some(phase) = event_type.key_phase() {
            return self.bind_any_key(phase, handler);
        }
        if event_type.needs_hover_tracking() {
            self.input.borrow_mut().enable_hover_tracking();
        }
        for id in self.last.clone() {
            self.side_table
                .bag_mut(Owner::Shape(id))
                .add_handler(event_type, handler.clone());
        }
        self
    }

    /// [`Scene::bind`] by event name, e.g. `"mousedown"`.
    pub fn bind_named(&mut self, event_name: &str, handler: Handler) -> Result<&mut Self> {
        let event_type: EventType = event_name.parse()?;
        Ok(self.bind(event_type, handler))
    }

    /// Surface-wide handler that runs only when the event target matches
    /// `selector` at dispatch time. A malformed selector never matches.
    pub fn bind_live(&mut self, event_type: EventType, selector: &str, h: Handler) -> &mut Self {
        if event_type.needs_hover_tracking() {
            self.input.borrow_mut().enable_hover_tracking();
        }
        let selector = Selector::parse(selector);
        let live = handler(move |scene, event| {
            let matched = match (&selector, event.target.and_then(|t| scene.shape(t))) {
                (Some(selector), Some(shape)) => selector.matches(shape),
                _ => false,
            };
            if matched {
                h(scene, event)
            } else {
                Ok(true)
            }
        });
        let surface = self.surface_id();
        self.side_table
            .bag_mut(Owner::Surface(surface))
            .add_handler(event_type, live);
        self
    }

    // --- drawing ---

    pub fn before_draw<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&mut dyn RenderContext) + 'static,
    {
        self.before_draw = Some(Rc::new(hook));
        self.drag_snapshot = None;
        self
    }

    pub fn after_draw<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&mut dyn RenderContext) + 'static,
    {
        self.after_draw = Some(Rc::new(hook));
        self
    }

    /// Erase the whole surface.
    pub fn clear(&mut self) -> &mut Self {
        let (w, h) = (self.surface.width() as f64, self.surface.height() as f64);
        self.surface.save();
        self.surface.set_transform(Affine::identity());
        self.surface.clear_rect(0.0, 0.0, w, h);
        self.surface.restore();
        self
    }

    /// Paint every shape in order between the draw hooks. While a drag is
    /// under way the snapshot stands in for the shapes below the dragged
    /// one; the dragged shape and everything above it are painted fresh.
    pub fn draw(&mut self) -> &mut Self {
        let zoom = self.zoom;
        self.surface.save();

        let restored = if self.snapshot_in_use() {
            match &self.drag_snapshot {
                Some(snapshot) if self.surface.put_pixels(&snapshot.pixels) => {
                    self.index_of(snapshot.shape)
                }
                _ => None,
            }
        } else {
            None
        };
        let first = match restored {
            Some(index) => index,
            None => {
                if let Some(hook) = self.before_draw.clone() {
                    hook(self.surface.as_mut());
                }
                0
            }
        };
        for shape in &self.shapes[first..] {
            shape.draw(self.surface.as_mut(), zoom);
        }

        if let Some(hook) = self.after_draw.clone() {
            hook(self.surface.as_mut());
        }
        self.surface.restore();
        self
    }

    pub fn redraw(&mut self) -> &mut Self {
        self.clear().draw()
    }

    /// Redraw if [`InputContext::request_redraw_all`](crate::input::InputContext::request_redraw_all)
    /// asked for it since the last call.
    pub fn redraw_if_requested(&mut self) -> bool {
        let requested = self.input.borrow_mut().take_redraw_request(self.surface_id());
        if requested {
            self.redraw();
        }
        requested
    }

    /// Hand freshly loaded pixels to every image shape showing `source`,
    /// then redraw. Returns how many shapes took them.
    pub fn notify_image_ready(&mut self, source: &str, pixels: RgbaImage) -> usize {
        let pixels = Rc::new(pixels);
        let mut updated = 0;
        for shape in &mut self.shapes {
            if let ShapeKind::Image(image) = &mut shape.kind {
                if image.source == source {
                    image.set_pixels(pixels.clone());
                    updated += 1;
                }
            }
        }
        tracing::debug!("Image '{}' ready for {} shape(s)", source, updated);
        self.drag_snapshot = None;
        self.redraw();
        updated
    }

    /// Current surface pixels.
    pub fn snapshot(&self) -> Result<RgbaImage> {
        self.surface.read_pixels().ok_or_else(|| {
            CapabilityError::PixelReadbackUnsupported {
                surface: self.surface.name().to_string(),
            }
            .into()
        })
    }

    // --- drag snapshot ---

    fn snapshot_in_use(&self) -> bool {
        let Some(snapshot) = &self.drag_snapshot else {
            return false;
        };
        let dragging = self.input.borrow().drag.as_ref().is_some_and(|s| {
            s.surface == self.surface_id()
                && s.shape == snapshot.shape
                && s.phase == DragPhase::Dragging
        });
        dragging && !self.is_playing()
    }

    /// Paint the shapes below `dragged` and keep the pixels. Surfaces
    /// without pixel readback simply keep full redraws.
    pub(crate) fn capture_drag_snapshot(&mut self, dragged: ShapeId) {
        let Some(index) = self.index_of(dragged) else {
            return;
        };
        let zoom = self.zoom;
        self.clear();
        self.surface.save();
        self.surface.set_transform(Affine::identity());
        if let Some(hook) = self.before_draw.clone() {
            hook(self.surface.as_mut());
        }
        for shape in &self.shapes[..index] {
            shape.draw(self.surface.as_mut(), zoom);
        }
        self.surface.restore();

        self.drag_snapshot = self.surface.read_pixels().map(|pixels| DragSnapshot {
            shape: dragged,
            pixels,
        });
        self.clear();
        if self.drag_snapshot.is_none() {
            tracing::debug!("'{}' has no pixel readback; drag redraws in full", self.surface.name());
        }
    }

    pub(crate) fn drop_drag_snapshot(&mut self) {
        self.drag_snapshot = None;
    }
}
