//! Pointer routing for one surface.
//!
//! Each raw pointer input is normalized to local coordinates, resolved to
//! the topmost shape under the pointer, turned into a queue of
//! (event, target, handlers) entries and fired as one batch.

use shapekit_core::{Error, Point, Result};
use smallvec::SmallVec;

use crate::event::{
    Dispatch, Event, EventType, HandlerList, MouseButton, PointerInput, PointerKind, PointerPhase,
};
use crate::model::{HitProbe, ShapeId};
use crate::scene::Scene;
use crate::side_table::Owner;
use crate::transform::to_local;

/// Hover, focus and pointer bookkeeping of one surface.
#[derive(Debug, Clone, Default)]
pub(crate) struct SurfaceState {
    pub(crate) hover: Option<ShapeId>,
    pub(crate) focused: Option<ShapeId>,
    /// Between a down and the next up.
    pub(crate) pressed: bool,
    /// Button of the down currently being dispatched.
    pub(crate) button: Option<MouseButton>,
    pub(crate) pointer: PointerKind,
    pub(crate) timestamp: f64,
    pub(crate) x: f64,
    pub(crate) y: f64,
    pub(crate) last_x: f64,
    pub(crate) last_y: f64,
    /// Target and time of the last synthesized click.
    pub(crate) last_click: Option<(ShapeId, f64)>,
}

struct Queued {
    event_type: EventType,
    target: ShapeId,
    handlers: HandlerList,
}

type Queue = SmallVec<[Queued; 4]>;

impl Scene {
    /// Topmost shape whose hit-test accepts the local point.
    pub fn hit_test(&mut self, point: Point) -> Option<ShapeId> {
        let line_tolerance = self.input.borrow().settings().line_hit_tolerance;
        let mut probe = HitProbe {
            ctx: self.probe.as_mut(),
            line_tolerance,
        };
        let hit = self
            .shapes
            .iter()
            .rev()
            .find(|shape| shape.hit_test(point, &mut probe))
            .map(|shape| shape.id());
        tracing::trace!("Hit-test ({}, {}) -> {:?}", point.x, point.y, hit);
        hit
    }

    /// Local coordinates of a device position.
    pub fn to_local(&self, x: f64, y: f64) -> Point {
        Point::new(
            to_local(x, self.origin.x, self.zoom),
            to_local(y, self.origin.y, self.zoom),
        )
    }

    pub fn pointer_position(&self) -> Point {
        Point::new(self.state.x, self.state.y)
    }

    pub fn hovered(&self) -> Option<ShapeId> {
        self.state.hover
    }

    pub fn focused(&self) -> Option<ShapeId> {
        self.state.focused
    }

    /// Route one pointer input through hover, focus and click handling,
    /// then fire the queued handlers.
    pub fn dispatch_pointer(&mut self, input: &PointerInput) -> Result<Dispatch> {
        let local = self.to_local(input.x, input.y);
        self.state.last_x = self.state.x;
        self.state.last_y = self.state.y;
        self.state.x = local.x;
        self.state.y = local.y;
        self.state.pointer = input.kind;
        self.state.timestamp = input.timestamp;

        let mut queue = Queue::new();
        match input.phase {
            PointerPhase::Move => self.route_move(&mut queue),
            PointerPhase::Down => self.route_down(input, local, &mut queue),
            PointerPhase::Up => self.route_up(input, &mut queue),
            PointerPhase::Click => self.queue_on_hover(EventType::Click, &mut queue),
            PointerPhase::DoubleClick => self.queue_on_hover(EventType::DblClick, &mut queue),
        }

        let result = self.fire_batch(queue);
        self.state.button = None;
        result
    }

    fn route_move(&mut self, queue: &mut Queue) {
        let tracking = {
            let mut ctx = self.input.borrow_mut();
            ctx.touch_moved = true;
            ctx.hover_tracking() && ctx.drag.is_none()
        };
        if tracking && !self.state.pressed {
            let point = self.pointer_position();
            let under = self.hit_test(point);
            self.update_hover(under, queue);
        }
        self.queue_on_hover(EventType::MouseMove, queue);
    }

    fn route_down(&mut self, input: &PointerInput, local: Point, queue: &mut Queue) {
        let target = self.hit_test(local);
        self.state.pressed = true;
        self.state.button = input.button;
        self.input.borrow_mut().set_active_surface(self.surface_id());

        if self.input.borrow().hover_tracking() {
            self.update_hover(target, queue);
        } else {
            self.state.hover = target;
        }

        let previous = self.state.focused;
        match target {
            Some(target) => {
                self.enqueue(EventType::MouseDown, target, queue);
                if previous != Some(target) {
                    self.enqueue(EventType::Focus, target, queue);
                    if let Some(old) = previous {
                        self.enqueue(EventType::Blur, old, queue);
                    }
                    tracing::debug!("Focus {:?} -> {}", previous, target);
                }
            }
            None => {
                if let Some(old) = previous {
                    self.enqueue(EventType::Blur, old, queue);
                    tracing::debug!("Focus {} -> none", old);
                }
            }
        }
        self.state.focused = target;
    }

    fn route_up(&mut self, input: &PointerInput, queue: &mut Queue) {
        self.state.pressed = false;
        let (touch_moved, window) = {
            let ctx = self.input.borrow();
            (ctx.touch_moved, ctx.settings().double_click_ms)
        };

        if let Some(hover) = self.state.hover {
            self.enqueue(EventType::MouseUp, hover, queue);

            if input.kind == PointerKind::Touch && !touch_moved {
                self.enqueue(EventType::Click, hover, queue);
                let double = self
                    .state
                    .last_click
                    .is_some_and(|(id, t)| id == hover && input.timestamp - t < window);
                if double {
                    self.enqueue(EventType::DblClick, hover, queue);
                }
                self.state.last_click = Some((hover, input.timestamp));
            }
        }
        self.input.borrow_mut().touch_moved = false;
    }

    /// Move hover to `under`: mouseout on the old shape, then mouseover on
    /// the new one.
    fn update_hover(&mut self, under: Option<ShapeId>, queue: &mut Queue) {
        let current = self.state.hover;
        if under == current {
            return;
        }
        if let Some(old) = current {
            self.enqueue(EventType::MouseOut, old, queue);
        }
        if let Some(new) = under {
            self.enqueue(EventType::MouseOver, new, queue);
        }
        tracing::debug!("Hover {:?} -> {:?}", current, under);
        self.state.hover = under;
    }

    fn queue_on_hover(&mut self, event_type: EventType, queue: &mut Queue) {
        if let Some(hover) = self.state.hover {
            self.enqueue(event_type, hover, queue);
        }
    }

    /// Shape handlers first, then the surface-wide ones, each as its own
    /// entry. Empty lists are not queued.
    fn enqueue(&self, event_type: EventType, target: ShapeId, queue: &mut Queue) {
        for owner in [Owner::Shape(target), Owner::Surface(self.surface_id())] {
            let handlers = self.side_table.handlers(owner, event_type);
            if !handlers.is_empty() {
                queue.push(Queued {
                    event_type,
                    target,
                    handlers,
                });
            }
        }
    }

    /// Queue the transition events a removed shape owes, then fire them.
    pub(crate) fn fire_departure(&mut self, id: ShapeId) -> Result<Dispatch> {
        let mut queue = Queue::new();
        if self.state.hover == Some(id) {
            self.enqueue(EventType::MouseOut, id, &mut queue);
            self.state.hover = None;
        }
        if self.state.focused == Some(id) {
            self.enqueue(EventType::Blur, id, &mut queue);
            self.state.focused = None;
        }
        self.fire_batch(queue)
    }

    fn fire_batch(&mut self, queue: Queue) -> Result<Dispatch> {
        let mut dispatch = Dispatch {
            queued: queue.len(),
            ..Dispatch::default()
        };
        if queue.is_empty() {
            return Ok(dispatch);
        }

        self.clear();
        let mut outcome = Ok(());
        for entry in queue {
            if self.index_of(entry.target).is_none() {
                tracing::debug!(
                    "Skipping {} for removed {}",
                    entry.event_type,
                    entry.target
                );
                continue;
            }
            let event = self.event_for(entry.event_type, entry.target);
            outcome = self.invoke_handlers(&entry.handlers, &event, &mut dispatch);
            if outcome.is_err() {
                break;
            }
        }
        // Repaint even after a failed handler.
        self.draw();
        outcome?;

        tracing::debug!(
            "Fired {} handler(s) from {} list(s)",
            dispatch.invoked,
            dispatch.queued
        );
        Ok(dispatch)
    }

    fn event_for(&self, event_type: EventType, target: ShapeId) -> Event {
        Event {
            event_type,
            target: Some(target),
            x: self.state.x,
            y: self.state.y,
            last_x: self.state.last_x,
            last_y: self.state.last_y,
            button: self.state.button,
            pointer: self.state.pointer,
            timestamp: self.state.timestamp,
            binding: None,
        }
    }

    /// Run one handler list with the surface pre-scaled by the zoom.
    pub(crate) fn invoke_handlers(
        &mut self,
        handlers: &HandlerList,
        event: &Event,
        dispatch: &mut Dispatch,
    ) -> Result<()> {
        let zoom = self.zoom;
        self.surface.save();
        self.surface.scale(zoom, zoom);

        let mut proceed = true;
        for h in handlers {
            dispatch.invoked += 1;
            match h(self, event) {
                Ok(true) => {}
                Ok(false) => proceed = false,
                Err(e) => {
                    self.surface.restore();
                    return Err(Error::Handler(e));
                }
            }
        }

        self.surface.restore();
        if !proceed {
            dispatch.default_prevented = true;
        }
        Ok(())
    }
}
