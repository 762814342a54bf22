//! Drag gestures.
//!
//! `Scene::drag` installs three internal handlers (mousedown, mousemove,
//! mouseup) on each selected shape; `Scene::drag_live` installs them as
//! selector-filtered surface handlers instead. The session itself lives in
//! the shared [`InputContext`](crate::input::InputContext) so at most one
//! exists per context:
//!
//! ```text
//! Idle --down(primary|touch)--> Armed --move--> Dragging --up--> Idle
//!                                 |  start() == false
//!                                 +-----------------------------> Idle
//! ```

use std::fmt;
use std::rc::Rc;

use crate::event::{handler, Event, EventType, MouseButton, PointerKind};
use crate::input::SurfaceId;
use crate::model::ShapeId;
use crate::scene::Scene;
use crate::side_table::Owner;

type StartCallback = Rc<dyn Fn(&mut Scene, &Event) -> anyhow::Result<bool>>;
type StepCallback = Rc<dyn Fn(&mut Scene, &Event) -> anyhow::Result<()>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    Armed,
    Dragging,
}

/// Optional start/move/end callbacks for a drag binding.
#[derive(Clone, Default)]
pub struct DragCallbacks {
    start: Option<StartCallback>,
    on_move: Option<StepCallback>,
    end: Option<StepCallback>,
}

impl DragCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called on the first move; returning `false` cancels the drag.
    pub fn on_start<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut Scene, &Event) -> anyhow::Result<bool> + 'static,
    {
        self.start = Some(Rc::new(f));
        self
    }

    /// Called after each translation step.
    pub fn on_move<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut Scene, &Event) -> anyhow::Result<()> + 'static,
    {
        self.on_move = Some(Rc::new(f));
        self
    }

    /// Called on release after the shape actually moved.
    pub fn on_end<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut Scene, &Event) -> anyhow::Result<()> + 'static,
    {
        self.end = Some(Rc::new(f));
        self
    }
}

impl fmt::Debug for DragCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DragCallbacks")
            .field("start", &self.start.is_some())
            .field("on_move", &self.on_move.is_some())
            .field("end", &self.end.is_some())
            .finish()
    }
}

#[derive(Debug, Clone)]
pub(crate) struct DragSession {
    pub(crate) surface: SurfaceId,
    pub(crate) shape: ShapeId,
    /// Which drag binding armed the session.
    binding: u64,
    pub(crate) phase: DragPhase,
    callbacks: Rc<DragCallbacks>,
}

impl DragSession {
    fn owned_by(&self, surface: SurfaceId, shape: ShapeId, binding: u64) -> bool {
        self.surface == surface && self.shape == shape && self.binding == binding
    }
}

impl Scene {
    /// Make every shape in the last selection draggable. Shapes that are
    /// already draggable are skipped.
    pub fn drag(&mut self, callbacks: DragCallbacks) -> &mut Self {
        let binding = self.input.borrow_mut().next_id();
        let callbacks = Rc::new(callbacks);
        for id in self.selection().to_vec() {
            let bag = self.side_table_mut().bag_mut(Owner::Shape(id));
            if bag.is_drag_marked() {
                tracing::debug!("{} is already draggable", id);
                continue;
            }
            bag.set_drag_marked(true);
            install(self, Some(id), None, binding, &callbacks);
        }
        self
    }

    /// Make whatever matches `selector` at event time draggable.
    pub fn drag_live(&mut self, selector: &str, callbacks: DragCallbacks) -> &mut Self {
        let binding = self.input.borrow_mut().next_id();
        install(self, None, Some(selector), binding, &Rc::new(callbacks));
        self
    }

    /// Drop the session if it targets `shape` on this surface, without
    /// calling `end`.
    pub(crate) fn cancel_drag_of(&mut self, shape: ShapeId) {
        let surface = self.surface_id();
        let cancelled = {
            let mut ctx = self.input.borrow_mut();
            let hit = ctx
                .drag
                .as_ref()
                .is_some_and(|s| s.surface == surface && s.shape == shape);
            if hit {
                ctx.drag = None;
            }
            hit
        };
        if cancelled {
            tracing::debug!("Drag of {} cancelled by removal", shape);
            self.drop_drag_snapshot();
        }
    }
}

fn install(
    scene: &mut Scene,
    shape: Option<ShapeId>,
    selector: Option<&str>,
    binding: u64,
    callbacks: &Rc<DragCallbacks>,
) {
    let down = {
        let callbacks = callbacks.clone();
        handler(move |scene, event| {
            on_down(scene, event, binding, &callbacks);
            Ok(true)
        })
    };
    let step = handler(move |scene, event| {
        on_move(scene, event, binding)?;
        Ok(true)
    });
    let up = handler(move |scene, event| {
        on_up(scene, event, binding)?;
        Ok(true)
    });

    for (event_type, h) in [
        (EventType::MouseDown, down),
        (EventType::MouseMove, step),
        (EventType::MouseUp, up),
    ] {
        match (shape, selector) {
            (Some(id), _) => scene.side_table_mut().bag_mut(id).add_handler(event_type, h),
            (None, Some(selector)) => {
                scene.bind_live(event_type, selector, h);
            }
            (None, None) => {}
        }
    }
}

fn on_down(scene: &mut Scene, event: &Event, binding: u64, callbacks: &Rc<DragCallbacks>) {
    let Some(target) = event.target else {
        return;
    };
    if event.button != Some(MouseButton::Left) && event.pointer != PointerKind::Touch {
        return;
    }

    let surface = scene.surface_id();
    let snapshot = {
        let mut ctx = scene.input.borrow_mut();
        if let Some(existing) = &ctx.drag {
            if existing.surface == surface && existing.shape == target {
                return;
            }
            tracing::debug!("Replacing stale drag of {}", existing.shape);
        }
        ctx.drag = Some(DragSession {
            surface,
            shape: target,
            binding,
            phase: DragPhase::Armed,
            callbacks: callbacks.clone(),
        });
        ctx.settings().drag_snapshot
    };
    tracing::debug!("Drag armed on {}", target);

    if snapshot && !scene.is_playing() {
        scene.capture_drag_snapshot(target);
    }
}

fn on_move(scene: &mut Scene, event: &Event, binding: u64) -> anyhow::Result<()> {
    let Some(target) = event.target else {
        return Ok(());
    };
    let surface = scene.surface_id();
    let session = scene
        .input
        .borrow()
        .drag
        .clone()
        .filter(|s| s.owned_by(surface, target, binding));
    let Some(session) = session else {
        return Ok(());
    };

    if session.phase == DragPhase::Armed {
        if let Some(start) = &session.callbacks.start {
            if !start(scene, event)? {
                tracing::debug!("Drag of {} refused by start callback", target);
                scene.input.borrow_mut().drag = None;
                scene.drop_drag_snapshot();
                return Ok(());
            }
        }
        if let Some(live) = scene.input.borrow_mut().drag.as_mut() {
            live.phase = DragPhase::Dragging;
        }
        tracing::debug!("Dragging {}", target);
    }

    if let Some(shape) = scene.shape_mut(target) {
        shape.relative_move(event.dx(), event.dy());
    }
    if let Some(on_move) = &session.callbacks.on_move {
        on_move(scene, event)?;
    }
    Ok(())
}

fn on_up(scene: &mut Scene, event: &Event, binding: u64) -> anyhow::Result<()> {
    let Some(target) = event.target else {
        return Ok(());
    };
    let surface = scene.surface_id();
    let session = {
        let mut ctx = scene.input.borrow_mut();
        if !ctx
            .drag
            .as_ref()
            .is_some_and(|s| s.owned_by(surface, target, binding))
        {
            return Ok(());
        }
        ctx.drag.take()
    };
    scene.drop_drag_snapshot();

    if let Some(session) = session {
        tracing::debug!("Drag of {} released ({:?})", target, session.phase);
        if session.phase == DragPhase::Dragging {
            if let Some(end) = &session.callbacks.end {
                end(scene, event)?;
            }
        }
    }
    Ok(())
}
