//! State shared by every surface of one application.
//!
//! Which surface owns the keyboard, the one drag session that may be in
//! flight, the last keydown code and the pending redraw requests all live
//! here instead of in process globals. Scenes hold the context as
//! `Shared<InputContext>`; independent contexts never interact.

use shapekit_core::{shared, Shared};
use shapekit_settings::{HoverTracking, InteractionSettings};
use std::collections::HashSet;
use std::fmt;

use crate::drag::{DragPhase, DragSession};
use crate::model::ShapeId;

/// Handle of one drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(pub(crate) u64);

impl SurfaceId {
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "surface#{}", self.0)
    }
}

#[derive(Debug)]
pub struct InputContext {
    settings: InteractionSettings,
    next_id: u64,
    surfaces: Vec<SurfaceId>,
    active_surface: Option<SurfaceId>,
    pub(crate) drag: Option<DragSession>,
    hover_tracking: bool,
    pub(crate) touch_moved: bool,
    pub(crate) last_key_code: Option<u32>,
    redraw_requested: HashSet<SurfaceId>,
}

impl InputContext {
    pub fn new() -> Self {
        Self::with_settings(InteractionSettings::default())
    }

    pub fn with_settings(settings: InteractionSettings) -> Self {
        let hover_tracking = settings.hover_tracking == HoverTracking::Always;
        Self {
            settings,
            next_id: 0,
            surfaces: Vec::new(),
            active_surface: None,
            drag: None,
            hover_tracking,
            touch_moved: false,
            last_key_code: None,
            redraw_requested: HashSet::new(),
        }
    }

    pub fn shared(self) -> Shared<InputContext> {
        shared(self)
    }

    pub fn settings(&self) -> &InteractionSettings {
        &self.settings
    }

    /// Fresh value from the context-wide counter. Surface handles, frame
    /// tokens and drag binding ids all come from here.
    pub(crate) fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    pub(crate) fn register_surface(&mut self) -> SurfaceId {
        let id = SurfaceId(self.next_id());
        self.surfaces.push(id);
        id
    }

    pub fn surfaces(&self) -> &[SurfaceId] {
        &self.surfaces
    }

    pub fn active_surface(&self) -> Option<SurfaceId> {
        self.active_surface
    }

    pub(crate) fn set_active_surface(&mut self, surface: SurfaceId) {
        if self.active_surface != Some(surface) {
            tracing::debug!("Keyboard now routed to {}", surface);
        }
        self.active_surface = Some(surface);
    }

    /// A pointer-down landed outside every registered surface.
    pub fn pointer_down_elsewhere(&mut self) {
        self.active_surface = None;
    }

    pub fn hover_tracking(&self) -> bool {
        self.hover_tracking
    }

    pub fn enable_hover_tracking(&mut self) {
        if !self.hover_tracking {
            tracing::debug!("Hover tracking enabled");
            self.hover_tracking = true;
        }
    }

    pub fn last_key_code(&self) -> Option<u32> {
        self.last_key_code
    }

    pub fn is_dragging(&self) -> bool {
        self.drag
            .as_ref()
            .is_some_and(|s| s.phase == DragPhase::Dragging)
    }

    pub fn drag_phase(&self) -> Option<DragPhase> {
        self.drag.as_ref().map(|s| s.phase)
    }

    pub fn drag_target(&self) -> Option<(SurfaceId, ShapeId)> {
        self.drag.as_ref().map(|s| (s.surface, s.shape))
    }

    /// Ask every registered surface for a full redraw, e.g. after images
    /// finish loading.
    pub fn request_redraw_all(&mut self) {
        self.redraw_requested.extend(self.surfaces.iter().copied());
    }

    pub(crate) fn take_redraw_request(&mut self, surface: SurfaceId) -> bool {
        self.redraw_requested.remove(&surface)
    }
}

impl Default for InputContext {
    fn default() -> Self {
        Self::new()
    }
}
