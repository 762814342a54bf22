//! Token-cancelled frame loop.
//!
//! The host schedules frames with whatever timer it has and calls
//! [`Scene::frame`] with the ticket it was given. Starting a new loop or
//! stopping the current one invalidates older tickets, so a frame that
//! was already scheduled notices and stops rescheduling itself.

use shapekit_core::{Error, Result};
use std::rc::Rc;

use super::Scene;
use crate::input::SurfaceId;

/// Per-frame callback; runs after the redraw.
pub type LoopCallback = Rc<dyn Fn(&mut Scene) -> anyhow::Result<()>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTicket {
    surface: SurfaceId,
    token: u64,
}

impl FrameTicket {
    pub fn token(&self) -> u64 {
        self.token
    }
}

impl Scene {
    /// Start (or restart) the loop with a new callback.
    pub fn start_loop<F>(&mut self, callback: F) -> FrameTicket
    where
        F: Fn(&mut Scene) -> anyhow::Result<()> + 'static,
    {
        self.loop_callback = Some(Rc::new(callback));
        self.resume_loop()
    }

    /// Start the loop again with the previous callback, if any.
    pub fn resume_loop(&mut self) -> FrameTicket {
        let token = self.input.borrow_mut().next_id();
        self.play = Some(token);
        tracing::debug!("Loop started on {} with token {}", self.surface_id(), token);
        FrameTicket {
            surface: self.surface_id(),
            token,
        }
    }

    /// Run one frame. `None` means the ticket is stale and the host should
    /// stop scheduling it.
    pub fn frame(&mut self, ticket: FrameTicket) -> Result<Option<FrameTicket>> {
        if ticket.surface != self.surface_id() || self.play != Some(ticket.token) {
            return Ok(None);
        }

        self.redraw();
        if let Some(callback) = self.loop_callback.clone() {
            self.surface.save();
            let result = callback(self);
            self.surface.restore();
            result.map_err(Error::Handler)?;
        }
        self.frame_count += 1;
        Ok(Some(ticket))
    }

    pub fn stop(&mut self) -> &mut Self {
        if let Some(token) = self.play.take() {
            tracing::debug!("Loop with token {} stopped", token);
        }
        self
    }

    pub fn is_playing(&self) -> bool {
        self.play.is_some()
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}
