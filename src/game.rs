//! Simulation loop and session state machine.
//!
//! `Game` owns the session, the control state and the RNG.  The host calls
//! `handle` for every input event and `frame` once per display refresh while
//! `wants_frame` is true; there is no self-rescheduling, so the loop stops as
//! soon as the session leaves `Running`.

use std::io;

use rand::Rng;
use tracing::{debug, info};

use crate::compute;
use crate::config::{Tuning, Viewport};
use crate::display::{self, Surface};
use crate::entities::{Lifecycle, Session};
use crate::input::{Action, Controls, InputEvent};

/// What the loop should do after a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameRequest {
    Next,
    Halt,
}

pub struct Game<R: Rng> {
    state: Session,
    controls: Controls,
    rng: R,
    /// An idle screen (start or game over) needs drawing.
    dirty: bool,
}

impl<R: Rng> Game<R> {
    pub fn new(tuning: Tuning, rng: R) -> Self {
        Self {
            state: compute::init_state(tuning),
            controls: Controls::new(),
            rng,
            dirty: true,
        }
    }

    /// Resume from an existing session, e.g. a hand-built scenario.
    pub fn from_session(state: Session, rng: R) -> Self {
        Self {
            state,
            controls: Controls::new(),
            rng,
            dirty: true,
        }
    }

    pub fn state(&self) -> &Session {
        &self.state
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.state.lifecycle
    }

    /// Stop condition for the host loop.
    pub fn wants_frame(&self) -> bool {
        self.state.lifecycle == Lifecycle::Running
    }

    /// Fold one input event in and run any one-shot action it triggers.
    pub fn handle(&mut self, event: InputEvent) {
        let Some(action) = self.controls.apply(event, &self.state.tuning) else {
            return;
        };
        match (self.state.lifecycle, action) {
            (Lifecycle::NotStarted, _) => {
                self.state = compute::start(&self.state);
            }
            (Lifecycle::Running, Action::Trigger) => {
                self.state = compute::player_fire(&self.state);
            }
            (Lifecycle::Running, Action::Tap) => {}
            (Lifecycle::Over, _) => self.reset(),
        }
    }

    /// Full reset back to the start screen.
    pub fn reset(&mut self) {
        info!(score = self.state.score, wave = self.state.wave, "session reset");
        self.state = compute::init_state(self.state.tuning);
        self.dirty = true;
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.state = compute::resize(&self.state, viewport);
        self.dirty = true;
    }

    /// Run one frame at `now_ms`: tick, collide, check waves, draw.
    ///
    /// Returns `Halt` once the session is over (after drawing the game over
    /// overlay) and on any call made while the session is not running.
    pub fn frame<S: Surface>(&mut self, now_ms: u64, surface: &mut S) -> io::Result<FrameRequest> {
        if self.state.lifecycle != Lifecycle::Running {
            return Ok(FrameRequest::Halt);
        }

        let input = self.controls.snapshot();
        let (next, report) = compute::tick(&self.state, input, now_ms, &mut self.rng);
        self.state = next;
        if report.collisions.invaders_destroyed > 0 {
            debug!(
                frame = self.state.frame,
                destroyed = report.collisions.invaders_destroyed,
                score = self.state.score,
                "score updated"
            );
        }

        display::render(surface, &self.state)?;

        if self.state.lifecycle == Lifecycle::Over {
            display::draw_game_over(surface, &self.state)?;
            self.dirty = false;
            return Ok(FrameRequest::Halt);
        }
        Ok(FrameRequest::Next)
    }

    /// Draw the start or game over screen if it is stale.  Returns whether
    /// anything was drawn.
    pub fn draw_idle<S: Surface>(&mut self, surface: &mut S) -> io::Result<bool> {
        if !self.dirty {
            return Ok(false);
        }
        match self.state.lifecycle {
            Lifecycle::NotStarted => display::draw_start_screen(surface, &self.state)?,
            Lifecycle::Over => {
                display::render(surface, &self.state)?;
                display::draw_game_over(surface, &self.state)?;
            }
            Lifecycle::Running => return Ok(false),
        }
        self.dirty = false;
        Ok(true)
    }
}
