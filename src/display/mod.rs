//! Rendering layer.
//!
//! Each function receives a mutable drawing surface and an immutable view of
//! the session.  No game logic is performed; this module only translates
//! state into surface calls.  `terminal` provides the crossterm surface the
//! binary draws on.

use std::io;

use crate::entities::{Invader, Owner, Projectile, Rect, Session, Ship, Vec2};

pub mod terminal;

// ── Surface (host collaborator) ──────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Paint {
    White,
    Red,
    Yellow,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Baseline {
    Alphabetic,
    Middle,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    pub font_px: u16,
    pub align: Align,
    pub baseline: Baseline,
    pub paint: Paint,
}

/// A 2D drawing target in play-area pixels.
pub trait Surface {
    fn clear(&mut self, region: Rect) -> io::Result<()>;
    fn fill_rect(&mut self, rect: Rect, paint: Paint) -> io::Result<()>;
    fn stroke_rect(&mut self, rect: Rect, paint: Paint, line_width: f32) -> io::Result<()>;
    fn fill_text(&mut self, text: &str, at: Vec2, style: TextStyle) -> io::Result<()>;
    /// Push everything drawn since the last call to the host.
    fn present(&mut self) -> io::Result<()>;
}

/// Entities that know how to draw themselves.
pub trait Draw {
    fn draw<S: Surface>(&self, surface: &mut S) -> io::Result<()>;
}

// ── Styles ───────────────────────────────────────────────────────────────────

const GLYPH: TextStyle = TextStyle {
    font_px: 30,
    align: Align::Center,
    baseline: Baseline::Alphabetic,
    paint: Paint::White,
};

const HUD_TEXT: TextStyle = TextStyle {
    font_px: 18,
    align: Align::Left,
    baseline: Baseline::Alphabetic,
    paint: Paint::White,
};

const BANNER: TextStyle = TextStyle {
    font_px: 30,
    align: Align::Center,
    baseline: Baseline::Middle,
    paint: Paint::White,
};

const HUD_BOX: Rect = Rect::new(10.0, 10.0, 150.0, 50.0);

pub const SHIP_GLYPH: &str = "🚀";
pub const INVADER_GLYPH: &str = "👾";
pub const START_PROMPT: &str = "Press SPACE or Tap to Start";
pub const GAME_OVER: &str = "GAME OVER";
pub const RESTART_PROMPT: &str = "Press SPACE or Tap to Restart";

// ── Entities ─────────────────────────────────────────────────────────────────

impl Draw for Projectile {
    fn draw<S: Surface>(&self, surface: &mut S) -> io::Result<()> {
        let paint = match self.owner {
            Owner::Player => Paint::Red,
            Owner::Enemy => Paint::Yellow,
        };
        surface.fill_rect(Rect::at(self.pos, self.width, self.height), paint)
    }
}

impl Draw for Ship {
    fn draw<S: Surface>(&self, surface: &mut S) -> io::Result<()> {
        // Glyph hangs above its baseline, so anchor it on the body's bottom edge
        let at = Vec2::new(self.pos.x + self.width / 2.0, self.pos.y + self.width);
        surface.fill_text(SHIP_GLYPH, at, GLYPH)?;
        for projectile in &self.projectiles {
            projectile.draw(surface)?;
        }
        Ok(())
    }
}

impl Draw for Invader {
    fn draw<S: Surface>(&self, surface: &mut S) -> io::Result<()> {
        let at = Vec2::new(self.pos.x + self.width / 2.0, self.pos.y + self.height);
        surface.fill_text(INVADER_GLYPH, at, GLYPH)?;
        for projectile in &self.projectiles {
            projectile.draw(surface)?;
        }
        Ok(())
    }
}

// ── Screens ──────────────────────────────────────────────────────────────────

fn full_view(state: &Session) -> Rect {
    let viewport = state.tuning.viewport;
    Rect::new(0.0, 0.0, viewport.width, viewport.height)
}

fn centre(state: &Session) -> Vec2 {
    let viewport = state.tuning.viewport;
    Vec2::new(viewport.width / 2.0, viewport.height / 2.0)
}

/// Score and wave counters in a framed box, top-left.
pub fn draw_hud<S: Surface>(surface: &mut S, state: &Session) -> io::Result<()> {
    surface.stroke_rect(HUD_BOX, Paint::White, 2.0)?;
    surface.fill_text(&format!("Score: {}", state.score), Vec2::new(20.0, 30.0), HUD_TEXT)?;
    surface.fill_text(&format!("Wave: {}", state.wave), Vec2::new(20.0, 50.0), HUD_TEXT)?;
    Ok(())
}

/// Render one complete running frame.
pub fn render<S: Surface>(surface: &mut S, state: &Session) -> io::Result<()> {
    surface.clear(full_view(state))?;
    draw_hud(surface, state)?;
    state.ship.draw(surface)?;
    for invader in &state.invaders {
        invader.draw(surface)?;
    }
    surface.present()
}

pub fn draw_start_screen<S: Surface>(surface: &mut S, state: &Session) -> io::Result<()> {
    surface.clear(full_view(state))?;
    surface.fill_text(START_PROMPT, centre(state), BANNER)?;
    surface.present()
}

/// Overlay drawn on top of the last frame; the board stays visible.
pub fn draw_game_over<S: Surface>(surface: &mut S, state: &Session) -> io::Result<()> {
    let style = TextStyle {
        paint: Paint::Red,
        ..BANNER
    };
    let at = centre(state);
    surface.fill_text(GAME_OVER, at, style)?;
    surface.fill_text(RESTART_PROMPT, Vec2::new(at.x, at.y + 40.0), style)?;
    surface.present()
}
