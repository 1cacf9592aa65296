//! Collision detection and scoring.
//!
//! Runs once per tick after everything has moved.  All tests are AABB
//! overlaps; the ship uses a fixed square hitbox rather than its glyph size.

use tracing::{debug, info};

use crate::config::Tuning;
use crate::entities::{Entity, Lifecycle, Rect, Session, Ship};

pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.overlaps(b)
}

pub fn player_hitbox(ship: &Ship, tuning: &Tuning) -> Rect {
    Rect::at(ship.pos, tuning.hitbox_size, tuning.hitbox_size)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CollisionReport {
    pub invaders_destroyed: u32,
    pub player_hit: bool,
}

/// Resolve every collision for this tick, mutating score and lifecycle.
///
/// A player projectile destroys at most one invader: the first still-alive
/// invader it overlaps, in spawn order.
pub fn resolve(state: &mut Session) -> CollisionReport {
    let mut report = CollisionReport::default();

    // ── Player projectiles ↔ invaders ────────────────────────────────────────
    let mut killed = vec![false; state.invaders.len()];
    let mut spent = vec![false; state.ship.projectiles.len()];

    for (pi, projectile) in state.ship.projectiles.iter().enumerate() {
        let shot = projectile.bounds();
        let hit = state
            .invaders
            .iter()
            .enumerate()
            .find(|(ii, invader)| !killed[*ii] && overlaps(&shot, &invader.bounds()));
        if let Some((ii, invader)) = hit {
            debug!(x = invader.pos.x, y = invader.pos.y, "invader destroyed");
            killed[ii] = true;
            spent[pi] = true;
            report.invaders_destroyed += 1;
        }
    }

    if report.invaders_destroyed > 0 {
        let mut killed = killed.into_iter();
        state.invaders.retain(|_| !killed.next().unwrap_or(false));
        let mut spent = spent.into_iter();
        state.ship.projectiles.retain(|_| !spent.next().unwrap_or(false));
        state.score += report.invaders_destroyed * state.tuning.points_per_invader;
    }

    // ── Invaders and their fire ↔ player ─────────────────────────────────────
    let hitbox = player_hitbox(&state.ship, &state.tuning);
    report.player_hit = state.invaders.iter().any(|invader| {
        overlaps(&invader.bounds(), &hitbox)
            || invader
                .projectiles
                .iter()
                .any(|shot| overlaps(&shot.bounds(), &hitbox))
    });

    if report.player_hit && state.lifecycle == Lifecycle::Running {
        state.lifecycle = Lifecycle::Over;
        info!(score = state.score, wave = state.wave, "game over");
    }

    report
}
