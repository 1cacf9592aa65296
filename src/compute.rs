//! Game logic: entity behaviour and session transitions.
//!
//! Session-level functions take an immutable reference to the current
//! `Session` (plus, where needed, an RNG handle and the current time) and
//! return a brand-new `Session`.  Randomness only enters through the
//! injected RNG, so a seeded RNG makes every run reproducible.

use rand::Rng;
use tracing::info;

use crate::collision::{self, CollisionReport};
use crate::config::{Tuning, Viewport};
use crate::entities::{
    Direction, Entity, Invader, Lifecycle, Projectile, Rect, Session, Ship, TickContext, WavePhase,
};
use crate::input::InputSnapshot;
use crate::wave::{self, WaveEvent};

// ── Entity behaviour ─────────────────────────────────────────────────────────

impl Entity for Projectile {
    fn bounds(&self) -> Rect {
        Rect::at(self.pos, self.width, self.height)
    }

    fn tick(&mut self, _ctx: &mut TickContext<'_>) {
        self.pos.y += self.velocity;
    }
}

/// Advance every projectile and drop the ones that left the viewport.
fn advance_projectiles(projectiles: &mut Vec<Projectile>, ctx: &mut TickContext<'_>) {
    let viewport_height = ctx.tuning.viewport.height;
    for projectile in projectiles.iter_mut() {
        projectile.tick(ctx);
    }
    projectiles.retain(|p| !p.is_off_screen(viewport_height));
}

/// Apply both movement flags (they add, so holding both cancels out) and
/// clamp the ship inside the viewport.
pub fn move_ship(ship: &mut Ship, input: InputSnapshot, tuning: &Tuning) {
    if input.left {
        ship.pos.x -= ship.speed;
    }
    if input.right {
        ship.pos.x += ship.speed;
    }
    let max_x = (tuning.viewport.width - ship.width).max(0.0);
    ship.pos.x = ship.pos.x.clamp(0.0, max_x);
}

impl Entity for Ship {
    fn bounds(&self) -> Rect {
        Rect::at(self.pos, self.width, self.width)
    }

    fn tick(&mut self, ctx: &mut TickContext<'_>) {
        move_ship(self, ctx.input, ctx.tuning);
        advance_projectiles(&mut self.projectiles, ctx);
    }
}

impl Entity for Invader {
    fn bounds(&self) -> Rect {
        Rect::at(self.pos, self.width, self.height)
    }

    fn tick(&mut self, ctx: &mut TickContext<'_>) {
        self.pos.x += self.speed * self.direction.sign();
        // Only the wall ahead counts, so an invader caught outside the field
        // after a resize turns once and walks back in
        let past_wall = match self.direction {
            Direction::Left => self.pos.x < 0.0,
            Direction::Right => self.pos.x + self.width > ctx.tuning.viewport.width,
        };
        if past_wall {
            self.direction = self.direction.flipped();
            self.pos.y += self.height;
        }

        if ctx.rng.gen_bool(ctx.tuning.fire_chance) {
            self.projectiles
                .push(Projectile::enemy(self.muzzle(), ctx.tuning));
        }

        advance_projectiles(&mut self.projectiles, ctx);
    }
}

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build a fresh session: the reset operation.
///
/// Uses no randomness, so two calls with the same tuning compare equal.
pub fn init_state(tuning: Tuning) -> Session {
    let wave = 1;
    let quota = tuning.initial_quota;
    Session {
        ship: Ship::new(&tuning),
        invaders: wave::spawn_wave(wave, quota, &tuning),
        score: 0,
        wave,
        quota,
        lifecycle: Lifecycle::NotStarted,
        phase: WavePhase::Active,
        frame: 0,
        tuning,
    }
}

// ── Input-driven transitions ─────────────────────────────────────────────────

pub fn start(state: &Session) -> Session {
    if state.lifecycle != Lifecycle::NotStarted {
        return state.clone();
    }
    info!(wave = state.wave, quota = state.quota, "game started");
    Session {
        lifecycle: Lifecycle::Running,
        ..state.clone()
    }
}

/// Fire one projectile from the ship's muzzle.  No rate limit: callers fire
/// once per input edge, not once per frame.
pub fn player_fire(state: &Session) -> Session {
    if state.lifecycle != Lifecycle::Running {
        return state.clone();
    }
    let mut next = state.clone();
    let shot = Projectile::player(next.ship.muzzle(&next.tuning), &next.tuning);
    next.ship.projectiles.push(shot);
    next
}

/// Adopt a new host viewport.  The ship keeps its x until the next tick
/// clamps it, but its row follows the new bottom edge.  Invaders are pulled
/// back inside the new width straight away.
pub fn resize(state: &Session, viewport: Viewport) -> Session {
    let mut next = state.clone();
    next.tuning = next.tuning.with_viewport(viewport);
    next.ship.pos.y = viewport.height - next.tuning.ship_offset;
    for invader in &mut next.invaders {
        let max_x = (viewport.width - invader.width).max(0.0);
        invader.pos.x = invader.pos.x.clamp(0.0, max_x);
    }
    next
}

// ── Per-frame tick ───────────────────────────────────────────────────────────

/// Outcome of one tick, for the loop and for logging.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickReport {
    pub collisions: CollisionReport,
    pub wave: WaveEvent,
}

/// Advance the simulation by one frame at time `now_ms`.
///
/// Order: ship, every invader, collisions and scoring, then the wave
/// transition check.  Does nothing unless the session is running.
pub fn tick(
    state: &Session,
    input: InputSnapshot,
    now_ms: u64,
    rng: &mut impl Rng,
) -> (Session, TickReport) {
    let mut next = state.clone();
    if next.lifecycle != Lifecycle::Running {
        let report = TickReport {
            collisions: CollisionReport::default(),
            wave: WaveEvent::Idle,
        };
        return (next, report);
    }
    next.frame += 1;

    let tuning = next.tuning;
    let mut ctx = TickContext {
        tuning: &tuning,
        input,
        rng,
    };

    next.ship.tick(&mut ctx);
    for invader in next.invaders.iter_mut() {
        invader.tick(&mut ctx);
    }

    let collisions = collision::resolve(&mut next);
    let wave = wave::check_transition(&mut next, now_ms);

    (next, TickReport { collisions, wave })
}
