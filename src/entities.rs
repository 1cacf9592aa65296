//! All game entity types, plus the capability trait they share.
//!
//! Behaviour (`Entity::tick`) is implemented in `compute`; drawing lives in
//! `display`.  Positions are screen-space pixels, origin top-left, y down.

use rand::RngCore;

use crate::config::Tuning;
use crate::input::InputSnapshot;

// ── Geometry ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn at(pos: Vec2, w: f32, h: f32) -> Self {
        Self::new(pos.x, pos.y, w, h)
    }

    /// Strict overlap: rectangles that only share an edge do not touch.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }
}

// ── Lifecycle ────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    NotStarted,
    Running,
    Over,
}

/// Wave manager phase.  `Clearing` doubles as the "transition pending" flag,
/// so a second transition cannot be queued while one is outstanding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WavePhase {
    Active,
    Clearing { deadline_ms: u64 },
}

impl WavePhase {
    pub fn is_pending(&self) -> bool {
        matches!(self, WavePhase::Clearing { .. })
    }
}

// ── Projectiles ──────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Owner {
    Player,
    Enemy,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    pub pos: Vec2,
    /// Vertical pixels per tick; negative travels up.
    pub velocity: f32,
    pub width: f32,
    pub height: f32,
    pub owner: Owner,
}

impl Projectile {
    /// A player shot whose horizontal centre sits on `muzzle.x`.
    pub fn player(muzzle: Vec2, tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::new(muzzle.x - tuning.projectile_width / 2.0, muzzle.y),
            velocity: -tuning.player_projectile_speed,
            width: tuning.projectile_width,
            height: tuning.projectile_height,
            owner: Owner::Player,
        }
    }

    /// An enemy shot whose left edge sits on `muzzle.x`.
    pub fn enemy(muzzle: Vec2, tuning: &Tuning) -> Self {
        Self {
            pos: muzzle,
            velocity: tuning.enemy_projectile_speed,
            width: tuning.projectile_width,
            height: tuning.projectile_height,
            owner: Owner::Enemy,
        }
    }

    /// True once the projectile has left the viewport in its direction of travel.
    pub fn is_off_screen(&self, viewport_height: f32) -> bool {
        match self.owner {
            Owner::Player => self.pos.y < 0.0,
            Owner::Enemy => self.pos.y > viewport_height,
        }
    }
}

// ── Ship & invaders ──────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Ship {
    /// Top-left corner of the ship body.
    pub pos: Vec2,
    pub speed: f32,
    pub width: f32,
    pub projectiles: Vec<Projectile>,
}

impl Ship {
    /// A ship centred horizontally, `ship_offset` above the viewport bottom.
    pub fn new(tuning: &Tuning) -> Self {
        let viewport = tuning.viewport;
        Self {
            pos: Vec2::new(
                viewport.width / 2.0,
                viewport.height - tuning.ship_offset,
            ),
            speed: tuning.ship_speed,
            width: tuning.ship_width,
            projectiles: Vec::new(),
        }
    }

    /// Top centre of the body, offset upward by the muzzle gap.
    pub fn muzzle(&self, tuning: &Tuning) -> Vec2 {
        Vec2::new(self.pos.x + self.width / 2.0, self.pos.y - tuning.muzzle_gap)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    pub fn sign(self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Invader {
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// Fixed at spawn from the wave number.
    pub speed: f32,
    pub direction: Direction,
    pub projectiles: Vec<Projectile>,
}

impl Invader {
    pub fn new(pos: Vec2, speed: f32, tuning: &Tuning) -> Self {
        Self {
            pos,
            width: tuning.invader_width,
            height: tuning.invader_height,
            speed,
            direction: Direction::Right,
            projectiles: Vec::new(),
        }
    }

    /// Bottom centre, where enemy shots leave.
    pub fn muzzle(&self) -> Vec2 {
        Vec2::new(self.pos.x + self.width / 2.0, self.pos.y + self.height)
    }
}

// ── Shared capability ────────────────────────────────────────────────────────

/// Everything an entity may read while advancing one tick.
pub struct TickContext<'a> {
    pub tuning: &'a Tuning,
    pub input: InputSnapshot,
    pub rng: &'a mut dyn RngCore,
}

pub trait Entity {
    fn bounds(&self) -> Rect;
    fn tick(&mut self, ctx: &mut TickContext<'_>);
}

// ── Master game state ────────────────────────────────────────────────────────

/// The whole session.  Cloneable so session-level transitions can return a
/// new copy; comparable so resets can be checked for idempotence.
#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    pub tuning: Tuning,
    pub ship: Ship,
    pub invaders: Vec<Invader>,
    pub score: u32,
    pub wave: u32,
    /// Invader count for the current (or, while clearing, the finished) wave.
    pub quota: u32,
    pub lifecycle: Lifecycle,
    pub phase: WavePhase,
    pub frame: u64,
}
