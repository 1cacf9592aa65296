//! Gameplay tuning and viewport sizing.
//!
//! Every number the simulation uses lives in `Tuning` so tests and the CLI
//! can adjust them without touching game logic.  Loop/runtime constants
//! (frame interval, key hold window) belong to the binary instead.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("viewport must be positive, got {width}x{height}")]
    EmptyViewport { width: f32, height: f32 },
    #[error("fire chance must be within [0, 1], got {0}")]
    FireChanceOutOfRange(f64),
    #[error("quota step must be at least 1")]
    ZeroQuotaStep,
    #[error("initial quota must be at least 1")]
    ZeroInitialQuota,
    #[error("speed increment must be positive, got {0}")]
    NonIncreasingSpeed(f32),
    #[error("grid column width must be positive, got {0}")]
    EmptyColumn(f32),
}

// ── Viewport ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Size the play area for a host of `host_width` × `host_height`.
    ///
    /// Wide hosts get the fixed maximum play area; narrow hosts use their
    /// full width and give up `reserved_height` at the bottom for chrome.
    pub fn fit(host_width: f32, host_height: f32, tuning: &Tuning) -> Self {
        if host_width > tuning.max_viewport.width {
            tuning.max_viewport
        } else {
            Self {
                width: host_width,
                height: (host_height - tuning.reserved_height).max(1.0),
            }
        }
    }
}

// ── Tuning ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tuning {
    pub viewport: Viewport,
    /// Largest play area a resize may produce.
    pub max_viewport: Viewport,
    /// Host height kept free below the play area on narrow hosts.
    pub reserved_height: f32,

    // Ship
    pub ship_speed: f32,
    pub ship_width: f32,
    /// Distance from the viewport bottom to the ship's top edge.
    pub ship_offset: f32,
    /// Side of the square used for hits against the ship.
    pub hitbox_size: f32,
    /// Gap between the ship's top edge and a freshly fired projectile.
    pub muzzle_gap: f32,

    // Projectiles
    pub projectile_width: f32,
    pub projectile_height: f32,
    pub player_projectile_speed: f32,
    pub enemy_projectile_speed: f32,

    // Invaders
    pub invader_width: f32,
    pub invader_height: f32,
    /// Per-invader, per-tick probability of firing.
    pub fire_chance: f64,

    // Waves
    pub base_speed: f32,
    pub speed_increment: f32,
    pub initial_quota: u32,
    pub quota_step: u32,
    pub points_per_invader: u32,
    pub wave_delay_ms: u64,
    pub column_width: f32,
    pub row_height: f32,
    pub grid_margin: f32,
    pub grid_top: f32,

    /// Fraction of the play width claimed by each side touch zone.
    pub touch_zone_fraction: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            viewport: Viewport::new(800.0, 600.0),
            max_viewport: Viewport::new(800.0, 600.0),
            reserved_height: 100.0,

            ship_speed: 5.0,
            ship_width: 40.0,
            ship_offset: 40.0,
            hitbox_size: 30.0,
            muzzle_gap: 10.0,

            projectile_width: 5.0,
            projectile_height: 10.0,
            player_projectile_speed: 5.0,
            enemy_projectile_speed: 3.0,

            invader_width: 40.0,
            invader_height: 30.0,
            fire_chance: 0.01,

            base_speed: 1.0,
            speed_increment: 0.2,
            initial_quota: 3,
            quota_step: 10,
            points_per_invader: 100,
            wave_delay_ms: 1000,
            column_width: 80.0,
            row_height: 40.0,
            grid_margin: 50.0,
            grid_top: 50.0,

            touch_zone_fraction: 1.0 / 3.0,
        }
    }
}

impl Tuning {
    pub fn with_viewport(self, viewport: Viewport) -> Self {
        Self { viewport, ..self }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let Viewport { width, height } = self.viewport;
        if width <= 0.0 || height <= 0.0 {
            return Err(ConfigError::EmptyViewport { width, height });
        }
        if !(0.0..=1.0).contains(&self.fire_chance) {
            return Err(ConfigError::FireChanceOutOfRange(self.fire_chance));
        }
        if self.initial_quota == 0 {
            return Err(ConfigError::ZeroInitialQuota);
        }
        if self.quota_step == 0 {
            return Err(ConfigError::ZeroQuotaStep);
        }
        if self.speed_increment <= 0.0 {
            return Err(ConfigError::NonIncreasingSpeed(self.speed_increment));
        }
        if self.column_width <= 0.0 {
            return Err(ConfigError::EmptyColumn(self.column_width));
        }
        Ok(())
    }
}
