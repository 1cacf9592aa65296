//! Wave manager: grid spawning, per-wave speed, and the deferred transition
//! between waves.
//!
//! Phases run `Spawning → Active → Clearing → Spawning(next)`.  Spawning is
//! instantaneous (`spawn_wave`), so only `Active` and `Clearing` are stored.
//! The transition delay is a deadline polled every tick rather than a timer
//! callback.

use tracing::{debug, info};

use crate::config::Tuning;
use crate::entities::{Invader, Lifecycle, Session, Vec2, WavePhase};

/// Number of grid columns that fit the current viewport (at least one).
pub fn columns_for(tuning: &Tuning) -> u32 {
    let usable = tuning.viewport.width - 2.0 * tuning.grid_margin;
    ((usable / tuning.column_width).floor() as u32).max(1)
}

/// Number of grid rows needed for `quota` invaders.
pub fn rows_for(quota: u32, tuning: &Tuning) -> u32 {
    quota.div_ceil(columns_for(tuning))
}

/// Horizontal speed shared by every invader of `wave`.
pub fn wave_speed(wave: u32, tuning: &Tuning) -> f32 {
    tuning.base_speed + wave as f32 * tuning.speed_increment
}

/// Grid slot of the `index`-th invader.  On viewports too narrow for the
/// margin the slot is pulled left so the invader still fits.
pub fn grid_position(index: u32, tuning: &Tuning) -> Vec2 {
    let columns = columns_for(tuning);
    let col = index % columns;
    let row = index / columns;
    let max_x = (tuning.viewport.width - tuning.invader_width).max(0.0);
    Vec2::new(
        (tuning.grid_margin + col as f32 * tuning.column_width).min(max_x),
        tuning.grid_top + row as f32 * tuning.row_height,
    )
}

/// Spawn `quota` invaders for `wave`, laid out row-major across the grid.
pub fn spawn_wave(wave: u32, quota: u32, tuning: &Tuning) -> Vec<Invader> {
    let speed = wave_speed(wave, tuning);
    debug!(
        wave,
        quota,
        columns = columns_for(tuning),
        rows = rows_for(quota, tuning),
        "spawning grid"
    );
    (0..quota)
        .map(|i| Invader::new(grid_position(i, tuning), speed, tuning))
        .collect()
}

/// What `check_transition` did this tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WaveEvent {
    Idle,
    /// The field just emptied; the next wave is due at `deadline_ms`.
    Scheduled { deadline_ms: u64 },
    Spawned { wave: u32, quota: u32 },
    /// The deadline passed after the session stopped running.
    Dropped,
}

/// Advance the wave state machine at time `now_ms`.
///
/// An empty field schedules exactly one transition; further empty ticks
/// during the delay are ignored.  When the deadline fires the session must
/// still be running, otherwise the transition is discarded.
pub fn check_transition(state: &mut Session, now_ms: u64) -> WaveEvent {
    match state.phase {
        WavePhase::Active => {
            if !state.invaders.is_empty() {
                return WaveEvent::Idle;
            }
            let deadline_ms = now_ms + state.tuning.wave_delay_ms;
            state.phase = WavePhase::Clearing { deadline_ms };
            info!(wave = state.wave, deadline_ms, "wave cleared");
            WaveEvent::Scheduled { deadline_ms }
        }
        WavePhase::Clearing { deadline_ms } => {
            if now_ms < deadline_ms {
                return WaveEvent::Idle;
            }
            state.phase = WavePhase::Active;
            if state.lifecycle != Lifecycle::Running {
                info!(wave = state.wave, "pending wave dropped, session not running");
                return WaveEvent::Dropped;
            }
            state.wave += 1;
            state.quota += state.tuning.quota_step;
            state.invaders = spawn_wave(state.wave, state.quota, &state.tuning);
            info!(
                wave = state.wave,
                quota = state.quota,
                speed = wave_speed(state.wave, &state.tuning),
                "wave spawned"
            );
            WaveEvent::Spawned {
                wave: state.wave,
                quota: state.quota,
            }
        }
    }
}
