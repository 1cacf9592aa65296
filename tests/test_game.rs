mod support;

use wave_invaders::compute::{init_state, start};
use wave_invaders::config::Viewport;
use wave_invaders::display::{GAME_OVER, RESTART_PROMPT, START_PROMPT};
use wave_invaders::entities::*;
use wave_invaders::game::{FrameRequest, Game};
use wave_invaders::input::{InputEvent, Key};

use support::{quiet_tuning, seeded_rng, RecordingSurface};

fn press(game: &mut Game<rand::rngs::StdRng>, key: Key) {
    game.handle(InputEvent::KeyDown(key));
    game.handle(InputEvent::KeyUp(key));
}

/// A running session with an enemy shot sitting on the ship.
fn doomed() -> Session {
    let mut s = start(&init_state(quiet_tuning()));
    let t = s.tuning;
    let target = Vec2::new(s.ship.pos.x + 10.0, s.ship.pos.y);
    s.invaders[0].projectiles.push(Projectile::enemy(target, &t));
    s
}

// ── Start ─────────────────────────────────────────────────────────────────────

#[test]
fn new_game_waits_on_start_screen() {
    let mut game = Game::new(quiet_tuning(), seeded_rng());
    let mut surface = RecordingSurface::default();

    assert_eq!(game.lifecycle(), Lifecycle::NotStarted);
    assert!(!game.wants_frame());
    assert!(game.draw_idle(&mut surface).unwrap());
    assert_eq!(surface.texts(), vec![START_PROMPT]);

    // Already drawn, nothing stale
    assert!(!game.draw_idle(&mut surface).unwrap());
}

#[test]
fn frame_before_start_does_nothing() {
    let mut game = Game::new(quiet_tuning(), seeded_rng());
    let mut surface = RecordingSurface::default();
    assert_eq!(game.frame(0, &mut surface).unwrap(), FrameRequest::Halt);
    assert_eq!(game.state().frame, 0);
    assert!(surface.calls.is_empty());
}

#[test]
fn space_starts_without_firing() {
    let mut game = Game::new(quiet_tuning(), seeded_rng());
    press(&mut game, Key::Fire);
    assert_eq!(game.lifecycle(), Lifecycle::Running);
    assert!(game.wants_frame());
    assert!(game.state().ship.projectiles.is_empty());
}

#[test]
fn tap_anywhere_starts() {
    let mut game = Game::new(quiet_tuning(), seeded_rng());
    game.handle(InputEvent::TouchStart { x: 20.0, y: 300.0 });
    assert_eq!(game.lifecycle(), Lifecycle::Running);
}

// ── Running ───────────────────────────────────────────────────────────────────

#[test]
fn each_space_press_fires_once() {
    let mut game = Game::new(quiet_tuning(), seeded_rng());
    press(&mut game, Key::Fire); // start

    game.handle(InputEvent::KeyDown(Key::Fire));
    game.handle(InputEvent::KeyDown(Key::Fire)); // held, repeating
    assert_eq!(game.state().ship.projectiles.len(), 1);

    game.handle(InputEvent::KeyUp(Key::Fire));
    press(&mut game, Key::Fire);
    assert_eq!(game.state().ship.projectiles.len(), 2);
}

#[test]
fn frames_advance_with_sampled_input() {
    let mut game = Game::new(quiet_tuning(), seeded_rng());
    let mut surface = RecordingSurface::default();
    press(&mut game, Key::Fire);

    game.handle(InputEvent::KeyDown(Key::Left));
    assert_eq!(game.frame(0, &mut surface).unwrap(), FrameRequest::Next);
    assert_eq!(game.frame(16, &mut surface).unwrap(), FrameRequest::Next);
    assert_eq!(game.state().ship.pos.x, 390.0);
    assert_eq!(game.state().frame, 2);

    game.handle(InputEvent::KeyUp(Key::Left));
    game.frame(32, &mut surface).unwrap();
    assert_eq!(game.state().ship.pos.x, 390.0);
    assert_eq!(surface.presents(), 3);
}

#[test]
fn centre_tap_fires_and_side_tap_steers() {
    let mut game = Game::new(quiet_tuning(), seeded_rng());
    let mut surface = RecordingSurface::default();
    press(&mut game, Key::Fire);

    game.handle(InputEvent::TouchStart { x: 400.0, y: 500.0 });
    game.handle(InputEvent::TouchEnd);
    assert_eq!(game.state().ship.projectiles.len(), 1);

    game.handle(InputEvent::TouchStart { x: 780.0, y: 500.0 });
    game.frame(0, &mut surface).unwrap();
    assert_eq!(game.state().ship.pos.x, 405.0);
    assert_eq!(game.state().ship.projectiles.len(), 1);
}

#[test]
fn resize_marks_idle_screen_stale() {
    let mut game = Game::new(quiet_tuning(), seeded_rng());
    let mut surface = RecordingSurface::default();
    game.draw_idle(&mut surface).unwrap();

    game.resize(Viewport::new(600.0, 400.0));
    assert_eq!(game.state().tuning.viewport, Viewport::new(600.0, 400.0));
    assert!(game.draw_idle(&mut surface).unwrap());
}

// ── Game over & restart ───────────────────────────────────────────────────────

#[test]
fn hit_halts_the_loop() {
    let mut game = Game::from_session(doomed(), seeded_rng());
    let mut surface = RecordingSurface::default();

    assert_eq!(game.frame(0, &mut surface).unwrap(), FrameRequest::Halt);
    assert_eq!(game.lifecycle(), Lifecycle::Over);
    assert!(!game.wants_frame());
    let texts = surface.texts();
    assert!(texts.contains(&GAME_OVER));
    assert!(texts.contains(&RESTART_PROMPT));

    // No further advance until restart
    let frame = game.state().frame;
    let ship = game.state().ship.clone();
    game.handle(InputEvent::KeyDown(Key::Left));
    assert_eq!(game.frame(16, &mut surface).unwrap(), FrameRequest::Halt);
    assert_eq!(game.frame(32, &mut surface).unwrap(), FrameRequest::Halt);
    assert_eq!(game.state().frame, frame);
    assert_eq!(game.state().ship, ship);
}

#[test]
fn game_over_overlay_is_not_redrawn_by_idle() {
    let mut game = Game::from_session(doomed(), seeded_rng());
    let mut surface = RecordingSurface::default();
    game.frame(0, &mut surface).unwrap();
    assert!(!game.draw_idle(&mut surface).unwrap());
}

#[test]
fn restart_resets_to_start_screen() {
    let mut game = Game::from_session(doomed(), seeded_rng());
    let mut surface = RecordingSurface::default();
    game.frame(0, &mut surface).unwrap();

    press(&mut game, Key::Fire);

    assert_eq!(game.lifecycle(), Lifecycle::NotStarted);
    assert_eq!(*game.state(), init_state(quiet_tuning()));
    assert!(game.draw_idle(&mut surface).unwrap());
    assert_eq!(surface.texts().last(), Some(&START_PROMPT));
}

#[test]
fn reset_twice_gives_the_same_state() {
    let mut game = Game::from_session(doomed(), seeded_rng());
    game.reset();
    let first = game.state().clone();
    game.reset();
    assert_eq!(*game.state(), first);
    assert_eq!(first.score, 0);
    assert_eq!(first.wave, 1);
    assert_eq!(first.quota, 3);
    assert_eq!(first.invaders.len(), 3);
}

#[test]
fn pending_wave_does_not_revive_a_finished_game() {
    let mut s = doomed();
    // Clear the field except the shooter, so the wave is about to end
    s.invaders.truncate(1);
    s.invaders[0].pos = Vec2::new(300.0, 100.0);
    s.phase = WavePhase::Clearing { deadline_ms: 0 };
    let mut game = Game::from_session(s, seeded_rng());
    let mut surface = RecordingSurface::default();

    game.frame(10, &mut surface).unwrap();
    assert_eq!(game.lifecycle(), Lifecycle::Over);
    assert_eq!(game.state().wave, 1);
}
