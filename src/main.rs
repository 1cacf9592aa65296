use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, KeyboardEnhancementFlags, MouseButton, MouseEvent, MouseEventKind,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use wave_invaders::config::{Tuning, Viewport};
use wave_invaders::display::terminal::TerminalSurface;
use wave_invaders::game::Game;
use wave_invaders::input::{InputEvent, Key};

/// Pixels represented by one terminal cell when sizing the play area.
const CELL_WIDTH: f32 = 8.0;
const CELL_HEIGHT: f32 = 16.0;

/// A key is considered "held" if its last press/repeat event arrived within
/// this window.  Covers terminals that don't emit key-release events: the OS
/// key-repeat rate is ≥ 15 Hz, so the window is refreshed before expiry.
const HOLD_WINDOW: Duration = Duration::from_millis(133);

/// Fire only needs a release to re-arm, so its window has to outlast the OS
/// key-repeat delay (up to ~600 ms); otherwise holding Space would re-fire
/// on the first repeat.
const FIRE_HOLD_WINDOW: Duration = Duration::from_millis(650);

fn hold_window(key: Key) -> Duration {
    match key {
        Key::Fire => FIRE_HOLD_WINDOW,
        Key::Left | Key::Right => HOLD_WINDOW,
    }
}

#[derive(Parser, Debug)]
#[command(name = "wave_invaders", about = "Terminal wave shooter")]
struct Args {
    /// Seed for enemy fire; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Frames per second
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Per-invader, per-frame chance of firing
    #[arg(long)]
    fire_chance: Option<f64>,

    /// Pause between a cleared wave and the next one, in milliseconds
    #[arg(long)]
    wave_delay_ms: Option<u64>,

    /// Write logs here (the terminal is busy drawing the game)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_tracing(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("cannot create log file {}", path.display()))?;
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file));
    if json {
        builder.json().init();
    } else {
        builder.compact().init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
    Ok(())
}

fn tuning_from(args: &Args, viewport: Viewport) -> Result<Tuning> {
    let defaults = Tuning::default();
    let tuning = Tuning {
        fire_chance: args.fire_chance.unwrap_or(defaults.fire_chance),
        wave_delay_ms: args.wave_delay_ms.unwrap_or(defaults.wave_delay_ms),
        ..defaults
    }
    .with_viewport(viewport);
    tuning.validate().context("invalid tuning")?;
    Ok(tuning)
}

fn viewport_for(cols: u16, rows: u16) -> Viewport {
    Viewport::fit(
        cols as f32 * CELL_WIDTH,
        rows as f32 * CELL_HEIGHT,
        &Tuning::default(),
    )
}

fn key_of(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Key::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Key::Right),
        KeyCode::Char(' ') => Some(Key::Fire),
        _ => None,
    }
}

fn is_quit(code: KeyCode, modifiers: KeyModifiers) -> bool {
    match code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => true,
        KeyCode::Char('c') => modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Input model: key presses are folded into the game as they arrive.  Keys
/// last seen within their `hold_window` count as held; on terminals without
/// release events a `KeyUp` is synthesised once a key goes quiet.
fn run<W: Write>(
    surface: &mut TerminalSurface<W>,
    game: &mut Game<StdRng>,
    rx: &mpsc::Receiver<Event>,
    frame_interval: Duration,
    release_events: bool,
) -> Result<()> {
    let clock = Instant::now();
    let mut last_seen: HashMap<Key, Instant> = HashMap::new();
    let (mut cols, mut rows) = terminal::size().context("terminal size unavailable")?;

    loop {
        let frame_start = Instant::now();

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            match ev {
                Event::Key(KeyEvent { code, kind, modifiers, .. }) => {
                    if kind == KeyEventKind::Press && is_quit(code, modifiers) {
                        return Ok(());
                    }
                    let Some(key) = key_of(code) else { continue };
                    match kind {
                        KeyEventKind::Press => {
                            last_seen.insert(key, frame_start);
                            game.handle(InputEvent::KeyDown(key));
                        }
                        // Repeat: refresh timestamp so the key stays held
                        KeyEventKind::Repeat => {
                            last_seen.insert(key, frame_start);
                        }
                        KeyEventKind::Release => {
                            last_seen.remove(&key);
                            game.handle(InputEvent::KeyUp(key));
                        }
                    }
                }
                Event::Mouse(MouseEvent { kind, column, row, .. }) => {
                    let viewport = game.state().tuning.viewport;
                    match kind {
                        MouseEventKind::Down(MouseButton::Left) => {
                            game.handle(InputEvent::TouchStart {
                                x: column as f32 / cols as f32 * viewport.width,
                                y: row as f32 / rows as f32 * viewport.height,
                            });
                        }
                        MouseEventKind::Up(MouseButton::Left) => {
                            game.handle(InputEvent::TouchEnd);
                        }
                        _ => {}
                    }
                }
                Event::Resize(new_cols, new_rows) => {
                    cols = new_cols;
                    rows = new_rows;
                    let viewport = viewport_for(cols, rows);
                    info!(cols, rows, width = viewport.width, height = viewport.height, "resize");
                    surface.resize(cols, rows, viewport);
                    game.resize(viewport);
                }
                _ => {}
            }
        }

        if !release_events {
            let expired: Vec<Key> = last_seen
                .iter()
                .filter(|(&key, &seen)| frame_start.duration_since(seen) > hold_window(key))
                .map(|(&key, _)| key)
                .collect();
            for key in expired {
                last_seen.remove(&key);
                game.handle(InputEvent::KeyUp(key));
            }
        }

        if game.wants_frame() {
            game.frame(clock.elapsed().as_millis() as u64, surface)?;
        } else {
            game.draw_idle(surface)?;
        }

        let elapsed = frame_start.elapsed();
        if elapsed < frame_interval {
            thread::sleep(frame_interval - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(path) = &args.log_file {
        init_tracing(path)?;
    }

    let (cols, rows) = terminal::size().context("terminal size unavailable")?;
    let viewport = viewport_for(cols, rows);
    let tuning = tuning_from(&args, viewport)?;
    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut game = Game::new(tuning, rng);
    let frame_interval = Duration::from_millis(1000 / u64::from(args.fps.max(1)));

    let mut out = BufWriter::new(stdout());
    terminal::enable_raw_mode().context("cannot enable raw mode")?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back to the hold windows.
    let release_events = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break; // receiver dropped → program exiting
            }
        }
    });

    info!(?viewport, seed = ?args.seed, release_events, "starting");
    let mut surface = TerminalSurface::new(out, cols, rows, viewport);
    let result = run(&mut surface, &mut game, &rx, frame_interval, release_events);
    let mut out = surface.into_inner();

    // Always restore the terminal
    if release_events {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    info!(score = game.state().score, wave = game.state().wave, "exiting");
    result
}
