//! Terminal match-3 runner (default binary).
//!
//! Drives the engine at a fixed tick, maps keys to cursor actions and renders
//! board snapshots through the diffing framebuffer renderer.
//!
//! Environment:
//! - `MATCH3_LEVEL`: path to a level JSON file (built-in level otherwise)
//! - `MATCH3_SEED`: overrides the level seed
//! - `MATCH3_LOG_PATH`: write logs to this file (no logging when unset)
//! - `MATCH3_LOG_LEVEL`: `error|warn|info|debug|trace` (default `info`)

use std::fs::File;
use std::str::FromStr;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use tracing::{debug, info, Level};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;

use tui_match3::core::{BoardEvent, BoardSnapshot, GameState, LevelConfig};
use tui_match3::input::{handle_key_event, should_quit, CursorOutcome, SelectionCursor};
use tui_match3::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};
use tui_match3::types::TICK_MS;

fn main() -> Result<()> {
    init_logging()?;
    let config = load_level()?;
    let mut game = GameState::from_level(config).context("invalid level")?;
    info!(seed = game.config().seed, "starting session");

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &mut game);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn init_logging() -> Result<()> {
    let Ok(path) = std::env::var("MATCH3_LOG_PATH") else {
        return Ok(());
    };
    let level = std::env::var("MATCH3_LOG_LEVEL")
        .ok()
        .and_then(|s| Level::from_str(&s).ok())
        .unwrap_or(Level::INFO);
    let file = File::create(&path).with_context(|| format!("cannot open log file {path}"))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(Mutex::new(file)),
        )
        .with(LevelFilter::from_level(level))
        .init();
    Ok(())
}

fn load_level() -> Result<LevelConfig> {
    let mut config = match std::env::var("MATCH3_LEVEL") {
        Ok(path) => LevelConfig::load(&path).with_context(|| format!("cannot load level {path}"))?,
        Err(_) => LevelConfig::default(),
    };
    if let Ok(seed) = std::env::var("MATCH3_SEED") {
        config.seed = seed
            .parse()
            .with_context(|| format!("MATCH3_SEED is not a number: {seed}"))?;
    }
    Ok(config)
}

fn run(term: &mut TerminalRenderer, game: &mut GameState) -> Result<()> {
    let view = GameView::default();
    let mut cursor = SelectionCursor::new(game.grid().width(), game.grid().height());
    let mut snap = BoardSnapshot::default();
    let mut fb = FrameBuffer::new(0, 0);

    let mut last_tick = Instant::now();
    let tick_duration = Duration::from_millis(TICK_MS as u64);

    loop {
        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        game.snapshot_into(&mut snap);
        view.render_into(&snap, Some(cursor.position()), Viewport::new(w, h), &mut fb);
        term.draw_swap(&mut fb)?;

        // Input with timeout until next tick.
        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if should_quit(key) {
                        return Ok(());
                    }
                    if let Some(action) = handle_key_event(key) {
                        let outcome = cursor.apply(action, game);
                        if outcome == CursorOutcome::Restarted {
                            info!(moves = game.moves_left(), "session restarted");
                        }
                    }
                }
                Event::Resize(_, _) => term.invalidate(),
                _ => {}
            }
        }

        // Tick.
        if last_tick.elapsed() >= tick_duration {
            last_tick = Instant::now();
            game.tick(TICK_MS);
            for event in game.drain_events() {
                log_event(&event);
            }
        }
    }
}

fn log_event(event: &BoardEvent) {
    match event {
        BoardEvent::SessionEnded { outcome } => info!(?outcome, "session ended"),
        BoardEvent::SwapRejected { .. } | BoardEvent::BombTriggered { .. } => debug!(?event),
        _ => tracing::trace!(?event),
    }
}
