//! Terminal Flappy Bird (default binary).
//!
//! Runs the glyph engine in 2D mode, rasterizes every frame into a terminal
//! framebuffer and flushes it through crossterm. Logs go to the file named by
//! `FLAPPY_LOG_PATH`; without it nothing is logged, since stdout is the
//! game screen.

use std::fs::File;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event};
use tracing_subscriber::EnvFilter;

use flappy_ascii::core::{EngineConfig, GlyphEngine};
use flappy_ascii::game::{Control, Game, GameConfig};
use flappy_ascii::input::{handle_key_event, should_quit};
use flappy_ascii::term::{GlyphCanvas, TerminalRenderer};
use flappy_ascii::types::{Color, RenderMode};

fn main() -> Result<()> {
    let config = GameConfig::from_env();
    init_logging(&config)?;

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &config);

    // Always try to restore terminal state.
    let _ = term.exit();
    if let Err(err) = &result {
        tracing::error!(error = %err, "game aborted");
    }
    result
}

fn init_logging(config: &GameConfig) -> Result<()> {
    let Some(path) = &config.log_path else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn run(term: &mut TerminalRenderer, config: &GameConfig) -> Result<()> {
    let mut engine = GlyphEngine::with_mode(EngineConfig::from_env(), RenderMode::TwoD)?;
    let mut game = Game::new(&mut engine, config)?;

    let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
    let mut canvas = GlyphCanvas::new(w, h);

    let frame = Duration::from_millis(config.frame_ms as u64);
    let mut last_tick = Instant::now();
    tracing::info!(seed = config.seed, frame_ms = config.frame_ms, "game started");

    loop {
        // Render.
        game.draw(&mut engine, &mut canvas)?;
        if let Some(boxes) = game.hitboxes() {
            for rect in boxes {
                canvas.outline(rect.x, rect.y, rect.w, rect.h, '.', Color::RED);
            }
        }
        term.present(canvas.framebuffer())?;

        // Input with timeout until next tick.
        let timeout = frame.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    if should_quit(key) {
                        return Ok(());
                    }
                    if let Some(action) = handle_key_event(key) {
                        if game.handle_action(&mut engine, action)? == Control::Exit {
                            return Ok(());
                        }
                    }
                }
                Event::Resize(w, h) => {
                    canvas.resize(w, h);
                    term.invalidate();
                }
                _ => {}
            }
        }

        // Tick with the time that actually passed.
        let elapsed = last_tick.elapsed();
        if elapsed >= frame {
            last_tick = Instant::now();
            game.tick(&mut engine, elapsed.as_millis() as u32)?;
        }
    }
}
