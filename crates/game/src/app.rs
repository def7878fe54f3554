//! Game flow: start screen, playing, game over.

use crate::config::GameConfig;
use crate::core::{GlyphEngine, GlyphSink, Result};
use crate::scene::{draw_text, draw_text_centered, score_label, Scene, GLYPH_ADVANCE};
use crate::types::{Color, GameAction};
use crate::world::{Rect, Step, World};

pub const TITLE: &str = "FLAPPY BIRD";
pub const TITLE_POS: (f32, f32) = (77.0, 200.0);
pub const TITLE_SCALE: f32 = 1.6;
pub const GAME_OVER: &str = "GAME OVER";
pub const GAME_OVER_POS: (f32, f32) = (64.0, 160.0);
pub const GAME_OVER_SCALE: f32 = 2.0;

/// Time between two highlight sweeps over a heading.
pub const SWEEP_PAUSE_MS: u32 = 1200;
/// Time each letter stays highlighted during a sweep.
pub const SWEEP_STEP_MS: u32 = 30;
const SWEEP_STEPS: u32 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Start,
    Playing,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Exit,
}

/// A white highlight running over a gold heading, one letter at a time.
#[derive(Debug, Clone, Copy, Default)]
struct Sweep {
    ms: u32,
}

impl Sweep {
    fn new() -> Self {
        Self {
            ms: SWEEP_PAUSE_MS * 2 / 3,
        }
    }

    fn advance(&mut self, dt_ms: u32) {
        self.ms += dt_ms;
        if self.ms >= SWEEP_PAUSE_MS + SWEEP_STEP_MS * SWEEP_STEPS {
            self.ms = 0;
        }
    }

    fn highlighted(&self) -> Option<usize> {
        self.ms
            .checked_sub(SWEEP_PAUSE_MS)
            .map(|t| (t / SWEEP_STEP_MS) as usize)
    }
}

pub struct Game {
    phase: Phase,
    world: World,
    scene: Scene,
    sweep: Sweep,
    show_hitboxes: bool,
    final_score: u32,
}

impl Game {
    pub fn new(engine: &mut GlyphEngine, config: &GameConfig) -> Result<Self> {
        Ok(Self {
            phase: Phase::Start,
            world: World::new(config.seed),
            scene: Scene::new(engine)?,
            sweep: Sweep::new(),
            show_hitboxes: false,
            final_score: 0,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn final_score(&self) -> u32 {
        self.final_score
    }

    pub fn show_hitboxes(&self) -> bool {
        self.show_hitboxes
    }

    /// Collision boxes to outline, when enabled and a run is on screen.
    pub fn hitboxes(&self) -> Option<impl Iterator<Item = Rect> + '_> {
        (self.show_hitboxes && self.phase == Phase::Playing).then(|| self.world.hitboxes())
    }

    pub fn handle_action(&mut self, engine: &mut GlyphEngine, action: GameAction) -> Result<Control> {
        tracing::debug!(action = action.as_str(), phase = ?self.phase, "action");
        match (action, self.phase) {
            (GameAction::Confirm, Phase::Start) => self.phase = Phase::Playing,
            (GameAction::Confirm, Phase::GameOver) => return Ok(Control::Exit),
            (GameAction::Flap, Phase::Playing) => {
                self.world.flap();
                self.scene.start_wing_flap(engine)?;
            }
            (GameAction::Reset, _) => self.restart(engine)?,
            (GameAction::ToggleHitboxes, _) => self.show_hitboxes = !self.show_hitboxes,
            _ => {}
        }
        Ok(Control::Continue)
    }

    /// Rebuild the scene from an empty engine and start a fresh run.
    fn restart(&mut self, engine: &mut GlyphEngine) -> Result<()> {
        engine.reset_all()?;
        self.scene = Scene::new(engine)?;
        self.world.reset();
        self.sweep = Sweep::new();
        self.phase = Phase::Playing;
        tracing::info!("run restarted");
        Ok(())
    }

    /// Advance by `dt_ms` milliseconds.
    pub fn tick(&mut self, engine: &mut GlyphEngine, dt_ms: u32) -> Result<()> {
        match self.phase {
            Phase::Start | Phase::GameOver => self.sweep.advance(dt_ms),
            Phase::Playing => {
                self.scene.update(engine, dt_ms)?;
                if self.world.step(dt_ms) == Step::Crashed {
                    self.final_score = self.world.score();
                    self.phase = Phase::GameOver;
                    self.sweep = Sweep::new();
                    tracing::info!(score = self.final_score, "game over");
                }
            }
        }
        Ok(())
    }

    pub fn draw<S: GlyphSink + ?Sized>(&self, engine: &mut GlyphEngine, sink: &mut S) -> Result<()> {
        match self.phase {
            Phase::Playing => return self.scene.draw(engine, &self.world, sink),
            Phase::Start => {
                engine.render_frame(sink, Color::BLACK, true, false)?;
                let (x, y) = TITLE_POS;
                draw_heading(sink, TITLE, x, y, TITLE_SCALE, self.sweep.highlighted());
                draw_text_centered(sink, "- press [ENTER] to start! -", 480.0, 0.5, Color::PURPLE);
            }
            Phase::GameOver => {
                engine.render_frame(sink, Color::BLACK, true, false)?;
                let (x, y) = GAME_OVER_POS;
                draw_heading(sink, GAME_OVER, x, y, GAME_OVER_SCALE, self.sweep.highlighted());
                draw_text_centered(sink, &score_label(self.final_score), 384.0, 1.0, Color::PURPLE);
                draw_text_centered(sink, "- press [ENTER] to exit -", 544.0, 0.25, Color::BLUE);
                draw_text_centered(sink, "- press [R] to reset -", 584.0, 0.25, Color::BLUE);
            }
        }
        Ok(())
    }
}

fn draw_heading<S: GlyphSink + ?Sized>(
    sink: &mut S,
    text: &str,
    x: f32,
    y: f32,
    scale: f32,
    highlighted: Option<usize>,
) {
    let advance = GLYPH_ADVANCE * scale;
    for (i, (at, ch)) in text.char_indices().enumerate() {
        let color = if highlighted == Some(i) {
            Color::WHITE
        } else {
            Color::GOLD
        };
        let letter = &text[at..at + ch.len_utf8()];
        draw_text(sink, letter, x + i as f32 * advance, y, scale, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RecordingSink;
    use crate::test_support::engine_2d;
    use crate::types::GlyphId;

    fn setup() -> (GlyphEngine, Game) {
        let mut engine = engine_2d();
        let config = GameConfig {
            seed: 9,
            ..GameConfig::default()
        };
        let game = Game::new(&mut engine, &config).unwrap();
        (engine, game)
    }

    #[test]
    fn test_confirm_starts_then_exits() {
        let (mut engine, mut game) = setup();
        assert_eq!(game.phase(), Phase::Start);

        // Flapping on the start screen does nothing.
        game.handle_action(&mut engine, GameAction::Flap).unwrap();
        assert_eq!(game.phase(), Phase::Start);

        let control = game.handle_action(&mut engine, GameAction::Confirm).unwrap();
        assert_eq!(control, Control::Continue);
        assert_eq!(game.phase(), Phase::Playing);

        // Fall until the run ends.
        for _ in 0..1000 {
            game.tick(&mut engine, 10).unwrap();
            if game.phase() == Phase::GameOver {
                break;
            }
        }
        assert_eq!(game.phase(), Phase::GameOver);
        assert!(game.final_score() >= 100);
        let control = game.handle_action(&mut engine, GameAction::Confirm).unwrap();
        assert_eq!(control, Control::Exit);
    }

    #[test]
    fn test_reset_starts_a_fresh_run() {
        let (mut engine, mut game) = setup();
        game.handle_action(&mut engine, GameAction::Confirm).unwrap();
        game.tick(&mut engine, 500).unwrap();
        game.handle_action(&mut engine, GameAction::Reset).unwrap();

        assert_eq!(game.phase(), Phase::Playing);
        assert_eq!(game.world().score(), 100);
        assert_eq!(engine.stats().objects, 4);
    }

    #[test]
    fn test_hitboxes_only_while_playing() {
        let (mut engine, mut game) = setup();
        game.handle_action(&mut engine, GameAction::ToggleHitboxes).unwrap();
        assert!(game.show_hitboxes());
        assert!(game.hitboxes().is_none());

        game.handle_action(&mut engine, GameAction::Confirm).unwrap();
        assert_eq!(game.hitboxes().map(|boxes| boxes.count()), Some(7));
    }

    #[test]
    fn test_start_screen_text() {
        let (mut engine, game) = setup();
        let mut sink = RecordingSink::new();
        game.draw(&mut engine, &mut sink).unwrap();

        let title: Vec<GlyphId> = sink.glyphs().into_iter().take(10).collect();
        let expected: Vec<GlyphId> = "FLAPPYBIRD".bytes().map(GlyphId::from).collect();
        assert_eq!(title, expected);
        assert_eq!(sink.draws[0].x, 77);
        assert_eq!(sink.draws[0].y, 200);
    }

    #[test]
    fn test_sweep_highlights_one_letter_at_a_time() {
        let mut sweep = Sweep::new();
        assert_eq!(sweep.highlighted(), None);
        sweep.advance(SWEEP_PAUSE_MS - sweep.ms);
        assert_eq!(sweep.highlighted(), Some(0));
        sweep.advance(SWEEP_STEP_MS);
        assert_eq!(sweep.highlighted(), Some(1));
        sweep.advance(SWEEP_STEP_MS * (SWEEP_STEPS - 1));
        assert_eq!(sweep.ms, 0);
    }
}
