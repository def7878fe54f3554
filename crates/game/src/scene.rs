//! Scene: turns the world into glyph draws.
//!
//! The bird and the three pipe pieces are created once as template objects
//! and hidden, so the automatic staging pass of `render_frame` skips them.
//! Each frame the templates are moved through their object offsets and drawn
//! directly, the pipe section once per 16px step of pipe body. A full pipe
//! field is larger than the staging buffer, so direct drawing is the only way
//! to get every section on screen.

use std::fmt::Write;

use arrayvec::ArrayString;

use crate::core::{Glyph2, GlyphEngine, GlyphSink, ObjectHandle, Result};
use crate::shapes::{
    BIRD, BIRD_WING_LOWER, BIRD_WING_UPPER, PIPE_HEAD_BOTTOM, PIPE_HEAD_TOP, PIPE_SECTION,
    WING_FLAP_Y, WING_REST_Y,
};
use crate::types::{Color, GlyphId, Vec2, GLYPH_ID_MIN, WORLD_HEIGHT, WORLD_WIDTH};
use crate::world::{Rect, World};

/// Glyph bitmap width in pixels at scale 1.
pub const GLYPH_ADVANCE: f32 = 64.0;
/// How long the wings stay down after a flap.
pub const WING_FLAP_MS: u32 = 350;
/// Vertical step between pipe sections.
pub const SECTION_STEP: f32 = 16.0;
/// Height of the cap drawn at the lower end of a top pipe.
const HEAD_BOTTOM_HEIGHT: f32 = 48.0;

pub const HUD_POS: Vec2 = Vec2::new(23.0, 23.0);
pub const FPS_POS: Vec2 = Vec2::new(1070.0, 23.0);
pub const HUD_SCALE: f32 = 0.25;

pub struct Scene {
    bird: ObjectHandle,
    head_top: ObjectHandle,
    head_bottom: ObjectHandle,
    section: ObjectHandle,
    /// Time since the last flap while the wings are down.
    wing_ms: Option<u32>,
    /// Length of the last simulated frame.
    frame_ms: u32,
}

impl Scene {
    /// Create the template objects. The engine must be in 2D mode.
    pub fn new(engine: &mut GlyphEngine) -> Result<Self> {
        let bird = engine.create_object_from_info(&BIRD)?;
        let head_top = engine.create_object_from_info(&PIPE_HEAD_TOP)?;
        let head_bottom = engine.create_object_from_info(&PIPE_HEAD_BOTTOM)?;
        let section = engine.create_object_from_info(&PIPE_SECTION)?;
        for handle in [bird, head_top, head_bottom, section] {
            engine.set_object_visible(handle, false)?;
        }
        tracing::debug!("scene objects created");
        Ok(Self {
            bird,
            head_top,
            head_bottom,
            section,
            wing_ms: None,
            frame_ms: 0,
        })
    }

    pub fn bird(&self) -> ObjectHandle {
        self.bird
    }

    pub fn is_flapping(&self) -> bool {
        self.wing_ms.is_some()
    }

    /// Lower the wings, unless they are already down.
    pub fn start_wing_flap(&mut self, engine: &mut GlyphEngine) -> Result<()> {
        if self.wing_ms.is_some() {
            return Ok(());
        }
        self.set_wings(engine, WING_FLAP_Y)?;
        self.wing_ms = Some(0);
        Ok(())
    }

    /// Advance the wing animation and remember the frame time for the HUD.
    pub fn update(&mut self, engine: &mut GlyphEngine, dt_ms: u32) -> Result<()> {
        self.frame_ms = dt_ms;
        let Some(elapsed) = self.wing_ms.as_mut() else {
            return Ok(());
        };
        *elapsed += dt_ms;
        if *elapsed >= WING_FLAP_MS {
            self.wing_ms = None;
            self.set_wings(engine, WING_REST_Y)?;
        }
        Ok(())
    }

    fn set_wings(&self, engine: &mut GlyphEngine, (upper, lower): (f32, f32)) -> Result<()> {
        let glyphs = engine.object_glyphs_mut::<Glyph2>(self.bird)?;
        if let Some(glyph) = glyphs.get_mut(BIRD_WING_UPPER) {
            glyph.pos.y = upper;
        }
        if let Some(glyph) = glyphs.get_mut(BIRD_WING_LOWER) {
            glyph.pos.y = lower;
        }
        Ok(())
    }

    /// Draw a playing frame: pipes, then the bird, then score and frame rate.
    pub fn draw<S: GlyphSink + ?Sized>(
        &self,
        engine: &mut GlyphEngine,
        world: &World,
        sink: &mut S,
    ) -> Result<()> {
        engine.render_frame(sink, Color::BLACK, true, false)?;

        for pair in world.pipes() {
            self.draw_pipe(engine, pair.top, sink)?;
            self.draw_pipe(engine, pair.bottom, sink)?;
        }

        let bird = world.bird();
        self.draw_at(engine, self.bird, bird.x, bird.y, sink)?;

        draw_text(sink, &score_label(world.score()), HUD_POS.x, HUD_POS.y, HUD_SCALE, Color::WHITE);
        draw_text(sink, &fps_label(self.frame_ms), FPS_POS.x, FPS_POS.y, HUD_SCALE, Color::WHITE);
        Ok(())
    }

    fn draw_pipe<S: GlyphSink + ?Sized>(
        &self,
        engine: &mut GlyphEngine,
        pipe: Rect,
        sink: &mut S,
    ) -> Result<()> {
        let end = pipe.y + pipe.h;
        if pipe.y < (WORLD_HEIGHT / 2) as f32 {
            // Top pipe: cap at its lower end, sections stacked upwards.
            self.draw_at(engine, self.head_bottom, pipe.x, end - HEAD_BOTTOM_HEIGHT, sink)?;
            let mut y = end - 121.0;
            for _ in 0..section_count((end - 126.0) / SECTION_STEP + 5.0) {
                y -= SECTION_STEP;
                self.draw_at(engine, self.section, pipe.x, y, sink)?;
            }
        } else {
            // Bottom pipe: cap at its upper end, sections down to the floor.
            self.draw_at(engine, self.head_top, pipe.x, pipe.y, sink)?;
            let mut y = pipe.y;
            for _ in 0..section_count((WORLD_HEIGHT as f32 - pipe.y) / SECTION_STEP - 3.0) {
                self.draw_at(engine, self.section, pipe.x, y, sink)?;
                y += SECTION_STEP;
            }
        }
        Ok(())
    }

    fn draw_at<S: GlyphSink + ?Sized>(
        &self,
        engine: &mut GlyphEngine,
        handle: ObjectHandle,
        x: f32,
        y: f32,
        sink: &mut S,
    ) -> Result<()> {
        engine.set_object_offset(handle, Vec2::new(x, y))?;
        engine.draw_object_direct(handle, sink)?;
        Ok(())
    }
}

fn section_count(n: f32) -> usize {
    n.round().max(0.0) as usize
}

/// Draw `text` one glyph per character, left to right from `(x, y)`.
/// Spaces and control characters advance without drawing.
pub fn draw_text<S: GlyphSink + ?Sized>(
    sink: &mut S,
    text: &str,
    x: f32,
    y: f32,
    scale: f32,
    color: Color,
) {
    let advance = GLYPH_ADVANCE * scale;
    for (i, ch) in text.chars().enumerate() {
        let id = ch as u32;
        if ch == ' ' || id < GLYPH_ID_MIN as u32 || id > GlyphId::MAX as u32 {
            continue;
        }
        let gx = (x + i as f32 * advance).round() as i32;
        sink.draw_glyph(gx, y.round() as i32, scale, color, id as GlyphId);
    }
}

/// X coordinate that centers `len` glyphs at `scale` horizontally.
pub fn centered_x(len: usize, scale: f32) -> f32 {
    (WORLD_WIDTH as f32 - len as f32 * GLYPH_ADVANCE * scale) / 2.0
}

/// Same as [`draw_text`], centered horizontally.
pub fn draw_text_centered<S: GlyphSink + ?Sized>(
    sink: &mut S,
    text: &str,
    y: f32,
    scale: f32,
    color: Color,
) {
    let x = centered_x(text.chars().count(), scale);
    draw_text(sink, text, x, y, scale, color);
}

/// `Score: NNNNN` label.
pub fn score_label(score: u32) -> ArrayString<24> {
    let mut label = ArrayString::new();
    // Fits for every u32.
    let _ = write!(label, "Score: {score:5}");
    label
}

/// `FPS: N.NN` label for a frame of `frame_ms` milliseconds. Zero-length
/// frames show `0.00`.
pub fn fps_label(frame_ms: u32) -> ArrayString<24> {
    let fps = if frame_ms == 0 {
        0.0
    } else {
        1000.0 / frame_ms as f32
    };
    let mut label = ArrayString::new();
    let _ = write!(label, "FPS: {fps:.2}");
    label
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RecordingSink;
    use crate::test_support::engine_2d as engine;

    #[test]
    fn test_templates_are_hidden() {
        let mut engine = engine();
        let _scene = Scene::new(&mut engine).unwrap();
        let mut sink = RecordingSink::new();
        let stats = engine.render_frame(&mut sink, Color::BLACK, true, false).unwrap();
        assert_eq!(stats.drawn, 0);
        assert_eq!(sink.clears, vec![Color::BLACK]);
    }

    #[test]
    fn test_draw_puts_bird_at_world_position() {
        let mut engine = engine();
        let scene = Scene::new(&mut engine).unwrap();
        let world = World::new(7);
        let mut sink = RecordingSink::new();
        scene.draw(&mut engine, &world, &mut sink).unwrap();

        let offset: Vec2 = engine.object_offset(scene.bird()).unwrap();
        assert_eq!(offset, Vec2::new(world.bird().x, world.bird().y));
        // The beak is part of the frame.
        assert!(sink.glyphs().contains(&(b'>' as GlyphId)));
        assert!(sink.draws.len() > BIRD.len() + 3 * (PIPE_HEAD_TOP.len() + PIPE_HEAD_BOTTOM.len()));
    }

    #[test]
    fn test_hud_is_drawn_last() {
        let mut engine = engine();
        let mut scene = Scene::new(&mut engine).unwrap();
        let world = World::new(1);
        scene.update(&mut engine, 8).unwrap();
        let mut sink = RecordingSink::new();
        scene.draw(&mut engine, &world, &mut sink).unwrap();

        let hud = "Score:100FPS:125.00";
        let tail: Vec<GlyphId> = sink.glyphs().iter().rev().take(hud.len()).rev().copied().collect();
        assert_eq!(tail, hud.bytes().map(GlyphId::from).collect::<Vec<_>>());

        let fps_start = sink.draws.len() - "FPS:125.00".len();
        assert_eq!((sink.draws[fps_start].x, sink.draws[fps_start].y), (1070, 23));
    }

    #[test]
    fn test_wing_flap_animation() {
        let mut engine = engine();
        let mut scene = Scene::new(&mut engine).unwrap();
        let bird = scene.bird();
        let wing_y = |engine: &GlyphEngine| {
            let glyphs = engine.object_glyphs::<Glyph2>(bird).unwrap();
            (glyphs[BIRD_WING_UPPER].pos.y, glyphs[BIRD_WING_LOWER].pos.y)
        };

        scene.start_wing_flap(&mut engine).unwrap();
        assert_eq!(wing_y(&engine), WING_FLAP_Y);
        scene.update(&mut engine, 200).unwrap();
        // A second flap does not restart the animation.
        scene.start_wing_flap(&mut engine).unwrap();
        scene.update(&mut engine, 150).unwrap();
        assert!(!scene.is_flapping());
        assert_eq!(wing_y(&engine), WING_REST_Y);
    }

    #[test]
    fn test_text_layout() {
        let mut sink = RecordingSink::new();
        draw_text(&mut sink, "A B", 10.0, 20.0, 0.25, Color::WHITE);
        assert_eq!(sink.positions(), vec![(10, 20), (42, 20)]);

        assert_eq!(centered_x(10, 1.0), 320.0);
        assert_eq!(score_label(42).as_str(), "Score:    42");
        assert_eq!(fps_label(7).as_str(), "FPS: 142.86");
        assert_eq!(fps_label(0).as_str(), "FPS: 0.00");
    }

    #[test]
    fn test_section_count_never_negative() {
        assert_eq!(section_count(-3.2), 0);
        assert_eq!(section_count(2.5), 3);
    }
}
