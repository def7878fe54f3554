//! End-to-end engine scenarios through the facade crate.

mod common;

use flappy_ascii::core::{EngineConfig, EngineError, Glyph2, GlyphEngine, RecordingSink};
use flappy_ascii::types::{Color, GlyphId, RenderMode, Vec2, Vec3};

fn engine_2d() -> GlyphEngine {
    common::engine(EngineConfig::default().lenient(), RenderMode::TwoD)
}

#[test]
fn abc_object_renders_three_white_glyphs_in_order() {
    let mut engine = engine_2d();
    let positions = [Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), Vec2::new(20.0, 0.0)];
    engine.create_object(&positions, None, &[65, 66, 67]).unwrap();

    let mut sink = RecordingSink::new();
    let stats = engine.render_frame(&mut sink, Color::BLACK, true, false).unwrap();

    assert_eq!(stats.drawn, 3);
    assert_eq!(sink.positions(), vec![(0, 0), (10, 0), (20, 0)]);
    assert_eq!(sink.glyphs(), vec![65, 66, 67]);
    assert!(sink.draws.iter().all(|d| d.color == Color::WHITE.opaque()));
    assert!(sink.draws.iter().all(|d| d.scale == 0.25));
}

#[test]
fn full_arena_pages_the_next_object() {
    let mut engine = engine_2d();
    let cap = engine.stats().arena_capacity;

    engine
        .create_object(&vec![Vec2::ZERO; cap - 1], None, &vec![b'.' as GlyphId; cap - 1])
        .unwrap();
    let last = engine.create_object(&[Vec2::ZERO], None, &[b'#' as GlyphId]).unwrap();
    assert!(!engine.is_paged(last).unwrap());
    assert_eq!(engine.stats().arena_used, cap);

    let extra = engine
        .create_object(&[Vec2::new(640.0, 360.0)], None, &[b'@' as GlyphId])
        .unwrap();
    assert!(engine.is_paged(extra).unwrap());
    assert_eq!(engine.stats().pages, 1);

    // Standalone glyphs never page.
    assert_eq!(
        engine.place_glyph(Vec2::ZERO, Color::RED, b'x' as GlyphId).unwrap_err(),
        EngineError::ArenaFull
    );

    let mut sink = RecordingSink::new();
    let stats = engine.render_frame(&mut sink, Color::BLACK, true, false).unwrap();
    assert_eq!(stats.drawn, cap + 1);
    assert_eq!(sink.draws.last().map(|d| (d.x, d.y, d.glyph)), Some((640, 360, b'@' as GlyphId)));
}

#[test]
fn change_mode_invalidates_every_handle() {
    let mut engine = engine_2d();
    let handles: Vec<_> = (0..4)
        .map(|i| {
            engine
                .create_object(&[Vec2::new(i as f32, 0.0)], None, &[65])
                .unwrap()
        })
        .collect();

    engine.change_mode(RenderMode::ThreeD).unwrap();
    let stats = engine.stats();
    assert_eq!(stats.mode, Some(RenderMode::ThreeD));
    assert_eq!(stats.arena_used, 0);
    assert_eq!(stats.objects, 0);

    for h in handles {
        assert_eq!(engine.remove_object(h).unwrap_err(), EngineError::StaleHandle);
        assert_eq!(
            engine.move_object(h, Vec3::new(1.0, 0.0, 0.0)).unwrap_err(),
            EngineError::StaleHandle
        );
    }

    // Table slots are reused, old handles stay dead.
    let fresh = engine.create_object(&[Vec3::ZERO], None, &[66]).unwrap();
    assert!(engine.is_live(fresh));
    assert_eq!(fresh.index(), 0);
}

#[test]
fn reset_all_keeps_mode_and_drops_pages() {
    let mut engine = engine_2d();
    let cap = engine.stats().arena_capacity;
    let h = engine
        .create_object(&vec![Vec2::ZERO; cap + 10], None, &vec![70; cap + 10])
        .unwrap();
    assert!(engine.is_paged(h).unwrap());

    engine.reset_all().unwrap();
    let stats = engine.stats();
    assert_eq!(stats.mode, Some(RenderMode::TwoD));
    assert_eq!(stats.pages, 0);
    assert_eq!(stats.page_bytes, 0);
    assert!(!engine.is_live(h));
}

#[test]
fn page_limit_turns_paging_into_capacity_error() {
    let config = EngineConfig {
        page_limit_bytes: Some(64),
        ..EngineConfig::default().lenient()
    };
    let mut engine = common::engine(config, RenderMode::TwoD);
    let cap = engine.stats().arena_capacity;
    engine
        .create_object(&vec![Vec2::ZERO; cap], None, &vec![65; cap])
        .unwrap();

    // Four 2D glyphs fit in 64 bytes, five do not.
    let small = engine.create_object(&[Vec2::ZERO; 4], None, &[66; 4]).unwrap();
    assert!(engine.is_paged(small).unwrap());
    let err = engine.create_object(&[Vec2::ZERO], None, &[67]).unwrap_err();
    assert!(err.is_capacity());
    assert!(matches!(err, EngineError::PageLimitExceeded { .. }));
    assert_eq!(engine.stats().objects, 2);
}

#[test]
fn render_skips_reserved_and_invisible_glyphs() {
    let mut engine = engine_2d();
    let h = engine
        .create_object(&[Vec2::ZERO, Vec2::new(16.0, 0.0), Vec2::new(32.0, 0.0)], None, &[65, 66, 67])
        .unwrap();
    {
        let glyphs = engine.object_glyphs_mut::<Glyph2>(h).unwrap();
        glyphs[0].visible = false;
        glyphs[2].id = 7;
    }

    let mut sink = RecordingSink::new();
    let stats = engine.render_frame(&mut sink, Color::BLACK, false, false).unwrap();
    assert_eq!(sink.glyphs(), vec![66]);
    assert_eq!(stats.skipped, 2);
}

#[test]
fn rounding_is_half_away_from_zero() {
    let mut engine = engine_2d();
    engine
        .create_object(&[Vec2::new(0.5, -0.5), Vec2::new(1.49, -2.5)], None, &[65, 66])
        .unwrap();

    let mut sink = RecordingSink::new();
    engine.render_frame(&mut sink, Color::BLACK, false, false).unwrap();
    assert_eq!(sink.positions(), vec![(1, -1), (1, -3)]);
}

#[test]
fn three_d_objects_render_offset_xy_and_page_on_overflow() {
    let mut engine = common::engine(EngineConfig::default().lenient(), RenderMode::ThreeD);
    let cap = engine.stats().arena_capacity;
    assert_eq!(cap, 409);

    let h = engine
        .create_object(&[Vec3::new(0.4, 0.0, 5.0), Vec3::new(16.5, -1.5, -5.0)], None, &[65, 66])
        .unwrap();
    engine.set_object_offset(h, Vec3::new(100.0, 50.0, 7.0)).unwrap();

    let mut sink = RecordingSink::new();
    engine.render_frame(&mut sink, Color::BLACK, true, false).unwrap();
    assert_eq!(sink.positions(), vec![(100, 50), (117, 49)]);

    let filler = cap - 2;
    engine
        .create_object(&vec![Vec3::ZERO; filler], None, &vec![b'.' as GlyphId; filler])
        .unwrap();
    assert_eq!(engine.stats().arena_used, cap);

    let paged = engine
        .create_object(&[Vec3::new(640.0, 360.0, 1.0)], None, &[b'@' as GlyphId])
        .unwrap();
    assert!(engine.is_paged(paged).unwrap());

    sink.reset();
    let stats = engine.render_frame(&mut sink, Color::BLACK, true, false).unwrap();
    assert_eq!(stats.drawn, cap + 1);
    assert_eq!(sink.draws.last().map(|d| (d.x, d.y, d.glyph)), Some((640, 360, b'@' as GlyphId)));

    sink.reset();
    assert_eq!(engine.draw_object_direct(paged, &mut sink).unwrap(), 1);
    assert_eq!(sink.positions(), vec![(640, 360)]);
}
