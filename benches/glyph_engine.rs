use criterion::{black_box, criterion_group, criterion_main, Criterion};
use flappy_ascii::core::{EngineConfig, GlyphEngine, RecordingSink};
use flappy_ascii::game::{Game, GameConfig};
use flappy_ascii::term::GlyphCanvas;
use flappy_ascii::types::{Color, GameAction, GlyphId, RenderMode, Vec2};

fn engine_2d() -> GlyphEngine {
    GlyphEngine::with_mode(EngineConfig::default().lenient(), RenderMode::TwoD).unwrap()
}

fn bench_create_remove(c: &mut Criterion) {
    let mut engine = engine_2d();
    let positions = [Vec2::ZERO; 16];
    let ids = [b'#' as GlyphId; 16];

    c.bench_function("create_remove_16", |b| {
        b.iter(|| {
            let h = engine.create_object(black_box(&positions), None, &ids).unwrap();
            engine.remove_object(h).unwrap();
        })
    });
}

fn bench_fragmented_create(c: &mut Criterion) {
    let mut engine = engine_2d();
    let handles: Vec<_> = (0..30)
        .map(|i| {
            engine
                .create_object(&[Vec2::new(i as f32, 0.0); 8], None, &[65; 8])
                .unwrap()
        })
        .collect();
    // Punch a hole near the front so every allocation scans.
    engine.remove_object(handles[1]).unwrap();

    c.bench_function("fragmented_create_remove_8", |b| {
        b.iter(|| {
            let h = engine.create_object(&[Vec2::ZERO; 8], None, &[66; 8]).unwrap();
            engine.remove_object(black_box(h)).unwrap();
        })
    });
}

fn bench_render_frame(c: &mut Criterion) {
    let mut engine = engine_2d();
    for row in 0..16 {
        let positions: Vec<Vec2> = (0..16)
            .map(|col| Vec2::new(col as f32 * 16.0, row as f32 * 16.0))
            .collect();
        engine
            .create_object(&positions, None, &[b'@' as GlyphId; 16])
            .unwrap();
    }
    let mut sink = RecordingSink::new();

    c.bench_function("render_frame_256_glyphs", |b| {
        b.iter(|| {
            sink.reset();
            engine
                .render_frame(&mut sink, Color::BLACK, true, false)
                .unwrap();
        })
    });
}

fn bench_game_frame(c: &mut Criterion) {
    let mut engine = engine_2d();
    let config = GameConfig {
        seed: 12345,
        ..GameConfig::default()
    };
    let mut game = Game::new(&mut engine, &config).unwrap();
    game.handle_action(&mut engine, GameAction::Confirm).unwrap();
    let mut canvas = GlyphCanvas::new(160, 45);

    c.bench_function("game_draw_160x45", |b| {
        b.iter(|| {
            game.draw(&mut engine, black_box(&mut canvas)).unwrap();
        })
    });
}

criterion_group!(
    benches,
    bench_create_remove,
    bench_fragmented_create,
    bench_render_frame,
    bench_game_frame
);
criterion_main!(benches);
