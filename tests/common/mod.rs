use std::thread;
use std::time::Duration;

use flappy_ascii::core::{EngineConfig, EngineError, GlyphEngine};
use flappy_ascii::types::RenderMode;

/// Build an engine, waiting while a parallel test still holds the
/// process-wide one.
pub fn engine(config: EngineConfig, mode: RenderMode) -> GlyphEngine {
    loop {
        match GlyphEngine::with_mode(config.clone(), mode) {
            Ok(engine) => return engine,
            Err(EngineError::AlreadyActive) => thread::sleep(Duration::from_millis(1)),
            Err(err) => panic!("engine setup failed: {err}"),
        }
    }
}
