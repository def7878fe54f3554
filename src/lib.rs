//! Flappy ASCII (workspace facade crate).
//!
//! Re-exports the workspace crates under one roof: the glyph engine
//! (`core`), the terminal backend (`term`), key mapping (`input`), the game
//! itself (`game`) and the shared plain types (`types`).

pub use flappy_ascii_core as core;
pub use flappy_ascii_game as game;
pub use flappy_ascii_input as input;
pub use flappy_ascii_term as term;
pub use flappy_ascii_types as types;
