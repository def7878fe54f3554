//! Terminal input.
//!
//! Maps `crossterm` key events into [`crate::types::GameAction`]. Quitting is
//! not a game action; [`should_quit`] answers that separately.

pub mod map;

pub use flappy_ascii_types as types;

pub use map::{handle_key_event, should_quit};
