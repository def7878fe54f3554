//! The Flappy Bird game on top of the glyph engine.
//!
//! - [`shapes`]: glyph tables for the bird and pipe pieces
//! - [`world`]: physics, pipes, collision and score
//! - [`scene`]: draws the world through engine objects
//! - [`app`]: start / playing / game-over flow
//! - [`config`]: seed and frame time

pub mod app;
pub mod config;
pub mod rng;
pub mod scene;
pub mod shapes;
pub mod world;

pub use flappy_ascii_core as core;
pub use flappy_ascii_types as types;

pub use app::{Control, Game, Phase};
pub use config::GameConfig;
pub use rng::SimpleRng;
pub use scene::Scene;
pub use world::{PipePair, Rect, Step, World};
