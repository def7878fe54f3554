//! Terminal backend for the glyph engine.
//!
//! Glyph draw calls are rasterized into a framebuffer of styled cells
//! ([`GlyphCanvas`], which implements the engine's `GlyphSink`), and the
//! framebuffer is flushed to the terminal with run-length diffing
//! ([`TerminalRenderer`]).
//!
//! Rasterizing is pure and unit-tested; only the renderer touches the
//! terminal.

pub mod canvas;
pub mod fb;
pub mod renderer;

pub use flappy_ascii_core as core;
pub use flappy_ascii_types as types;

pub use canvas::{GlyphCanvas, GLYPH_PIXELS};
pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
