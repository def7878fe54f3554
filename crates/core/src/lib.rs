//! Glyph engine - arena-backed ASCII rendering core
//!
//! Positioned, colored glyph instances are packed into a fixed-capacity arena,
//! grouped into movable objects, and drawn once per frame through a
//! [`GlyphSink`]. When the arena cannot fit an object, the object moves into
//! a heap-allocated overflow page instead of failing.
//!
//! The crate has no I/O: the drawing backend is whatever implements
//! [`GlyphSink`], and timing is the caller's business.
//!
//! # Module Structure
//!
//! - [`arena`]: fixed slot array with compact-append and free-slot-scan allocation
//! - [`pages`]: overflow pages keyed by [`PageId`], with byte accounting
//! - [`registry`]: the 32-entry object table and generation-checked handles
//! - [`compositor`]: staging buffer, glyph submission and the [`GlyphSink`] trait
//! - [`engine`]: [`GlyphEngine`], the lifecycle and public object API
//! - [`glyph`]: 2D/3D glyph instances and the [`Position`] / [`Glyph`] traits
//! - [`layer`]: per-mode buffers behind the tagged [`Storage`]
//! - [`config`] / [`error`]: configuration and error types
//!
//! # Invariants
//!
//! - A slot whose glyph id is `0` is free; ids below 32 are never stored.
//! - Only the buffers of the active render mode exist.
//! - Handles die with their object, and all of them die on reset or mode change.
//! - Steady-state frames do not allocate; only overflow pages do.

pub mod arena;
pub mod compositor;
pub mod config;
pub mod engine;
pub mod error;
pub mod glyph;
pub mod layer;
pub mod pages;
pub mod registry;

pub use flappy_ascii_types as types;

pub use compositor::{DrawCall, FrameStats, GlyphSink, RecordingSink};
pub use config::EngineConfig;
pub use engine::{EngineStats, GlyphEngine, GlyphIndex};
pub use error::{EngineError, Result};
pub use glyph::{Glyph, Glyph2, Glyph3, GlyphInfo, Position};
pub use layer::{Layer, Storage};
pub use pages::{PageId, PageLimits, PageList};
pub use registry::{Backing, GlyphObject, ObjectHandle, ObjectTable};
