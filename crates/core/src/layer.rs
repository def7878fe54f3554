//! Per-mode buffers.
//!
//! The engine owns one [`Storage`] value. Its variant is the active render
//! mode and carries the buffers typed for that mode, so a 2D glyph can never
//! be read out of 3D memory.

use crate::arena::Arena;
use crate::compositor::RenderBuffer;
use crate::config::EngineConfig;
use crate::error::Result;
use crate::glyph::{Glyph, Glyph2, Glyph3};
use crate::pages::{PageLimits, PageList};
use crate::registry::{Backing, GlyphObject};
use crate::types::{RenderMode, ARENA_BYTES, RENDER_BUFFER_BYTES};

#[derive(Debug, Clone)]
pub enum Storage {
    Uninitialized,
    TwoD(Layer<Glyph2>),
    ThreeD(Layer<Glyph3>),
}

impl Storage {
    pub fn new(mode: RenderMode, config: &EngineConfig) -> Self {
        match mode {
            RenderMode::TwoD => Storage::TwoD(Layer::new(config)),
            RenderMode::ThreeD => Storage::ThreeD(Layer::new(config)),
        }
    }

    pub fn mode(&self) -> Option<RenderMode> {
        match self {
            Storage::Uninitialized => None,
            Storage::TwoD(_) => Some(RenderMode::TwoD),
            Storage::ThreeD(_) => Some(RenderMode::ThreeD),
        }
    }
}

/// Arena, overflow pages and staging buffer of one render mode.
#[derive(Debug, Clone)]
pub struct Layer<G> {
    pub arena: Arena<G>,
    pub pages: PageList<G>,
    pub staging: RenderBuffer<G>,
}

impl<G: Glyph> Layer<G> {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            arena: Arena::with_byte_budget(ARENA_BYTES),
            pages: PageList::new(PageLimits {
                warn_bytes: config.page_warn_bytes,
                limit_bytes: config.page_limit_bytes,
            }),
            staging: RenderBuffer::with_byte_budget(RENDER_BUFFER_BYTES),
        }
    }

    /// Zero every buffer and free all pages, keeping the allocations.
    pub fn reset(&mut self) {
        self.pages.free_all();
        self.arena.clear();
        self.staging.clear();
    }

    /// Back `len` glyphs with arena memory, or with a new page if no arena
    /// run is large enough.
    pub fn allocate(&mut self, len: usize, mut init: impl FnMut(usize) -> G) -> Result<Backing> {
        if let Some(start) = self.arena.alloc(len, &mut init) {
            return Ok(Backing::Arena { start });
        }

        tracing::debug!(
            glyphs = len,
            arena_used = self.arena.used(),
            arena_capacity = self.arena.capacity(),
            fragmented = self.arena.is_fragmented(),
            "arena cannot fit object, paging"
        );
        let id = self.pages.add_page(len, init)?;
        Ok(Backing::Paged(id))
    }

    /// Return an object's memory to the arena or drop its page.
    pub fn release(&mut self, object: &GlyphObject) {
        match object.backing {
            Backing::Arena { start } => {
                self.arena.release(start, object.len);
            }
            Backing::Paged(id) => {
                self.pages.remove_page(id);
            }
        }
    }

    pub fn glyphs(&self, object: &GlyphObject) -> Option<&[G]> {
        object_glyphs(&self.arena, &self.pages, object)
    }

    pub fn glyphs_mut(&mut self, object: &GlyphObject) -> Option<&mut [G]> {
        match object.backing {
            Backing::Arena { start } => Some(self.arena.run_mut(start, object.len)),
            Backing::Paged(id) => self.pages.get_mut(id),
        }
    }
}

/// Glyphs of `object`, borrowed from the arena or its page.
///
/// Takes the buffers separately so the staging buffer can be written while
/// object memory is read.
pub fn object_glyphs<'a, G: Glyph>(
    arena: &'a Arena<G>,
    pages: &'a PageList<G>,
    object: &GlyphObject,
) -> Option<&'a [G]> {
    match object.backing {
        Backing::Arena { start } => Some(arena.run(start, object.len)),
        Backing::Paged(id) => pages.get(id),
    }
}
