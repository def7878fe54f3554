//! Overflow pages - heap blocks used once the arena is exhausted
//!
//! Every block is owned by the list and addressed by a [`PageId`], never by
//! pointer. Pages keep insertion order, which is also the order they are
//! walked in. The list also accounts the bytes it holds: an optional warning
//! threshold logs once when crossed, and an optional hard limit turns further
//! page requests into capacity errors.

use std::mem::size_of;

use crate::error::{EngineError, Result};
use crate::glyph::Glyph;

/// Stable identifier of an overflow page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageId(u32);

impl PageId {
    pub fn raw(self) -> u32 {
        self.0
    }
}

/// Byte thresholds applied to overflow pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageLimits {
    pub warn_bytes: Option<usize>,
    pub limit_bytes: Option<usize>,
}

#[derive(Debug, Clone)]
struct Page<G> {
    id: PageId,
    block: Box<[G]>,
}

#[derive(Debug, Clone)]
pub struct PageList<G> {
    pages: Vec<Page<G>>,
    next_id: u32,
    bytes: usize,
    limits: PageLimits,
    warned: bool,
}

impl<G: Glyph> PageList<G> {
    pub fn new(limits: PageLimits) -> Self {
        Self {
            pages: Vec::new(),
            next_id: 0,
            bytes: 0,
            limits,
            warned: false,
        }
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Bytes currently held in pages.
    pub fn bytes(&self) -> usize {
        self.bytes
    }

    /// The warning threshold has been logged and is not yet re-armed.
    pub fn warned(&self) -> bool {
        self.warned
    }

    /// Allocate a block of `len` glyphs, fill slot `i` with `init(i)` and
    /// append it to the tail of the list.
    pub fn add_page(&mut self, len: usize, init: impl FnMut(usize) -> G) -> Result<PageId> {
        let requested = len * size_of::<G>();

        if let Some(limit) = self.limits.limit_bytes {
            if self.bytes + requested > limit {
                return Err(EngineError::PageLimitExceeded {
                    requested,
                    in_use: self.bytes,
                    limit,
                });
            }
        }

        let id = PageId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);

        let block: Box<[G]> = (0..len).map(init).collect();
        self.pages.push(Page { id, block });
        self.bytes += requested;

        tracing::debug!(
            page = id.0,
            glyphs = len,
            bytes = self.bytes,
            mode = %G::MODE,
            "added overflow page"
        );

        if let Some(warn) = self.limits.warn_bytes {
            if !self.warned && self.bytes > warn {
                self.warned = true;
                tracing::warn!(bytes = self.bytes, threshold = warn, "overflow pages above warning threshold");
            }
        }

        Ok(id)
    }

    /// Free the page `id`. Returns `false` (and logs) if it is not in the list.
    pub fn remove_page(&mut self, id: PageId) -> bool {
        let Some(pos) = self.pages.iter().position(|p| p.id == id) else {
            tracing::warn!(page = id.0, "overflow page not found, nothing removed");
            return false;
        };

        let page = self.pages.remove(pos);
        self.bytes -= page.block.len() * size_of::<G>();
        if self.limits.warn_bytes.is_some_and(|warn| self.bytes <= warn) {
            self.warned = false;
        }

        tracing::debug!(page = id.0, bytes = self.bytes, "removed overflow page");
        true
    }

    /// Free every page. A no-op on an empty list.
    pub fn free_all(&mut self) {
        if self.pages.is_empty() {
            return;
        }
        tracing::debug!(pages = self.pages.len(), bytes = self.bytes, "freeing all overflow pages");
        self.pages.clear();
        self.bytes = 0;
        self.warned = false;
    }

    pub fn get(&self, id: PageId) -> Option<&[G]> {
        self.pages
            .iter()
            .find(|p| p.id == id)
            .map(|p| &p.block[..])
    }

    pub fn get_mut(&mut self, id: PageId) -> Option<&mut [G]> {
        self.pages
            .iter_mut()
            .find(|p| p.id == id)
            .map(|p| &mut p.block[..])
    }

    /// Pages in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (PageId, &[G])> {
        self.pages.iter().map(|p| (p.id, &p.block[..]))
    }
}
