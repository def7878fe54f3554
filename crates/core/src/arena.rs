//! Arena module - fixed-capacity glyph slot storage
//!
//! The arena is one contiguous slot array sized from a byte budget, allocated
//! once per render mode and never grown. Runs of slots are handed out to glyph
//! objects and standalone glyphs; a slot is free when its glyph id is the empty
//! sentinel.
//!
//! Allocation uses one of two strategies, selected by the fragmentation flag:
//!
//! - **compact-append**: while every slot below the cursor is occupied, a run
//!   is taken at the cursor in O(1);
//! - **free-slot scan**: once a non-tail run has been released, a first-fit
//!   linear scan over the whole capacity looks for `count` consecutive free
//!   slots.
//!
//! The cursor is the high-water mark of the occupied region. Releasing the run
//! that ends at the cursor pulls it back (over any trailing free slots too);
//! releasing anything else leaves a hole. The arena is fragmented exactly
//! while holes exist. Slots are never moved, so holes only disappear when
//! their neighbourhood is released or reused.

use std::mem::size_of;

use crate::glyph::Glyph;

#[derive(Debug, Clone)]
pub struct Arena<G> {
    slots: Box<[G]>,
    /// One past the highest occupied slot.
    cursor: usize,
    /// Free slots below the cursor.
    holes: usize,
}

impl<G: Glyph> Arena<G> {
    /// Create an arena holding as many slots as fit in `bytes`.
    pub fn with_byte_budget(bytes: usize) -> Self {
        Self::with_slots(bytes / size_of::<G>())
    }

    pub fn with_slots(capacity: usize) -> Self {
        Self {
            slots: vec![G::default(); capacity].into_boxed_slice(),
            cursor: 0,
            holes: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_fragmented(&self) -> bool {
        self.holes > 0
    }

    /// Number of occupied slots.
    pub fn used(&self) -> usize {
        self.cursor - self.holes
    }

    pub fn slots(&self) -> &[G] {
        &self.slots
    }

    pub fn get(&self, index: usize) -> Option<&G> {
        self.slots.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut G> {
        self.slots.get_mut(index)
    }

    pub fn run(&self, start: usize, len: usize) -> &[G] {
        &self.slots[start..start + len]
    }

    pub fn run_mut(&mut self, start: usize, len: usize) -> &mut [G] {
        &mut self.slots[start..start + len]
    }

    /// Zero every slot and rewind the cursor.
    pub fn clear(&mut self) {
        self.slots.fill(G::default());
        self.cursor = 0;
        self.holes = 0;
    }

    /// Claim `count` consecutive slots and fill slot `i` with `init(i)`.
    ///
    /// Returns the index of the first slot, or `None` if no run is large
    /// enough. `init` must produce occupied (non-empty) glyphs.
    pub fn alloc(&mut self, count: usize, mut init: impl FnMut(usize) -> G) -> Option<usize> {
        if count == 0 || count > self.capacity() {
            return None;
        }

        let start = if self.is_fragmented() {
            self.find_free_run(count)?
        } else if self.cursor + count <= self.capacity() {
            self.cursor
        } else {
            return None;
        };
        let end = start + count;

        for (i, slot) in self.slots[start..end].iter_mut().enumerate() {
            *slot = init(i);
            debug_assert!(!slot.is_free(), "arena init produced an empty glyph");
        }

        if start < self.cursor {
            self.holes -= end.min(self.cursor) - start;
        }
        self.cursor = self.cursor.max(end);

        Some(start)
    }

    /// First-fit scan for `count` consecutive free slots.
    ///
    /// The bound is the slot capacity of this arena.
    fn find_free_run(&self, count: usize) -> Option<usize> {
        let mut run = 0;
        for (i, slot) in self.slots.iter().enumerate() {
            if slot.is_free() {
                run += 1;
                if run == count {
                    return Some(i + 1 - count);
                }
            } else {
                run = 0;
            }
        }
        None
    }

    /// Zero `count` slots starting at `start`.
    ///
    /// A run ending at the cursor is reclaimed in place; any other run leaves a
    /// hole and switches the arena to free-slot scanning. Returns the number of
    /// slots that were occupied.
    pub fn release(&mut self, start: usize, count: usize) -> usize {
        let end = (start + count).min(self.capacity());
        if start >= end {
            return 0;
        }

        let below = end.min(self.cursor);
        let freed = self.slots[start..end]
            .iter()
            .filter(|slot| !slot.is_free())
            .count();
        let already_free = if start < below {
            (below - start) - freed
        } else {
            0
        };

        self.slots[start..end].fill(G::default());

        if end >= self.cursor {
            if start < self.cursor {
                self.holes -= already_free;
                self.cursor = start;
            }
            self.retreat_cursor();
        } else {
            self.holes += freed;
        }

        freed
    }

    fn retreat_cursor(&mut self) {
        while self.cursor > 0 && self.slots[self.cursor - 1].is_free() {
            self.cursor -= 1;
            self.holes -= 1;
        }
    }
}
