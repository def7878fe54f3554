//! Object registry - fixed table of glyph object descriptors
//!
//! A glyph object groups a contiguous run of glyph instances that move,
//! recolor and render together. The table has [`OBJECT_TABLE_SIZE`] entries
//! and follows the same two-strategy rule as the arena: append at the cursor
//! until a non-tail entry is freed, then scan linearly for a free entry.
//!
//! Handles carry a generation number. Every object gets a fresh generation,
//! and clearing the table (reset, mode change) never rewinds the counter, so
//! a handle that outlived its object is always recognised as stale.

use crate::pages::PageId;
use crate::types::{RenderMode, Vec3, OBJECT_TABLE_SIZE};

/// Opaque reference to a live glyph object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectHandle {
    index: u16,
    generation: u32,
}

impl ObjectHandle {
    /// Table slot this handle points at.
    pub fn index(&self) -> usize {
        self.index as usize
    }
}

/// Where an object's glyphs live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backing {
    Arena { start: usize },
    Paged(PageId),
}

/// Object descriptor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphObject {
    pub mode: RenderMode,
    pub len: usize,
    pub visible: bool,
    /// Render-time translation; `z` is unused in 2D.
    pub offset: Vec3,
    pub backing: Backing,
    generation: u32,
}

impl GlyphObject {
    pub fn is_paged(&self) -> bool {
        matches!(self.backing, Backing::Paged(_))
    }

    /// Arena slots covered by this object, if arena-backed.
    pub fn arena_range(&self) -> Option<std::ops::Range<usize>> {
        match self.backing {
            Backing::Arena { start } => Some(start..start + self.len),
            Backing::Paged(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ObjectTable {
    slots: [Option<GlyphObject>; OBJECT_TABLE_SIZE],
    /// One past the highest live entry.
    cursor: usize,
    /// Free entries below the cursor.
    holes: usize,
    next_generation: u32,
}

impl ObjectTable {
    pub fn new() -> Self {
        Self {
            slots: [None; OBJECT_TABLE_SIZE],
            cursor: 0,
            holes: 0,
            next_generation: 1,
        }
    }

    pub fn capacity(&self) -> usize {
        OBJECT_TABLE_SIZE
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn live(&self) -> usize {
        self.cursor - self.holes
    }

    pub fn is_fragmented(&self) -> bool {
        self.holes > 0
    }

    /// Drop every descriptor. Outstanding handles become stale.
    pub fn clear(&mut self) {
        self.slots = [None; OBJECT_TABLE_SIZE];
        self.cursor = 0;
        self.holes = 0;
    }

    /// Entry a new object would be stored in.
    pub fn find_free(&self) -> Option<usize> {
        if self.is_fragmented() {
            self.slots.iter().position(Option::is_none)
        } else if self.cursor < OBJECT_TABLE_SIZE {
            Some(self.cursor)
        } else {
            None
        }
    }

    /// Store a descriptor at `index` (as returned by [`find_free`](Self::find_free)).
    pub fn insert(
        &mut self,
        index: usize,
        mode: RenderMode,
        len: usize,
        backing: Backing,
    ) -> ObjectHandle {
        debug_assert!(self.slots[index].is_none(), "object slot {index} in use");

        let generation = self.next_generation;
        self.next_generation = self.next_generation.wrapping_add(1).max(1);

        self.slots[index] = Some(GlyphObject {
            mode,
            len,
            visible: true,
            offset: Vec3::ZERO,
            backing,
            generation,
        });

        if index < self.cursor {
            self.holes -= 1;
        } else {
            self.cursor = index + 1;
        }

        ObjectHandle {
            index: index as u16,
            generation,
        }
    }

    pub fn get(&self, handle: ObjectHandle) -> Option<&GlyphObject> {
        self.slots
            .get(handle.index())?
            .as_ref()
            .filter(|o| o.generation == handle.generation)
    }

    pub fn get_mut(&mut self, handle: ObjectHandle) -> Option<&mut GlyphObject> {
        self.slots
            .get_mut(handle.index())?
            .as_mut()
            .filter(|o| o.generation == handle.generation)
    }

    /// Remove a descriptor. Removing the tail entry rewinds the cursor;
    /// removing any other entry fragments the table.
    pub fn remove(&mut self, handle: ObjectHandle) -> Option<GlyphObject> {
        self.get(handle)?;
        let index = handle.index();
        let object = self.slots[index].take()?;

        if index + 1 == self.cursor {
            self.cursor = index;
            while self.cursor > 0 && self.slots[self.cursor - 1].is_none() {
                self.cursor -= 1;
                self.holes -= 1;
            }
        } else {
            self.holes += 1;
        }

        Some(object)
    }

    /// Live objects in table order.
    pub fn iter(&self) -> impl Iterator<Item = (ObjectHandle, &GlyphObject)> {
        self.slots[..self.cursor]
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| {
                slot.as_ref().map(|o| {
                    (
                        ObjectHandle {
                            index: i as u16,
                            generation: o.generation,
                        },
                        o,
                    )
                })
            })
    }

    /// Object whose arena run overlaps `start..end`, if any.
    pub fn arena_owner(&self, start: usize, end: usize) -> Option<ObjectHandle> {
        self.iter().find_map(|(handle, o)| {
            let range = o.arena_range()?;
            (range.start < end && start < range.end).then_some(handle)
        })
    }
}

impl Default for ObjectTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arena_at(start: usize) -> Backing {
        Backing::Arena { start }
    }

    fn fill(table: &mut ObjectTable, n: usize) -> Vec<ObjectHandle> {
        (0..n)
            .map(|i| {
                let idx = table.find_free().unwrap();
                table.insert(idx, RenderMode::TwoD, 1, arena_at(i))
            })
            .collect()
    }

    #[test]
    fn test_append_until_full() {
        let mut table = ObjectTable::new();
        let handles = fill(&mut table, OBJECT_TABLE_SIZE);
        assert_eq!(handles.len(), OBJECT_TABLE_SIZE);
        assert_eq!(table.find_free(), None);
        assert_eq!(table.live(), OBJECT_TABLE_SIZE);
    }

    #[test]
    fn test_tail_removal_rewinds() {
        let mut table = ObjectTable::new();
        let handles = fill(&mut table, 3);
        assert!(table.remove(handles[2]).is_some());
        assert_eq!(table.cursor(), 2);
        assert!(!table.is_fragmented());
        assert_eq!(table.find_free(), Some(2));
    }

    #[test]
    fn test_interior_removal_fragments_and_reuses() {
        let mut table = ObjectTable::new();
        let handles = fill(&mut table, 3);
        table.remove(handles[0]).unwrap();
        assert!(table.is_fragmented());
        assert_eq!(table.find_free(), Some(0));

        let h = table.insert(0, RenderMode::TwoD, 2, arena_at(10));
        assert!(!table.is_fragmented());
        assert_eq!(table.get(h).unwrap().len, 2);
    }

    #[test]
    fn test_stale_handle_rejected() {
        let mut table = ObjectTable::new();
        let old = fill(&mut table, 1)[0];
        table.remove(old).unwrap();
        let new = table.insert(0, RenderMode::TwoD, 1, arena_at(0));

        assert_eq!(old.index(), new.index());
        assert!(table.get(old).is_none());
        assert!(table.remove(old).is_none());
        assert!(table.get(new).is_some());
    }

    #[test]
    fn test_clear_invalidates_handles() {
        let mut table = ObjectTable::new();
        let h = fill(&mut table, 2)[1];
        table.clear();
        let idx = table.find_free().unwrap();
        table.insert(idx, RenderMode::TwoD, 1, arena_at(0));
        table.insert(idx + 1, RenderMode::TwoD, 1, arena_at(1));
        assert!(table.get(h).is_none());
    }

    #[test]
    fn test_arena_owner() {
        let mut table = ObjectTable::new();
        let h = table.insert(0, RenderMode::TwoD, 4, arena_at(2));
        assert_eq!(table.arena_owner(0, 2), None);
        assert_eq!(table.arena_owner(5, 6), Some(h));
        assert_eq!(table.arena_owner(6, 8), None);
    }

    #[test]
    fn test_iter_in_table_order() {
        let mut table = ObjectTable::new();
        let handles = fill(&mut table, 4);
        table.remove(handles[1]).unwrap();
        let seen: Vec<ObjectHandle> = table.iter().map(|(h, _)| h).collect();
        assert_eq!(seen, vec![handles[0], handles[2], handles[3]]);
    }
}
