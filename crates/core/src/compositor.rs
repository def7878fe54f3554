//! Compositor - per-frame staging and glyph submission
//!
//! Objects are copied into a fixed staging buffer with their global offset
//! applied, then the buffer is walked once and every drawable glyph is handed
//! to a [`GlyphSink`]. Submission order is draw order: glyphs staged later
//! paint over earlier ones at the same cell.
//!
//! Positions stay `f32` until submission, where they are rounded half away
//! from zero. Colors leave with the alpha byte forced opaque.

use std::mem::size_of;

use crate::glyph::{Glyph, Position};
use crate::types::{Color, GlyphId};

/// Drawing backend the compositor submits to.
pub trait GlyphSink {
    /// Fill the whole target with `color`.
    fn clear_screen(&mut self, color: Color);

    /// Draw glyph `glyph` at integer world position `(x, y)`.
    fn draw_glyph(&mut self, x: i32, y: i32, scale: f32, color: Color, glyph: GlyphId);
}

impl<S: GlyphSink + ?Sized> GlyphSink for &mut S {
    fn clear_screen(&mut self, color: Color) {
        (**self).clear_screen(color);
    }

    fn draw_glyph(&mut self, x: i32, y: i32, scale: f32, color: Color, glyph: GlyphId) {
        (**self).draw_glyph(x, y, scale, color, glyph);
    }
}

/// Counters of one `render_frame` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    /// Glyphs in the staging buffer when it was walked.
    pub staged: usize,
    /// Draw calls issued.
    pub drawn: usize,
    /// Staged glyphs that were invisible or carried a reserved id.
    pub skipped: usize,
    /// Staging units that did not fit this frame: a whole object, or a
    /// single standalone glyph.
    pub dropped: usize,
}

/// Fixed-capacity staging buffer.
#[derive(Debug, Clone)]
pub struct RenderBuffer<G> {
    slots: Box<[G]>,
    len: usize,
    /// Contents were kept from the previous frame.
    retained: bool,
}

impl<G: Glyph> RenderBuffer<G> {
    pub fn with_byte_budget(bytes: usize) -> Self {
        Self {
            slots: vec![G::default(); bytes / size_of::<G>()].into_boxed_slice(),
            len: 0,
            retained: false,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_retained(&self) -> bool {
        self.retained
    }

    pub fn set_retained(&mut self, retained: bool) {
        self.retained = retained;
    }

    pub fn as_slice(&self) -> &[G] {
        &self.slots[..self.len]
    }

    /// Append `glyphs` translated by `offset`. All or nothing: returns
    /// `false` and leaves the buffer untouched if they do not fit.
    pub fn push(&mut self, glyphs: &[G], offset: G::Pos) -> bool {
        let end = self.len + glyphs.len();
        if end > self.capacity() {
            return false;
        }

        let shift = !offset.is_near_zero();
        for (dst, src) in self.slots[self.len..end].iter_mut().zip(glyphs) {
            *dst = *src;
            if shift {
                dst.translate(offset);
            }
        }
        self.len = end;
        true
    }

    /// Rewind the cursor. Slots are overwritten on the next push.
    pub fn clear(&mut self) {
        self.len = 0;
        self.retained = false;
    }
}

/// Submit every drawable glyph of `glyphs`, shifted by `offset`.
pub fn submit<G: Glyph, S: GlyphSink + ?Sized>(
    glyphs: &[G],
    offset: G::Pos,
    scale: f32,
    sink: &mut S,
    stats: &mut FrameStats,
) {
    for glyph in glyphs {
        if !glyph.is_drawable() {
            stats.skipped += 1;
            continue;
        }
        let (x, y) = (glyph.pos() + offset).xy();
        sink.draw_glyph(
            x.round() as i32,
            y.round() as i32,
            scale,
            glyph.color().opaque(),
            glyph.id(),
        );
        stats.drawn += 1;
    }
}

/// One recorded `draw_glyph` call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCall {
    pub x: i32,
    pub y: i32,
    pub scale: f32,
    pub color: Color,
    pub glyph: GlyphId,
}

/// Sink that records calls instead of drawing. Useful in tests and for
/// inspecting a frame.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    pub clears: Vec<Color>,
    pub draws: Vec<DrawCall>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.clears.clear();
        self.draws.clear();
    }

    /// Drawn positions in submission order.
    pub fn positions(&self) -> Vec<(i32, i32)> {
        self.draws.iter().map(|d| (d.x, d.y)).collect()
    }

    pub fn glyphs(&self) -> Vec<GlyphId> {
        self.draws.iter().map(|d| d.glyph).collect()
    }
}

impl GlyphSink for RecordingSink {
    fn clear_screen(&mut self, color: Color) {
        self.clears.push(color);
    }

    fn draw_glyph(&mut self, x: i32, y: i32, scale: f32, color: Color, glyph: GlyphId) {
        self.draws.push(DrawCall {
            x,
            y,
            scale,
            color,
            glyph,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glyph::Glyph2;
    use crate::types::Vec2;

    fn glyph(x: f32, y: f32, id: GlyphId) -> Glyph2 {
        Glyph2::new(Vec2::new(x, y), Color::WHITE, id)
    }

    #[test]
    fn test_push_applies_offset() {
        let mut buf = RenderBuffer::<Glyph2>::with_byte_budget(64);
        assert_eq!(buf.capacity(), 4);
        assert!(buf.push(&[glyph(1.0, 2.0, 65)], Vec2::new(10.0, -2.0)));
        assert_eq!(buf.as_slice()[0].pos, Vec2::new(11.0, 0.0));
    }

    #[test]
    fn test_push_is_all_or_nothing() {
        let mut buf = RenderBuffer::<Glyph2>::with_byte_budget(48);
        let three = [glyph(0.0, 0.0, 65); 3];
        assert!(buf.push(&three[..2], Vec2::ZERO));
        assert!(!buf.push(&three[..2], Vec2::ZERO));
        assert_eq!(buf.len(), 2);
        assert!(buf.push(&three[..1], Vec2::ZERO));
        assert_eq!(buf.len(), 3);
    }

    #[test]
    fn test_submit_rounds_half_away_from_zero() {
        let glyphs = [
            glyph(0.5, 1.4, 65),
            glyph(-0.5, -1.5, 66),
            glyph(2.49, 2.51, 67),
        ];
        let mut sink = RecordingSink::new();
        let mut stats = FrameStats::default();
        submit(&glyphs, Vec2::ZERO, 0.25, &mut sink, &mut stats);

        assert_eq!(sink.positions(), vec![(1, 1), (-1, -2), (2, 3)]);
        assert_eq!(stats.drawn, 3);
    }

    #[test]
    fn test_submit_skips_invisible_and_reserved() {
        let mut hidden = glyph(0.0, 0.0, 65);
        hidden.visible = false;
        let reserved = glyph(0.0, 0.0, 31);
        let glyphs = [hidden, reserved, Glyph2::default(), glyph(3.0, 3.0, 32)];

        let mut sink = RecordingSink::new();
        let mut stats = FrameStats::default();
        submit(&glyphs, Vec2::ZERO, 0.25, &mut sink, &mut stats);

        assert_eq!(sink.glyphs(), vec![32]);
        assert_eq!(stats.skipped, 3);
    }

    #[test]
    fn test_submit_forces_opaque_color() {
        let mut sink = RecordingSink::new();
        let mut stats = FrameStats::default();
        let g = Glyph2::new(Vec2::ZERO, Color(0x1234_5600), 65);
        submit(&[g], Vec2::ZERO, 0.5, &mut sink, &mut stats);
        assert_eq!(sink.draws[0].color, Color(0x1234_56ff));
        assert_eq!(sink.draws[0].scale, 0.5);
    }
}
