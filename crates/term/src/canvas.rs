//! GlyphCanvas: rasterizes glyph draw calls into a terminal framebuffer.
//!
//! The game world is `WORLD_WIDTH` x `WORLD_HEIGHT` pixels; the canvas maps
//! it onto whatever cell grid the terminal offers. A glyph covers a square of
//! `64 * scale` pixels and lands in the cell under its center. Draws outside
//! the grid are clipped. This module is pure (no I/O).

use crate::core::GlyphSink;
use crate::fb::{Cell, CellStyle, FrameBuffer, Rgb};
use crate::types::{Color, GlyphId, WORLD_HEIGHT, WORLD_WIDTH};

/// Glyph bitmap size in pixels before scaling.
pub const GLYPH_PIXELS: f32 = 64.0;

pub struct GlyphCanvas {
    fb: FrameBuffer,
    background: Rgb,
}

impl GlyphCanvas {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            fb: FrameBuffer::new(width, height),
            background: Rgb::default(),
        }
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.fb.resize(width, height);
    }

    pub fn framebuffer(&self) -> &FrameBuffer {
        &self.fb
    }

    pub fn framebuffer_mut(&mut self) -> &mut FrameBuffer {
        &mut self.fb
    }

    /// Cell under world pixel `(x, y)`, if on screen.
    pub fn cell_at(&self, x: f32, y: f32) -> Option<(u16, u16)> {
        if x < 0.0 || y < 0.0 {
            return None;
        }
        let col = (x * self.fb.width() as f32 / WORLD_WIDTH as f32) as u32;
        let row = (y * self.fb.height() as f32 / WORLD_HEIGHT as f32) as u32;
        if col >= self.fb.width() as u32 || row >= self.fb.height() as u32 {
            return None;
        }
        Some((col as u16, row as u16))
    }

    /// Outline the world rectangle with `ch`.
    pub fn outline(&mut self, x: f32, y: f32, w: f32, h: f32, ch: char, color: Color) {
        let (Some((x0, y0)), Some((x1, y1))) = (
            self.clamped_cell(x, y),
            self.clamped_cell(x + w, y + h),
        ) else {
            return;
        };
        let style = self.style(color);
        for cx in x0..=x1 {
            self.fb.set(cx, y0, Cell { ch, style });
            self.fb.set(cx, y1, Cell { ch, style });
        }
        for cy in y0..=y1 {
            self.fb.set(x0, cy, Cell { ch, style });
            self.fb.set(x1, cy, Cell { ch, style });
        }
    }

    fn clamped_cell(&self, x: f32, y: f32) -> Option<(u16, u16)> {
        let (w, h) = (self.fb.width(), self.fb.height());
        if w == 0 || h == 0 {
            return None;
        }
        let col = (x * w as f32 / WORLD_WIDTH as f32).clamp(0.0, (w - 1) as f32);
        let row = (y * h as f32 / WORLD_HEIGHT as f32).clamp(0.0, (h - 1) as f32);
        Some((col as u16, row as u16))
    }

    fn style(&self, color: Color) -> CellStyle {
        CellStyle {
            fg: color.into(),
            bg: self.background,
        }
    }
}

impl GlyphSink for GlyphCanvas {
    fn clear_screen(&mut self, color: Color) {
        self.background = color.into();
        self.fb.fill(Cell::blank(self.background));
    }

    fn draw_glyph(&mut self, x: i32, y: i32, scale: f32, color: Color, glyph: GlyphId) {
        let half = GLYPH_PIXELS * scale / 2.0;
        let Some((col, row)) = self.cell_at(x as f32 + half, y as f32 + half) else {
            return;
        };
        let ch = char::from_u32(glyph as u32).unwrap_or('?');
        let style = self.style(color);
        self.fb.set(col, row, Cell { ch, style });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> GlyphCanvas {
        // One cell per 16x16 world pixels.
        GlyphCanvas::new(80, 45)
    }

    #[test]
    fn test_glyph_lands_under_its_center() {
        let mut c = canvas();
        c.clear_screen(Color::BLACK);
        c.draw_glyph(0, 0, 0.25, Color::RED, b'A' as GlyphId);
        c.draw_glyph(160, 32, 0.25, Color::GREEN, b'B' as GlyphId);

        let a = c.framebuffer().get(0, 0).unwrap();
        assert_eq!(a.ch, 'A');
        assert_eq!(a.style.fg, Rgb::new(0xff, 0, 0));
        assert_eq!(c.framebuffer().get(10, 2).unwrap().ch, 'B');
    }

    #[test]
    fn test_off_screen_draws_are_clipped() {
        let mut c = canvas();
        c.clear_screen(Color::BLACK);
        c.draw_glyph(-40, 10, 0.25, Color::WHITE, b'X' as GlyphId);
        c.draw_glyph(1300, 10, 0.25, Color::WHITE, b'X' as GlyphId);
        c.draw_glyph(10, 800, 0.25, Color::WHITE, b'X' as GlyphId);
        assert!(c.framebuffer().cells().iter().all(|cell| cell.ch == ' '));
    }

    #[test]
    fn test_clear_sets_background_for_later_glyphs() {
        let mut c = canvas();
        c.clear_screen(Color::AZURE);
        c.draw_glyph(0, 0, 0.25, Color::WHITE, b'#' as GlyphId);
        let bg = Rgb::from(Color::AZURE);
        assert!(c.framebuffer().cells().iter().all(|cell| cell.style.bg == bg));
    }

    #[test]
    fn test_outline_clamps_to_grid() {
        let mut c = GlyphCanvas::new(8, 4);
        c.clear_screen(Color::BLACK);
        c.outline(-100.0, -100.0, 5000.0, 5000.0, '.', Color::RED);
        let fb = c.framebuffer();
        assert_eq!(fb.get(0, 0).unwrap().ch, '.');
        assert_eq!(fb.get(7, 3).unwrap().ch, '.');
        assert_eq!(fb.get(3, 1).unwrap().ch, ' ');
    }
}
