//! Cell grid the glyph canvas rasterizes into and the renderer flushes.
//!
//! Colors are kept as 24-bit RGB; the alpha byte of engine colors is dropped
//! on conversion.

use crate::types::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl From<Color> for Rgb {
    fn from(c: Color) -> Self {
        Rgb::new(c.r(), c.g(), c.b())
    }
}

/// Foreground and background of one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellStyle {
    pub fg: Rgb,
    pub bg: Rgb,
}

impl CellStyle {
    pub fn new(fg: impl Into<Rgb>, bg: impl Into<Rgb>) -> Self {
        Self {
            fg: fg.into(),
            bg: bg.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub style: CellStyle,
}

impl Cell {
    /// Empty cell showing only `bg`.
    pub fn blank(bg: Rgb) -> Self {
        Self {
            ch: ' ',
            style: CellStyle { fg: bg, bg },
        }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::blank(Rgb::default())
    }
}

/// Row-major `width` x `height` grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); area(width, height)],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Change the grid size. Content is not preserved in any meaningful
    /// layout; callers redraw after a resize. The allocation is reused when
    /// it is large enough.
    pub fn resize(&mut self, width: u16, height: u16) {
        if (self.width, self.height) == (width, height) {
            return;
        }
        self.width = width;
        self.height = height;
        self.cells.resize(area(width, height), Cell::default());
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Row `y`, empty when out of range.
    pub fn row(&self, y: u16) -> &[Cell] {
        self.rows().nth(y as usize).unwrap_or(&[])
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.cells.chunks_exact(self.width.max(1) as usize)
    }

    fn index(&self, x: u16, y: u16) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }

    pub fn get(&self, x: u16, y: u16) -> Option<Cell> {
        self.index(x, y).map(|i| self.cells[i])
    }

    /// Write one cell; returns `false` when `(x, y)` is off the grid.
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.cells[i] = cell;
                true
            }
            None => false,
        }
    }

    pub fn fill(&mut self, cell: Cell) {
        self.cells.fill(cell);
    }

    /// Write `s` left to right from `(x, y)`, stopping at the right edge.
    /// Returns the number of cells written.
    pub fn write_str(&mut self, x: u16, y: u16, s: &str, style: CellStyle) -> usize {
        s.chars()
            .zip(x..self.width)
            .filter(|&(ch, cx)| self.set(cx, y, Cell { ch, style }))
            .count()
    }
}

fn area(width: u16, height: u16) -> usize {
    width as usize * height as usize
}
