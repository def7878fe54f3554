//! Glyph tables of the bird and the pipe pieces.
//!
//! Positions are local pixel offsets from the sprite's top-left corner, laid
//! out for glyphs drawn at a 16px cell.

use crate::core::GlyphInfo;
use crate::types::{Color, GlyphId, Vec2};

const WHITE: Color = Color::WHITE;
const BLACK: Color = Color::BLACK;
const GOLD: Color = Color::GOLD;
const RED: Color = Color::RED;
const LGREEN: Color = Color::LIGHT_GREEN;
const MGREEN: Color = Color::MID_GREEN;
const DGREEN: Color = Color::DARK_GREEN;

const fn g(ch: u8, color: Color, x: f32, y: f32) -> GlyphInfo<Vec2> {
    GlyphInfo::new(ch as GlyphId, color, Vec2::new(x, y))
}

/// Index of the upper wing glyph.
pub const BIRD_WING_UPPER: usize = 4;
/// Index of the lower wing glyph.
pub const BIRD_WING_LOWER: usize = 5;

/// Wing rows `(upper, lower)` at rest.
pub const WING_REST_Y: (f32, f32) = (9.0, 10.0);
/// Wing rows `(upper, lower)` right after a flap.
pub const WING_FLAP_Y: (f32, f32) = (13.0, 12.0);

pub const BIRD: [GlyphInfo<Vec2>; 16] = [
    g(b'\\', WHITE, 2.0, 33.0),
    g(b'-', WHITE, 14.0, -5.0),
    g(b'-', WHITE, 31.0, -5.0),
    g(b'\\', WHITE, 47.0, 2.0),
    g(b'(', WHITE, -12.0, 9.0),
    g(b'@', GOLD, 3.0, 10.0),
    g(b'O', WHITE, 32.0, 6.0),
    g(b'>', RED, 55.0, 18.0),
    g(b'\'', BLACK, 33.0, 10.0),
    g(b'_', WHITE, 18.0, 32.0),
    g(b'_', WHITE, 33.0, 32.0),
    g(b'/', WHITE, 49.0, 32.0),
    g(b'>', RED, 46.0, 18.0),
    g(b')', WHITE, 17.0, 11.0),
    g(b'B', GOLD, 17.0, 28.0),
    g(b'D', GOLD, 34.0, 28.0),
];

/// Cap drawn on the upper end of a bottom pipe.
pub const PIPE_HEAD_TOP: [GlyphInfo<Vec2>; 37] = [
    g(b'_', LGREEN, 0.0, -14.0),
    g(b'_', LGREEN, 16.0, -14.0),
    g(b'_', LGREEN, 32.0, -14.0),
    g(b'_', LGREEN, 48.0, -14.0),
    g(b'_', LGREEN, 64.0, -14.0),
    g(b'#', DGREEN, 42.0, 12.0),
    g(b'E', DGREEN, 58.0, 12.0),
    g(b'#', DGREEN, 42.0, 28.0),
    g(b'E', DGREEN, 58.0, 28.0),
    g(b'_', DGREEN, 1.0, -2.0),
    g(b']', DGREEN, 16.0, 12.0),
    g(b']', DGREEN, 16.0, 28.0),
    g(b'!', MGREEN, 28.0, 12.0),
    g(b'!', MGREEN, 28.0, 28.0),
    g(b'#', MGREEN, 2.0, 28.0),
    g(b'"', MGREEN, 2.0, 17.0),
    g(b'=', MGREEN, 3.0, 0.0),
    g(b'=', MGREEN, 22.0, 0.0),
    g(b'=', MGREEN, 42.0, 0.0),
    g(b'=', MGREEN, 61.0, 0.0),
    g(b'`', MGREEN, 66.0, 16.0),
    g(b'`', MGREEN, 66.0, 25.0),
    g(b'`', MGREEN, 66.0, 34.0),
    g(b'|', LGREEN, -10.0, 1.0),
    g(b'|', LGREEN, 72.0, 1.0),
    g(b'|', LGREEN, -10.0, 17.0),
    g(b'|', LGREEN, 72.0, 17.0),
    g(b'|', LGREEN, -10.0, 33.0),
    g(b'|', LGREEN, 72.0, 33.0),
    g(b'T', LGREEN, 0.0, 45.0),
    g(b'=', LGREEN, 16.0, 41.0),
    g(b'=', LGREEN, 32.0, 41.0),
    g(b'=', LGREEN, 48.0, 41.0),
    g(b'T', LGREEN, 62.0, 45.0),
    g(b'_', MGREEN, 14.0, 41.0),
    g(b'_', MGREEN, 32.0, 41.0),
    g(b'_', MGREEN, 50.0, 41.0),
];

/// Cap drawn on the lower end of a top pipe.
pub const PIPE_HEAD_BOTTOM: [GlyphInfo<Vec2>; 39] = [
    g(b'_', MGREEN, 14.0, -23.0),
    g(b'_', MGREEN, 32.0, -23.0),
    g(b'_', MGREEN, 50.0, -23.0),
    g(b'-', LGREEN, 0.0, -5.0),
    g(b'=', LGREEN, 16.0, -7.0),
    g(b'=', LGREEN, 32.0, -7.0),
    g(b'=', LGREEN, 48.0, -7.0),
    g(b'-', LGREEN, 62.0, -5.0),
    g(b'|', LGREEN, -10.0, 33.0),
    g(b'|', LGREEN, 72.0, 33.0),
    g(b'|', LGREEN, -10.0, 17.0),
    g(b'|', LGREEN, 72.0, 17.0),
    g(b'|', LGREEN, -10.0, 1.0),
    g(b'|', LGREEN, 72.0, 1.0),
    g(b'`', MGREEN, 66.0, 10.0),
    g(b'`', MGREEN, 66.0, 20.0),
    g(b'`', MGREEN, 66.0, 30.0),
    g(b'=', MGREEN, 3.0, 34.0),
    g(b'=', MGREEN, 22.0, 34.0),
    g(b'=', MGREEN, 42.0, 34.0),
    g(b'=', MGREEN, 61.0, 34.0),
    g(b'!', MGREEN, 28.0, 22.0),
    g(b'!', MGREEN, 28.0, 6.0),
    g(b'#', MGREEN, 2.0, 6.0),
    g(b'"', MGREEN, 2.0, 25.0),
    g(b'_', DGREEN, 1.0, 20.0),
    g(b']', DGREEN, 16.0, 22.0),
    g(b']', DGREEN, 16.0, 6.0),
    g(b'#', DGREEN, 42.0, 22.0),
    g(b'E', DGREEN, 58.0, 22.0),
    g(b'#', DGREEN, 42.0, 6.0),
    g(b'E', DGREEN, 58.0, 6.0),
    g(b'_', LGREEN, 0.0, 32.0),
    g(b'_', LGREEN, 16.0, 32.0),
    g(b'_', LGREEN, 32.0, 32.0),
    g(b'_', LGREEN, 48.0, 32.0),
    g(b'_', LGREEN, 64.0, 32.0),
    g(b'|', LGREEN, 0.0, -12.0),
    g(b'|', LGREEN, 62.0, -12.0),
];

/// One 16px slice of pipe body, repeated along the pipe.
pub const PIPE_SECTION: [GlyphInfo<Vec2>; 9] = [
    g(b'|', LGREEN, 0.0, 61.0),
    g(b'-', DGREEN, 10.0, 55.0),
    g(b']', DGREEN, 24.0, 61.0),
    g(b'!', MGREEN, 34.0, 61.0),
    g(b'E', DGREEN, 47.0, 61.0),
    g(b'|', LGREEN, 62.0, 61.0),
    g(b'"', MGREEN, 12.0, 67.0),
    g(b'`', MGREEN, 56.0, 63.0),
    g(b'`', MGREEN, 56.0, 69.0),
];
