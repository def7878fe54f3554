//! Core types module - shared data structures and constants
//!
//! Plain data used by every other crate: vectors, packed colors, the render
//! mode tag, glyph ids and the capacity constants the glyph engine is sized
//! from. Nothing in here allocates or performs I/O.
//!
//! # Glyph ids
//!
//! Glyph ids are printable character codes. Ids below [`GLYPH_ID_MIN`] are
//! reserved: id `0` ([`EMPTY_GLYPH`]) marks a free arena slot, and the engine
//! relies on that marker when it scans for free runs. Callers can never create
//! a glyph with a reserved id.
//!
//! # Capacities
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `ARENA_BYTES` | 8192 | Byte budget of the glyph-instance arena |
//! | `RENDER_BUFFER_BYTES` | 16384 | Byte budget of the per-frame staging buffer |
//! | `OBJECT_TABLE_SIZE` | 32 | Number of glyph object descriptors |
//!
//! Slot counts are derived from the byte budgets and the instance size of the
//! active render mode, so a 3D arena holds fewer instances than a 2D one.
//!
//! # Examples
//!
//! ```
//! use flappy_ascii_types::{Color, RenderMode, Vec2};
//!
//! let c = Color::rgb(0x12, 0x34, 0x56);
//! assert_eq!(c.r(), 0x12);
//! assert_eq!(c.opaque().0 & 0xff, 0xff);
//!
//! let v = Vec2::new(1.0, 2.0) + Vec2::new(3.0, 4.0);
//! assert_eq!(v, Vec2::new(4.0, 6.0));
//!
//! assert_eq!(RenderMode::from_str("3d"), Some(RenderMode::ThreeD));
//! ```

use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub};

/// Glyph identifier (character code).
pub type GlyphId = u16;

/// Glyph id stored in free arena slots.
pub const EMPTY_GLYPH: GlyphId = 0;

/// Smallest glyph id a caller may use. Everything below is reserved.
pub const GLYPH_ID_MIN: GlyphId = 32;

/// Byte budget of the glyph-instance arena.
pub const ARENA_BYTES: usize = 8192;

/// Byte budget of the per-frame render staging buffer.
pub const RENDER_BUFFER_BYTES: usize = 16384;

/// Number of glyph object descriptors.
pub const OBJECT_TABLE_SIZE: usize = 32;

/// Default draw scale handed to the renderer (64px font drawn at 16px).
pub const RENDER_SCALE: f32 = 0.25;

/// Offsets smaller than this are treated as zero.
pub const EPSILON: f32 = 0.0001;

/// World width in pixels.
pub const WORLD_WIDTH: u32 = 1280;

/// World height in pixels.
pub const WORLD_HEIGHT: u32 = 720;

/// Fixed frame time of the game loop in milliseconds.
pub const FRAME_MS: u32 = 7;

/// Packed `0xRRGGBBAA` color. The low byte is ignored and forced opaque when
/// a glyph is submitted to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color(pub u32);

impl Color {
    pub const BLACK: Color = Color(0x0000_0000);
    pub const WHITE: Color = Color(0xffff_ff00);
    pub const WARM_WHITE: Color = Color(0xe0e0_ce00);
    pub const RED: Color = Color(0xff00_0000);
    pub const GREEN: Color = Color(0x00ff_0000);
    pub const BLUE: Color = Color(0x0000_ff00);
    pub const YELLOW: Color = Color(0xfce8_0300);
    pub const GOLD: Color = Color(0xfcd3_0300);
    pub const PURPLE: Color = Color(0xa103_fc00);
    pub const AZURE: Color = Color(0x03ec_fc00);
    pub const OLIVE: Color = Color(0x0175_0500);
    pub const DARK_GRAY: Color = Color(0x4040_4000);
    pub const LIGHT_GREEN: Color = Color(0x40d8_0000);
    pub const MID_GREEN: Color = Color(0x0d70_0000);
    pub const DARK_GREEN: Color = Color(0x0030_0000);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color(((r as u32) << 24) | ((g as u32) << 16) | ((b as u32) << 8))
    }

    pub const fn r(self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub const fn g(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub const fn b(self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// Same RGB with the alpha byte forced to `0xff`.
    pub const fn opaque(self) -> Self {
        Color((self.0 & 0xffff_ff00) | 0xff)
    }
}

/// Active glyph dimensionality. The engine holds exactly one mode at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderMode {
    TwoD,
    ThreeD,
}

impl RenderMode {
    /// Parse from string ("2d" / "3d", case-insensitive).
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "2d" => Some(RenderMode::TwoD),
            "3d" => Some(RenderMode::ThreeD),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RenderMode::TwoD => "2d",
            RenderMode::ThreeD => "3d",
        }
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 2D position or offset.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn is_near_zero(&self) -> bool {
        self.x.abs() <= EPSILON && self.y.abs() <= EPSILON
    }
}

/// 3D position or offset.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn is_near_zero(&self) -> bool {
        self.x.abs() <= EPSILON && self.y.abs() <= EPSILON && self.z.abs() <= EPSILON
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;
    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, rhs: Vec3) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

/// Player-facing actions produced by the input layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    /// Leave the start screen, or exit from the game-over screen
    Confirm,
    /// Give the bird an updraft
    Flap,
    /// Restart the run
    Reset,
    /// Show or hide collision boxes
    ToggleHitboxes,
}

impl GameAction {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "confirm" => Some(GameAction::Confirm),
            "flap" => Some(GameAction::Flap),
            "reset" => Some(GameAction::Reset),
            "togglehitboxes" => Some(GameAction::ToggleHitboxes),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::Confirm => "confirm",
            GameAction::Flap => "flap",
            GameAction::Reset => "reset",
            GameAction::ToggleHitboxes => "toggleHitboxes",
        }
    }
}
