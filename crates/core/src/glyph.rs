//! Glyph instances and the position types that select them.
//!
//! A glyph instance is one positioned, colored character cell. The 2D and 3D
//! variants are separate types; the engine stores whichever matches its active
//! render mode and never mixes them. [`Position`] ties a coordinate type to its
//! glyph type, so `create_object(&[Vec2 { .. }], ..)` picks 2D storage at
//! compile time.
//!
//! Free-slot representation: a slot whose glyph id is [`EMPTY_GLYPH`] is free.
//! `Default` produces exactly that, so zeroing a slot releases it. This is why
//! ids below [`GLYPH_ID_MIN`] can never be stored by callers.

use std::fmt::Debug;
use std::ops::{Add, Neg, Sub};

use crate::layer::{Layer, Storage};
use crate::types::{Color, GlyphId, RenderMode, Vec2, Vec3, EMPTY_GLYPH, GLYPH_ID_MIN};

/// Coordinate type of one render mode.
pub trait Position:
    Copy + Debug + PartialEq + Add<Output = Self> + Sub<Output = Self> + Neg<Output = Self>
{
    const MODE: RenderMode;
    const ZERO: Self;

    type Glyph: Glyph<Pos = Self>;

    /// Screen-plane coordinates. 3D positions drop `z`.
    fn xy(self) -> (f32, f32);
    fn to_vec3(self) -> Vec3;
    fn from_vec3(v: Vec3) -> Self;
    fn is_near_zero(&self) -> bool;
}

impl Position for Vec2 {
    const MODE: RenderMode = RenderMode::TwoD;
    const ZERO: Self = Vec2::ZERO;

    type Glyph = Glyph2;

    fn xy(self) -> (f32, f32) {
        (self.x, self.y)
    }

    fn to_vec3(self) -> Vec3 {
        Vec3::new(self.x, self.y, 0.0)
    }

    fn from_vec3(v: Vec3) -> Self {
        Vec2::new(v.x, v.y)
    }

    fn is_near_zero(&self) -> bool {
        Vec2::is_near_zero(self)
    }
}

impl Position for Vec3 {
    const MODE: RenderMode = RenderMode::ThreeD;
    const ZERO: Self = Vec3::ZERO;

    type Glyph = Glyph3;

    fn xy(self) -> (f32, f32) {
        (self.x, self.y)
    }

    fn to_vec3(self) -> Vec3 {
        self
    }

    fn from_vec3(v: Vec3) -> Self {
        v
    }

    fn is_near_zero(&self) -> bool {
        Vec3::is_near_zero(self)
    }
}

/// Behaviour shared by both glyph instance types.
pub trait Glyph: Copy + Default + Debug + PartialEq {
    const MODE: RenderMode;

    type Pos: Position;

    /// A visible glyph.
    fn new(pos: Self::Pos, color: Color, id: GlyphId) -> Self;

    fn pos(&self) -> Self::Pos;
    fn set_pos(&mut self, pos: Self::Pos);
    fn id(&self) -> GlyphId;
    fn color(&self) -> Color;
    fn set_color(&mut self, color: Color);
    fn is_visible(&self) -> bool;
    fn set_visible(&mut self, visible: bool);

    /// Per-mode buffers inside the engine storage, if this mode is active.
    fn layer(storage: &Storage) -> Option<&Layer<Self>>;
    fn layer_mut(storage: &mut Storage) -> Option<&mut Layer<Self>>;

    fn is_free(&self) -> bool {
        self.id() == EMPTY_GLYPH
    }

    /// Visible and not carrying a reserved id.
    fn is_drawable(&self) -> bool {
        self.is_visible() && self.id() >= GLYPH_ID_MIN
    }

    fn translate(&mut self, delta: Self::Pos) {
        let pos = self.pos();
        self.set_pos(pos + delta);
    }
}

/// Glyph instance in 2D space.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Glyph2 {
    pub pos: Vec2,
    pub color: Color,
    pub visible: bool,
    pub id: GlyphId,
}

/// Glyph instance in 3D space.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Glyph3 {
    pub pos: Vec3,
    pub color: Color,
    pub visible: bool,
    pub id: GlyphId,
}

macro_rules! impl_glyph {
    ($glyph:ty, $pos:ty, $mode:expr, $variant:ident) => {
        impl Glyph for $glyph {
            const MODE: RenderMode = $mode;

            type Pos = $pos;

            fn new(pos: $pos, color: Color, id: GlyphId) -> Self {
                Self {
                    pos,
                    color,
                    visible: true,
                    id,
                }
            }

            #[inline]
            fn pos(&self) -> $pos {
                self.pos
            }

            #[inline]
            fn set_pos(&mut self, pos: $pos) {
                self.pos = pos;
            }

            #[inline]
            fn id(&self) -> GlyphId {
                self.id
            }

            #[inline]
            fn color(&self) -> Color {
                self.color
            }

            fn set_color(&mut self, color: Color) {
                self.color = color;
            }

            #[inline]
            fn is_visible(&self) -> bool {
                self.visible
            }

            fn set_visible(&mut self, visible: bool) {
                self.visible = visible;
            }

            fn layer(storage: &Storage) -> Option<&Layer<Self>> {
                match storage {
                    Storage::$variant(layer) => Some(layer),
                    _ => None,
                }
            }

            fn layer_mut(storage: &mut Storage) -> Option<&mut Layer<Self>> {
                match storage {
                    Storage::$variant(layer) => Some(layer),
                    _ => None,
                }
            }
        }
    };
}

impl_glyph!(Glyph2, Vec2, RenderMode::TwoD, TwoD);
impl_glyph!(Glyph3, Vec3, RenderMode::ThreeD, ThreeD);

/// One entry of a static glyph table: id, color and local position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphInfo<P> {
    pub id: GlyphId,
    pub color: Color,
    pub pos: P,
}

impl<P> GlyphInfo<P> {
    pub const fn new(id: GlyphId, color: Color, pos: P) -> Self {
        Self { id, color, pos }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_free_slot() {
        assert!(Glyph2::default().is_free());
        assert!(Glyph3::default().is_free());
        assert!(!Glyph2::default().is_drawable());
    }

    #[test]
    fn test_slot_sizes_fit_byte_budgets() {
        assert_eq!(std::mem::size_of::<Glyph2>(), 16);
        assert_eq!(std::mem::size_of::<Glyph3>(), 20);
    }

    #[test]
    fn test_drawable_rules() {
        let mut g = Glyph2::new(Vec2::new(1.0, 2.0), Color::RED, b'A' as GlyphId);
        assert!(g.is_drawable());

        g.set_visible(false);
        assert!(!g.is_drawable());

        let control = Glyph2::new(Vec2::ZERO, Color::RED, 31);
        assert!(!control.is_drawable());
        assert!(!control.is_free());
    }

    #[test]
    fn test_translate() {
        let mut g = Glyph3::new(Vec3::new(1.0, 1.0, 1.0), Color::WHITE, 64);
        g.translate(Vec3::new(2.0, -1.0, 0.5));
        assert_eq!(g.pos, Vec3::new(3.0, 0.0, 1.5));
    }

    #[test]
    fn test_position_projection_drops_z() {
        assert_eq!(Vec3::new(4.0, 5.0, 6.0).xy(), (4.0, 5.0));
        assert_eq!(Vec2::from_vec3(Vec3::new(1.0, 2.0, 3.0)), Vec2::new(1.0, 2.0));
    }
}
