//! Cell state constants and the [`Rgb`] colour triple.

use std::fmt;

/// Value stored for a dead cell.
pub const DEAD: u8 = 0;

/// Value stored for a live cell in the baseline binary rule.
pub const ALIVE: u8 = 1;

/// Whether a stored cell value counts as alive.
///
/// Any non-zero value is alive, leaving room for multi-state rules that
/// encode an alive sub-state in the byte.
#[inline]
pub fn is_alive(value: u8) -> bool {
    value != DEAD
}

/// An 8-bit-per-channel display colour produced by a color rule.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
    /// Red component.
    pub r: u8,
    /// Green component.
    pub g: u8,
    /// Blue component.
    pub b: u8,
}

impl Rgb {
    /// Opaque black.
    pub const BLACK: Self = Self::new(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Construct a colour from its components.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Construct a colour from unit-range floats, clamping each component.
    ///
    /// NaN components map to 0.
    pub fn from_unit(r: f32, g: f32, b: f32) -> Self {
        fn channel(v: f32) -> u8 {
            if v.is_nan() {
                return 0;
            }
            (v.clamp(0.0, 1.0) * 255.0).round() as u8
        }
        Self::new(channel(r), channel(g), channel(b))
    }

    /// Linear interpolation between two colours, `t` clamped to `[0, 1]`.
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Self::new(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
        )
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}
