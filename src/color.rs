//! Color types.
//!
//! Drawables resolve colors as packed 32-bit ARGB integers ([`ColorInt`]).
//! The canvas records [`Color`] values with normalized float channels.

/// Packed `0xAARRGGBB` color.
pub type ColorInt = u32;

/// Alpha channel of a packed color.
pub const fn alpha(color: ColorInt) -> u8 {
    (color >> 24) as u8
}

pub const fn red(color: ColorInt) -> u8 {
    (color >> 16) as u8
}

pub const fn green(color: ColorInt) -> u8 {
    (color >> 8) as u8
}

pub const fn blue(color: ColorInt) -> u8 {
    color as u8
}

pub const fn argb(a: u8, r: u8, g: u8, b: u8) -> ColorInt {
    (a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32
}

/// Replace the alpha channel of a packed color.
pub const fn with_alpha(color: ColorInt, alpha: u8) -> ColorInt {
    (color & 0x00FF_FFFF) | (alpha as u32) << 24
}

/// Scale `src` alpha by `dst` alpha, both in `0..=255`.
///
/// `dst` is widened to `0..=256` so that 255 leaves `src` untouched.
pub const fn modulate_alpha(src: u8, dst: u8) -> u8 {
    let multiplier = dst as u32 + (dst as u32 >> 7);
    ((src as u32 * multiplier) >> 8) as u8
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_argb(color: ColorInt) -> Self {
        Self {
            r: red(color) as f32 / 255.0,
            g: green(color) as f32 / 255.0,
            b: blue(color) as f32 / 255.0,
            a: alpha(color) as f32 / 255.0,
        }
    }

    pub fn to_argb(&self) -> ColorInt {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        argb(
            channel(self.a),
            channel(self.r),
            channel(self.g),
            channel(self.b),
        )
    }

    /// Multiply the alpha channel by `opacity` (0.0-1.0).
    pub fn with_opacity(self, opacity: f32) -> Self {
        Self {
            a: self.a * opacity.clamp(0.0, 1.0),
            ..self
        }
    }

    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);
}

impl Default for Color {
    fn default() -> Self {
        Self::TRANSPARENT
    }
}

impl From<ColorInt> for Color {
    fn from(color: ColorInt) -> Self {
        Color::from_argb(color)
    }
}
