//! Blend modes used by tint filters.
//!
//! Tinting composites the tint color (source) over the drawable's own color
//! (destination). Compositing is done on premultiplied channels and the
//! result is returned as a straight packed color.

use crate::color::{alpha, argb, blue, green, red, ColorInt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlendMode {
    Clear,
    Src,
    Dst,
    SrcOver,
    DstOver,
    /// Tint color masked by the destination alpha.
    #[default]
    SrcIn,
    DstIn,
    SrcAtop,
    /// Channel-wise multiply, including alpha.
    Modulate,
    Screen,
}

#[derive(Clone, Copy)]
struct Premul {
    r: f32,
    g: f32,
    b: f32,
    a: f32,
}

impl Premul {
    fn from_argb(color: ColorInt) -> Self {
        let a = alpha(color) as f32 / 255.0;
        Self {
            r: red(color) as f32 / 255.0 * a,
            g: green(color) as f32 / 255.0 * a,
            b: blue(color) as f32 / 255.0 * a,
            a,
        }
    }

    fn to_argb(self) -> ColorInt {
        if self.a <= 0.0 {
            return 0;
        }
        let channel = |v: f32| ((v / self.a).clamp(0.0, 1.0) * 255.0).round() as u8;
        argb(
            (self.a.clamp(0.0, 1.0) * 255.0).round() as u8,
            channel(self.r),
            channel(self.g),
            channel(self.b),
        )
    }

    /// `src * fs + dst * fd` on every channel.
    fn combine(src: Self, fs: f32, dst: Self, fd: f32) -> Self {
        Self {
            r: src.r * fs + dst.r * fd,
            g: src.g * fs + dst.g * fd,
            b: src.b * fs + dst.b * fd,
            a: src.a * fs + dst.a * fd,
        }
    }

    fn zip(src: Self, dst: Self, f: impl Fn(f32, f32) -> f32) -> Self {
        Self {
            r: f(src.r, dst.r),
            g: f(src.g, dst.g),
            b: f(src.b, dst.b),
            a: f(src.a, dst.a),
        }
    }
}

impl BlendMode {
    /// Composite `src` onto `dst`.
    pub fn blend(self, src: ColorInt, dst: ColorInt) -> ColorInt {
        let s = Premul::from_argb(src);
        let d = Premul::from_argb(dst);
        let out = match self {
            BlendMode::Clear => return 0,
            BlendMode::Src => return src,
            BlendMode::Dst => return dst,
            BlendMode::SrcOver => Premul::combine(s, 1.0, d, 1.0 - s.a),
            BlendMode::DstOver => Premul::combine(s, 1.0 - d.a, d, 1.0),
            BlendMode::SrcIn => Premul::combine(s, d.a, d, 0.0),
            BlendMode::DstIn => Premul::combine(s, 0.0, d, s.a),
            BlendMode::SrcAtop => Premul::combine(s, d.a, d, 1.0 - s.a),
            BlendMode::Modulate => Premul::zip(s, d, |a, b| a * b),
            BlendMode::Screen => Premul::zip(s, d, |a, b| a + b - a * b),
        };
        out.to_argb()
    }
}
