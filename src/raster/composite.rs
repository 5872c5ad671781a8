//! Compositing operators for straight-alpha RGBA8 pixels.
//!
//! Every operator has the shape `(dst, src, opacity) -> dst'`. Separable
//! blend modes use the W3C compositing formula
//! `Co = (as*(1-ab)*Cs + as*ab*B(Cb, Cs) + (1-as)*ab*Cb) / ao`
//! with `as` already scaled by opacity. `Copy` and `Erase` are the two
//! non-blending operators used by the shadow pipeline.

use std::fmt;

/// Straight-alpha RGBA8 color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color { r, g, b, a }
    }

    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Parses `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(text: &str) -> Option<Self> {
        let hex = text.strip_prefix('#')?;
        if !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        match hex.len() {
            6 => Some(Color::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Some(Color::rgba(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
    }
}

/// Exact `a * b / 255` with rounding.
#[inline]
pub fn mul_u8(a: u8, b: u8) -> u8 {
    let t = a as u32 * b as u32 + 128;
    (((t >> 8) + t) >> 8) as u8
}

/// Linear interpolation from `a` to `b` by `t / 255`.
#[inline]
pub fn lerp_u8(a: u8, b: u8, t: u8) -> u8 {
    let diff = b as i32 - a as i32;
    let step = (diff * t as i32 + if diff >= 0 { 127 } else { -127 }) / 255;
    (a as i32 + step) as u8
}

/// Converts a 0..=100 percentage into a 0..=255 opacity.
#[inline]
pub fn percent_to_u8(percent: i32) -> u8 {
    ((percent.clamp(0, 100) * 255 + 50) / 100) as u8
}

/// Compositing operators known to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompositeOp {
    Normal,
    Multiply,
    Screen,
    Overlay,
    Darken,
    Lighten,
    Add,
    Subtract,
    Difference,
    ColorDodge,
    ColorBurn,
    HardLight,
    Copy,
    Erase,
}

impl CompositeOp {
    pub const ALL: [CompositeOp; 14] = [
        CompositeOp::Normal,
        CompositeOp::Multiply,
        CompositeOp::Screen,
        CompositeOp::Overlay,
        CompositeOp::Darken,
        CompositeOp::Lighten,
        CompositeOp::Add,
        CompositeOp::Subtract,
        CompositeOp::Difference,
        CompositeOp::ColorDodge,
        CompositeOp::ColorBurn,
        CompositeOp::HardLight,
        CompositeOp::Copy,
        CompositeOp::Erase,
    ];

    /// Resolves a blend-mode identifier.
    pub fn from_id(id: &str) -> Option<Self> {
        let op = match id {
            "normal" | "over" => CompositeOp::Normal,
            "multiply" => CompositeOp::Multiply,
            "screen" => CompositeOp::Screen,
            "overlay" => CompositeOp::Overlay,
            "darken" => CompositeOp::Darken,
            "lighten" => CompositeOp::Lighten,
            "add" | "linear_dodge" => CompositeOp::Add,
            "subtract" => CompositeOp::Subtract,
            "difference" | "diff" => CompositeOp::Difference,
            "color_dodge" | "dodge" => CompositeOp::ColorDodge,
            "color_burn" | "burn" => CompositeOp::ColorBurn,
            "hard_light" => CompositeOp::HardLight,
            "copy" => CompositeOp::Copy,
            "erase" => CompositeOp::Erase,
            _ => return None,
        };
        Some(op)
    }

    pub fn id(self) -> &'static str {
        match self {
            CompositeOp::Normal => "normal",
            CompositeOp::Multiply => "multiply",
            CompositeOp::Screen => "screen",
            CompositeOp::Overlay => "overlay",
            CompositeOp::Darken => "darken",
            CompositeOp::Lighten => "lighten",
            CompositeOp::Add => "add",
            CompositeOp::Subtract => "subtract",
            CompositeOp::Difference => "difference",
            CompositeOp::ColorDodge => "color_dodge",
            CompositeOp::ColorBurn => "color_burn",
            CompositeOp::HardLight => "hard_light",
            CompositeOp::Copy => "copy",
            CompositeOp::Erase => "erase",
        }
    }
}

/// Separable blend function on normalized channels.
#[inline]
fn blend_channel(op: CompositeOp, cb: f32, cs: f32) -> f32 {
    match op {
        CompositeOp::Multiply => cb * cs,
        CompositeOp::Screen => cb + cs - cb * cs,
        CompositeOp::Overlay => hard_light(cs, cb),
        CompositeOp::Darken => cb.min(cs),
        CompositeOp::Lighten => cb.max(cs),
        CompositeOp::Add => (cb + cs).min(1.0),
        CompositeOp::Subtract => (cb - cs).max(0.0),
        CompositeOp::Difference => (cb - cs).abs(),
        CompositeOp::ColorDodge => {
            if cb <= 0.0 {
                0.0
            } else if cs >= 1.0 {
                1.0
            } else {
                (cb / (1.0 - cs)).min(1.0)
            }
        }
        CompositeOp::ColorBurn => {
            if cb >= 1.0 {
                1.0
            } else if cs <= 0.0 {
                0.0
            } else {
                1.0 - ((1.0 - cb) / cs).min(1.0)
            }
        }
        CompositeOp::HardLight => hard_light(cb, cs),
        CompositeOp::Normal | CompositeOp::Copy | CompositeOp::Erase => cs,
    }
}

#[inline]
fn hard_light(cb: f32, cs: f32) -> f32 {
    if cs <= 0.5 {
        cb * 2.0 * cs
    } else {
        let s = 2.0 * cs - 1.0;
        cb + s - cb * s
    }
}

/// Composites `src` onto `dst` in place.
#[inline]
pub fn composite(op: CompositeOp, dst: &mut [u8; 4], src: [u8; 4], opacity: u8) {
    match op {
        CompositeOp::Copy => {
            for c in 0..4 {
                dst[c] = lerp_u8(dst[c], src[c], opacity);
            }
        }
        CompositeOp::Erase => {
            let erase = mul_u8(src[3], opacity);
            dst[3] = mul_u8(dst[3], 255 - erase);
        }
        _ => {
            let src_a = mul_u8(src[3], opacity);
            if src_a == 0 {
                return;
            }
            let as_ = src_a as f32 / 255.0;
            let ab = dst[3] as f32 / 255.0;
            let ao = as_ + ab * (1.0 - as_);
            for c in 0..3 {
                let cs = src[c] as f32 / 255.0;
                let cb = dst[c] as f32 / 255.0;
                let mixed = as_ * (1.0 - ab) * cs
                    + as_ * ab * blend_channel(op, cb, cs)
                    + (1.0 - as_) * ab * cb;
                dst[c] = ((mixed / ao).clamp(0.0, 1.0) * 255.0).round() as u8;
            }
            dst[3] = (ao * 255.0).round().clamp(0.0, 255.0) as u8;
        }
    }
}
