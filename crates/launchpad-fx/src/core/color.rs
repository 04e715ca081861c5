//! Color types.
//!
//! `Color` is the straight-alpha RGBA color every surface draws with
//! (components in 0.0-1.0). `Rgb` is the 0-255 color space the text morph
//! blends in, matching CSS `rgb()` semantics.

use serde::{Deserialize, Serialize};

use crate::error::FxError;

/// Straight-alpha RGBA color, components in 0.0-1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create a fully opaque color from 0-255 components.
    pub fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgba8(r, g, b, 255)
    }

    pub fn rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: a as f32 / 255.0,
        }
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(hex: &str) -> Result<Self, FxError> {
        let invalid = || FxError::InvalidColor(hex.to_string());
        let digits = hex.strip_prefix('#').ok_or_else(invalid)?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let byte = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
        match digits.len() {
            3 => {
                let mut c = [0u8; 3];
                for (i, ch) in digits.chars().enumerate() {
                    let v = byte(&ch.to_string())?;
                    c[i] = v * 17;
                }
                Ok(Self::rgb8(c[0], c[1], c[2]))
            }
            6 | 8 => {
                let r = byte(&digits[0..2])?;
                let g = byte(&digits[2..4])?;
                let b = byte(&digits[4..6])?;
                let a = if digits.len() == 8 { byte(&digits[6..8])? } else { 255 };
                Ok(Self::rgba8(r, g, b, a))
            }
            _ => Err(invalid()),
        }
    }

    /// `#rrggbb` (alpha dropped when opaque, appended otherwise).
    pub fn to_hex(self) -> String {
        let [r, g, b, a] = self.to_rgba8();
        if a == 255 {
            format!("#{r:02x}{g:02x}{b:02x}")
        } else {
            format!("#{r:02x}{g:02x}{b:02x}{a:02x}")
        }
    }

    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }

    /// CSS `rgba(...)` string for Canvas2D style setters.
    pub fn to_css(self) -> String {
        let [r, g, b, _] = self.to_rgba8();
        format!("rgba({r}, {g}, {b}, {})", self.a.clamp(0.0, 1.0))
    }

    /// Component-wise interpolation, exact at both ends.
    pub fn lerp(self, other: Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: f32, b: f32| a * (1.0 - t) + b * t;
        Color::new(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
            mix(self.a, other.a),
        )
    }

    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl TryFrom<String> for Color {
    type Error = FxError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::from_hex(value.trim())
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

/// RGB color in 0-255 float space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// `self * (1 - w) + target * w`; returns `target` bit-for-bit at `w == 1`.
    pub fn lerp(self, target: Rgb, w: f32) -> Rgb {
        let w = w.clamp(0.0, 1.0);
        let mix = |a: f32, b: f32| a * (1.0 - w) + b * w;
        Rgb::new(mix(self.r, target.r), mix(self.g, target.g), mix(self.b, target.b))
    }

    /// Rounded to whole channel values, as a canvas `rgb()` would draw it.
    pub fn to_rgb8(self) -> [u8; 3] {
        let q = |v: f32| v.clamp(0.0, 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b)]
    }

    pub fn to_color(self) -> Color {
        let [r, g, b] = self.to_rgb8();
        Color::rgb8(r, g, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_six_digit_hex() {
        let c = Color::from_hex("#6366f1").unwrap();
        assert_eq!(c.to_rgba8(), [0x63, 0x66, 0xf1, 255]);
    }

    #[test]
    fn parses_short_hex() {
        let c = Color::from_hex("#fff").unwrap();
        assert_eq!(c, Color::WHITE);
    }

    #[test]
    fn rejects_garbage() {
        assert!(Color::from_hex("6366f1").is_err());
        assert!(Color::from_hex("#12345").is_err());
        assert!(Color::from_hex("#zzzzzz").is_err());
    }

    #[test]
    fn rejects_sign_prefixed_digits() {
        assert!(Color::from_hex("#+f+f+f").is_err());
        assert!(Color::from_hex("#+ff").is_err());
        assert!(Color::from_hex("#-1-1-1").is_err());
    }

    #[test]
    fn hex_round_trips_through_serde() {
        let c: Color = serde_json::from_str("\"#00a9ff\"").unwrap();
        assert_eq!(serde_json::to_string(&c).unwrap(), "\"#00a9ff\"");
    }

    #[test]
    fn css_string_keeps_fractional_alpha() {
        let css = Color::rgb8(0, 169, 255).with_alpha(0.25).to_css();
        assert_eq!(css, "rgba(0, 169, 255, 0.25)");
    }

    #[test]
    fn rgb_lerp_hits_target_exactly() {
        let start = Rgb::new(12.3, 200.7, 99.9);
        let target = Rgb::new(250.1, 3.3, 180.0);
        assert_eq!(start.lerp(target, 1.0), target);
        assert_eq!(start.lerp(target, 0.0), start);
    }
}
