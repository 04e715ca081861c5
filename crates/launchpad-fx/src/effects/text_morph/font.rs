//! Word rasterization for the text morph.
//!
//! The browser bridge rasterizes with the page's real fonts through an
//! offscreen canvas. [`BitmapFont`] is the host-free fallback used
//! headlessly: a 5x7 dot-matrix face scaled to the requested font size.

use super::mask::AlphaMask;
use crate::error::FxResult;

/// Renders a single line of text, centered, into an alpha mask.
pub trait GlyphRasterizer {
    fn rasterize(&mut self, text: &str, font_px: f32, width: u32, height: u32) -> FxResult<AlphaMask>;
}

/// Font size for a word: long words shrink so they still fit.
pub fn font_size_for(word: &str, compact: bool) -> f32 {
    let base = if compact { 40.0 } else { 100.0 };
    let len = word.chars().count();
    if len > 15 {
        base * 0.6
    } else if len > 10 {
        base * 0.8
    } else {
        base
    }
}

const GLYPH_COLS: u32 = 5;
const GLYPH_ROWS: usize = 7;

/// 5x7 dot-matrix font covering A-Z, 0-9 and a little punctuation.
/// Lowercase letters render as uppercase; unknown characters as blanks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BitmapFont {
    /// Gap between glyphs, in dots.
    pub spacing: f32,
    /// Dot size as a fraction of the font size.
    pub dot_scale: f32,
}

impl Default for BitmapFont {
    fn default() -> Self {
        Self {
            spacing: 1.0,
            dot_scale: 0.1,
        }
    }
}

impl BitmapFont {
    pub fn new() -> Self {
        Self::default()
    }

    /// Width and height of `text` in CSS pixels at `font_px`.
    pub fn measure(&self, text: &str, font_px: f32) -> (f32, f32) {
        let dot = self.dot(font_px);
        let n = text.chars().count() as f32;
        if n == 0.0 {
            return (0.0, 0.0);
        }
        let width = n * GLYPH_COLS as f32 * dot + (n - 1.0) * self.spacing * dot;
        (width, GLYPH_ROWS as f32 * dot)
    }

    fn dot(&self, font_px: f32) -> f32 {
        (font_px * self.dot_scale).max(1.0)
    }
}

impl GlyphRasterizer for BitmapFont {
    fn rasterize(&mut self, text: &str, font_px: f32, width: u32, height: u32) -> FxResult<AlphaMask> {
        let mut mask = AlphaMask::new(width, height);
        let dot = self.dot(font_px);
        let (text_w, text_h) = self.measure(text, font_px);
        let origin_x = width as f32 / 2.0 - text_w / 2.0;
        let origin_y = height as f32 / 2.0 - text_h / 2.0;
        let advance = (GLYPH_COLS as f32 + self.spacing) * dot;

        for (i, c) in text.chars().enumerate() {
            let Some(rows) = glyph(c) else { continue };
            let glyph_x = origin_x + i as f32 * advance;
            for (row, bits) in rows.iter().enumerate() {
                for col in 0..GLYPH_COLS {
                    if bits & (0b10000 >> col) == 0 {
                        continue;
                    }
                    let x0 = glyph_x + col as f32 * dot;
                    let y0 = origin_y + row as f32 * dot;
                    fill_dot(&mut mask, x0, y0, dot);
                }
            }
        }
        Ok(mask)
    }
}

/// Mark every pixel whose center falls inside the square dot.
fn fill_dot(mask: &mut AlphaMask, x0: f32, y0: f32, size: f32) {
    let span = |start: f32, limit: u32| {
        let lo = (start - 0.5).ceil().max(0.0) as u32;
        let hi = ((start + size - 0.5).ceil().max(0.0) as u32).min(limit);
        lo..hi
    };
    for y in span(y0, mask.height()) {
        for x in span(x0, mask.width()) {
            mask.set(x, y, 255);
        }
    }
}

/// Rows top to bottom; bit 4 is the leftmost dot.
fn glyph(c: char) -> Option<[u8; GLYPH_ROWS]> {
    let rows = match c.to_ascii_uppercase() {
        'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'B' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110],
        'C' => [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
        'D' => [0b11100, 0b10010, 0b10001, 0b10001, 0b10001, 0b10010, 0b11100],
        'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        'F' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000],
        'G' => [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111],
        'H' => [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'I' => [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        'J' => [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100],
        'K' => [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001],
        'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'M' => [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001],
        'N' => [0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001],
        'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'P' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000],
        'Q' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101],
        'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        'S' => [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
        'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'V' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
        'W' => [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010],
        'X' => [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001],
        'Y' => [0b10001, 0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100],
        'Z' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111],
        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
        '3' => [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110],
        '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        '.' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b01100, 0b01100],
        '-' => [0b00000, 0b00000, 0b00000, 0b11111, 0b00000, 0b00000, 0b00000],
        '!' => [0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00000, 0b00100],
        '?' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b00000, 0b00100],
        _ => return None,
    };
    Some(rows)
}
