//! The drawing seam.
//!
//! Effects never touch a canvas directly: they draw through [`Surface`],
//! which has three implementations: the browser's Canvas2D (in
//! `launchpad-web`), the CPU [`PixelSurface`](super::pixel::PixelSurface)
//! and, with the `vectors` feature, the lyon-backed
//! [`VectorSurface`](super::vector::VectorSurface).

use glam::Vec2;

use crate::api::types::Viewport;
use crate::core::color::Color;

/// Which kind of backend a surface draws with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderTier {
    /// Browser Canvas2D context.
    Canvas2d,
    /// Triangle-list tessellation for a GPU renderer.
    Vector,
    /// CPU rasterization into an RGBA buffer.
    Software,
}

/// One color stop of a radial gradient. `offset` runs 0 (center) to 1 (rim).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    pub offset: f32,
    pub color: Color,
}

impl GradientStop {
    pub const fn new(offset: f32, color: Color) -> Self {
        Self { offset, color }
    }
}

/// Translucent full-surface fill painted at the start of every frame in
/// place of a clear. What it leaves of the previous frames is the trail.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trail {
    pub color: Color,
    pub opacity: f32,
}

impl Trail {
    pub fn black(opacity: f32) -> Self {
        Self {
            color: Color::BLACK,
            opacity,
        }
    }

    pub fn fill_color(&self) -> Color {
        self.color.with_alpha(self.opacity.clamp(0.0, 1.0))
    }
}

/// 2D drawing target. Coordinates are CSS pixels.
pub trait Surface {
    /// Backend identifier (e.g. "canvas2d", "software", "vector").
    fn backend(&self) -> &'static str;

    fn tier(&self) -> RenderTier;

    /// Drawable size in CSS pixels.
    fn size(&self) -> Vec2;

    /// Reallocate backing storage for a new viewport. Content is discarded.
    fn resize(&mut self, viewport: Viewport);

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Color);

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);

    /// Disc of `radius` filled with a radial gradient from the center outward.
    fn fill_radial_gradient(&mut self, center: Vec2, radius: f32, stops: &[GradientStop]);

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color);

    /// Centered single-line label. Backends without text support skip it.
    fn fill_text(&mut self, _text: &str, _center: Vec2, _size: f32, _color: Color) {}
}

/// Paint the trail rectangle over the whole surface.
pub fn paint_trail(surface: &mut dyn Surface, trail: Trail) {
    let size = surface.size();
    surface.fill_rect(Vec2::ZERO, size, trail.fill_color());
}

/// Color of a gradient at `t` in [0, 1]. Stops must be sorted by offset.
pub fn sample_gradient(stops: &[GradientStop], t: f32) -> Color {
    let Some(first) = stops.first() else {
        return Color::TRANSPARENT;
    };
    if t <= first.offset {
        return first.color;
    }
    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t <= b.offset {
            let span = (b.offset - a.offset).max(f32::EPSILON);
            return a.color.lerp(b.color, (t - a.offset) / span);
        }
    }
    stops[stops.len() - 1].color
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glow() -> [GradientStop; 3] {
        let blue = Color::rgb8(0, 169, 255);
        [
            GradientStop::new(0.0, blue.with_alpha(0.5)),
            GradientStop::new(0.5, blue.with_alpha(0.25)),
            GradientStop::new(1.0, blue.with_alpha(0.0)),
        ]
    }

    #[test]
    fn gradient_interpolates_between_stops() {
        let stops = glow();
        assert_eq!(sample_gradient(&stops, 0.0).a, 0.5);
        assert!((sample_gradient(&stops, 0.25).a - 0.375).abs() < 1e-6);
        assert_eq!(sample_gradient(&stops, 1.0).a, 0.0);
        assert_eq!(sample_gradient(&stops, 2.0).a, 0.0);
    }

    #[test]
    fn empty_gradient_is_transparent() {
        assert_eq!(sample_gradient(&[], 0.3), Color::TRANSPARENT);
    }

    #[test]
    fn trail_clamps_opacity() {
        assert_eq!(Trail::black(3.0).fill_color().a, 1.0);
    }
}
