//! CPU rasterizer.
//!
//! Straight-alpha RGBA buffer with source-over compositing. Used for
//! headless rendering and to check what the trail compositing actually does
//! to pixels.

use glam::Vec2;

use super::surface::{sample_gradient, GradientStop, RenderTier, Surface};
use crate::api::types::Viewport;
use crate::core::color::Color;

pub struct PixelSurface {
    viewport: Viewport,
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl PixelSurface {
    pub fn new(viewport: Viewport) -> Self {
        let mut surface = Self {
            viewport,
            width: 0,
            height: 0,
            pixels: Vec::new(),
        };
        surface.resize(viewport);
        surface
    }

    /// Buffer size in device pixels.
    pub fn buffer_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[(y * self.width + x) as usize])
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    pub fn clear(&mut self, color: Color) {
        self.pixels.fill(color);
    }

    /// Number of pixels whose alpha exceeds `threshold`.
    pub fn coverage(&self, threshold: f32) -> usize {
        self.pixels.iter().filter(|c| c.a > threshold).count()
    }

    /// Row-major RGBA bytes, e.g. for an `ImageData` upload.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|c| c.to_rgba8()).collect()
    }

    fn blend(&mut self, x: u32, y: u32, src: Color) {
        let idx = (y * self.width + x) as usize;
        let dst = self.pixels[idx];
        let out_a = src.a + dst.a * (1.0 - src.a);
        if out_a <= 0.0 {
            self.pixels[idx] = Color::TRANSPARENT;
            return;
        }
        let mix = |s: f32, d: f32| (s * src.a + d * dst.a * (1.0 - src.a)) / out_a;
        self.pixels[idx] = Color::new(mix(src.r, dst.r), mix(src.g, dst.g), mix(src.b, dst.b), out_a);
    }

    /// Device-pixel span covering [min, max) in CSS pixels, clamped to the buffer.
    fn span(&self, min: f32, max: f32, limit: u32) -> std::ops::Range<u32> {
        let dpr = self.viewport.dpr;
        let lo = (min * dpr).floor().max(0.0);
        let hi = (max * dpr).ceil().min(limit as f32);
        if !(lo < hi) {
            return 0..0;
        }
        lo as u32..hi as u32
    }

    /// Visit every device pixel whose center lies in the CSS-space disc.
    fn for_disc(&mut self, center: Vec2, radius: f32, mut shade: impl FnMut(f32) -> Option<Color>) {
        if radius <= 0.0 || !center.is_finite() {
            return;
        }
        let dpr = self.viewport.dpr;
        let xs = self.span(center.x - radius, center.x + radius, self.width);
        let ys = self.span(center.y - radius, center.y + radius, self.height);
        for y in ys {
            for x in xs.clone() {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5) / dpr;
                let d = p.distance(center);
                if d <= radius {
                    if let Some(color) = shade(d / radius) {
                        self.blend(x, y, color);
                    }
                }
            }
        }
    }
}

impl Surface for PixelSurface {
    fn backend(&self) -> &'static str {
        "software"
    }

    fn tier(&self) -> RenderTier {
        RenderTier::Software
    }

    fn size(&self) -> Vec2 {
        Vec2::new(self.viewport.width, self.viewport.height)
    }

    fn resize(&mut self, viewport: Viewport) {
        let (w, h) = viewport.buffer_size();
        self.viewport = viewport;
        self.width = w;
        self.height = h;
        self.pixels = vec![Color::TRANSPARENT; (w as usize) * (h as usize)];
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Color) {
        if !origin.is_finite() || !size.is_finite() {
            return;
        }
        let xs = self.span(origin.x, origin.x + size.x, self.width);
        let ys = self.span(origin.y, origin.y + size.y, self.height);
        for y in ys {
            for x in xs.clone() {
                self.blend(x, y, color);
            }
        }
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.for_disc(center, radius, |_| Some(color));
    }

    fn fill_radial_gradient(&mut self, center: Vec2, radius: f32, stops: &[GradientStop]) {
        self.for_disc(center, radius, |t| Some(sample_gradient(stops, t)));
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color) {
        if width <= 0.0 || !from.is_finite() || !to.is_finite() {
            return;
        }
        let half = width / 2.0;
        let dpr = self.viewport.dpr;
        let min = from.min(to) - Vec2::splat(half);
        let max = from.max(to) + Vec2::splat(half);
        let xs = self.span(min.x, max.x, self.width);
        let ys = self.span(min.y, max.y, self.height);
        let seg = to - from;
        let len_sq = seg.length_squared();
        for y in ys {
            for x in xs.clone() {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5) / dpr;
                let t = if len_sq > 0.0 { ((p - from).dot(seg) / len_sq).clamp(0.0, 1.0) } else { 0.0 };
                if p.distance(from + seg * t) <= half {
                    self.blend(x, y, color);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::surface::{paint_trail, Trail};

    #[test]
    fn buffer_is_device_pixel_sized() {
        let surface = PixelSurface::new(Viewport::new(20.0, 10.0).with_dpr(2.0));
        assert_eq!(surface.buffer_size(), (40, 20));
        assert_eq!(surface.size(), Vec2::new(20.0, 10.0));
    }

    #[test]
    fn trail_fades_previous_frame_geometrically() {
        let mut surface = PixelSurface::new(Viewport::new(4.0, 4.0));
        surface.clear(Color::BLACK);
        surface.fill_rect(Vec2::ZERO, Vec2::splat(1.0), Color::WHITE);

        let trail = Trail::black(0.5);
        let mut expected = 1.0;
        for _ in 0..5 {
            paint_trail(&mut surface, trail);
            expected *= 0.5;
            let px = surface.pixel(0, 0).unwrap();
            assert!((px.r - expected).abs() < 1e-5, "{} vs {expected}", px.r);
            assert_eq!(px.a, 1.0);
        }
    }

    #[test]
    fn circle_covers_roughly_its_area() {
        let mut surface = PixelSurface::new(Viewport::new(100.0, 100.0));
        surface.fill_circle(Vec2::new(50.0, 50.0), 10.0, Color::WHITE);
        let area = std::f32::consts::PI * 100.0;
        let covered = surface.coverage(0.5) as f32;
        assert!((covered - area).abs() / area < 0.05, "covered {covered}");
    }

    #[test]
    fn drawing_off_canvas_is_clipped() {
        let mut surface = PixelSurface::new(Viewport::new(10.0, 10.0));
        surface.fill_rect(Vec2::new(-50.0, -50.0), Vec2::splat(20.0), Color::WHITE);
        surface.fill_circle(Vec2::new(500.0, 500.0), 5.0, Color::WHITE);
        assert_eq!(surface.coverage(0.0), 0);
    }

    #[test]
    fn stroke_line_touches_both_ends() {
        let mut surface = PixelSurface::new(Viewport::new(20.0, 20.0));
        surface.stroke_line(Vec2::new(2.0, 10.5), Vec2::new(18.0, 10.5), 1.0, Color::WHITE);
        assert!(surface.pixel(2, 10).unwrap().a > 0.0);
        assert!(surface.pixel(17, 10).unwrap().a > 0.0);
        assert_eq!(surface.pixel(10, 2).unwrap().a, 0.0);
    }
}
