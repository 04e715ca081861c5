//! Particle text: particles steer into the shape of a word, change color,
//! then regroup into the next word. Secondary press (right click or touch)
//! scatters the particles under the pointer.

mod font;
mod mask;

pub use font::{font_size_for, BitmapFont, GlyphRasterizer};
pub use mask::{sample_targets, AlphaMask};

use glam::Vec2;
use serde::Deserialize;

use crate::api::effect::{Effect, FrameContext};
use crate::api::types::{ListenerKind, Viewport};
use crate::core::color::Rgb;
use crate::core::rng::Rng;
use crate::error::{FxError, FxResult};
use crate::input::queue::{InputQueue, PointerState};
use crate::particles::{ColorBlend, Particle, ParticleStore};
use crate::renderer::surface::{Surface, Trail};

// ── Tuning ───────────────────────────────────────────────────────────

const POINT_SIZE: f32 = 2.0;
/// Mask pixels with alpha above this become targets.
const ALPHA_THRESHOLD: u8 = 0;
const COMPACT_PIXEL_STEP: usize = 12;
const COMPACT_KILL_RADIUS: f32 = 80.0;
const COMPACT_SPEED_BOOST: f32 = 1.3;

const LISTENERS: &[ListenerKind] = &[
    ListenerKind::Resize,
    ListenerKind::PointerDown,
    ListenerKind::PointerUp,
    ListenerKind::PointerMove,
    ListenerKind::ContextMenu,
    ListenerKind::TouchStart,
    ListenerKind::TouchEnd,
    ListenerKind::TouchMove,
];

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TextMorphConfig {
    pub words: Vec<String>,
    pub frames_per_word: u64,
    /// Raster stride when sampling the word mask.
    pub pixel_step: usize,
    pub trail_opacity: f32,
    pub kill_radius: f32,
    /// Small-screen sizing: smaller font, sparser particles, faster motion.
    pub compact: bool,
    /// 2 px squares instead of discs.
    pub draw_as_points: bool,
}

impl Default for TextMorphConfig {
    fn default() -> Self {
        Self {
            words: vec![
                "LAUNCHPAD".to_string(),
                "ZERO TO ONE".to_string(),
                "Your career is your launchpad".to_string(),
            ],
            frames_per_word: 240,
            pixel_step: 10,
            trail_opacity: 0.5,
            kill_radius: 50.0,
            compact: false,
            draw_as_points: true,
        }
    }
}

impl TextMorphConfig {
    pub fn validate(&self) -> FxResult<()> {
        if self.words.is_empty() {
            return Err(FxError::EmptyWordList);
        }
        Ok(())
    }

    fn pixel_step(&self) -> usize {
        if self.compact {
            self.pixel_step.max(COMPACT_PIXEL_STEP)
        } else {
            self.pixel_step
        }
    }

    fn kill_radius(&self) -> f32 {
        if self.compact {
            self.kill_radius.max(COMPACT_KILL_RADIUS)
        } else {
            self.kill_radius
        }
    }
}

// ── Effect ───────────────────────────────────────────────────────────

pub struct TextMorph<R: GlyphRasterizer = BitmapFont> {
    config: TextMorphConfig,
    rasterizer: R,
    particles: ParticleStore,
    viewport: Viewport,
    pointer: PointerState,
    word_index: usize,
    frames: u64,
}

impl TextMorph<BitmapFont> {
    pub fn new(config: TextMorphConfig) -> Self {
        Self::with_rasterizer(config, BitmapFont::new())
    }
}

impl Default for TextMorph<BitmapFont> {
    fn default() -> Self {
        Self::new(TextMorphConfig::default())
    }
}

impl<R: GlyphRasterizer> TextMorph<R> {
    pub fn with_rasterizer(config: TextMorphConfig, rasterizer: R) -> Self {
        Self {
            config,
            rasterizer,
            particles: ParticleStore::new(),
            viewport: Viewport::default(),
            pointer: PointerState::default(),
            word_index: 0,
            frames: 0,
        }
    }

    pub fn particles(&self) -> &ParticleStore {
        &self.particles
    }

    pub fn current_word(&self) -> Option<&str> {
        self.config.words.get(self.word_index).map(String::as_str)
    }

    /// Retarget the particle pool onto the current word.
    ///
    /// Existing particles are reused in store order, missing ones spawn off
    /// screen, and the surplus is killed.
    pub fn form_word(&mut self, rng: &mut Rng) {
        let Some(word) = self.config.words.get(self.word_index).cloned() else {
            log::warn!("text-morph: no words configured");
            return;
        };
        if self.viewport.is_empty() {
            log::warn!("text-morph: zero-sized canvas, skipping {word:?}");
            return;
        }

        let (w, h) = (self.viewport.width.round() as u32, self.viewport.height.round() as u32);
        let font_px = font_size_for(&word, self.config.compact);
        let mask = match self.rasterizer.rasterize(&word, font_px, w, h) {
            Ok(mask) => mask,
            Err(err) => {
                log::warn!("text-morph: could not rasterize {word:?}: {err}");
                return;
            }
        };
        let targets = sample_targets(&mask, self.config.pixel_step(), ALPHA_THRESHOLD, rng);
        let color = Rgb::new(rng.range(0.0, 255.0), rng.range(0.0, 255.0), rng.range(0.0, 255.0));

        let reused = targets.len().min(self.particles.len());
        for (i, target) in targets.iter().enumerate() {
            if i >= reused {
                let spawned = self.spawn(rng);
                self.particles.push(spawned);
            }
            if let Some(p) = self.particles.get_mut(i) {
                p.killed = false;
                p.target = *target;
                p.color.retarget(color);
            }
        }
        for i in targets.len()..self.particles.len() {
            let exit = off_screen(&self.viewport, rng);
            if let Some(p) = self.particles.get_mut(i) {
                p.kill(exit);
            }
        }
        log::debug!(
            "text-morph: {word:?} -> {} targets, {} reused",
            targets.len(),
            reused
        );
    }

    fn spawn(&self, rng: &mut Rng) -> Particle {
        let boost = if self.config.compact { COMPACT_SPEED_BOOST } else { 1.0 };
        let max_speed = rng.range(4.0, 10.0) * boost;
        let blend_rate = if self.config.compact {
            rng.range(0.01, 0.05)
        } else {
            rng.range(0.0025, 0.03)
        };
        let mut particle = Particle::new(off_screen(&self.viewport, rng))
            .with_steering(max_speed, max_speed * 0.05)
            .with_size(rng.range(6.0, 12.0));
        particle.color = ColorBlend::new(blend_rate);
        particle
    }

    fn scatter_under_pointer(&mut self, rng: &mut Rng) {
        let radius = self.config.kill_radius();
        let at = Vec2::new(self.pointer.x, self.pointer.y);
        let viewport = self.viewport;
        for p in self.particles.iter_mut() {
            if p.position.distance(at) < radius {
                p.kill(off_screen(&viewport, rng));
            }
        }
    }
}

/// A point on the circle of radius `(w + h) / 2` around the center, in the
/// direction of a random point on the canvas.
fn off_screen(viewport: &Viewport, rng: &mut Rng) -> Vec2 {
    let center = viewport.center();
    let toward = rng.point_in(viewport.width, viewport.height) - center;
    let direction = toward.try_normalize().unwrap_or(Vec2::X);
    center + direction * (viewport.width + viewport.height) / 2.0
}

impl<R: GlyphRasterizer> Effect for TextMorph<R> {
    type Config = TextMorphConfig;

    fn name(&self) -> &'static str {
        "text-morph"
    }

    fn config(&self) -> &TextMorphConfig {
        &self.config
    }

    fn reconfigure(&mut self, config: TextMorphConfig, viewport: Viewport, rng: &mut Rng) {
        let words_changed = config.words != self.config.words;
        self.config = config;
        if words_changed {
            self.word_index = 0;
            self.frames = 0;
        }
        if !viewport.is_empty() {
            self.viewport = viewport;
            self.form_word(rng);
        }
    }

    fn listeners(&self) -> &'static [ListenerKind] {
        LISTENERS
    }

    fn trail(&self) -> Trail {
        Trail::black(self.config.trail_opacity)
    }

    fn preferred_height(&self, width: f32) -> Option<f32> {
        let ratio = if self.config.compact { 0.4 } else { 0.35 };
        Some(width * ratio)
    }

    fn resize(&mut self, viewport: Viewport, rng: &mut Rng) {
        self.viewport = viewport;
        self.form_word(rng);
    }

    fn update(&mut self, ctx: &mut FrameContext<'_>, input: &InputQueue) {
        self.pointer.apply_all(input.iter());

        let viewport = self.viewport;
        for p in self.particles.iter_mut() {
            p.seek();
            p.color.step();
        }
        self.particles
            .retain(|p| !(p.killed && !viewport.contains(p.position)));

        if self.pointer.pressed && self.pointer.secondary {
            self.scatter_under_pointer(ctx.rng);
        }

        self.frames += 1;
        let per_word = self.config.frames_per_word.max(1);
        if self.frames % per_word == 0 && !self.config.words.is_empty() {
            self.word_index = (self.word_index + 1) % self.config.words.len();
            self.form_word(ctx.rng);
        }
    }

    fn render(&self, surface: &mut dyn Surface) {
        for p in self.particles.iter() {
            let color = p.color.current().to_color();
            if self.config.draw_as_points {
                surface.fill_rect(p.position, Vec2::splat(POINT_SIZE), color);
            } else {
                surface.fill_circle(p.position, p.size / 2.0, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::queue::InputEvent;

    /// Rasterizer returning a solid block of `n` pixels in the top row.
    struct Strip(u32);

    impl GlyphRasterizer for Strip {
        fn rasterize(&mut self, _text: &str, _px: f32, w: u32, h: u32) -> FxResult<AlphaMask> {
            let mut mask = AlphaMask::new(w, h);
            for x in 0..self.0.min(w) {
                mask.set(x, 0, 255);
            }
            Ok(mask)
        }
    }

    fn strip_morph(n: u32) -> (TextMorph<Strip>, Rng) {
        let config = TextMorphConfig {
            words: vec!["A".into(), "B".into()],
            pixel_step: 1,
            ..Default::default()
        };
        let mut fx = TextMorph::with_rasterizer(config, Strip(n));
        let mut rng = Rng::new(11);
        fx.resize(Viewport::new(200.0, 70.0), &mut rng);
        (fx, rng)
    }

    #[test]
    fn empty_word_list_fails_validation() {
        let cfg = TextMorphConfig {
            words: vec![],
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(FxError::EmptyWordList)));
        assert!(TextMorphConfig::default().validate().is_ok());
    }

    #[test]
    fn first_word_spawns_one_particle_per_target() {
        let (fx, _) = strip_morph(40);
        assert_eq!(fx.particles().len(), 40);
        assert_eq!(fx.particles().killed_count(), 0);
        let r = (200.0 + 70.0) / 2.0;
        for p in fx.particles().iter() {
            let d = p.position.distance(Vec2::new(100.0, 35.0));
            assert!((d - r).abs() < 1e-3, "spawned on the exit circle");
        }
    }

    #[test]
    fn shrinking_word_kills_the_surplus_without_growing() {
        let (mut fx, mut rng) = strip_morph(40);
        fx.rasterizer = Strip(25);
        fx.form_word(&mut rng);
        assert_eq!(fx.particles().len(), 40);
        assert_eq!(fx.particles().killed_count(), 15);
        assert!(fx.particles().as_slice()[..25].iter().all(|p| !p.killed));
    }

    #[test]
    fn growing_word_revives_killed_particles_first() {
        let (mut fx, mut rng) = strip_morph(40);
        fx.rasterizer = Strip(10);
        fx.form_word(&mut rng);
        fx.rasterizer = Strip(50);
        fx.form_word(&mut rng);
        assert_eq!(fx.particles().len(), 50);
        assert_eq!(fx.particles().killed_count(), 0);
    }

    #[test]
    fn killed_particles_leave_and_are_removed() {
        let (mut fx, mut rng) = strip_morph(30);
        fx.rasterizer = Strip(0);
        fx.form_word(&mut rng);
        assert_eq!(fx.particles().killed_count(), 30);

        let input = InputQueue::new();
        for frame in 0..2000 {
            let mut ctx = FrameContext {
                viewport: fx.viewport,
                now_ms: 0.0,
                frame,
                rng: &mut rng,
            };
            fx.update(&mut ctx, &input);
            if fx.particles().is_empty() {
                break;
            }
        }
        assert!(fx.particles().is_empty());
    }

    #[test]
    fn secondary_press_scatters_nearby_particles() {
        let (mut fx, mut rng) = strip_morph(100);
        for p in fx.particles.iter_mut() {
            p.position = p.target;
        }
        let mut input = InputQueue::new();
        input.push(InputEvent::PointerDown {
            x: 5.0,
            y: 0.0,
            secondary: true,
        });
        let mut ctx = FrameContext {
            viewport: fx.viewport,
            now_ms: 0.0,
            frame: 0,
            rng: &mut rng,
        };
        fx.update(&mut ctx, &input);
        let killed = fx.particles().killed_count();
        // Targets sit at x = 0..100 on the top row; radius 50 around x = 5.
        assert_eq!(killed, 55);
    }

    #[test]
    fn words_advance_on_schedule() {
        let (mut fx, mut rng) = strip_morph(5);
        fx.config.frames_per_word = 3;
        let input = InputQueue::new();
        for frame in 0..3 {
            let mut ctx = FrameContext {
                viewport: fx.viewport,
                now_ms: 0.0,
                frame,
                rng: &mut rng,
            };
            fx.update(&mut ctx, &input);
        }
        assert_eq!(fx.current_word(), Some("B"));
    }

    #[test]
    fn canvas_height_follows_width() {
        let fx = TextMorph::new(TextMorphConfig::default());
        assert_eq!(fx.preferred_height(1000.0), Some(350.0));
    }
}
