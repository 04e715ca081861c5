//! Flow field: an ambient background of short-lived particles drifting
//! along a static trigonometric vector field.
//!
//! Each step: field force → integrate → friction → wrap → age. Rendering
//! paints every particle as a small square faded over its lifetime.
use glam::Vec2;
use serde::Deserialize;

use crate::api::effect::{Effect, FrameContext};
use crate::api::types::Viewport;
use crate::core::color::Color;
use crate::core::rng::Rng;
use crate::field::{flow_force, FlowFieldParams};
use crate::input::queue::InputQueue;
use crate::particles::{EdgePolicy, Particle, ParticleStore};
use crate::renderer::surface::{Surface, Trail};

// ── Tuning ───────────────────────────────────────────────────────────

const FRICTION: f32 = 0.95;
const LIFE_MIN: f32 = 100.0;
const LIFE_MAX: f32 = 300.0;
/// Side of the square each particle is drawn as, in CSS pixels.
const PARTICLE_SIZE: f32 = 1.5;

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FlowFieldConfig {
    pub color: Color,
    pub trail_opacity: f32,
    pub particle_count: usize,
    pub speed: f32,
}

impl Default for FlowFieldConfig {
    fn default() -> Self {
        Self {
            color: Color::rgb8(0x63, 0x66, 0xf1),
            trail_opacity: 0.15,
            particle_count: 600,
            speed: 1.0,
        }
    }
}

// ── Effect ───────────────────────────────────────────────────────────

pub struct FlowField {
    config: FlowFieldConfig,
    params: FlowFieldParams,
    particles: ParticleStore,
    viewport: Viewport,
}

impl FlowField {
    pub fn new(config: FlowFieldConfig) -> Self {
        Self {
            params: FlowFieldParams::with_speed(config.speed),
            particles: ParticleStore::with_capacity(config.particle_count),
            config,
            viewport: Viewport::default(),
        }
    }

    pub fn particles(&self) -> &ParticleStore {
        &self.particles
    }

    /// Fresh particle somewhere on the canvas, already partway through its
    /// own life so the initial population doesn't expire together.
    fn spawn_staggered(&self, rng: &mut Rng) -> Particle {
        let position = rng.point_in(self.viewport.width, self.viewport.height);
        let life = rng.range(LIFE_MIN, LIFE_MAX);
        let age = rng.range(0.0, life);
        Particle::new(position).with_life(age, life)
    }

    fn respawn(particle: &mut Particle, viewport: &Viewport, rng: &mut Rng) {
        particle.position = rng.point_in(viewport.width, viewport.height);
        particle.velocity = Vec2::ZERO;
        particle.acceleration = Vec2::ZERO;
        particle.age = 0.0;
        particle.life = rng.range(LIFE_MIN, LIFE_MAX);
    }
}

impl Default for FlowField {
    fn default() -> Self {
        Self::new(FlowFieldConfig::default())
    }
}

impl Effect for FlowField {
    type Config = FlowFieldConfig;

    fn name(&self) -> &'static str {
        "flow-field"
    }

    fn config(&self) -> &FlowFieldConfig {
        &self.config
    }

    fn reconfigure(&mut self, config: FlowFieldConfig, viewport: Viewport, rng: &mut Rng) {
        self.params = FlowFieldParams::with_speed(config.speed);
        let rebuild = config.particle_count != self.config.particle_count;
        self.config = config;
        // Color, trail and speed apply live; only a new count repopulates.
        if rebuild && !viewport.is_empty() {
            self.resize(viewport, rng);
        }
    }

    fn trail(&self) -> Trail {
        Trail::black(self.config.trail_opacity)
    }

    fn resize(&mut self, viewport: Viewport, rng: &mut Rng) {
        self.viewport = viewport;
        self.particles.clear();
        for _ in 0..self.config.particle_count {
            let particle = self.spawn_staggered(rng);
            self.particles.push(particle);
        }
    }

    fn update(&mut self, ctx: &mut FrameContext<'_>, _input: &InputQueue) {
        let viewport = ctx.viewport;
        for p in self.particles.iter_mut() {
            p.integrate_force(flow_force(p.position, &self.params));
            p.apply_friction(FRICTION);
            EdgePolicy::Wrap.apply(p, &viewport);
            if p.grow_older() {
                Self::respawn(p, &viewport, ctx.rng);
            }
        }
    }

    fn render(&self, surface: &mut dyn Surface) {
        let size = Vec2::splat(PARTICLE_SIZE);
        for p in self.particles.iter() {
            let alpha = p.fade_alpha();
            if alpha <= 0.0 {
                continue;
            }
            surface.fill_rect(p.position, size, self.config.color.with_alpha(alpha));
        }
    }
}
