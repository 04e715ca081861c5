//! AI tools: six labelled nodes that drift, converge on the center, orbit
//! it as one "Launchpad" cluster, then fly apart. Forever.

mod phase;

pub use phase::{
    merged_position, Phase, PhaseDurations, PhaseMachine, PhaseSpec, PhaseTable, RuleContext,
};

use glam::Vec2;
use serde::Deserialize;

use crate::api::effect::{Effect, FrameContext};
use crate::api::types::Viewport;
use crate::core::color::Color;
use crate::core::rng::Rng;
use crate::input::queue::InputQueue;
use crate::particles::{Particle, ParticleStore};
use crate::renderer::surface::{GradientStop, Surface, Trail};

// ── Palette ──────────────────────────────────────────────────────────

const BLUE: Color = Color::new(0.0, 169.0 / 255.0, 1.0, 1.0);
const RED: Color = Color::new(177.0 / 255.0, 18.0 / 255.0, 44.0 / 255.0, 1.0);
const BACKGROUND: Color = Color::new(10.0 / 255.0, 5.0 / 255.0, 16.0 / 255.0, 1.0);

// ── Layout ───────────────────────────────────────────────────────────

/// Nodes further apart than this are not connected.
const LINK_DISTANCE: f32 = 300.0;
const LINK_ALPHA: f32 = 0.3;
const BADGE_RADIUS: f32 = 25.0;
const LABEL_SIZE: f32 = 10.0;
const HUB_RADIUS: f32 = 100.0;
const HUB_LABEL: &str = "Launchpad";
const HUB_LABEL_SIZE: f32 = 16.0;
const SPARKLES_MERGED: usize = 50;
const SPARKLES: usize = 20;
const CAPTION_SIZE: f32 = 14.0;
/// Caption baseline, up from the bottom edge.
const CAPTION_INSET: f32 = 24.0;

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NodeSpec {
    pub name: String,
    pub color: Color,
    /// Glow radius in CSS pixels.
    pub size: f32,
}

impl NodeSpec {
    fn new(name: &str, color: Color, size: f32) -> Self {
        Self {
            name: name.to_string(),
            color,
            size,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AiToolsConfig {
    pub dwell_ms: PhaseDurations,
    /// Fraction of the remaining distance covered per converging step.
    pub gain: f32,
    /// Bounce band while floating.
    pub margin: f32,
    /// Pixels per step while exploding.
    pub explode_speed: f32,
    pub trail_opacity: f32,
    pub nodes: Vec<NodeSpec>,
}

impl Default for AiToolsConfig {
    fn default() -> Self {
        Self {
            dwell_ms: PhaseDurations::default(),
            gain: 0.05,
            margin: 50.0,
            explode_speed: 8.0,
            trail_opacity: 0.15,
            nodes: vec![
                NodeSpec::new("ChatGPT", BLUE, 80.0),
                NodeSpec::new("Claude", RED, 75.0),
                NodeSpec::new("Gemini", BLUE, 70.0),
                NodeSpec::new("Midjourney", RED, 65.0),
                NodeSpec::new("DALL-E", BLUE, 60.0),
                NodeSpec::new("Stable Diffusion", RED, 55.0),
            ],
        }
    }
}

// ── Effect ───────────────────────────────────────────────────────────

pub struct AiTools {
    config: AiToolsConfig,
    machine: PhaseMachine,
    nodes: ParticleStore,
    viewport: Viewport,
    /// Host clock of the last update, in seconds.
    seconds: f32,
}

impl AiTools {
    pub fn new(config: AiToolsConfig) -> Self {
        Self {
            machine: PhaseMachine::new(PhaseTable::new(&config.dwell_ms)),
            nodes: ParticleStore::with_capacity(config.nodes.len()),
            config,
            viewport: Viewport::default(),
            seconds: 0.0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.machine.phase()
    }

    pub fn nodes(&self) -> &ParticleStore {
        &self.nodes
    }

    fn rule_context(&self, viewport: Viewport) -> RuleContext {
        RuleContext {
            viewport,
            center: viewport.center(),
            seconds: self.seconds,
            node_count: self.nodes.len(),
            gain: self.config.gain,
            margin: self.config.margin,
            explode_speed: self.config.explode_speed,
        }
    }

    fn render_links(&self, surface: &mut dyn Surface) {
        let nodes = self.nodes.as_slice();
        for (i, a) in nodes.iter().enumerate() {
            for b in &nodes[i + 1..] {
                let d = a.position.distance(b.position);
                if d < LINK_DISTANCE {
                    let alpha = (1.0 - d / LINK_DISTANCE) * LINK_ALPHA;
                    surface.stroke_line(a.position, b.position, 1.0, BLUE.with_alpha(alpha));
                }
            }
        }
    }

    fn render_node(&self, surface: &mut dyn Surface, node: &Particle, spec: &NodeSpec) {
        let glow = [
            GradientStop::new(0.0, spec.color.with_alpha(0x80 as f32 / 255.0)),
            GradientStop::new(0.5, spec.color.with_alpha(0x40 as f32 / 255.0)),
            GradientStop::new(1.0, spec.color.with_alpha(0.0)),
        ];
        surface.fill_radial_gradient(node.position, spec.size, &glow);
        surface.fill_circle(node.position, BADGE_RADIUS, spec.color);
        surface.fill_text(&spec.name, node.position, LABEL_SIZE, Color::WHITE.with_alpha(0.95));
    }

    fn render_hub(&self, surface: &mut dyn Surface) {
        let center = self.viewport.center();
        let stops = [
            GradientStop::new(0.0, RED.with_alpha(0.6)),
            GradientStop::new(0.5, BLUE.with_alpha(0.4)),
            GradientStop::new(1.0, BLUE.with_alpha(0.0)),
        ];
        surface.fill_radial_gradient(center, HUB_RADIUS, &stops);
        surface.fill_text(
            HUB_LABEL,
            center + Vec2::new(0.0, 15.0),
            HUB_LABEL_SIZE,
            BLUE.with_alpha(0.95),
        );
    }

    /// Phase status line along the bottom edge.
    fn render_caption(&self, surface: &mut dyn Surface) {
        let anchor = Vec2::new(self.viewport.width / 2.0, self.viewport.height - CAPTION_INSET);
        surface.fill_text(
            self.phase().caption(),
            anchor,
            CAPTION_SIZE,
            Color::WHITE.with_alpha(0.8),
        );
    }

    /// Decorative specks circling the center, independent of the nodes.
    fn render_sparkles(&self, surface: &mut dyn Surface) {
        let center = self.viewport.center();
        let t = self.seconds;
        let count = if self.phase() == Phase::Merged {
            SPARKLES_MERGED
        } else {
            SPARKLES
        };
        for i in 0..count {
            let fi = i as f32;
            let position = center + Vec2::from_angle(t * 2.0 + fi) * (100.0 + fi * 5.0);
            let radius = (t * 3.0 + fi).sin() * 2.0 + 2.0;
            if radius <= 0.0 {
                continue;
            }
            let alpha = (t * 2.0 + fi).sin() * 0.5 + 0.5;
            let color = if i % 2 == 0 { BLUE } else { RED };
            surface.fill_circle(position, radius, color.with_alpha(alpha));
        }
    }
}

impl Default for AiTools {
    fn default() -> Self {
        Self::new(AiToolsConfig::default())
    }
}

impl Effect for AiTools {
    type Config = AiToolsConfig;

    fn name(&self) -> &'static str {
        "ai-tools"
    }

    fn config(&self) -> &AiToolsConfig {
        &self.config
    }

    fn reconfigure(&mut self, config: AiToolsConfig, viewport: Viewport, rng: &mut Rng) {
        self.machine.restart(PhaseTable::new(&config.dwell_ms));
        self.config = config;
        if !viewport.is_empty() {
            self.resize(viewport, rng);
        }
    }

    fn trail(&self) -> Trail {
        Trail {
            color: BACKGROUND,
            opacity: self.config.trail_opacity,
        }
    }

    fn resize(&mut self, viewport: Viewport, rng: &mut Rng) {
        self.viewport = viewport;
        if self.nodes.len() != self.config.nodes.len() {
            self.nodes.clear();
            for spec in &self.config.nodes {
                self.nodes.push(Particle::new(viewport.center()).with_size(spec.size));
            }
            let ctx = self.rule_context(viewport);
            phase::scatter(&mut self.nodes, &ctx, rng);
        }
    }

    fn update(&mut self, ctx: &mut FrameContext<'_>, _input: &InputQueue) {
        self.seconds = (ctx.now_ms / 1000.0) as f32;
        let rules = self.rule_context(ctx.viewport);

        if let Some(entered) = self.machine.advance(ctx.now_ms) {
            log::debug!("ai-tools: entering {:?}", entered);
            if let Some(entry) = self.machine.spec().entry {
                entry(&mut self.nodes, &rules, ctx.rng);
            }
        }

        let rule = self.machine.spec().rule;
        for (i, node) in self.nodes.iter_mut().enumerate() {
            rule(node, i, &rules);
        }
    }

    fn render(&self, surface: &mut dyn Surface) {
        self.render_links(surface);
        for (node, spec) in self.nodes.iter().zip(&self.config.nodes) {
            self.render_node(surface, node, spec);
        }
        if self.phase() == Phase::Merged {
            self.render_hub(surface);
        }
        self.render_sparkles(surface);
        self.render_caption(surface);
    }
}
