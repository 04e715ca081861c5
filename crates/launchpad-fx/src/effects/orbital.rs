//! Radial orbital timeline: items on a slowly rotating ring. The item
//! passing the top of the ring expands on its own; clicking an item centers
//! it there and stops the rotation until the background is clicked.

use glam::Vec2;
use serde::Deserialize;

use crate::api::effect::{Effect, FrameContext};
use crate::api::types::{ListenerKind, Viewport};
use crate::core::color::Color;
use crate::core::rng::Rng;
use crate::input::queue::{InputEvent, InputQueue};
use crate::renderer::surface::{GradientStop, Surface, Trail};

// ── Layout ───────────────────────────────────────────────────────────

/// Angle (degrees, y down) of the top-center display slot.
pub const DISPLAY_ANGLE: f32 = 270.0;
/// How close to the display slot an item must be to count as displayed.
pub const DISPLAY_THRESHOLD: f32 = 25.0;
const COMPACT_RADIUS: f32 = 120.0;
/// Nominal frame length the rotation speeds are tuned for.
const SPEED_FRAME_MS: f64 = 16.67;
const SPEED: f32 = 0.2;
const COMPACT_SPEED: f32 = 0.15;
const DISPLAY_SPEED: f32 = 0.08;

const NODE_RADIUS: f32 = 20.0;
const ACTIVE_SCALE: f32 = 1.5;
const RING_SEGMENTS: usize = 96;
const LABEL_SIZE: f32 = 12.0;
const CORE_RADIUS: f32 = 32.0;

const BACKGROUND: Color = Color::new(2.0 / 255.0, 6.0 / 255.0, 23.0 / 255.0, 1.0);
const INDIGO: Color = Color::new(79.0 / 255.0, 70.0 / 255.0, 229.0 / 255.0, 1.0);
const PURPLE: Color = Color::new(147.0 / 255.0, 51.0 / 255.0, 234.0 / 255.0, 1.0);
const CYAN: Color = Color::new(34.0 / 255.0, 211.0 / 255.0, 238.0 / 255.0, 1.0);
const PINK: Color = Color::new(236.0 / 255.0, 72.0 / 255.0, 153.0 / 255.0, 1.0);

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ItemStatus {
    Completed,
    InProgress,
    Pending,
}

impl ItemStatus {
    fn fill(self) -> Color {
        match self {
            ItemStatus::Completed => INDIGO,
            ItemStatus::InProgress => CYAN,
            ItemStatus::Pending => Color::BLACK.with_alpha(0.4),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TimelineItem {
    pub id: u32,
    pub title: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub related_ids: Vec<u32>,
    pub status: ItemStatus,
    /// 0-100; sizes the item's halo.
    #[serde(default)]
    pub energy: f32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OrbitalConfig {
    pub items: Vec<TimelineItem>,
    pub radius: f32,
    pub compact: bool,
}

impl Default for OrbitalConfig {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            radius: 220.0,
            compact: false,
        }
    }
}

impl OrbitalConfig {
    pub fn orbit_radius(&self) -> f32 {
        if self.compact {
            COMPACT_RADIUS
        } else {
            self.radius
        }
    }

    fn base_speed(&self) -> f32 {
        if self.compact {
            COMPACT_SPEED
        } else {
            SPEED
        }
    }
}

// ── Geometry ─────────────────────────────────────────────────────────

/// Where and how an item is drawn for a given ring rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeLayout {
    pub position: Vec2,
    /// Degrees in [0, 360).
    pub angle: f32,
    /// Paint order; items in front (larger) draw last.
    pub z: i32,
    pub opacity: f32,
    pub scale: f32,
}

pub fn node_layout(index: usize, total: usize, rotation: f32, radius: f32, center: Vec2) -> NodeLayout {
    let angle = (index as f32 / total.max(1) as f32 * 360.0 + rotation).rem_euclid(360.0);
    let rad = angle.to_radians();
    let depth = (1.0 + rad.sin()) / 2.0;
    NodeLayout {
        position: center + Vec2::from_angle(rad) * radius,
        angle,
        z: (100.0 + 50.0 * rad.cos()).round() as i32,
        opacity: (0.5 + 0.5 * depth).clamp(0.5, 1.0),
        scale: (0.8 + 0.2 * depth).clamp(0.8, 1.0),
    }
}

/// Smallest absolute difference between two angles, in degrees.
fn angular_distance(a: f32, b: f32) -> f32 {
    let diff = (a - b).abs() % 360.0;
    if diff > 180.0 {
        360.0 - diff
    } else {
        diff
    }
}

// ── Effect ───────────────────────────────────────────────────────────

pub struct OrbitalTimeline {
    config: OrbitalConfig,
    viewport: Viewport,
    /// Ring rotation in degrees.
    rotation: f32,
    auto_rotate: bool,
    user_interacted: bool,
    active: Option<u32>,
    last_auto_expanded: Option<u32>,
    pulsing: Vec<u32>,
    last_ms: Option<f64>,
}

impl OrbitalTimeline {
    pub fn new(config: OrbitalConfig) -> Self {
        Self {
            config,
            viewport: Viewport::default(),
            rotation: 0.0,
            auto_rotate: true,
            user_interacted: false,
            active: None,
            last_auto_expanded: None,
            pulsing: Vec::new(),
            last_ms: None,
        }
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn is_auto_rotating(&self) -> bool {
        self.auto_rotate
    }

    /// The expanded item, if any.
    pub fn active(&self) -> Option<&TimelineItem> {
        let id = self.active?;
        self.config.items.iter().find(|item| item.id == id)
    }

    pub fn is_pulsing(&self, id: u32) -> bool {
        self.pulsing.contains(&id)
    }

    pub fn layout(&self, index: usize) -> NodeLayout {
        node_layout(
            index,
            self.config.items.len(),
            self.rotation,
            self.config.orbit_radius(),
            self.viewport.center(),
        )
    }

    /// Item currently within the display slot tolerance.
    pub fn item_at_display(&self) -> Option<u32> {
        (0..self.config.items.len())
            .find(|&i| angular_distance(self.layout(i).angle, DISPLAY_ANGLE) < DISPLAY_THRESHOLD)
            .map(|i| self.config.items[i].id)
    }

    /// Rotate the ring so item `index` sits in the display slot.
    pub fn center_on(&mut self, index: usize) {
        let total = self.config.items.len().max(1);
        self.rotation = (DISPLAY_ANGLE - index as f32 / total as f32 * 360.0).rem_euclid(360.0);
    }

    /// Expand or collapse an item. Manual toggles stop (or resume) the
    /// rotation; automatic ones only track the display slot.
    pub fn toggle(&mut self, id: u32, manual: bool) {
        if manual {
            self.user_interacted = true;
        }
        if self.active == Some(id) {
            self.active = None;
            self.pulsing.clear();
            if manual {
                self.auto_rotate = true;
            }
            return;
        }
        self.expand(id);
        if manual {
            self.auto_rotate = false;
            if let Some(index) = self.config.items.iter().position(|item| item.id == id) {
                self.center_on(index);
            }
        }
    }

    /// Collapse everything and resume auto rotation.
    pub fn clear(&mut self) {
        self.active = None;
        self.pulsing.clear();
        self.auto_rotate = true;
        self.user_interacted = false;
    }

    fn expand(&mut self, id: u32) {
        self.active = Some(id);
        self.pulsing = self
            .config
            .items
            .iter()
            .find(|item| item.id == id)
            .map(|item| item.related_ids.clone())
            .unwrap_or_default();
    }

    /// Front-most item under `point`.
    fn hit(&self, point: Vec2) -> Option<u32> {
        (0..self.config.items.len())
            .map(|i| (i, self.layout(i)))
            .filter(|(_, l)| l.position.distance(point) <= NODE_RADIUS * l.scale)
            .max_by_key(|(_, l)| l.z)
            .map(|(i, _)| self.config.items[i].id)
    }

    fn handle_input(&mut self, input: &InputQueue) {
        for event in input.iter() {
            if let InputEvent::PointerDown { x, y, .. } = *event {
                match self.hit(Vec2::new(x, y)) {
                    Some(id) => self.toggle(id, true),
                    None => self.clear(),
                }
            }
        }
    }

    fn rotate(&mut self, dt_ms: f64) {
        let speed = if self.active.is_some() && !self.user_interacted {
            DISPLAY_SPEED
        } else {
            self.config.base_speed()
        };
        let next = (self.rotation + speed * (dt_ms / SPEED_FRAME_MS) as f32).rem_euclid(360.0);
        self.rotation = (next * 100.0).round() / 100.0;
    }

    fn render_ring(&self, surface: &mut dyn Surface) {
        let center = self.viewport.center();
        let radius = self.config.orbit_radius();
        let color = Color::WHITE.with_alpha(0.1);
        let step = std::f32::consts::TAU / RING_SEGMENTS as f32;
        for k in 0..RING_SEGMENTS {
            let a = center + Vec2::from_angle(k as f32 * step) * radius;
            let b = center + Vec2::from_angle((k + 1) as f32 * step) * radius;
            surface.stroke_line(a, b, 1.0, color);
        }
        let core = [
            GradientStop::new(0.0, INDIGO.with_alpha(0.9)),
            GradientStop::new(0.6, PURPLE.with_alpha(0.6)),
            GradientStop::new(1.0, PINK.with_alpha(0.0)),
        ];
        surface.fill_radial_gradient(center, CORE_RADIUS, &core);
    }

    fn render_item(&self, surface: &mut dyn Surface, item: &TimelineItem, layout: &NodeLayout) {
        let active = self.active == Some(item.id);
        let scale = if active { ACTIVE_SCALE } else { layout.scale };
        let alpha = if active { 1.0 } else { layout.opacity };
        let radius = NODE_RADIUS * scale;

        if self.is_pulsing(item.id) || active {
            let halo = (item.energy * 0.5 + 40.0) / 2.0 * scale;
            let stops = [
                GradientStop::new(0.0, Color::WHITE.with_alpha(0.2 * alpha)),
                GradientStop::new(1.0, Color::WHITE.with_alpha(0.0)),
            ];
            surface.fill_radial_gradient(layout.position, halo, &stops);
        }
        surface.fill_circle(layout.position, radius, item.status.fill().with_alpha(alpha));
        surface.fill_text(
            &item.title,
            layout.position + Vec2::new(0.0, radius + LABEL_SIZE),
            LABEL_SIZE,
            Color::WHITE.with_alpha(0.7 * alpha),
        );
    }
}

impl Default for OrbitalTimeline {
    fn default() -> Self {
        Self::new(OrbitalConfig::default())
    }
}

impl Effect for OrbitalTimeline {
    type Config = OrbitalConfig;

    fn name(&self) -> &'static str {
        "orbital-timeline"
    }

    fn config(&self) -> &OrbitalConfig {
        &self.config
    }

    fn reconfigure(&mut self, config: OrbitalConfig, _viewport: Viewport, _rng: &mut Rng) {
        if config.items != self.config.items {
            self.clear();
            self.last_auto_expanded = None;
        }
        self.config = config;
    }

    fn listeners(&self) -> &'static [ListenerKind] {
        &[ListenerKind::Resize, ListenerKind::PointerDown]
    }

    fn trail(&self) -> Trail {
        Trail {
            color: BACKGROUND,
            opacity: 1.0,
        }
    }

    fn resize(&mut self, viewport: Viewport, _rng: &mut Rng) {
        self.viewport = viewport;
    }

    fn update(&mut self, ctx: &mut FrameContext<'_>, input: &InputQueue) {
        self.handle_input(input);

        let dt_ms = self.last_ms.map_or(0.0, |last| (ctx.now_ms - last).max(0.0));
        self.last_ms = Some(ctx.now_ms);
        if self.auto_rotate {
            self.rotate(dt_ms);
        }

        if self.auto_rotate && !self.user_interacted {
            if let Some(id) = self.item_at_display() {
                if self.last_auto_expanded != Some(id) {
                    self.last_auto_expanded = Some(id);
                    self.expand(id);
                    log::debug!("orbital-timeline: auto-expanded item {id}");
                }
            }
        }
    }

    fn render(&self, surface: &mut dyn Surface) {
        self.render_ring(surface);
        let mut order: Vec<(usize, NodeLayout)> =
            (0..self.config.items.len()).map(|i| (i, self.layout(i))).collect();
        order.sort_by_key(|(_, l)| l.z);
        for (i, layout) in &order {
            self.render_item(surface, &self.config.items[*i], layout);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(n: u32) -> Vec<TimelineItem> {
        (1..=n)
            .map(|id| TimelineItem {
                id,
                title: format!("Phase {id}"),
                date: String::new(),
                category: String::new(),
                related_ids: vec![id % n + 1],
                status: ItemStatus::Pending,
                energy: 80.0,
            })
            .collect()
    }

    fn timeline(n: u32) -> OrbitalTimeline {
        let mut fx = OrbitalTimeline::new(OrbitalConfig {
            items: items(n),
            ..Default::default()
        });
        fx.resize(Viewport::new(800.0, 700.0), &mut Rng::new(1));
        fx
    }

    fn tick(fx: &mut OrbitalTimeline, now_ms: f64, input: &InputQueue) {
        let mut rng = Rng::new(1);
        let mut ctx = FrameContext {
            viewport: Viewport::new(800.0, 700.0),
            now_ms,
            frame: 0,
            rng: &mut rng,
        };
        fx.update(&mut ctx, input);
    }

    #[test]
    fn layout_depth_cues_stay_clamped() {
        for rot in [0.0, 45.0, 90.0, 180.0, 270.0, 359.0] {
            let l = node_layout(0, 6, rot, 220.0, Vec2::ZERO);
            assert!((0.5..=1.0).contains(&l.opacity));
            assert!((0.8..=1.0).contains(&l.scale));
            assert!((l.position.length() - 220.0).abs() < 1e-3);
        }
        let front = node_layout(0, 4, 0.0, 100.0, Vec2::ZERO);
        assert_eq!(front.z, 150);
    }

    #[test]
    fn rotation_advances_by_elapsed_time() {
        let mut fx = timeline(6);
        let input = InputQueue::new();
        tick(&mut fx, 0.0, &input);
        assert_eq!(fx.rotation(), 0.0);
        tick(&mut fx, 16.67 * 10.0, &input);
        assert!((fx.rotation() - 2.0).abs() < 0.011);
    }

    #[test]
    fn centering_puts_item_in_display_slot() {
        let mut fx = timeline(6);
        fx.center_on(2);
        assert!(angular_distance(fx.layout(2).angle, DISPLAY_ANGLE) < 1e-3);
        assert_eq!(fx.item_at_display(), Some(3));
    }

    #[test]
    fn clicking_an_item_stops_rotation_and_background_resumes() {
        let mut fx = timeline(6);
        let target = fx.layout(1).position;
        let mut input = InputQueue::new();
        input.push(InputEvent::PointerDown {
            x: target.x,
            y: target.y,
            secondary: false,
        });
        tick(&mut fx, 0.0, &input);
        assert!(!fx.is_auto_rotating());
        assert_eq!(fx.active().map(|i| i.id), Some(2));
        assert!(fx.is_pulsing(3));

        let mut input = InputQueue::new();
        input.push(InputEvent::PointerDown {
            x: 1.0,
            y: 1.0,
            secondary: false,
        });
        tick(&mut fx, 16.0, &input);
        assert!(fx.is_auto_rotating());
        // The centered item is still in the display slot and expands again.
        assert_eq!(fx.active().map(|i| i.id), Some(2));
    }

    #[test]
    fn item_reaching_the_top_auto_expands() {
        let mut fx = timeline(4);
        // Item index 3 of 4 sits at 270 degrees with no rotation.
        tick(&mut fx, 0.0, &InputQueue::new());
        assert_eq!(fx.active().map(|i| i.id), Some(4));
    }

    #[test]
    fn status_parses_kebab_case() {
        let item: TimelineItem =
            serde_json::from_str(r#"{"id":1,"title":"Idea","status":"in-progress"}"#).unwrap();
        assert_eq!(item.status, ItemStatus::InProgress);
        assert!(item.related_ids.is_empty());
    }
}
