//! The four-phase cycle and its dispatch table.

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use serde::Deserialize;

use crate::api::types::Viewport;
use crate::core::rng::Rng;
use crate::particles::{EdgePolicy, Particle, ParticleStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Floating,
    Converging,
    Merged,
    Exploding,
}

impl Phase {
    pub const ALL: [Phase; 4] = [
        Phase::Floating,
        Phase::Converging,
        Phase::Merged,
        Phase::Exploding,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// The phase after this one; `Exploding` wraps back to `Floating`.
    pub fn next(self) -> Phase {
        Phase::ALL[(self.index() + 1) % Phase::ALL.len()]
    }

    /// Status line shown under the animation.
    pub fn caption(self) -> &'static str {
        match self {
            Phase::Floating => "AI Tools Exploring...",
            Phase::Converging => "Integrating Technologies...",
            Phase::Merged => "Launchpad Active!",
            Phase::Exploding => "Deploying Innovation...",
        }
    }
}

/// Dwell time per phase, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct PhaseDurations {
    pub floating: f64,
    pub converging: f64,
    pub merged: f64,
    pub exploding: f64,
}

impl Default for PhaseDurations {
    fn default() -> Self {
        Self {
            floating: 2500.0,
            converging: 2000.0,
            merged: 2500.0,
            exploding: 1500.0,
        }
    }
}

impl PhaseDurations {
    pub fn get(&self, phase: Phase) -> f64 {
        match phase {
            Phase::Floating => self.floating,
            Phase::Converging => self.converging,
            Phase::Merged => self.merged,
            Phase::Exploding => self.exploding,
        }
    }
}

/// Everything a per-node rule may read.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext {
    pub viewport: Viewport,
    pub center: Vec2,
    /// Host clock in seconds; drives the merged orbit.
    pub seconds: f32,
    pub node_count: usize,
    pub gain: f32,
    pub margin: f32,
    pub explode_speed: f32,
}

/// Per-step motion rule for node `index`.
pub type StepRule = fn(&mut Particle, usize, &RuleContext);

/// Runs once when a phase is entered.
pub type EntryAction = fn(&mut ParticleStore, &RuleContext, &mut Rng);

#[derive(Clone, Copy)]
pub struct PhaseSpec {
    pub rule: StepRule,
    pub dwell_ms: f64,
    pub entry: Option<EntryAction>,
}

/// `Phase → {rule, dwell, entry}`.
#[derive(Clone, Copy)]
pub struct PhaseTable {
    specs: [PhaseSpec; 4],
}

impl PhaseTable {
    pub fn new(durations: &PhaseDurations) -> Self {
        let spec = |phase: Phase, rule: StepRule, entry: Option<EntryAction>| PhaseSpec {
            rule,
            dwell_ms: durations.get(phase),
            entry,
        };
        Self {
            specs: [
                spec(Phase::Floating, drift, Some(scatter)),
                spec(Phase::Converging, converge, None),
                spec(Phase::Merged, orbit, None),
                spec(Phase::Exploding, explode, None),
            ],
        }
    }

    pub fn get(&self, phase: Phase) -> &PhaseSpec {
        &self.specs[phase.index()]
    }
}

/// Advances the phase by elapsed host time.
pub struct PhaseMachine {
    table: PhaseTable,
    phase: Phase,
    entered_ms: Option<f64>,
}

impl PhaseMachine {
    pub fn new(table: PhaseTable) -> Self {
        Self {
            table,
            phase: Phase::Floating,
            entered_ms: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn spec(&self) -> &PhaseSpec {
        self.table.get(self.phase)
    }

    /// Start the cycle over from `Floating` at the next `advance`.
    pub fn restart(&mut self, table: PhaseTable) {
        self.table = table;
        self.phase = Phase::Floating;
        self.entered_ms = None;
    }

    /// Move to the next phase once the current dwell has elapsed. The clock
    /// starts on the first call. Returns the phase just entered, if any.
    ///
    /// At most one transition per call, so a stalled tab resumes in the
    /// phase after the one it stalled in rather than skipping through.
    pub fn advance(&mut self, now_ms: f64) -> Option<Phase> {
        let Some(entered) = self.entered_ms else {
            self.entered_ms = Some(now_ms);
            return None;
        };
        if now_ms - entered < self.spec().dwell_ms {
            return None;
        }
        self.phase = self.phase.next();
        self.entered_ms = Some(now_ms);
        Some(self.phase)
    }
}

// ── Rules ────────────────────────────────────────────────────────────

fn drift(node: &mut Particle, _index: usize, ctx: &RuleContext) {
    node.position += node.velocity;
    EdgePolicy::Bounce { margin: ctx.margin }.apply(node, &ctx.viewport);
}

fn converge(node: &mut Particle, _index: usize, ctx: &RuleContext) {
    node.position += (ctx.center - node.position) * ctx.gain;
}

fn orbit(node: &mut Particle, index: usize, ctx: &RuleContext) {
    node.position = merged_position(index, ctx.center, ctx.seconds);
}

fn explode(node: &mut Particle, index: usize, ctx: &RuleContext) {
    let theta = index as f32 / ctx.node_count.max(1) as f32 * TAU;
    node.position += Vec2::from_angle(theta) * ctx.explode_speed;
}

/// Where node `index` sits on the merged orbit at `seconds`.
pub fn merged_position(index: usize, center: Vec2, seconds: f32) -> Vec2 {
    let angle = (seconds + index as f32 * PI / 3.0).rem_euclid(TAU);
    let radius = 30.0 + 15.0 * index as f32;
    center + Vec2::from_angle(angle) * radius
}

/// Floating entry: put every node back inside the margins with a fresh
/// drift velocity in [-1, 1).
pub fn scatter(nodes: &mut ParticleStore, ctx: &RuleContext, rng: &mut Rng) {
    let (w, h) = (ctx.viewport.width, ctx.viewport.height);
    let m = ctx.margin.min(w / 2.0).min(h / 2.0).max(0.0);
    for node in nodes.iter_mut() {
        node.position = Vec2::new(rng.range(m, w - m), rng.range(m, h - m));
        node.velocity = Vec2::new(rng.range(-1.0, 1.0), rng.range(-1.0, 1.0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine() -> PhaseMachine {
        PhaseMachine::new(PhaseTable::new(&PhaseDurations::default()))
    }

    #[test]
    fn cycles_through_all_phases() {
        let mut m = machine();
        assert_eq!(m.advance(0.0), None);
        assert_eq!(m.advance(2499.0), None);
        assert_eq!(m.advance(2500.0), Some(Phase::Converging));
        assert_eq!(m.advance(4500.0), Some(Phase::Merged));
        assert_eq!(m.advance(7000.0), Some(Phase::Exploding));
        assert_eq!(m.advance(8500.0), Some(Phase::Floating));
    }

    #[test]
    fn long_stall_moves_one_phase_at_a_time() {
        let mut m = machine();
        m.advance(0.0);
        assert_eq!(m.advance(60_000.0), Some(Phase::Converging));
        assert_eq!(m.advance(60_001.0), None);
    }

    #[test]
    fn only_floating_has_an_entry_action() {
        let table = PhaseTable::new(&PhaseDurations::default());
        for phase in Phase::ALL {
            assert_eq!(table.get(phase).entry.is_some(), phase == Phase::Floating);
        }
        assert_eq!(table.get(Phase::Merged).dwell_ms, 2500.0);
    }

    #[test]
    fn merged_radius_grows_per_index() {
        let c = Vec2::new(200.0, 150.0);
        for i in 0..6 {
            let r = merged_position(i, c, 12.34).distance(c);
            assert!((r - (30.0 + 15.0 * i as f32)).abs() < 1e-3);
        }
    }
}
