//! The particle record and its symplectic-Euler integrator.

use glam::Vec2;

use super::blend::ColorBlend;
use super::steering;

/// A single animated point.
///
/// Not every effect uses every field: the flow field only touches the
/// lifetime pair, the text morph only the steering and color fields.
#[derive(Debug, Clone)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Per-step force accumulator, zeroed by [`Particle::integrate`].
    pub acceleration: Vec2,
    pub target: Vec2,
    /// Frames lived so far.
    pub age: f32,
    /// Frames until respawn.
    pub life: f32,
    pub color: ColorBlend,
    pub max_speed: f32,
    pub max_force: f32,
    /// Radius inside which the arrival behavior slows the particle down.
    pub close_enough: f32,
    pub size: f32,
    /// Leaving the scene; see [`Particle::kill`].
    pub killed: bool,
}

impl Particle {
    pub const DEFAULT_MAX_SPEED: f32 = 1.0;
    pub const DEFAULT_MAX_FORCE: f32 = 0.1;
    pub const DEFAULT_CLOSE_ENOUGH: f32 = 100.0;
    pub const DEFAULT_SIZE: f32 = 10.0;

    pub fn new(position: Vec2) -> Self {
        Particle {
            position,
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            target: position,
            age: 0.0,
            life: 0.0,
            color: ColorBlend::default(),
            max_speed: Self::DEFAULT_MAX_SPEED,
            max_force: Self::DEFAULT_MAX_FORCE,
            close_enough: Self::DEFAULT_CLOSE_ENOUGH,
            size: Self::DEFAULT_SIZE,
            killed: false,
        }
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_life(mut self, age: f32, life: f32) -> Self {
        self.age = age;
        self.life = life;
        self
    }

    pub fn with_steering(mut self, max_speed: f32, max_force: f32) -> Self {
        self.max_speed = max_speed;
        self.max_force = max_force;
        self
    }

    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    /// Accumulate a force for the next integration step.
    pub fn apply_force(&mut self, force: Vec2) {
        self.acceleration += force;
    }

    /// `vel += acc; pos += vel; acc = 0`.
    pub fn integrate(&mut self) {
        self.velocity += self.acceleration;
        self.position += self.velocity;
        self.acceleration = Vec2::ZERO;
    }

    /// One full step under a single force.
    pub fn integrate_force(&mut self, force: Vec2) {
        self.apply_force(force);
        self.integrate();
    }

    /// Scale velocity down after integration. Bounds speed without clamping.
    pub fn apply_friction(&mut self, factor: f32) {
        self.velocity *= factor;
    }

    /// Steer toward `target` with arrival damping, then integrate.
    pub fn seek(&mut self) {
        let steer = steering::steer(
            self.position,
            self.velocity,
            self.target,
            self.max_speed,
            self.max_force,
            self.close_enough,
        );
        self.integrate_force(steer);
    }

    /// Advance age by one frame. Returns true once the particle outlived `life`.
    pub fn grow_older(&mut self) -> bool {
        self.age += 1.0;
        self.age > self.life
    }

    /// Triangular fade envelope over the particle's lifetime.
    pub fn fade_alpha(&self) -> f32 {
        lifetime_alpha(self.age, self.life)
    }

    /// Send the particle out of the scene: new target at `exit`, color
    /// blending from wherever it currently is toward black.
    ///
    /// Idempotent: killing a killed particle changes nothing.
    pub fn kill(&mut self, exit: Vec2) {
        if self.killed {
            return;
        }
        self.target = exit;
        self.color.retarget(super::blend::KILL_COLOR);
        self.killed = true;
    }
}

/// `1 - |(age/life - 0.5) * 2|`: 0 at birth and death, 1 at mid-life.
pub fn lifetime_alpha(age: f32, life: f32) -> f32 {
    if life <= 0.0 {
        return 0.0;
    }
    (1.0 - ((age / life) - 0.5).abs() * 2.0).clamp(0.0, 1.0)
}
