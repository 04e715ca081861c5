//! Particle store and integrator shared by every effect.

mod blend;
mod edge;
mod particle;
mod steering;
mod store;

pub use blend::{ColorBlend, KILL_COLOR};
pub use edge::{wrap, EdgePolicy};
pub use particle::{lifetime_alpha, Particle};
pub use steering::{desired_velocity, steer};
pub use store::ParticleStore;
