//! The shared 3D background scene: one GPU allocation behind a
//! reference-counted manager, drawn by a pluggable backend.

mod camera;
mod manager;

pub use camera::{screen_to_ndc, PerspectiveCamera};
pub use manager::{SceneBackend, SceneLease, SceneManager, SceneState, SceneUniforms, DEFAULT_GRACE_FRAMES};
