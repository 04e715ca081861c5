use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use super::camera::PerspectiveCamera;
use crate::api::types::Viewport;
use crate::core::color::Color;
use crate::error::FxResult;

/// Frames a released scene stays allocated before disposal. A re-acquire
/// inside the window (unmount then remount of the same view) keeps it.
pub const DEFAULT_GRACE_FRAMES: u32 = 60;

const TIME_SCALE: f64 = 0.0003;
const SPIN_X: f32 = 0.0002;
const SPIN_Y: f32 = 0.0005;

/// The GPU side of the shared scene.
pub trait SceneBackend {
    /// Create GPU resources. Called once per allocation.
    fn allocate(&mut self, viewport: Viewport) -> FxResult<()>;

    /// Release GPU resources.
    fn dispose(&mut self);

    fn resize(&mut self, _viewport: Viewport) {}

    fn draw(&mut self, uniforms: &SceneUniforms);
}

/// Per-frame uniform block, laid out for direct upload (112 bytes).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct SceneUniforms {
    pub time: f32,
    pub rotation_x: f32,
    pub rotation_y: f32,
    pub _pad: f32,
    /// xyz + 1.0
    pub light_position: [f32; 4],
    /// Straight RGBA.
    pub color: [f32; 4],
    /// Column-major camera matrix, the same one pointer picks invert.
    pub view_projection: [[f32; 4]; 4],
}

impl SceneUniforms {
    pub fn new(color: Color) -> Self {
        Self {
            time: 0.0,
            rotation_x: 0.0,
            rotation_y: 0.0,
            _pad: 0.0,
            light_position: [0.0, 0.0, 0.0, 1.0],
            color: [color.r, color.g, color.b, color.a],
            view_projection: PerspectiveCamera::default().view_projection().to_cols_array_2d(),
        }
    }

    /// The block as 28 floats, ready for a `Float32Array` upload.
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(std::slice::from_ref(self))
    }
}

/// Handle returned by [`SceneManager::acquire`]. Releasing the same lease
/// twice is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SceneLease(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneState {
    Disposed,
    Live,
    /// No leases; disposed when the countdown reaches zero.
    Draining { frames_left: u32 },
}

/// Reference-counted owner of the one shared 3D scene.
///
/// Lives in the application context; every view that wants the scene
/// acquires a lease and releases it on unmount.
pub struct SceneManager<B: SceneBackend> {
    backend: B,
    state: SceneState,
    leases: Vec<SceneLease>,
    next_lease: u64,
    grace_frames: u32,
    camera: PerspectiveCamera,
    viewport: Viewport,
    uniforms: SceneUniforms,
    allocations: u32,
}

impl<B: SceneBackend> SceneManager<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            state: SceneState::Disposed,
            leases: Vec::new(),
            next_lease: 1,
            grace_frames: DEFAULT_GRACE_FRAMES,
            camera: PerspectiveCamera::default(),
            viewport: Viewport::default(),
            uniforms: SceneUniforms::new(Color::rgb8(0x81, 0x8c, 0xf8)),
            allocations: 0,
        }
    }

    pub fn with_grace_frames(mut self, frames: u32) -> Self {
        self.grace_frames = frames;
        self
    }

    pub fn state(&self) -> SceneState {
        self.state
    }

    pub fn lease_count(&self) -> usize {
        self.leases.len()
    }

    /// How many times GPU resources have been created.
    pub fn allocations(&self) -> u32 {
        self.allocations
    }

    pub fn uniforms(&self) -> &SceneUniforms {
        &self.uniforms
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Take a lease on the scene, allocating it on first use.
    pub fn acquire(&mut self, viewport: Viewport) -> FxResult<SceneLease> {
        match self.state {
            SceneState::Disposed => {
                self.resize(viewport);
                self.backend.allocate(viewport)?;
                self.allocations += 1;
                log::info!("scene: allocated");
            }
            SceneState::Draining { .. } => {
                log::debug!("scene: disposal cancelled");
            }
            SceneState::Live => {}
        }
        self.state = SceneState::Live;

        let lease = SceneLease(self.next_lease);
        self.next_lease += 1;
        self.leases.push(lease);
        Ok(lease)
    }

    /// Give a lease back. The last release starts the grace countdown.
    pub fn release(&mut self, lease: SceneLease) {
        let Some(pos) = self.leases.iter().position(|l| *l == lease) else {
            log::debug!("scene: lease {:?} already released", lease);
            return;
        };
        self.leases.swap_remove(pos);
        if self.leases.is_empty() {
            self.state = SceneState::Draining {
                frames_left: self.grace_frames,
            };
        }
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.camera.resize(viewport);
        self.uniforms.view_projection = self.camera.view_projection().to_cols_array_2d();
        if self.state == SceneState::Live {
            self.backend.resize(viewport);
        }
    }

    /// Move the light to where the pointer meets the `z = 0` plane.
    pub fn pointer_move(&mut self, x: f32, y: f32) {
        if let Some(p) = self.camera.pick_on_plane(Vec2::new(x, y), self.viewport) {
            self.uniforms.light_position = [p.x, p.y, p.z, 1.0];
        }
    }

    /// Per-frame step. Returns true while the scene is allocated.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        match self.state {
            SceneState::Disposed => false,
            SceneState::Live => {
                self.uniforms.time = (now_ms * TIME_SCALE) as f32;
                self.uniforms.rotation_y += SPIN_Y;
                self.uniforms.rotation_x += SPIN_X;
                self.backend.draw(&self.uniforms);
                true
            }
            SceneState::Draining { frames_left } => {
                if frames_left == 0 {
                    self.backend.dispose();
                    self.state = SceneState::Disposed;
                    log::info!("scene: disposed");
                    false
                } else {
                    self.state = SceneState::Draining {
                        frames_left: frames_left - 1,
                    };
                    true
                }
            }
        }
    }
}
