pub mod api;
pub mod config;
pub mod core;
pub mod driver;
pub mod effects;
pub mod error;
pub mod field;
pub mod input;
pub mod particles;
pub mod renderer;
pub mod scene;

// Re-export key types at crate root for convenience
pub use api::effect::{Effect, FrameContext};
pub use api::types::{FrameHandle, ListenerKind, Viewport};
pub use config::{parse_config, FxManifest};
pub use core::color::{Color, Rgb};
pub use core::rng::Rng;
pub use core::time::{FixedTimestep, ManualClock, StepMode};
pub use driver::{DriverState, FrameDriver, HeadlessHost, Host};
pub use effects::{
    AiTools, AiToolsConfig, FlowField, FlowFieldConfig, OrbitalConfig, OrbitalTimeline, Phase,
    TextMorph, TextMorphConfig, TimelineItem,
};
pub use error::{FxError, FxResult};
pub use input::queue::{InputEvent, InputQueue, PointerState};
pub use particles::{ColorBlend, EdgePolicy, Particle, ParticleStore};
pub use renderer::pixel::PixelSurface;
pub use renderer::surface::{GradientStop, RenderTier, Surface, Trail};
pub use scene::{SceneBackend, SceneLease, SceneManager, SceneUniforms};

#[cfg(feature = "vectors")]
pub use renderer::vector::{VectorSurface, VectorVertex};
