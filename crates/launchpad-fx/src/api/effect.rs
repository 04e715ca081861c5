use serde::de::DeserializeOwned;

use crate::api::types::{ListenerKind, Viewport};
use crate::core::rng::Rng;
use crate::input::queue::InputQueue;
use crate::renderer::surface::{Surface, Trail};

/// Per-step state handed to [`Effect::update`].
pub struct FrameContext<'a> {
    pub viewport: Viewport,
    /// Host timestamp of the frame callback, in milliseconds.
    pub now_ms: f64,
    /// Steps run since mount.
    pub frame: u64,
    pub rng: &'a mut Rng,
}

/// The contract every canvas effect fulfills.
///
/// The frame driver owns the effect and calls, per display refresh:
/// `update` (field + integration) then, after painting the trail, `render`.
/// `resize` is the only place particle positions get reinitialized.
pub trait Effect {
    /// Declarative configuration. Equal configs never rebuild the effect.
    type Config: Clone + PartialEq + DeserializeOwned + Default;

    /// Short name used in log lines.
    fn name(&self) -> &'static str;

    fn config(&self) -> &Self::Config;

    /// Adopt a new configuration. Called only when it differs from the
    /// current one. `viewport` may be empty if the effect is not sized yet.
    fn reconfigure(&mut self, config: Self::Config, viewport: Viewport, rng: &mut Rng);

    /// Listeners the host must register for this effect.
    fn listeners(&self) -> &'static [ListenerKind] {
        &[ListenerKind::Resize]
    }

    /// Background fill painted before every render.
    fn trail(&self) -> Trail;

    /// Canvas height this effect wants for a container of `width` CSS
    /// pixels, or `None` to fill the container.
    fn preferred_height(&self, _width: f32) -> Option<f32> {
        None
    }

    /// (Re)initialize for a non-empty viewport.
    fn resize(&mut self, viewport: Viewport, rng: &mut Rng);

    /// Advance the simulation by one step.
    fn update(&mut self, ctx: &mut FrameContext<'_>, input: &InputQueue);

    /// Draw the current state. The trail has already been painted.
    fn render(&self, surface: &mut dyn Surface);
}
