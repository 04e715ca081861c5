use crate::api::effect::{Effect, FrameContext};
use crate::api::types::{FrameHandle, ListenerKind, Viewport};
use crate::core::rng::Rng;
use crate::core::time::{FixedTimestep, StepMode};
use crate::driver::host::Host;
use crate::error::{FxError, FxResult};
use crate::input::queue::{InputEvent, InputQueue};
use crate::renderer::surface::{paint_trail, Surface};

/// Lifecycle of a mounted effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// Constructed, not mounted.
    Created,
    /// Mounted, but the last viewport was zero-sized. No frame is pending.
    AwaitingSize,
    /// Frames are being scheduled.
    Running,
    /// Unmounted. Every call is a no-op from here on.
    TornDown,
}

/// Ties an [`Effect`] to a [`Host`]: one update/render pass per frame
/// callback, rescheduled until teardown.
///
/// The driver owns the effect, its input queue and its random generator.
/// It never owns the surface or the host; those are passed in per call so
/// the same driver runs under the browser bridge and under a test loop.
pub struct FrameDriver<E: Effect> {
    effect: E,
    input: InputQueue,
    rng: Rng,
    viewport: Viewport,
    state: DriverState,
    pending: Option<FrameHandle>,
    listeners: Vec<ListenerKind>,
    step_mode: StepMode,
    timestep: Option<FixedTimestep>,
    last_frame_ms: Option<f64>,
    frame: u64,
}

impl<E: Effect> FrameDriver<E> {
    pub fn new(effect: E, seed: u64) -> Self {
        Self {
            effect,
            input: InputQueue::new(),
            rng: Rng::new(seed),
            viewport: Viewport::default(),
            state: DriverState::Created,
            pending: None,
            listeners: Vec::new(),
            step_mode: StepMode::PerFrame,
            timestep: None,
            last_frame_ms: None,
            frame: 0,
        }
    }

    pub fn with_step_mode(mut self, mode: StepMode) -> Self {
        self.timestep = match mode {
            StepMode::PerFrame => None,
            StepMode::Fixed(dt) => Some(FixedTimestep::new(dt)),
        };
        self.step_mode = mode;
        self
    }

    pub fn effect(&self) -> &E {
        &self.effect
    }

    pub fn effect_mut(&mut self) -> &mut E {
        &mut self.effect
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn step_mode(&self) -> StepMode {
        self.step_mode
    }

    /// Simulation steps run since mount.
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending
    }

    pub fn listeners(&self) -> &[ListenerKind] {
        &self.listeners
    }

    /// Queue an input event for the next update. Dropped after teardown.
    pub fn push_input(&mut self, event: InputEvent) {
        if self.state != DriverState::TornDown {
            self.input.push(event);
        }
    }

    /// Register the effect's listeners and start the loop.
    ///
    /// A zero-sized viewport is not an error: the driver waits for the
    /// next [`resize`](Self::resize) before scheduling anything.
    pub fn mount(
        &mut self,
        viewport: Viewport,
        surface: &mut dyn Surface,
        host: &mut dyn Host,
    ) -> FxResult<()> {
        match self.state {
            DriverState::TornDown => return Err(FxError::TornDown),
            DriverState::Created => {}
            _ => {
                log::debug!("{}: already mounted", self.effect.name());
                return Ok(());
            }
        }

        for &kind in self.effect.listeners() {
            host.add_listener(kind)?;
            self.listeners.push(kind);
        }
        self.state = DriverState::AwaitingSize;
        log::info!(
            "{}: mounted, {} listener(s)",
            self.effect.name(),
            self.listeners.len()
        );
        self.resize(viewport, surface, host)
    }

    /// Reinitialize the effect for a new viewport without restarting the loop.
    pub fn resize(
        &mut self,
        viewport: Viewport,
        surface: &mut dyn Surface,
        host: &mut dyn Host,
    ) -> FxResult<()> {
        match self.state {
            DriverState::TornDown => return Err(FxError::TornDown),
            DriverState::Created => {
                self.viewport = viewport;
                return Ok(());
            }
            _ => {}
        }
        self.viewport = viewport;

        if viewport.is_empty() {
            log::warn!(
                "{}: zero-sized viewport ({}x{}), waiting for resize",
                self.effect.name(),
                viewport.width,
                viewport.height
            );
            if let Some(handle) = self.pending.take() {
                host.cancel_frame(handle);
            }
            self.state = DriverState::AwaitingSize;
            return Ok(());
        }

        surface.resize(viewport);
        self.effect.resize(viewport, &mut self.rng);
        if self.state == DriverState::AwaitingSize {
            self.state = DriverState::Running;
            self.last_frame_ms = None;
        }
        self.schedule(host)
    }

    /// The frame callback: update, drain input, paint trail, render, reschedule.
    pub fn frame(
        &mut self,
        now_ms: f64,
        surface: &mut dyn Surface,
        host: &mut dyn Host,
    ) -> FxResult<()> {
        // The handle that brought us here has been consumed.
        self.pending = None;
        if self.state != DriverState::Running {
            return Ok(());
        }

        let steps = self.steps_for(now_ms);
        if steps > 0 {
            let mut ctx = FrameContext {
                viewport: self.viewport,
                now_ms,
                frame: self.frame,
                rng: &mut self.rng,
            };
            // Queued input belongs to the first step only.
            let idle = InputQueue::new();
            for step in 0..steps {
                let input = if step == 0 { &self.input } else { &idle };
                self.effect.update(&mut ctx, input);
                ctx.frame += 1;
            }
            self.frame = ctx.frame;
            self.input.drain();
        }

        paint_trail(surface, self.effect.trail());
        self.effect.render(surface);

        self.schedule(host)
    }

    /// Cancel the pending frame and remove every registered listener.
    pub fn teardown(&mut self, host: &mut dyn Host) {
        if self.state == DriverState::TornDown {
            return;
        }
        if let Some(handle) = self.pending.take() {
            host.cancel_frame(handle);
        }
        for kind in self.listeners.drain(..) {
            host.remove_listener(kind);
        }
        self.input.drain();
        self.state = DriverState::TornDown;
        log::info!("{}: torn down after {} steps", self.effect.name(), self.frame);
    }

    /// Swap in a new configuration. Returns false (and does nothing) when it
    /// equals the current one.
    pub fn reconfigure(&mut self, config: E::Config) -> bool {
        if self.state == DriverState::TornDown || *self.effect.config() == config {
            return false;
        }
        log::debug!("{}: reconfigured", self.effect.name());
        self.effect.reconfigure(config, self.viewport, &mut self.rng);
        true
    }

    fn steps_for(&mut self, now_ms: f64) -> u32 {
        let previous = self.last_frame_ms.replace(now_ms);
        match self.timestep.as_mut() {
            None => 1,
            Some(timestep) => {
                let dt_ms = previous.map_or(0.0, |p| now_ms - p);
                timestep.accumulate((dt_ms / 1000.0) as f32)
            }
        }
    }

    fn schedule(&mut self, host: &mut dyn Host) -> FxResult<()> {
        if self.pending.is_none() {
            self.pending = Some(host.request_frame()?);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::color::Color;
    use crate::driver::host::HeadlessHost;
    use crate::renderer::pixel::PixelSurface;
    use crate::renderer::surface::Trail;

    /// Counts calls; config is a single number.
    #[derive(Default)]
    struct Counter {
        config: u32,
        resizes: u32,
        updates: u32,
        renders: std::cell::Cell<u32>,
        clicks: u32,
    }

    impl Effect for Counter {
        type Config = u32;

        fn name(&self) -> &'static str {
            "counter"
        }

        fn config(&self) -> &u32 {
            &self.config
        }

        fn reconfigure(&mut self, config: u32, _viewport: Viewport, _rng: &mut Rng) {
            self.config = config;
        }

        fn listeners(&self) -> &'static [ListenerKind] {
            &[ListenerKind::Resize, ListenerKind::PointerDown]
        }

        fn trail(&self) -> Trail {
            Trail::black(0.5)
        }

        fn resize(&mut self, _viewport: Viewport, _rng: &mut Rng) {
            self.resizes += 1;
        }

        fn update(&mut self, _ctx: &mut FrameContext<'_>, input: &InputQueue) {
            self.updates += 1;
            self.clicks += input.len() as u32;
        }

        fn render(&self, surface: &mut dyn Surface) {
            self.renders.set(self.renders.get() + 1);
            surface.fill_rect(glam::Vec2::ZERO, glam::Vec2::ONE, Color::WHITE);
        }
    }

    fn mounted() -> (FrameDriver<Counter>, PixelSurface, HeadlessHost) {
        let vp = Viewport::new(16.0, 8.0);
        let mut surface = PixelSurface::new(vp);
        let mut host = HeadlessHost::new();
        let mut driver = FrameDriver::new(Counter::default(), 1);
        driver.mount(vp, &mut surface, &mut host).unwrap();
        (driver, surface, host)
    }

    #[test]
    fn mount_registers_listeners_and_schedules_once() {
        let (driver, _surface, host) = mounted();
        assert_eq!(driver.state(), DriverState::Running);
        assert_eq!(host.listeners().len(), 2);
        assert_eq!(host.requests(), 1);
        assert_eq!(driver.effect().resizes, 1);
    }

    #[test]
    fn zero_sized_mount_waits_for_resize() {
        let mut surface = PixelSurface::new(Viewport::new(1.0, 1.0));
        let mut host = HeadlessHost::new();
        let mut driver = FrameDriver::new(Counter::default(), 1);
        driver
            .mount(Viewport::new(0.0, 300.0), &mut surface, &mut host)
            .unwrap();
        assert_eq!(driver.state(), DriverState::AwaitingSize);
        assert_eq!(host.pending_frame(), None);
        assert_eq!(driver.effect().resizes, 0);

        driver
            .resize(Viewport::new(300.0, 300.0), &mut surface, &mut host)
            .unwrap();
        assert_eq!(driver.state(), DriverState::Running);
        assert!(host.pending_frame().is_some());
    }

    #[test]
    fn frame_updates_renders_and_reschedules() {
        let (mut driver, mut surface, mut host) = mounted();
        driver.push_input(InputEvent::PointerUp);
        host.fire();
        driver.frame(16.0, &mut surface, &mut host).unwrap();

        let effect = driver.effect();
        assert_eq!((effect.updates, effect.renders.get(), effect.clicks), (1, 1, 1));
        assert_eq!(host.requests(), 2);
        assert_eq!(driver.frame_count(), 1);
    }

    #[test]
    fn resize_while_running_does_not_start_a_second_loop() {
        let (mut driver, mut surface, mut host) = mounted();
        for _ in 0..3 {
            driver
                .resize(Viewport::new(32.0, 32.0), &mut surface, &mut host)
                .unwrap();
        }
        assert_eq!(host.requests(), 1);
        assert_eq!(driver.effect().resizes, 4);
        assert_eq!(surface.size(), glam::Vec2::new(32.0, 32.0));
    }

    #[test]
    fn teardown_releases_everything() {
        let (mut driver, mut surface, mut host) = mounted();
        driver.teardown(&mut host);
        assert_eq!(host.pending_frame(), None);
        assert!(host.listeners().is_empty());
        assert_eq!(driver.state(), DriverState::TornDown);

        // A late frame callback does nothing.
        driver.frame(32.0, &mut surface, &mut host).unwrap();
        assert_eq!(driver.effect().updates, 0);
        assert!(matches!(
            driver.resize(Viewport::new(8.0, 8.0), &mut surface, &mut host),
            Err(FxError::TornDown)
        ));
    }

    #[test]
    fn equal_config_is_a_no_op() {
        let (mut driver, _surface, _host) = mounted();
        assert!(!driver.reconfigure(0));
        assert!(driver.reconfigure(7));
        assert_eq!(*driver.effect().config(), 7);
    }

    #[test]
    fn fixed_step_mode_runs_by_elapsed_time() {
        let vp = Viewport::new(8.0, 8.0);
        let mut surface = PixelSurface::new(vp);
        let mut host = HeadlessHost::new();
        let mut driver =
            FrameDriver::new(Counter::default(), 1).with_step_mode(StepMode::Fixed(1.0 / 64.0));
        driver.mount(vp, &mut surface, &mut host).unwrap();

        driver.frame(0.0, &mut surface, &mut host).unwrap();
        assert_eq!(driver.effect().updates, 0, "first frame has no elapsed time");
        driver.frame(35.0, &mut surface, &mut host).unwrap();
        assert_eq!(driver.effect().updates, 2);
        // Long stalls are capped.
        driver.frame(5035.0, &mut surface, &mut host).unwrap();
        assert_eq!(driver.effect().updates, 12);
    }

    #[test]
    fn fixed_step_catch_up_sees_each_click_once() {
        let vp = Viewport::new(8.0, 8.0);
        let mut surface = PixelSurface::new(vp);
        let mut host = HeadlessHost::new();
        let mut driver =
            FrameDriver::new(Counter::default(), 1).with_step_mode(StepMode::Fixed(1.0 / 60.0));
        driver.mount(vp, &mut surface, &mut host).unwrap();
        driver.frame(0.0, &mut surface, &mut host).unwrap();

        driver.push_input(InputEvent::PointerDown {
            x: 1.0,
            y: 1.0,
            secondary: false,
        });
        driver.frame(34.0, &mut surface, &mut host).unwrap();
        assert_eq!(driver.effect().updates, 2);
        assert_eq!(driver.effect().clicks, 1);

        driver.frame(51.0, &mut surface, &mut host).unwrap();
        assert_eq!(driver.effect().clicks, 1);
    }
}
