//! Full mount → frames → teardown runs against the headless host.

use launchpad_fx::effects::text_morph::{AlphaMask, GlyphRasterizer};
use launchpad_fx::scene::{SceneBackend, SceneManager, SceneState, SceneUniforms};
use launchpad_fx::{
    AiTools, AiToolsConfig, DriverState, FlowField, FlowFieldConfig, FrameDriver, FxResult,
    HeadlessHost, Host, ManualClock, Phase, PixelSurface, TextMorph, TextMorphConfig, Viewport,
};

fn run_frames<E: launchpad_fx::Effect>(
    driver: &mut FrameDriver<E>,
    clock: &mut ManualClock,
    surface: &mut PixelSurface,
    host: &mut HeadlessHost,
    frames: usize,
) {
    for _ in 0..frames {
        assert!(host.fire(), "a frame should always be pending while running");
        driver.frame(clock.tick_frame(), surface, host).unwrap();
    }
}

#[test]
fn flow_field_stays_finite_and_in_bounds() {
    let vp = Viewport::new(160.0, 120.0);
    let mut surface = PixelSurface::new(vp);
    let mut host = HeadlessHost::new();
    let mut clock = ManualClock::new();
    let config = FlowFieldConfig {
        particle_count: 600,
        speed: 1.0,
        ..Default::default()
    };
    let mut driver = FrameDriver::new(FlowField::new(config), 42);
    driver.mount(vp, &mut surface, &mut host).unwrap();

    for _ in 0..1000 {
        host.fire();
        driver.frame(clock.tick_frame(), &mut surface, &mut host).unwrap();
        for p in driver.effect().particles().iter() {
            assert!(p.position.is_finite() && p.velocity.is_finite());
            assert!((0.0..=vp.width).contains(&p.position.x), "{:?}", p.position);
            assert!((0.0..=vp.height).contains(&p.position.y), "{:?}", p.position);
        }
    }
    assert_eq!(driver.effect().particles().len(), 600);
    assert_eq!(driver.frame_count(), 1000);
    assert!(surface.coverage(0.0) > 0);
}

#[test]
fn ai_tools_converge_on_the_center_then_cycle() {
    let vp = Viewport::new(400.0, 300.0);
    let center = vp.center();
    let mut surface = PixelSurface::new(vp);
    let mut host = HeadlessHost::new();
    let mut clock = ManualClock::new();
    let mut driver = FrameDriver::new(AiTools::new(AiToolsConfig::default()), 3);
    driver.mount(vp, &mut surface, &mut host).unwrap();

    let mut seen = vec![Phase::Floating];
    let mut converged_spread = None;
    let mut last_converging_spread = f32::MAX;

    // One full cycle is 8.5 s; run a little past it.
    let frames = (9000.0 / ManualClock::FRAME_MS) as usize;
    for _ in 0..frames {
        host.fire();
        driver.frame(clock.tick_frame(), &mut surface, &mut host).unwrap();

        let fx = driver.effect();
        if fx.phase() == Phase::Converging {
            last_converging_spread = fx
                .nodes()
                .iter()
                .map(|n| n.position.distance(center))
                .fold(0.0, f32::max);
        }
        if seen.last() != Some(&fx.phase()) {
            if fx.phase() == Phase::Merged {
                converged_spread = Some(last_converging_spread);
            }
            seen.push(fx.phase());
        }
    }

    let spread = converged_spread.expect("reached Merged");
    assert!(spread < 1.0, "nodes still {spread} px from center");
    assert_eq!(
        seen,
        vec![
            Phase::Floating,
            Phase::Converging,
            Phase::Merged,
            Phase::Exploding,
            Phase::Floating,
        ]
    );
}

/// Draws a row of pixels whose length depends on the word.
struct RowPerWord;

impl GlyphRasterizer for RowPerWord {
    fn rasterize(&mut self, text: &str, _font_px: f32, width: u32, height: u32) -> FxResult<AlphaMask> {
        let n = match text {
            "LONG" => 40,
            _ => 25,
        };
        let mut mask = AlphaMask::new(width, height);
        for x in 0..n.min(width) {
            mask.set(x, 0, 255);
        }
        Ok(mask)
    }
}

#[test]
fn next_word_reuses_particles_and_kills_the_surplus() {
    let vp = Viewport::new(200.0, 70.0);
    let mut surface = PixelSurface::new(vp);
    let mut host = HeadlessHost::new();
    let mut clock = ManualClock::new();
    let config = TextMorphConfig {
        words: vec!["LONG".into(), "SHORT".into()],
        frames_per_word: 2,
        pixel_step: 1,
        ..Default::default()
    };
    let mut driver = FrameDriver::new(TextMorph::with_rasterizer(config, RowPerWord), 9);
    driver.mount(vp, &mut surface, &mut host).unwrap();
    assert_eq!(driver.effect().particles().len(), 40);

    run_frames(&mut driver, &mut clock, &mut surface, &mut host, 2);

    let fx = driver.effect();
    assert_eq!(fx.current_word(), Some("SHORT"));
    assert_eq!(fx.particles().len(), 40);
    assert_eq!(fx.particles().killed_count(), 15);
}

#[test]
fn teardown_releases_the_frame_and_every_listener() {
    let vp = Viewport::new(200.0, 70.0);
    let mut surface = PixelSurface::new(vp);
    let mut host = HeadlessHost::new();
    let mut clock = ManualClock::new();
    let mut driver = FrameDriver::new(TextMorph::new(TextMorphConfig::default()), 1);
    driver.mount(vp, &mut surface, &mut host).unwrap();
    assert_eq!(host.listeners().len(), 8);

    run_frames(&mut driver, &mut clock, &mut surface, &mut host, 5);
    driver.teardown(&mut host);

    assert_eq!(driver.state(), DriverState::TornDown);
    assert!(host.pending_frame().is_none());
    assert!(host.listeners().is_empty());
    assert!(driver.pending_frame().is_none());
}

#[test]
fn resize_keeps_a_single_loop() {
    let vp = Viewport::new(160.0, 120.0);
    let mut surface = PixelSurface::new(vp);
    let mut host = HeadlessHost::new();
    let mut clock = ManualClock::new();
    let mut driver = FrameDriver::new(FlowField::default(), 5);
    driver.mount(vp, &mut surface, &mut host).unwrap();
    assert_eq!(host.requests(), 1);

    for size in [(320.0, 240.0), (100.0, 80.0), (160.0, 120.0)] {
        driver
            .resize(Viewport::new(size.0, size.1), &mut surface, &mut host)
            .unwrap();
    }
    assert_eq!(host.requests(), 1, "resize must not start a second loop");

    run_frames(&mut driver, &mut clock, &mut surface, &mut host, 3);
    assert_eq!(host.requests(), 4);

    // Collapsing to zero parks the loop until a real size comes back.
    driver.resize(Viewport::new(0.0, 0.0), &mut surface, &mut host).unwrap();
    assert_eq!(driver.state(), DriverState::AwaitingSize);
    assert!(host.pending_frame().is_none());
    driver.resize(vp, &mut surface, &mut host).unwrap();
    assert_eq!(driver.state(), DriverState::Running);
    assert!(host.pending_frame().is_some());
    assert_eq!(host.requests(), 5);
}

#[derive(Default)]
struct CountingBackend {
    allocations: u32,
    disposals: u32,
}

impl SceneBackend for CountingBackend {
    fn allocate(&mut self, _viewport: Viewport) -> FxResult<()> {
        self.allocations += 1;
        Ok(())
    }

    fn dispose(&mut self) {
        self.disposals += 1;
    }

    fn draw(&mut self, _uniforms: &SceneUniforms) {}
}

#[test]
fn scene_survives_a_quick_remount_and_is_freed_later() {
    let vp = Viewport::new(800.0, 600.0);
    let mut scene = SceneManager::new(CountingBackend::default()).with_grace_frames(30);

    let first = scene.acquire(vp).unwrap();
    scene.tick(0.0);
    scene.release(first);
    scene.release(first);
    scene.tick(16.0);
    let second = scene.acquire(vp).unwrap();
    for i in 0..100 {
        scene.tick(32.0 + i as f64 * 16.0);
    }
    assert_eq!(scene.backend().allocations, 1);
    assert_eq!(scene.backend().disposals, 0);

    scene.release(second);
    for _ in 0..30 {
        scene.tick(0.0);
    }
    assert_eq!(scene.backend().disposals, 0);
    scene.tick(0.0);
    assert_eq!(scene.backend().disposals, 1);
    assert_eq!(scene.state(), SceneState::Disposed);
}

#[test]
fn host_trait_is_object_safe() {
    let mut host = HeadlessHost::new();
    let dyn_host: &mut dyn Host = &mut host;
    let handle = dyn_host.request_frame().unwrap();
    dyn_host.cancel_frame(handle);
    assert!(host.pending_frame().is_none());
}
