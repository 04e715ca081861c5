/// How many simulation steps a frame callback runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepMode {
    /// Exactly one step per display refresh. All per-frame constants
    /// (friction, gains, blend rates) are tuned for this mode.
    PerFrame,
    /// Fixed-rate steps decoupled from the display refresh rate.
    Fixed(f32),
}

impl Default for StepMode {
    fn default() -> Self {
        StepMode::PerFrame
    }
}

/// Fixed timestep accumulator.
/// Ensures simulation runs at a consistent rate regardless of frame time.
pub struct FixedTimestep {
    /// The fixed delta time per tick, in seconds.
    dt: f32,
    /// Accumulated time from variable frame deltas.
    accumulator: f32,
}

impl FixedTimestep {
    pub fn new(dt: f32) -> Self {
        Self {
            dt,
            accumulator: 0.0,
        }
    }

    /// Add frame time to the accumulator. Returns the number of fixed steps to run.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.max(0.0);
        // Cap to prevent spiral of death (max 10 steps per frame)
        self.accumulator = self.accumulator.min(self.dt * 10.0);
        let steps = (self.accumulator / self.dt) as u32;
        self.accumulator -= steps as f32 * self.dt;
        steps
    }

    /// Interpolation alpha for rendering between ticks (0.0 to 1.0).
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.dt
    }

    /// The fixed delta time.
    pub fn dt(&self) -> f32 {
        self.dt
    }
}

/// Hand-advanced millisecond clock for headless hosts and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualClock {
    now_ms: f64,
}

impl ManualClock {
    /// Nominal display refresh interval (60 Hz).
    pub const FRAME_MS: f64 = 1000.0 / 60.0;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(now_ms: f64) -> Self {
        Self { now_ms }
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Advance by `ms` and return the new time.
    pub fn advance(&mut self, ms: f64) -> f64 {
        self.now_ms += ms;
        self.now_ms
    }

    /// Advance by one nominal display frame.
    pub fn tick_frame(&mut self) -> f64 {
        self.advance(Self::FRAME_MS)
    }
}
