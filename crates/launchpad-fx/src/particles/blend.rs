use crate::core::color::Rgb;

/// Color killed particles fade toward.
pub const KILL_COLOR: Rgb = Rgb::BLACK;

/// Linear color transition: rendered color is `lerp(start, target, weight)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorBlend {
    pub start: Rgb,
    pub target: Rgb,
    /// Progress in [0, 1]; only ever increases until the next retarget.
    pub weight: f32,
    /// Weight gained per frame.
    pub rate: f32,
}

impl ColorBlend {
    pub const DEFAULT_RATE: f32 = 0.01;

    pub fn new(rate: f32) -> Self {
        Self {
            start: Rgb::BLACK,
            target: Rgb::BLACK,
            weight: 0.0,
            rate,
        }
    }

    /// Advance one frame; freezes once the weight reaches 1.
    pub fn step(&mut self) {
        if self.weight < 1.0 {
            self.weight = (self.weight + self.rate).min(1.0);
        }
    }

    pub fn current(&self) -> Rgb {
        self.start.lerp(self.target, self.weight)
    }

    /// Start a new transition from the color currently shown.
    pub fn retarget(&mut self, target: Rgb) {
        self.start = self.current();
        self.target = target;
        self.weight = 0.0;
    }

    pub fn is_settled(&self) -> bool {
        self.weight >= 1.0
    }
}

impl Default for ColorBlend {
    fn default() -> Self {
        Self::new(Self::DEFAULT_RATE)
    }
}
