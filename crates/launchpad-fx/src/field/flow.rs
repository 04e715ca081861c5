use std::f32::consts::PI;

use glam::Vec2;

/// Parameters of the static flow field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowFieldParams {
    /// Spatial frequency of the field.
    pub frequency: f32,
    /// Base force magnitude per frame.
    pub strength: f32,
    /// External speed multiplier.
    pub speed: f32,
}

impl FlowFieldParams {
    pub const DEFAULT_FREQUENCY: f32 = 0.005;
    pub const DEFAULT_STRENGTH: f32 = 0.2;

    pub fn with_speed(speed: f32) -> Self {
        Self { speed, ..Self::default() }
    }
}

impl Default for FlowFieldParams {
    fn default() -> Self {
        Self {
            frequency: Self::DEFAULT_FREQUENCY,
            strength: Self::DEFAULT_STRENGTH,
            speed: 1.0,
        }
    }
}

/// `(cos(x * f) + sin(y * f)) * PI`
pub fn flow_angle(position: Vec2, frequency: f32) -> f32 {
    ((position.x * frequency).cos() + (position.y * frequency).sin()) * PI
}

/// Force the field exerts at `position`. No time dependence.
pub fn flow_force(position: Vec2, params: &FlowFieldParams) -> Vec2 {
    let angle = flow_angle(position, params.frequency);
    Vec2::from_angle(angle) * params.strength * params.speed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn angle_at_origin_is_pi() {
        // cos(0) + sin(0) = 1
        assert!((flow_angle(Vec2::ZERO, 0.005) - PI).abs() < 1e-6);
    }

    #[test]
    fn force_magnitude_is_strength_times_speed() {
        let params = FlowFieldParams::with_speed(2.5);
        for p in [Vec2::ZERO, Vec2::new(123.0, 456.0), Vec2::new(-40.0, 9000.0)] {
            let f = flow_force(p, &params);
            assert!((f.length() - 0.5).abs() < 1e-5);
        }
    }

    #[test]
    fn field_is_deterministic() {
        let params = FlowFieldParams::default();
        let p = Vec2::new(321.0, 77.0);
        assert_eq!(flow_force(p, &params), flow_force(p, &params));
    }
}
