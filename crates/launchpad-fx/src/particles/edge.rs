use glam::Vec2;

use super::Particle;
use crate::api::types::Viewport;

/// What happens when a particle reaches the edge of the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum EdgePolicy {
    /// Leave the particle alone.
    #[default]
    None,
    /// Reappear on the opposite edge.
    Wrap,
    /// Flip the velocity component when inside `margin` of an edge.
    Bounce { margin: f32 },
}

impl EdgePolicy {
    pub fn apply(self, particle: &mut Particle, viewport: &Viewport) {
        match self {
            EdgePolicy::None => {}
            EdgePolicy::Wrap => {
                particle.position = wrap(particle.position, viewport.width, viewport.height);
            }
            EdgePolicy::Bounce { margin } => {
                let p = particle.position;
                if p.x < margin || p.x > viewport.width - margin {
                    particle.velocity.x = -particle.velocity.x;
                }
                if p.y < margin || p.y > viewport.height - margin {
                    particle.velocity.y = -particle.velocity.y;
                }
            }
        }
    }
}

/// Position modulo the canvas size; positions already inside (edges
/// included) are returned untouched.
pub fn wrap(p: Vec2, width: f32, height: f32) -> Vec2 {
    Vec2::new(wrap_axis(p.x, width), wrap_axis(p.y, height))
}

fn wrap_axis(v: f32, extent: f32) -> f32 {
    if extent <= 0.0 || !v.is_finite() {
        return 0.0;
    }
    if (0.0..=extent).contains(&v) {
        return v;
    }
    // rem_euclid can round up to `extent` for tiny negative inputs; still in range.
    v.rem_euclid(extent).clamp(0.0, extent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crossing_right_edge_reappears_left() {
        let p = wrap(Vec2::new(801.5, 10.0), 800.0, 600.0);
        assert!((p.x - 1.5).abs() < 1e-4);
        assert_eq!(p.y, 10.0);
    }

    #[test]
    fn crossing_top_edge_reappears_bottom() {
        let p = wrap(Vec2::new(10.0, -2.0), 800.0, 600.0);
        assert!((p.y - 598.0).abs() < 1e-4);
    }

    #[test]
    fn edges_themselves_are_inside() {
        assert_eq!(wrap(Vec2::new(800.0, 0.0), 800.0, 600.0), Vec2::new(800.0, 0.0));
    }

    #[test]
    fn bounce_flips_velocity_inside_margin() {
        let vp = Viewport::new(400.0, 300.0);
        let mut p = Particle::new(Vec2::new(360.0, 150.0)).with_velocity(Vec2::new(1.0, 0.5));
        EdgePolicy::Bounce { margin: 50.0 }.apply(&mut p, &vp);
        assert_eq!(p.velocity, Vec2::new(-1.0, 0.5));
    }
}
