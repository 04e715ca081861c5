//! Steering with arrival.

use glam::Vec2;

/// Velocity a particle wants toward `target`: full `max_speed` outside the
/// `close_enough` radius, scaled linearly by `distance / close_enough` inside
/// it, so the desired speed reaches zero exactly at the target.
pub fn desired_velocity(position: Vec2, target: Vec2, max_speed: f32, close_enough: f32) -> Vec2 {
    let to_target = target - position;
    let distance = to_target.length();
    if distance <= f32::EPSILON {
        return Vec2::ZERO;
    }
    let proximity = if close_enough > 0.0 && distance < close_enough {
        distance / close_enough
    } else {
        1.0
    };
    to_target / distance * max_speed * proximity
}

/// `desired - velocity`, magnitude-limited to `max_force`.
pub fn steer(
    position: Vec2,
    velocity: Vec2,
    target: Vec2,
    max_speed: f32,
    max_force: f32,
    close_enough: f32,
) -> Vec2 {
    let desired = desired_velocity(position, target, max_speed, close_enough);
    (desired - velocity).clamp_length_max(max_force.max(0.0))
}
