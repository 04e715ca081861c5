use glam::{Mat4, Vec2, Vec3};

use crate::api::types::Viewport;

/// Perspective camera looking down -Z at the origin.
/// Projection maps to OpenGL clip space (Z in [-1, 1]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveCamera {
    /// Vertical field of view in degrees.
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub eye: Vec3,
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self {
            fov_y: 75.0,
            aspect: 1.0,
            near: 0.1,
            far: 1000.0,
            eye: Vec3::new(0.0, 0.0, 3.0),
        }
    }
}

impl PerspectiveCamera {
    pub fn new(aspect: f32) -> Self {
        Self {
            aspect,
            ..Self::default()
        }
    }

    /// Keep the aspect ratio in step with the canvas. Empty viewports are ignored.
    pub fn resize(&mut self, viewport: Viewport) {
        if !viewport.is_empty() {
            self.aspect = viewport.width / viewport.height;
        }
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_y.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, Vec3::ZERO, Vec3::Y)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// NDC point back to world space.
    pub fn unproject(&self, ndc: Vec3) -> Vec3 {
        self.view_projection().inverse().project_point3(ndc)
    }

    /// Where the ray through a screen point (CSS pixels) meets the `z = 0`
    /// plane. `None` for an empty viewport or a ray parallel to the plane.
    pub fn pick_on_plane(&self, screen: Vec2, viewport: Viewport) -> Option<Vec3> {
        if viewport.is_empty() {
            return None;
        }
        let ndc = screen_to_ndc(screen, viewport);
        let through = self.unproject(ndc.extend(0.5));
        let dir = (through - self.eye).try_normalize()?;
        if dir.z.abs() < f32::EPSILON {
            return None;
        }
        let distance = -self.eye.z / dir.z;
        Some(self.eye + dir * distance)
    }
}

/// CSS pixels (origin top-left, y down) to NDC (origin center, y up).
pub fn screen_to_ndc(screen: Vec2, viewport: Viewport) -> Vec2 {
    Vec2::new(
        screen.x / viewport.width * 2.0 - 1.0,
        -(screen.y / viewport.height * 2.0 - 1.0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_of_screen_picks_origin() {
        let cam = PerspectiveCamera::new(2.0);
        let vp = Viewport::new(800.0, 400.0);
        let hit = cam.pick_on_plane(Vec2::new(400.0, 200.0), vp).unwrap();
        assert!(hit.length() < 1e-4, "{hit:?}");
    }

    #[test]
    fn picks_land_on_the_plane_and_keep_orientation() {
        let mut cam = PerspectiveCamera::default();
        let vp = Viewport::new(600.0, 600.0);
        cam.resize(vp);
        let top_right = cam.pick_on_plane(Vec2::new(600.0, 0.0), vp).unwrap();
        assert!(top_right.z.abs() < 1e-4);
        assert!(top_right.x > 0.0 && top_right.y > 0.0);
        // tan(37.5 deg) * 3 units to the edge of the view at z = 0.
        let half_extent = (37.5f32).to_radians().tan() * 3.0;
        assert!((top_right.y - half_extent).abs() < 1e-3);
    }

    #[test]
    fn view_projection_round_trips_a_pick() {
        let cam = PerspectiveCamera::new(1.5);
        let vp = Viewport::new(900.0, 600.0);
        let hit = cam.pick_on_plane(Vec2::new(700.0, 150.0), vp).unwrap();
        let ndc = cam.view_projection().project_point3(hit);
        let expected = screen_to_ndc(Vec2::new(700.0, 150.0), vp);
        assert!((ndc.truncate() - expected).length() < 1e-4, "{ndc:?}");
    }

    #[test]
    fn empty_viewport_picks_nothing() {
        let cam = PerspectiveCamera::default();
        assert!(cam.pick_on_plane(Vec2::ZERO, Viewport::new(0.0, 0.0)).is_none());
    }
}
