use glam::{Mat4, Vec3};

/// Vertical field of view in degrees.
pub const FOV_Y_DEG: f32 = 75.0;
pub const NEAR: f32 = 0.1;
pub const FAR: f32 = 1000.0;
/// Distance from the origin along +Z; the cloud's cube (±75) fits in view.
pub const EYE_DISTANCE: f32 = 120.0;

/// Fixed perspective camera looking at the origin down -Z.
#[derive(Debug, Clone)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    /// Vertical field of view (radians).
    pub fov_y_rad: f32,
    /// Width over height of the output surface.
    pub aspect: f32,
    pub near: f32,
    pub far: f32,

    /// Cached projection; refreshed by `update_projection_matrix()`.
    proj: Mat4,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        let mut camera = Self {
            eye: Vec3::new(0.0, 0.0, EYE_DISTANCE),
            target: Vec3::ZERO,
            fov_y_rad: FOV_Y_DEG.to_radians(),
            aspect: 1.0,
            near: NEAR,
            far: FAR,
            proj: Mat4::IDENTITY,
        };
        camera.set_aspect(width, height);
        camera.update_projection_matrix();
        camera
    }

    /// Sets the aspect ratio from an output size. Zero sizes (minimized
    /// windows) are ignored.
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Recomputes the projection after `fov_y_rad`, `aspect`, `near` or
    /// `far` changed.
    pub fn update_projection_matrix(&mut self) {
        // glam's perspective_rh already maps depth to wgpu's [0, 1].
        self.proj = Mat4::perspective_rh(self.fov_y_rad, self.aspect, self.near, self.far);
    }

    #[inline]
    pub fn proj(&self) -> Mat4 {
        self.proj
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, Vec3::Y)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.proj * self.view()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_projects_to_screen_center() {
        let cam = Camera::new(1280, 720);
        let ndc = cam.view_proj().project_point3(Vec3::ZERO);
        assert!(ndc.x.abs() < 1e-6 && ndc.y.abs() < 1e-6);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn resize_updates_aspect_and_projection() {
        let mut cam = Camera::new(800, 600);
        let before = cam.proj();
        cam.set_aspect(1920, 1080);
        cam.update_projection_matrix();
        assert!((cam.aspect - 16.0 / 9.0).abs() < 1e-6);
        assert_ne!(cam.proj(), before);
    }

    #[test]
    fn zero_size_keeps_previous_aspect() {
        let mut cam = Camera::new(800, 400);
        cam.set_aspect(0, 300);
        assert_eq!(cam.aspect, 2.0);
    }

    #[test]
    fn cloud_corner_is_in_front_of_the_camera() {
        let cam = Camera::new(1280, 720);
        let ndc = cam.view_proj().project_point3(Vec3::splat(75.0));
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }
}
