//! Pinhole camera with a yaw/pitch orientation.

use hrt_math::{Ray, Vec3};

/// Camera for primary-ray generation.
///
/// Orientation is stored as Euler angles in degrees; `front`, `right` and
/// `up` are derived from them by [`Camera::update_vectors`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub front: Vec3,
    pub up: Vec3,
    pub right: Vec3,
    pub world_up: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    /// Vertical field of view in degrees
    pub fov: f32,
    pub aspect_ratio: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::ZERO, 4.0 / 3.0)
    }
}

impl Camera {
    /// Create a camera at `position` looking down -Z.
    pub fn new(position: Vec3, aspect_ratio: f32) -> Self {
        let mut camera = Self {
            position,
            front: Vec3::NEG_Z,
            up: Vec3::Y,
            right: Vec3::X,
            world_up: Vec3::Y,
            yaw: -90.0,
            pitch: 0.0,
            fov: 45.0,
            aspect_ratio,
        };
        camera.update_vectors();
        camera
    }

    pub fn with_fov(mut self, fov: f32) -> Self {
        self.fov = fov;
        self
    }

    /// Recompute the basis from `yaw` and `pitch`.
    pub fn update_vectors(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        self.front = Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos()).normalize();
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
    }

    /// Turn the camera toward `target`.
    ///
    /// Pitch is clamped to +-89 degrees to keep the basis well defined.
    pub fn look_at(&mut self, target: Vec3) {
        let dir = target - self.position;
        if dir.length_squared() == 0.0 {
            return;
        }
        let dir = dir.normalize();
        self.yaw = dir.z.atan2(dir.x).to_degrees();
        self.pitch = dir.y.clamp(-1.0, 1.0).asin().to_degrees().clamp(-89.0, 89.0);
        self.update_vectors();
    }

    pub fn set_aspect(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
    }

    /// Primary ray through normalized device coordinates `(x, y)` in `[-1, 1]`.
    pub fn ray_through(&self, x: f32, y: f32) -> Ray {
        let scale = (self.fov.to_radians() * 0.5).tan();
        let direction = self.front
            + self.right * (x * self.aspect_ratio * scale)
            + self.up * (y * scale);
        Ray::new(self.position, direction.normalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_looks_down_neg_z() {
        let camera = Camera::new(Vec3::new(0.0, 5.0, 30.0), 800.0 / 600.0);

        assert!((camera.front - Vec3::NEG_Z).length() < 1e-5);
        assert!((camera.right - Vec3::X).length() < 1e-5);
        assert!((camera.up - Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn test_look_at() {
        let mut camera = Camera::new(Vec3::ZERO, 1.0);
        camera.look_at(Vec3::new(10.0, 0.0, 0.0));

        assert!((camera.front - Vec3::X).length() < 1e-5);
        assert!(camera.front.dot(camera.right).abs() < 1e-5);
        assert!(camera.front.dot(camera.up).abs() < 1e-5);
    }

    #[test]
    fn test_look_at_clamps_pitch() {
        let mut camera = Camera::new(Vec3::ZERO, 1.0);
        camera.look_at(Vec3::new(0.0, 10.0, 0.0));

        assert!(camera.pitch <= 89.0);
        assert!(camera.front.is_finite());
        assert!(camera.right.is_finite());
    }

    #[test]
    fn test_center_ray_follows_front() {
        let camera = Camera::new(Vec3::new(1.0, 2.0, 3.0), 16.0 / 9.0);
        let ray = camera.ray_through(0.0, 0.0);

        assert_eq!(ray.origin, camera.position);
        assert!((ray.direction - camera.front).length() < 1e-5);
    }

    #[test]
    fn test_corner_rays_spread() {
        let camera = Camera::new(Vec3::ZERO, 2.0).with_fov(90.0);
        let right = camera.ray_through(1.0, 0.0);
        let top = camera.ray_through(0.0, 1.0);

        assert!(right.direction.x > 0.0);
        assert!(top.direction.y > 0.0);
        // Horizontal extent is scaled by the aspect ratio
        assert!(right.direction.x > top.direction.y);
    }
}
