//! Bounded rectangle lying in a plane.

use hrt_math::{Ray, Vec3};

use super::Plane;
use crate::Intersection;

/// Below this length the `n x Y` helper is considered parallel to the normal.
const HELPER_AXIS_EPSILON: f32 = 1e-4;

/// A rectangle of `width x height` starting at `start`, spanned by the
/// plane's tangent basis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wall {
    pub plane: Plane,
    pub start: Vec3,
    pub width: f32,
    pub height: f32,
}

impl Wall {
    pub fn new(start: Vec3, width: f32, height: f32, normal: Vec3) -> Self {
        Self {
            plane: Plane::new(normal, start),
            start,
            width,
            height,
        }
    }

    /// In-plane tangent basis `(u, v)`.
    ///
    /// `u` is derived from the world Y axis, switching to X when the normal
    /// is (nearly) vertical.
    pub fn tangents(&self) -> (Vec3, Vec3) {
        let n = self.plane.normal;
        let mut u = n.cross(Vec3::Y);
        if u.length() < HELPER_AXIS_EPSILON {
            u = n.cross(Vec3::X);
        }
        let u = u.normalize();
        let v = n.cross(u).normalize();
        (u, v)
    }

    /// Corner diagonally opposite `start`.
    pub fn end(&self) -> Vec3 {
        let (u, v) = self.tangents();
        self.start + u * self.width + v * self.height
    }

    /// The four rectangle corners, starting at `start`.
    pub fn corners(&self) -> [Vec3; 4] {
        let (u, v) = self.tangents();
        let along_u = u * self.width;
        let along_v = v * self.height;
        [
            self.start,
            self.start + along_u,
            self.start + along_v,
            self.start + along_u + along_v,
        ]
    }

    /// Midpoint of `start` and the opposite corner.
    pub fn center(&self) -> Vec3 {
        (self.start + self.end()) * 0.5
    }

    pub fn intersect(&self, ray: &Ray) -> Intersection {
        let base = self.plane.intersect(ray);
        if !base.is_hit() {
            return Intersection::NONE;
        }

        let (u, v) = self.tangents();
        let local = base.point - self.start;
        let u_proj = local.dot(u);
        let v_proj = local.dot(v);

        if u_proj < 0.0 || u_proj > self.width || v_proj < 0.0 || v_proj > self.height {
            return Intersection::NONE;
        }
        base
    }
}
