//! Infinite plane `dot(n, p) + d = 0`.

use hrt_math::{Ray, Vec3};

use crate::{IntersectKind, Intersection};

/// An infinite plane with unit normal `normal` and offset `d`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub d: f32,
}

impl Plane {
    /// Create the plane through `point` with the given (unnormalized) normal.
    pub fn new(normal: Vec3, point: Vec3) -> Self {
        let normal = normal.normalize();
        Self {
            normal,
            d: -normal.dot(point),
        }
    }

    /// Signed distance of a point from the plane.
    pub fn signed_distance(&self, p: Vec3) -> f32 {
        self.normal.dot(p) + self.d
    }

    /// Ray parameter of the plane crossing, with its facing.
    ///
    /// Parallel rays and crossings at `t <= 0` report `None`.
    pub fn hit_t(&self, ray: &Ray) -> Option<(f32, IntersectKind)> {
        let np = self.normal.dot(ray.direction);
        if np == 0.0 {
            return None;
        }
        let t = -(self.d + self.normal.dot(ray.origin)) / np;
        // NaN from a degenerate normal fails this comparison too
        if t > 0.0 {
            Some((t, IntersectKind::from_facing(np)))
        } else {
            None
        }
    }

    pub fn intersect(&self, ray: &Ray) -> Intersection {
        match self.hit_t(ray) {
            Some((t, kind)) => Intersection::new(kind, ray.at(t)),
            None => Intersection::NONE,
        }
    }
}
