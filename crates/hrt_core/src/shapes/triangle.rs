//! Triangle primitive for ray tracing.
//!
//! Three interchangeable intersection algorithms are available:
//! barycentric (plane hit + edge-basis test), Möller-Trumbore, and a query
//! against an external acceleration structure. For a non-degenerate triangle
//! all three agree on hit/no-hit and on the hit point.

use std::sync::Arc;

use hrt_math::{Ray, Vec3};
use serde::{Deserialize, Serialize};

use super::Plane;
use crate::{AcceleratorHandle, IntersectKind, Intersection, TriangleAccelerator};

/// Relative determinant threshold below which the ray is parallel to the
/// triangle, scaled by both edge lengths and the direction length.
const MT_PARALLEL_EPSILON: f32 = 1e-8;

/// Minimum accepted ray parameter for Möller-Trumbore hits.
const MT_T_EPSILON: f32 = 1e-6;

/// Relative threshold on the barycentric denominator (zero-area triangles).
const BARYCENTRIC_DENOM_EPSILON: f32 = 1e-7;

/// Which ray/triangle test to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriangleAlgorithm {
    Barycentric,
    #[default]
    MollerTrumbore,
    /// Delegate to the registered [`TriangleAccelerator`].
    Accelerated,
}

/// Möller-Trumbore ray-triangle intersection.
///
/// Returns `(t, u, v)` for hits with `t > 1e-6`.
pub fn moller_trumbore(a: Vec3, b: Vec3, c: Vec3, ray: &Ray) -> Option<(f32, f32, f32)> {
    let edge1 = b - a;
    let edge2 = c - a;

    let h = ray.direction.cross(edge2);
    let det = edge1.dot(h);

    // Ray is parallel to triangle (or the triangle is degenerate)
    let scale = edge1.length() * edge2.length() * ray.direction.length();
    if det.abs() <= MT_PARALLEL_EPSILON * scale {
        return None;
    }

    let f = 1.0 / det;
    let s = ray.origin - a;
    let u = f * s.dot(h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * ray.direction.dot(q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);
    (t > MT_T_EPSILON).then_some((t, u, v))
}

/// A triangle primitive.
#[derive(Debug, Clone)]
pub struct Triangle {
    /// Plane through the vertices (unit normal from the winding)
    pub plane: Plane,
    pub a: Vec3,
    pub b: Vec3,
    pub c: Vec3,
    /// Algorithm used by [`Triangle::intersect`]
    pub algorithm: TriangleAlgorithm,
    inverted: bool,
    accelerator: Option<AcceleratorHandle>,
}

impl Triangle {
    /// Create a new triangle from three vertices.
    pub fn new(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self {
            plane: Self::plane_through(a, b, c, false),
            a,
            b,
            c,
            algorithm: TriangleAlgorithm::default(),
            inverted: false,
            accelerator: None,
        }
    }

    /// Register this triangle with an acceleration structure.
    pub fn with_accelerator(mut self, accelerator: &Arc<dyn TriangleAccelerator>) -> Self {
        self.accelerator = Some(AcceleratorHandle::register_triangle(accelerator, self.vertices()));
        self
    }

    pub fn with_algorithm(mut self, algorithm: TriangleAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    fn plane_through(a: Vec3, b: Vec3, c: Vec3, inverted: bool) -> Plane {
        let mut plane = Plane::new((b - a).cross(c - a), a);
        if inverted {
            plane.normal = -plane.normal;
            plane.d = -plane.normal.dot(a);
        }
        plane
    }

    pub fn vertices(&self) -> [Vec3; 3] {
        [self.a, self.b, self.c]
    }

    /// Centroid of the triangle.
    pub fn center(&self) -> Vec3 {
        (self.a + self.b + self.c) / 3.0
    }

    pub fn normal(&self) -> Vec3 {
        self.plane.normal
    }

    pub fn is_finite(&self) -> bool {
        self.a.is_finite() && self.b.is_finite() && self.c.is_finite()
    }

    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    pub fn accelerator(&self) -> Option<&AcceleratorHandle> {
        self.accelerator.as_ref()
    }

    /// Flip the normal (and plane offset) without touching the vertices.
    pub fn invert_normal(&mut self) {
        self.inverted = !self.inverted;
        self.plane.normal = -self.plane.normal;
        self.plane.d = -self.plane.normal.dot(self.a);
    }

    /// Move the vertices, re-deriving the plane and forwarding the new
    /// buffer to the accelerator (visible after its next commit).
    pub fn set_vertices(&mut self, a: Vec3, b: Vec3, c: Vec3) {
        self.a = a;
        self.b = b;
        self.c = c;
        self.plane = Self::plane_through(a, b, c, self.inverted);
        if let Some(handle) = &self.accelerator {
            handle.update([a, b, c]);
        }
    }

    /// Intersect with the triangle's configured algorithm.
    pub fn intersect(&self, ray: &Ray) -> Intersection {
        self.intersect_with(ray, self.algorithm)
    }

    pub fn intersect_with(&self, ray: &Ray, algorithm: TriangleAlgorithm) -> Intersection {
        match algorithm {
            TriangleAlgorithm::Barycentric => self.intersect_barycentric(ray),
            TriangleAlgorithm::MollerTrumbore => self.intersect_moller_trumbore(ray),
            TriangleAlgorithm::Accelerated => self.intersect_accelerated(ray),
        }
    }

    /// Plane hit followed by a barycentric inside test.
    pub fn intersect_barycentric(&self, ray: &Ray) -> Intersection {
        let base = self.plane.intersect(ray);
        if !base.is_hit() {
            return Intersection::NONE;
        }

        let edge1 = self.b - self.a;
        let edge2 = self.c - self.a;
        let to_point = base.point - self.a;

        let d00 = edge1.dot(edge1);
        let d01 = edge1.dot(edge2);
        let d11 = edge2.dot(edge2);
        let d20 = to_point.dot(edge1);
        let d21 = to_point.dot(edge2);

        let denom = d00 * d11 - d01 * d01;
        if denom.abs() <= BARYCENTRIC_DENOM_EPSILON * d00 * d11 {
            return Intersection::NONE;
        }

        let v = (d11 * d20 - d01 * d21) / denom;
        let w = (d00 * d21 - d01 * d20) / denom;
        let u = 1.0 - v - w;

        if u < 0.0 || v < 0.0 || w < 0.0 {
            return Intersection::NONE;
        }
        base
    }

    pub fn intersect_moller_trumbore(&self, ray: &Ray) -> Intersection {
        match moller_trumbore(self.a, self.b, self.c, ray) {
            Some((t, _, _)) => Intersection::new(self.facing(ray), ray.at(t)),
            None => Intersection::NONE,
        }
    }

    /// Query the registered accelerator. Triangles without one fall back to
    /// Möller-Trumbore, which is what the accelerator runs internally.
    pub fn intersect_accelerated(&self, ray: &Ray) -> Intersection {
        let Some(handle) = &self.accelerator else {
            return self.intersect_moller_trumbore(ray);
        };
        match handle.intersect(ray) {
            Some(hit) => Intersection::new(self.facing(ray), ray.at(hit.t)),
            None => Intersection::NONE,
        }
    }

    fn facing(&self, ray: &Ray) -> IntersectKind {
        IntersectKind::from_facing(self.plane.normal.dot(ray.direction))
    }
}
