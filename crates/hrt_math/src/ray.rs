use crate::Vec3;

/// A half-line with an origin and a (not necessarily normalized) direction.
///
/// Intersection routines report hits as points, so `t` values are only
/// meaningful relative to the direction's length.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Reciprocal of the direction, used by slab tests.
    #[inline]
    pub fn inv_direction(&self) -> Vec3 {
        Vec3::ONE / self.direction
    }
}
