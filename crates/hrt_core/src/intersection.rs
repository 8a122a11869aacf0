//! Ray/primitive intersection results.

use hrt_math::Vec3;

/// Which side of the surface the ray hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntersectKind {
    /// No intersection.
    #[default]
    None,
    /// The ray travels against the surface normal (entering / front face).
    Inner,
    /// The ray travels with the surface normal (exiting / back face).
    Outer,
}

impl IntersectKind {
    /// Classify a hit from `dot(normal, direction)`.
    #[inline]
    pub fn from_facing(n_dot_dir: f32) -> Self {
        if n_dot_dir < 0.0 {
            IntersectKind::Inner
        } else {
            IntersectKind::Outer
        }
    }
}

/// Outcome of a single ray/primitive test.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Intersection {
    pub kind: IntersectKind,
    /// Hit point (meaningless when `kind` is `None`)
    pub point: Vec3,
}

impl Intersection {
    pub const NONE: Intersection = Intersection {
        kind: IntersectKind::None,
        point: Vec3::ZERO,
    };

    pub fn new(kind: IntersectKind, point: Vec3) -> Self {
        Self { kind, point }
    }

    pub fn inner(point: Vec3) -> Self {
        Self::new(IntersectKind::Inner, point)
    }

    pub fn outer(point: Vec3) -> Self {
        Self::new(IntersectKind::Outer, point)
    }

    #[inline]
    pub fn is_hit(&self) -> bool {
        self.kind != IntersectKind::None
    }
}

/// Closest-hit query result over a collection of primitives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Scene index of the primitive that was hit
    pub primitive: usize,
    pub intersection: Intersection,
    /// Euclidean distance from the ray origin to the hit point
    pub distance: f32,
}
