use crate::{axis_component, Ray, Vec3};

/// Axis-aligned bounding box used by the BVH.
///
/// A fresh box is the inverted sentinel `min = +inf, max = -inf`; the first
/// `grow_to_include` call makes it valid. Boxes only ever grow.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl BoundingBox {
    /// The inverted sentinel box (contains nothing).
    pub const EMPTY: BoundingBox = BoundingBox {
        min: Vec3::INFINITY,
        max: Vec3::NEG_INFINITY,
    };

    /// Create an empty box.
    pub fn new() -> Self {
        Self::EMPTY
    }

    /// Create the tight box around two corner points.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// True while no point has been included.
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Component-wise min/max update.
    #[inline]
    pub fn grow_to_include(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Grow to include another box. Empty boxes are ignored.
    pub fn grow_to_include_box(&mut self, other: &BoundingBox) {
        if other.is_empty() {
            return;
        }
        self.grow_to_include(other.min);
        self.grow_to_include(other.max);
    }

    /// Returns the center point of the box.
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Extent along each axis (zero for an empty box).
    pub fn size(&self) -> Vec3 {
        if self.is_empty() {
            Vec3::ZERO
        } else {
            self.max - self.min
        }
    }

    /// Returns the index (0=X, 1=Y, 2=Z) of the axis with the greatest extent.
    ///
    /// Ties resolve towards the later axis.
    pub fn longest_axis(&self) -> usize {
        let size = self.size();
        if size.x > size.y.max(size.z) {
            0
        } else if size.y > size.z {
            1
        } else {
            2
        }
    }

    /// Surface area, used to measure refit looseness.
    pub fn surface_area(&self) -> f32 {
        let d = self.size();
        2.0 * (d.x * d.y + d.y * d.z + d.z * d.x)
    }

    /// Inclusive point containment.
    pub fn contains_point(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    /// True when `other` lies entirely inside this box. An empty box is
    /// contained by everything.
    pub fn contains_box(&self, other: &BoundingBox) -> bool {
        other.is_empty() || (self.contains_point(other.min) && self.contains_point(other.max))
    }

    /// Slab test: does the ray enter the box for some `t` in `(0, t_max]`?
    pub fn hit(&self, ray: &Ray, t_max: f32) -> bool {
        if self.is_empty() {
            return false;
        }

        let inv = ray.inv_direction();
        let mut t_min = 0.0_f32;
        let mut t_max = t_max;

        for axis in 0..3 {
            let origin = axis_component(ray.origin, axis);
            let inv_d = axis_component(inv, axis);
            let lo = axis_component(self.min, axis);
            let hi = axis_component(self.max, axis);

            if inv_d.is_infinite() {
                // Parallel to this slab: inside or never.
                if origin < lo || origin > hi {
                    return false;
                }
                continue;
            }

            let mut t0 = (lo - origin) * inv_d;
            let mut t1 = (hi - origin) * inv_d;
            if inv_d < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = t0.max(t_min);
            t_max = t1.min(t_max);
            if t_max < t_min {
                return false;
            }
        }

        true
    }
}
