//! Bounding-box growth for each primitive variant.
//!
//! Extends `hrt_math::BoundingBox`, which only knows about points.

use hrt_math::{BoundingBox, Vec3};

use crate::{Primitive, Shape, Sphere, Triangle, Wall};

/// Extension trait growing a [`BoundingBox`] around scene geometry.
pub trait GrowToInclude {
    /// Include `center ± radius` (the axis-aligned cube around the sphere).
    fn grow_to_include_sphere(&mut self, sphere: &Sphere);

    /// Include the four rectangle corners.
    fn grow_to_include_wall(&mut self, wall: &Wall);

    /// Include the three vertices. Triangles with non-finite vertices are
    /// reported and skipped; returns `false` in that case.
    fn grow_to_include_triangle(&mut self, triangle: &Triangle) -> bool;

    /// Dispatch on the primitive's shape. Planes are infinite and leave the
    /// box unchanged; returns `false` whenever nothing was included.
    fn grow_to_include_primitive(&mut self, primitive: &Primitive) -> bool;
}

impl GrowToInclude for BoundingBox {
    fn grow_to_include_sphere(&mut self, sphere: &Sphere) {
        let r = Vec3::splat(sphere.radius);
        self.grow_to_include(sphere.center - r);
        self.grow_to_include(sphere.center + r);
    }

    fn grow_to_include_wall(&mut self, wall: &Wall) {
        for corner in wall.corners() {
            self.grow_to_include(corner);
        }
    }

    fn grow_to_include_triangle(&mut self, triangle: &Triangle) -> bool {
        if !triangle.is_finite() {
            log::error!(
                "Invalid triangle vertices, skipping bounds: P1 {:?} P2 {:?} P3 {:?}",
                triangle.a,
                triangle.b,
                triangle.c
            );
            return false;
        }
        for vertex in triangle.vertices() {
            self.grow_to_include(vertex);
        }
        true
    }

    fn grow_to_include_primitive(&mut self, primitive: &Primitive) -> bool {
        match &primitive.shape {
            Shape::Sphere(s) => {
                self.grow_to_include_sphere(s);
                true
            }
            Shape::Wall(w) => {
                self.grow_to_include_wall(w);
                true
            }
            Shape::Triangle(t) => self.grow_to_include_triangle(t),
            Shape::Plane(_) => false,
        }
    }
}
