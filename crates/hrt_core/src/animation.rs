//! In-place animation of scene primitives.
//!
//! Helpers mutate geometry only; the caller marks the primitive animated
//! so the BVH refit and partial GPU sync pick it up.

use hrt_math::{Mat4, Vec3};

use crate::{Primitive, Shape};

/// Move a sphere vertically: `center.y = origin.y + amplitude * sin(frequency * time)`.
///
/// Returns `false` (and does nothing) for non-sphere primitives.
pub fn bounce_sphere(primitive: &mut Primitive, time: f32, amplitude: f32, frequency: f32) -> bool {
    let base_y = primitive.origin.y;
    match primitive.as_sphere_mut() {
        Some(sphere) => {
            sphere.center.y = base_y + amplitude * (frequency * time).sin();
            true
        }
        None => false,
    }
}

/// Rotation by `angle` radians about the line through `pivot` along `axis`.
pub fn rotation_about(pivot: Vec3, axis: Vec3, angle: f32) -> Mat4 {
    Mat4::from_translation(pivot)
        * Mat4::from_axis_angle(axis.normalize(), angle)
        * Mat4::from_translation(-pivot)
}

/// Rotate a primitive about `pivot`.
///
/// Triangles rotate their vertices (re-deriving the plane and updating any
/// attached accelerator); spheres rotate their center. Walls and planes are
/// left untouched and report `false`.
pub fn rotate_about(primitive: &mut Primitive, pivot: Vec3, axis: Vec3, angle: f32) -> bool {
    let transform = rotation_about(pivot, axis, angle);
    match &mut primitive.shape {
        Shape::Triangle(triangle) => {
            let [a, b, c] = triangle.vertices().map(|v| transform.transform_point3(v));
            triangle.set_vertices(a, b, c);
            true
        }
        Shape::Sphere(sphere) => {
            sphere.center = transform.transform_point3(sphere.center);
            true
        }
        Shape::Plane(_) | Shape::Wall(_) => false,
    }
}
