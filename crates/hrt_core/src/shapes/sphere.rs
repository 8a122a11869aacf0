//! Sphere primitive for ray tracing.

use hrt_math::{Ray, Vec3};

use crate::{IntersectKind, Intersection};

/// A sphere primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
        }
    }

    /// Outward unit normal at a point on the surface.
    pub fn normal(&self, point: Vec3) -> Vec3 {
        (point - self.center).normalize()
    }

    /// Ray parameter of the first forward crossing, with its facing.
    ///
    /// The near root is an entering (inner) hit; when the origin is inside
    /// the sphere only the far root is positive and the hit is outer.
    pub fn hit_t(&self, ray: &Ray) -> Option<(f32, IntersectKind)> {
        let oc = ray.origin - self.center;
        let a = ray.direction.length_squared();
        let b = 2.0 * ray.direction.dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = b * b - 4.0 * a * c;
        if discriminant <= 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();
        let t1 = (-b - sqrtd) / (2.0 * a);
        if t1 > 0.0 {
            return Some((t1, IntersectKind::Inner));
        }
        let t2 = (-b + sqrtd) / (2.0 * a);
        if t2 > 0.0 {
            return Some((t2, IntersectKind::Outer));
        }
        None
    }

    pub fn intersect(&self, ray: &Ray) -> Intersection {
        match self.hit_t(ray) {
            Some((t, kind)) => Intersection::new(kind, ray.at(t)),
            None => Intersection::NONE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ball() -> Sphere {
        Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5)
    }

    #[test]
    fn test_sphere_hit_from_outside() {
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let hit = ball().intersect(&ray);

        assert_eq!(hit.kind, IntersectKind::Inner);
        assert!((hit.point - Vec3::new(0.0, 0.0, -0.5)).length() < 1e-5);
    }

    #[test]
    fn test_sphere_hit_from_inside() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, -1.0), Vec3::X);
        let hit = ball().intersect(&ray);

        assert_eq!(hit.kind, IntersectKind::Outer);
        assert!((hit.point - Vec3::new(0.5, 0.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn test_sphere_miss() {
        // Ray pointing away from sphere
        let ray = Ray::new(Vec3::ZERO, Vec3::Y);
        assert!(!ball().intersect(&ray).is_hit());

        // Sphere entirely behind the ray
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        assert!(!ball().intersect(&ray).is_hit());
    }

    #[test]
    fn test_sphere_tangent_is_miss() {
        let ray = Ray::new(Vec3::new(0.5, 0.0, 0.0), Vec3::NEG_Z);
        assert!(!ball().intersect(&ray).is_hit());
    }

    #[test]
    fn test_sphere_normal() {
        let n = ball().normal(Vec3::new(0.0, 0.5, -1.0));
        assert!((n - Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn test_sphere_unnormalized_direction() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -4.0));
        let hit = ball().intersect(&ray);
        assert!((hit.point.z + 0.5).abs() < 1e-5);
    }
}
