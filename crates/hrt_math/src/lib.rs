// Re-export glam for convenience
pub use glam::*;

// HRT math types
mod aabb;
mod ray;

pub use aabb::BoundingBox;
pub use ray::Ray;

/// Index of a coordinate axis (0=X, 1=Y, 2=Z) into a `Vec3`.
#[inline]
pub fn axis_component(v: Vec3, axis: usize) -> f32 {
    match axis {
        0 => v.x,
        1 => v.y,
        _ => v.z,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_component() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(axis_component(v, 0), 1.0);
        assert_eq!(axis_component(v, 1), 2.0);
        assert_eq!(axis_component(v, 2), 3.0);
    }

    #[test]
    fn test_vec3_operations() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert_eq!(a + b, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(a.min(b), a);
        assert_eq!(a.max(b), b);
    }
}
