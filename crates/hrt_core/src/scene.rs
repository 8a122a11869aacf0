//! Scene container for the ray tracer.
//!
//! Primitives are addressed by their insertion index. Indices are never
//! reused or invalidated during a run, so the BVH and the GPU buffers can
//! refer to primitives by position.

use hrt_math::{BoundingBox, Ray};

use crate::{Camera, Hit, Light, Primitive, SceneError, SceneResult, TriangleAlgorithm};

/// A complete scene: primitives, one camera and one light.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    primitives: Vec<Primitive>,

    /// Indices of primitives flagged animated, in marking order
    animated: Vec<usize>,

    pub camera: Camera,

    pub light: Light,
}

impl Scene {
    /// Create an empty scene with a default camera and light.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a primitive and return its stable index.
    pub fn add(&mut self, primitive: Primitive) -> usize {
        let index = self.primitives.len();
        self.primitives.push(primitive);
        index
    }

    /// Flag a primitive as animated.
    ///
    /// Marking the same index twice is a no-op.
    pub fn mark_animated(&mut self, index: usize) -> SceneResult<()> {
        let len = self.primitives.len();
        let primitive = self
            .primitives
            .get_mut(index)
            .ok_or(SceneError::IndexOutOfRange { index, len })?;

        if !primitive.animated {
            primitive.animated = true;
            self.animated.push(index);
        }
        Ok(())
    }

    pub fn set_camera(&mut self, camera: Camera) {
        self.camera = camera;
    }

    pub fn set_light(&mut self, light: Light) {
        self.light = light;
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    pub fn primitive(&self, index: usize) -> SceneResult<&Primitive> {
        let len = self.primitives.len();
        self.primitives
            .get(index)
            .ok_or(SceneError::IndexOutOfRange { index, len })
    }

    /// Mutable access for in-place animation. The shape variant must not
    /// be swapped for another one.
    pub fn primitive_mut(&mut self, index: usize) -> SceneResult<&mut Primitive> {
        let len = self.primitives.len();
        self.primitives
            .get_mut(index)
            .ok_or(SceneError::IndexOutOfRange { index, len })
    }

    pub fn animated_indices(&self) -> &[usize] {
        &self.animated
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    /// Select the intersection routine used by every triangle.
    pub fn set_triangle_algorithm(&mut self, algorithm: TriangleAlgorithm) {
        for primitive in &mut self.primitives {
            if let Some(triangle) = primitive.as_triangle_mut() {
                triangle.algorithm = algorithm;
            }
        }
    }

    /// Bounding box of every bounded primitive.
    pub fn world_bounds(&self) -> BoundingBox {
        let mut bounds = BoundingBox::new();
        for primitive in &self.primitives {
            bounds.grow_to_include_box(&primitive.bounds());
        }
        bounds
    }

    /// Closest hit by testing every primitive.
    ///
    /// Reference answer for accelerated traversal.
    pub fn closest_hit_linear(&self, ray: &Ray) -> Option<Hit> {
        let mut closest: Option<Hit> = None;
        for (index, primitive) in self.primitives.iter().enumerate() {
            let intersection = primitive.intersect(ray);
            if !intersection.is_hit() {
                continue;
            }
            let distance = (intersection.point - ray.origin).length();
            if closest.map_or(true, |c| distance < c.distance) {
                closest = Some(Hit {
                    primitive: index,
                    intersection,
                    distance,
                });
            }
        }
        closest
    }
}
