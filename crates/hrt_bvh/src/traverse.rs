//! CPU closest-hit traversal.
//!
//! Mirrors the GPU shader: an explicit stack over the node arena with a slab
//! test per node, followed by a linear pass over unbounded primitives.

use hrt_core::{Hit, Scene};
use hrt_math::Ray;

use crate::{Bvh, NodeKind};

/// Test one primitive and keep it if it is closer than the current best.
fn consider(scene: &Scene, index: usize, ray: &Ray, closest: &mut Option<Hit>) {
    let Some(primitive) = scene.primitives().get(index) else {
        return;
    };
    let intersection = primitive.intersect(ray);
    if !intersection.is_hit() {
        return;
    }
    let distance = (intersection.point - ray.origin).length();
    if closest.map_or(true, |c| distance < c.distance) {
        *closest = Some(Hit {
            primitive: index,
            intersection,
            distance,
        });
    }
}

impl Bvh {
    /// Closest hit along `ray`, or `None`.
    pub fn closest_hit(&self, scene: &Scene, ray: &Ray) -> Option<Hit> {
        let dir_len = ray.direction.length();
        let mut closest: Option<Hit> = None;

        let mut stack = Vec::with_capacity(64);
        stack.push(Self::ROOT);

        while let Some(index) = stack.pop() {
            let node = &self.nodes[index];
            // Boxes are tested in ray-parameter units, hits are stored as distances
            let t_max = closest.map_or(f32::INFINITY, |h| h.distance / dir_len);
            if !node.bounds.hit(ray, t_max) {
                continue;
            }

            match &node.kind {
                NodeKind::Leaf { primitives } => {
                    for &primitive in primitives {
                        consider(scene, primitive, ray, &mut closest);
                    }
                }
                NodeKind::Branch { left, right } => {
                    stack.push(*right);
                    stack.push(*left);
                }
            }
        }

        for &primitive in &self.unbounded {
            consider(scene, primitive, ray, &mut closest);
        }

        closest
    }
}
