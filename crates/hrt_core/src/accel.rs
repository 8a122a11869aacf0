//! Seam to an external triangle acceleration structure.
//!
//! Triangles using [`TriangleAlgorithm::Accelerated`](crate::TriangleAlgorithm)
//! delegate to a prebuilt spatial index over all registered triangles. The
//! index is handed to each triangle explicitly at construction time, so
//! triangle creation order and device setup stay visible to the caller.
//!
//! Backends follow the usual register/update/commit cycle: changes to vertex
//! buffers become visible to queries after `commit`.

use std::fmt;
use std::sync::Arc;

use hrt_math::{Ray, Vec3};

/// Identifier of a geometry registered with an accelerator.
pub type GeometryId = u32;

/// Hit reported by an accelerator query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AcceleratorHit {
    pub geometry: GeometryId,
    /// Triangle index inside the geometry's index buffer
    pub primitive: u32,
    /// Ray parameter of the hit
    pub t: f32,
    /// Barycentric coordinates of the hit
    pub u: f32,
    pub v: f32,
}

/// A spatial index over triangle vertex/index buffers.
pub trait TriangleAccelerator: Send + Sync {
    /// Register a triangle geometry and return its id.
    fn register(&self, vertices: &[Vec3], indices: &[[u32; 3]]) -> GeometryId;

    /// Replace the vertex buffer of a registered geometry.
    fn update_vertices(&self, geometry: GeometryId, vertices: &[Vec3]);

    /// Publish all pending registrations and updates to queries.
    fn commit(&self);

    /// Closest hit against a single geometry.
    fn intersect(&self, geometry: GeometryId, ray: &Ray) -> Option<AcceleratorHit>;

    /// Closest hit against every committed geometry.
    fn closest_hit(&self, ray: &Ray) -> Option<AcceleratorHit>;
}

/// A triangle's registration with an accelerator.
#[derive(Clone)]
pub struct AcceleratorHandle {
    accelerator: Arc<dyn TriangleAccelerator>,
    geometry: GeometryId,
}

impl AcceleratorHandle {
    /// Register a single triangle and keep the resulting handle.
    pub fn register_triangle(accelerator: &Arc<dyn TriangleAccelerator>, vertices: [Vec3; 3]) -> Self {
        let geometry = accelerator.register(&vertices, &[[0, 1, 2]]);
        Self {
            accelerator: Arc::clone(accelerator),
            geometry,
        }
    }

    pub fn geometry(&self) -> GeometryId {
        self.geometry
    }

    pub fn update(&self, vertices: [Vec3; 3]) {
        self.accelerator.update_vertices(self.geometry, &vertices);
    }

    pub fn intersect(&self, ray: &Ray) -> Option<AcceleratorHit> {
        self.accelerator.intersect(self.geometry, ray)
    }
}

impl fmt::Debug for AcceleratorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AcceleratorHandle")
            .field("geometry", &self.geometry)
            .finish_non_exhaustive()
    }
}
