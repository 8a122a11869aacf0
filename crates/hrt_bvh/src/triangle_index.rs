//! In-process triangle accelerator.
//!
//! Geometry is registered into a staging area; queries only see what was
//! published by the last [`commit`](TriangleAccelerator::commit). Each
//! committed geometry carries a bounding box used to cull rays before the
//! per-triangle Möller-Trumbore test.

use hrt_core::shapes::moller_trumbore;
use hrt_core::{AcceleratorHit, GeometryId, TriangleAccelerator};
use hrt_math::{BoundingBox, Ray, Vec3};
use parking_lot::{Mutex, RwLock};

#[derive(Debug, Clone, Default)]
struct Geometry {
    vertices: Vec<Vec3>,
    indices: Vec<[u32; 3]>,
    bounds: BoundingBox,
}

impl Geometry {
    fn refresh_bounds(&mut self) {
        let mut bounds = BoundingBox::new();
        for v in self.vertices.iter().filter(|v| v.is_finite()) {
            bounds.grow_to_include(*v);
        }
        self.bounds = bounds;
    }

    fn closest_hit(&self, geometry: GeometryId, ray: &Ray) -> Option<AcceleratorHit> {
        if !self.bounds.hit(ray, f32::INFINITY) {
            return None;
        }

        let mut closest: Option<AcceleratorHit> = None;
        for (primitive, tri) in self.indices.iter().enumerate() {
            let [Some(a), Some(b), Some(c)] = tri.map(|i| self.vertices.get(i as usize).copied()) else {
                continue;
            };
            if let Some((t, u, v)) = moller_trumbore(a, b, c, ray) {
                if closest.map_or(true, |h| t < h.t) {
                    closest = Some(AcceleratorHit {
                        geometry,
                        primitive: primitive as u32,
                        t,
                        u,
                        v,
                    });
                }
            }
        }
        closest
    }
}

/// Shared triangle index implementing [`TriangleAccelerator`].
///
/// Uses `parking_lot` locks so triangles on any thread can push vertex
/// updates while the tracer reads the committed state.
#[derive(Debug, Default)]
pub struct TriangleIndex {
    staged: Mutex<Vec<Geometry>>,
    committed: RwLock<Vec<Geometry>>,
}

impl TriangleIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of geometries visible to queries.
    pub fn committed_len(&self) -> usize {
        self.committed.read().len()
    }

    /// Total triangles visible to queries.
    pub fn triangle_count(&self) -> usize {
        self.committed.read().iter().map(|g| g.indices.len()).sum()
    }
}

impl TriangleAccelerator for TriangleIndex {
    fn register(&self, vertices: &[Vec3], indices: &[[u32; 3]]) -> GeometryId {
        let mut staged = self.staged.lock();
        let id = staged.len() as GeometryId;
        staged.push(Geometry {
            vertices: vertices.to_vec(),
            indices: indices.to_vec(),
            bounds: BoundingBox::new(),
        });
        id
    }

    fn update_vertices(&self, geometry: GeometryId, vertices: &[Vec3]) {
        let mut staged = self.staged.lock();
        match staged.get_mut(geometry as usize) {
            Some(g) => g.vertices = vertices.to_vec(),
            None => log::warn!("Vertex update for unknown geometry {}", geometry),
        }
    }

    fn commit(&self) {
        let mut snapshot = self.staged.lock().clone();
        for geometry in &mut snapshot {
            geometry.refresh_bounds();
        }

        log::debug!(
            "Triangle index committed: {} geometries, {} triangles",
            snapshot.len(),
            snapshot.iter().map(|g| g.indices.len()).sum::<usize>()
        );
        *self.committed.write() = snapshot;
    }

    fn intersect(&self, geometry: GeometryId, ray: &Ray) -> Option<AcceleratorHit> {
        let committed = self.committed.read();
        committed.get(geometry as usize)?.closest_hit(geometry, ray)
    }

    fn closest_hit(&self, ray: &Ray) -> Option<AcceleratorHit> {
        let committed = self.committed.read();
        committed
            .iter()
            .enumerate()
            .filter_map(|(id, g)| g.closest_hit(id as GeometryId, ray))
            .min_by(|a, b| a.t.total_cmp(&b.t))
    }
}
