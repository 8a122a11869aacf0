//! Flattened scene buffers and their per-frame synchronization.

use std::mem::size_of;

use hrt_bvh::{Bvh, BvhUpdate};
use hrt_core::Scene;

use crate::{coalesce, DirtyRange, FlatCamera, FlatLight, FlatNode, FlatShape, LayoutError, LayoutResult};

/// Byte ranges to re-upload after a sync.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub shapes: Vec<DirtyRange>,
    pub nodes: Vec<DirtyRange>,
    pub indices: Vec<DirtyRange>,
    pub unbounded: Vec<DirtyRange>,
    /// Node, index or unbounded buffer length changed; GPU buffers must be reallocated
    pub resized: bool,
}

impl SyncReport {
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty() && self.nodes.is_empty() && self.indices.is_empty() && self.unbounded.is_empty()
    }

    pub fn dirty_bytes(&self) -> usize {
        self.shapes
            .iter()
            .chain(&self.nodes)
            .chain(&self.indices)
            .chain(&self.unbounded)
            .map(|r| r.len_bytes)
            .sum()
    }
}

/// Everything the compute shader reads, as flat arrays.
#[derive(Debug, Clone)]
pub struct GpuScene {
    shapes: Vec<FlatShape>,
    nodes: Vec<FlatNode>,
    /// Concatenated leaf primitive indices, one slice per leaf
    indices: Vec<i32>,
    /// Shapes outside the hierarchy (planes); scanned linearly after the
    /// node walk
    unbounded: Vec<i32>,
    camera: FlatCamera,
    light: FlatLight,
}

/// Flatten the node arena and its leaf lists.
///
/// Leaf slices are laid out in node order.
fn flatten_bvh(bvh: &Bvh) -> (Vec<FlatNode>, Vec<i32>) {
    let mut nodes = Vec::with_capacity(bvh.node_count());
    let mut indices = Vec::new();
    for node in bvh.nodes() {
        nodes.push(FlatNode::from_node(node, indices.len()));
        indices.extend(node.primitives().iter().map(|&i| i as i32));
    }
    (nodes, indices)
}

fn flatten_unbounded(bvh: &Bvh) -> Vec<i32> {
    bvh.unbounded().iter().map(|&i| i as i32).collect()
}

impl GpuScene {
    /// Serialize the whole scene and hierarchy.
    pub fn new(scene: &Scene, bvh: &Bvh) -> Self {
        let shapes: Vec<FlatShape> = scene.primitives().iter().map(FlatShape::from_primitive).collect();
        let (nodes, indices) = flatten_bvh(bvh);
        let unbounded = flatten_unbounded(bvh);

        log::info!(
            "GPU scene: {} shapes ({} B), {} nodes ({} B), {} leaf indices, {} unbounded",
            shapes.len(),
            shapes.len() * size_of::<FlatShape>(),
            nodes.len(),
            nodes.len() * size_of::<FlatNode>(),
            indices.len(),
            unbounded.len()
        );

        Self {
            shapes,
            nodes,
            indices,
            unbounded,
            camera: FlatCamera::from(&scene.camera),
            light: FlatLight::from(&scene.light),
        }
    }

    pub fn shapes(&self) -> &[FlatShape] {
        &self.shapes
    }

    pub fn nodes(&self) -> &[FlatNode] {
        &self.nodes
    }

    pub fn indices(&self) -> &[i32] {
        &self.indices
    }

    /// Indices of shapes the node walk never reaches.
    pub fn unbounded(&self) -> &[i32] {
        &self.unbounded
    }

    pub fn camera(&self) -> &FlatCamera {
        &self.camera
    }

    pub fn light(&self) -> &FlatLight {
        &self.light
    }

    pub fn shapes_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.shapes)
    }

    pub fn nodes_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.nodes)
    }

    pub fn indices_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    pub fn unbounded_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.unbounded)
    }

    pub fn camera_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(&self.camera)
    }

    pub fn light_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(&self.light)
    }

    /// Leaf slice of the index buffer for a flat node.
    pub fn leaf_indices(&self, node: usize) -> &[i32] {
        let Some(flat) = self.nodes.get(node) else {
            return &[];
        };
        let start = flat.start_shape_idx as usize;
        let end = start + flat.num_shapes as usize;
        self.indices.get(start..end).unwrap_or(&[])
    }

    /// Re-serialize camera and light; called every frame.
    pub fn sync_view(&mut self, scene: &Scene) {
        self.camera = FlatCamera::from(&scene.camera);
        self.light = FlatLight::from(&scene.light);
    }

    /// Rewrite the records of animated primitives and the boxes of the
    /// refitted nodes.
    ///
    /// Only box extents change; child links and leaf slices stay put, so the
    /// returned ranges can be uploaded in place.
    pub fn sync_animated(&mut self, scene: &Scene, bvh: &Bvh, changed_nodes: &[usize]) -> LayoutResult<SyncReport> {
        if self.nodes.len() != bvh.node_count() {
            return Err(LayoutError::NodeCountMismatch {
                expected: self.nodes.len(),
                found: bvh.node_count(),
            });
        }
        let mut report = self.sync_shapes(scene)?;

        let mut written = Vec::with_capacity(changed_nodes.len());
        for &index in changed_nodes {
            match (self.nodes.get_mut(index), bvh.node(index)) {
                (Some(flat), Some(node)) => {
                    flat.set_bounds(node);
                    written.push(index);
                }
                _ => log::warn!("Changed node {} outside the node buffer, skipped", index),
            }
        }
        report.nodes = coalesce(&written, size_of::<FlatNode>());

        log::debug!(
            "GPU sync: {} shape ranges, {} node ranges, {} bytes",
            report.shapes.len(),
            report.nodes.len(),
            report.dirty_bytes()
        );
        Ok(report)
    }

    /// Replace the node and index buffers after a full rebuild, re-serializing
    /// animated shapes as well.
    pub fn sync_rebuilt(&mut self, scene: &Scene, bvh: &Bvh) -> LayoutResult<SyncReport> {
        let mut report = self.sync_shapes(scene)?;

        let (nodes, indices) = flatten_bvh(bvh);
        let unbounded = flatten_unbounded(bvh);
        report.resized = nodes.len() != self.nodes.len()
            || indices.len() != self.indices.len()
            || unbounded.len() != self.unbounded.len();
        self.nodes = nodes;
        self.indices = indices;
        self.unbounded = unbounded;

        report.nodes = DirtyRange::whole(self.nodes.len(), size_of::<FlatNode>()).into_iter().collect();
        report.indices = DirtyRange::whole(self.indices.len(), size_of::<i32>()).into_iter().collect();
        report.unbounded = DirtyRange::whole(self.unbounded.len(), size_of::<i32>()).into_iter().collect();

        log::debug!("GPU sync after rebuild: {} bytes (resized: {})", report.dirty_bytes(), report.resized);
        Ok(report)
    }

    /// Camera, light and animated shape records.
    fn sync_shapes(&mut self, scene: &Scene) -> LayoutResult<SyncReport> {
        if self.shapes.len() != scene.len() {
            return Err(LayoutError::ShapeCountMismatch {
                expected: self.shapes.len(),
                found: scene.len(),
            });
        }
        self.sync_view(scene);

        let animated = scene.animated_indices();
        for &index in animated {
            self.shapes[index] = FlatShape::from_primitive(&scene.primitives()[index]);
        }
        Ok(SyncReport {
            shapes: coalesce(animated, size_of::<FlatShape>()),
            ..Default::default()
        })
    }

    /// Apply the outcome of [`Bvh::update`].
    pub fn apply_update(&mut self, scene: &Scene, bvh: &Bvh, update: &BvhUpdate) -> LayoutResult<SyncReport> {
        match update {
            BvhUpdate::Refit { changed } => self.sync_animated(scene, bvh, changed),
            BvhUpdate::Rebuilt => self.sync_rebuilt(scene, bvh),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hrt_bvh::{BvhConfig, RebuildPolicy};
    use hrt_core::animation::bounce_sphere;
    use hrt_core::{Material, Primitive, Shape, Triangle};
    use hrt_math::Vec3;

    fn demo_scene() -> Scene {
        let mut scene = Scene::new();
        scene.add(
            Primitive::sphere(Vec3::new(0.0, 10.0, -8.0), 5.0)
                .with_material(Material::new(Vec3::new(1.0, 0.2, 0.2)).with_fresnel(0.3)),
        );
        scene.add(Primitive::wall(
            Vec3::new(-15.0, 23.0, 10.0),
            30.0,
            20.0,
            Vec3::new(-1.0, 0.2, 0.0),
        ));
        scene.add(Primitive::plane(Vec3::Y, Vec3::new(0.0, -2.0, 0.0)));
        let mut tri = Triangle::new(Vec3::new(3.0, 0.0, -4.0), Vec3::new(5.0, 0.0, -4.0), Vec3::new(4.0, 2.0, -5.0));
        tri.invert_normal();
        scene.add(Primitive::triangle(tri).with_material(Material::default().with_shininess(8)));
        for i in 0..6 {
            scene.add(Primitive::sphere(Vec3::new(i as f32 * 3.0 - 8.0, 1.0, -15.0), 1.0));
        }
        scene
    }

    #[test]
    fn test_round_trip_reproduces_scene() {
        let scene = demo_scene();
        let bvh = Bvh::build(&scene, &BvhConfig::default());
        let gpu = GpuScene::new(&scene, &bvh);

        assert_eq!(gpu.shapes().len(), scene.len());
        for (flat, live) in gpu.shapes().iter().zip(scene.primitives()) {
            let decoded = flat.to_primitive().unwrap();
            assert_eq!(decoded.kind(), live.kind());
            assert_eq!(decoded.material, live.material);

            match (&decoded.shape, &live.shape) {
                (Shape::Sphere(a), Shape::Sphere(b)) => assert_eq!(a, b),
                (Shape::Plane(a), Shape::Plane(b)) => assert_eq!(a, b),
                (Shape::Wall(a), Shape::Wall(b)) => assert_eq!(a, b),
                (Shape::Triangle(a), Shape::Triangle(b)) => {
                    assert_eq!(a.vertices(), b.vertices());
                    assert_eq!(a.is_inverted(), b.is_inverted());
                    assert!((a.normal() - b.normal()).length() < 1e-6);
                    assert!((a.plane.d - b.plane.d).abs() < 1e-5);
                }
                other => panic!("kind mismatch: {:?}", other),
            }
        }
    }

    #[test]
    fn test_leaf_slices_cover_bounded_primitives() {
        let scene = demo_scene();
        let bvh = Bvh::build(&scene, &BvhConfig::default());
        let gpu = GpuScene::new(&scene, &bvh);

        let mut seen: Vec<i32> = Vec::new();
        let mut next_start = 0;
        for (i, flat) in gpu.nodes().iter().enumerate() {
            assert_eq!(flat.start_shape_idx as usize, next_start);
            next_start += flat.num_shapes as usize;
            if flat.is_leaf() {
                assert_eq!(flat.right_child, crate::NO_CHILD);
                seen.extend_from_slice(gpu.leaf_indices(i));
            } else {
                assert_eq!(flat.num_shapes, 0);
                assert_eq!(flat.right_child, flat.left_child + 1);
            }
        }
        assert_eq!(next_start, gpu.indices().len());

        seen.sort_unstable();
        // Index 2 is the plane, kept out of the tree
        assert_eq!(seen, vec![0, 1, 3, 4, 5, 6, 7, 8, 9]);
    }

    #[test]
    fn test_byte_views() {
        let scene = demo_scene();
        let bvh = Bvh::build(&scene, &BvhConfig::default());
        let gpu = GpuScene::new(&scene, &bvh);

        assert_eq!(gpu.shapes_bytes().len(), scene.len() * 160);
        assert_eq!(gpu.nodes_bytes().len(), bvh.node_count() * 48);
        assert_eq!(gpu.indices_bytes().len(), gpu.indices().len() * 4);
        assert_eq!(gpu.camera_bytes().len(), 80);
        assert_eq!(gpu.light_bytes().len(), 32);
    }

    #[test]
    fn test_sync_animated_touches_only_dirty_records() {
        let mut scene = demo_scene();
        let ball = 5;
        scene.mark_animated(ball).unwrap();
        let mut bvh = Bvh::build(&scene, &BvhConfig::default());
        let mut gpu = GpuScene::new(&scene, &bvh);
        let shapes_before = gpu.shapes().to_vec();
        let nodes_before = gpu.nodes().to_vec();

        bounce_sphere(scene.primitive_mut(ball).unwrap(), 1.0, 10.0, 1.0);
        let changed = bvh.refit(&scene).unwrap();
        assert!(!changed.is_empty());

        let report = gpu.sync_animated(&scene, &bvh, &changed).unwrap();
        assert_eq!(
            report.shapes,
            vec![DirtyRange {
                offset_bytes: ball * 160,
                len_bytes: 160
            }]
        );
        assert!(report.indices.is_empty());
        assert!(!report.resized);

        for (i, (before, after)) in shapes_before.iter().zip(gpu.shapes()).enumerate() {
            if i == ball {
                assert_ne!(before, after);
            } else {
                assert_eq!(before, after);
            }
        }
        for (i, (before, after)) in nodes_before.iter().zip(gpu.nodes()).enumerate() {
            // Topology and leaf slices never move
            assert_eq!(before.left_child, after.left_child);
            assert_eq!(before.start_shape_idx, after.start_shape_idx);
            assert_eq!(before.num_shapes, after.num_shapes);
            if !changed.contains(&i) {
                assert_eq!(before, after);
            }
        }

        // Flat root box matches the refitted live root
        assert_eq!(gpu.nodes()[0].bounds_max, bvh.root().bounds.max.to_array());
        assert_eq!(gpu.shapes()[ball], FlatShape::from_primitive(scene.primitive(ball).unwrap()));
    }

    #[test]
    fn test_sync_detects_count_mismatch() {
        let mut scene = demo_scene();
        let bvh = Bvh::build(&scene, &BvhConfig::default());
        let mut gpu = GpuScene::new(&scene, &bvh);

        scene.add(Primitive::sphere(Vec3::ZERO, 1.0));
        assert_eq!(
            gpu.sync_animated(&scene, &bvh, &[]),
            Err(LayoutError::ShapeCountMismatch {
                expected: 10,
                found: 11
            })
        );

        let other_bvh = Bvh::build(&scene, &BvhConfig::default().with_max_depth(0));
        let scene = demo_scene();
        assert_eq!(
            gpu.sync_animated(&scene, &other_bvh, &[]),
            Err(LayoutError::NodeCountMismatch {
                expected: bvh.node_count(),
                found: 1
            })
        );
    }

    #[test]
    fn test_apply_rebuild_replaces_hierarchy() {
        let mut scene = demo_scene();
        scene.mark_animated(4).unwrap();
        let config = BvhConfig::default().with_rebuild(RebuildPolicy::EveryNFrames(1));
        let mut bvh = Bvh::build(&scene, &config);
        let mut gpu = GpuScene::new(&scene, &bvh);

        scene.primitive_mut(4).unwrap().as_sphere_mut().unwrap().center = Vec3::new(40.0, 40.0, -40.0);
        let update = bvh.update(&scene).unwrap();
        assert_eq!(update, BvhUpdate::Rebuilt);

        let report = gpu.apply_update(&scene, &bvh, &update).unwrap();
        assert_eq!(report.nodes.len(), 1);
        assert_eq!(report.nodes[0].len_bytes, bvh.node_count() * 48);
        assert_eq!(report.indices[0].len_bytes, gpu.indices().len() * 4);
        assert_eq!(gpu.nodes().len(), bvh.node_count());
        assert_eq!(gpu.nodes()[0].bounds_max, bvh.root().bounds.max.to_array());
    }

    #[test]
    fn test_camera_follows_scene() {
        let mut scene = demo_scene();
        let bvh = Bvh::build(&scene, &BvhConfig::default());
        let mut gpu = GpuScene::new(&scene, &bvh);

        scene.camera.position = Vec3::new(1.0, 2.0, 3.0);
        scene.light.intensity = 7.0;
        let report = gpu.sync_animated(&scene, &bvh, &[]).unwrap();

        assert!(report.is_empty());
        assert_eq!(gpu.camera().position, [1.0, 2.0, 3.0]);
        assert_eq!(gpu.light().intensity, 7.0);
    }

    #[test]
    fn test_partial_sync_matches_full_flatten_over_random_animation() {
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        let _ = env_logger::builder().is_test(true).try_init();

        let mut rng = StdRng::seed_from_u64(11);
        let mut scene = Scene::new();
        for _ in 0..40 {
            let center = Vec3::new(rng.gen_range(-30.0..30.0), rng.gen_range(-5.0..5.0), rng.gen_range(-60.0..-10.0));
            let index = scene.add(Primitive::sphere(center, rng.gen_range(0.5..2.0)));
            if rng.gen_bool(0.5) {
                scene.mark_animated(index).unwrap();
            }
        }
        scene.add(Primitive::plane(Vec3::Y, Vec3::new(0.0, -10.0, 0.0)));

        let mut bvh = Bvh::build(&scene, &BvhConfig::default());
        let mut gpu = GpuScene::new(&scene, &bvh);

        for frame in 0..10 {
            let animated = scene.animated_indices().to_vec();
            for i in animated {
                bounce_sphere(scene.primitive_mut(i).unwrap(), frame as f32 * 0.3, 3.0, 1.0);
            }
            let changed = bvh.refit(&scene).unwrap();
            gpu.sync_animated(&scene, &bvh, &changed).unwrap();

            let fresh = GpuScene::new(&scene, &bvh);
            assert_eq!(gpu.shapes(), fresh.shapes());
            assert_eq!(gpu.nodes(), fresh.nodes());
            assert_eq!(gpu.indices(), fresh.indices());
        }
    }

    /// Closest hit using only the flat buffers: walk the node links from
    /// the root, then scan the unbounded list.
    fn flat_closest_hit(gpu: &GpuScene, ray: &hrt_math::Ray) -> Option<usize> {
        let mut candidates: Vec<i32> = Vec::new();
        let mut stack = vec![0usize];
        while let Some(index) = stack.pop() {
            let node = &gpu.nodes()[index];
            if node.is_leaf() {
                candidates.extend_from_slice(gpu.leaf_indices(index));
            } else {
                stack.push(node.left_child as usize);
                stack.push(node.right_child as usize);
            }
        }
        candidates.extend_from_slice(gpu.unbounded());

        candidates
            .into_iter()
            .filter_map(|i| {
                let hit = gpu.shapes()[i as usize].to_primitive().ok()?.intersect(ray);
                hit.is_hit().then(|| (i as usize, (hit.point - ray.origin).length()))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }

    #[test]
    fn test_planes_reachable_through_unbounded_buffer() {
        let mut scene = Scene::new();
        scene.add(Primitive::sphere(Vec3::new(0.0, 0.0, -10.0), 1.0));
        let floor = scene.add(Primitive::plane(Vec3::Y, Vec3::new(0.0, -2.0, 0.0)));
        let bvh = Bvh::build(&scene, &BvhConfig::default());
        let gpu = GpuScene::new(&scene, &bvh);

        assert_eq!(gpu.indices(), &[0]);
        assert_eq!(gpu.unbounded(), &[floor as i32]);
        assert_eq!(gpu.unbounded_bytes().len(), 4);

        let down = hrt_math::Ray::new(Vec3::ZERO, Vec3::new(0.0, -1.0, -1.0));
        assert_eq!(flat_closest_hit(&gpu, &down), Some(floor));
        assert_eq!(bvh.closest_hit(&scene, &down).map(|h| h.primitive), Some(floor));

        let ahead = hrt_math::Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        assert_eq!(flat_closest_hit(&gpu, &ahead), Some(0));
    }

    #[test]
    fn test_flat_buffers_agree_with_cpu_traversal() {
        let scene = demo_scene();
        let bvh = Bvh::build(&scene, &BvhConfig::default());
        let gpu = GpuScene::new(&scene, &bvh);

        for j in 0..12 {
            for i in 0..12 {
                let dir = Vec3::new(i as f32 / 6.0 - 1.0, j as f32 / 6.0 - 1.0, -1.0);
                let ray = hrt_math::Ray::new(Vec3::new(0.0, 3.0, 10.0), dir);
                let cpu = bvh.closest_hit(&scene, &ray);
                let flat = flat_closest_hit(&gpu, &ray);
                assert_eq!(cpu.map(|h| h.primitive), flat, "ray {:?}", ray);
            }
        }
    }

    #[test]
    fn test_rebuild_refreshes_unbounded_buffer() {
        let scene = demo_scene();
        let mut bvh = Bvh::build(&scene, &BvhConfig::default().with_rebuild(RebuildPolicy::EveryNFrames(1)));
        let mut gpu = GpuScene::new(&scene, &bvh);

        let update = bvh.update(&scene).unwrap();
        let report = gpu.apply_update(&scene, &bvh, &update).unwrap();
        assert_eq!(gpu.unbounded(), &[2]);
        assert_eq!(report.unbounded, vec![DirtyRange { offset_bytes: 0, len_bytes: 4 }]);
        assert!(!report.resized);
    }
}
