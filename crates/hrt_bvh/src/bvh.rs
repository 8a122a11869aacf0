//! Bounding Volume Hierarchy (BVH) over scene primitives.
//!
//! Nodes live in a flat arena addressed by index, which maps one-to-one onto
//! the GPU node buffer. The root is node 0 and every branch allocates its two
//! children as a consecutive pair.
//!
//! Construction uses a spatial-midpoint split: the node box is cut at its
//! center along the longest axis and primitives are sorted to either side by
//! their own center. Planes are infinite and are kept out of the tree in a
//! separate list.

use hrt_core::Scene;
use hrt_math::{axis_component, BoundingBox};

use crate::{BvhConfig, BvhNode, NodeKind};

/// An arena BVH built over a [`Scene`].
#[derive(Debug, Clone)]
pub struct Bvh {
    pub(crate) nodes: Vec<BvhNode>,

    /// Parent of each node (`None` for the root)
    pub(crate) parents: Vec<Option<usize>>,

    /// Leaf holding each scene primitive (`None` for unbounded primitives)
    pub(crate) leaf_of: Vec<Option<usize>>,

    /// Primitives that cannot be bounded and are tested linearly
    pub(crate) unbounded: Vec<usize>,

    pub(crate) config: BvhConfig,

    /// Scene length at build time
    pub(crate) built_for: usize,

    /// Sum of leaf surface areas right after the build
    pub(crate) built_leaf_area: f32,

    /// Refits since the last build
    pub(crate) refits: u32,
}

impl Bvh {
    /// Index of the root node.
    pub const ROOT: usize = 0;

    /// Build a BVH over every bounded primitive in `scene`.
    ///
    /// The arena always holds at least the root; a scene without bounded
    /// primitives yields a single empty leaf.
    pub fn build(scene: &Scene, config: &BvhConfig) -> Self {
        let mut bounded = Vec::with_capacity(scene.len());
        let mut unbounded = Vec::new();
        // One box per primitive, computed once; malformed triangles report here
        let mut boxes = Vec::with_capacity(scene.len());
        for (index, primitive) in scene.primitives().iter().enumerate() {
            boxes.push(primitive.bounds());
            if primitive.is_bounded() {
                bounded.push(index);
            } else {
                log::warn!(
                    "Primitive {} ({:?}) is unbounded, excluded from BVH and tested linearly",
                    index,
                    primitive.kind()
                );
                unbounded.push(index);
            }
        }

        if bounded.is_empty() {
            log::warn!("Building BVH over a scene with no bounded primitives");
        }

        let mut bvh = Self {
            nodes: vec![BvhNode::leaf(BoundingBox::new(), Vec::new())],
            parents: vec![None],
            leaf_of: vec![None; scene.len()],
            unbounded,
            config: *config,
            built_for: scene.len(),
            built_leaf_area: 0.0,
            refits: 0,
        };

        bvh.split(scene, &boxes, Self::ROOT, bounded, config.max_depth);
        bvh.built_leaf_area = bvh.leaf_surface_area();

        let stats = bvh.stats();
        log::info!(
            "BVH built: {} nodes, {} leaves, depth {}, largest leaf {} ({} unbounded)",
            stats.node_count,
            stats.leaf_count,
            stats.max_depth,
            stats.largest_leaf,
            bvh.unbounded.len()
        );

        bvh
    }

    /// Fill `node` with `indices`, partitioning recursively.
    fn split(&mut self, scene: &Scene, boxes: &[BoundingBox], node: usize, indices: Vec<usize>, depth: u32) {
        let primitives = scene.primitives();

        let mut bounds = BoundingBox::new();
        for &i in &indices {
            bounds.grow_to_include_box(&boxes[i]);
        }

        if depth == 0 {
            self.make_leaf(node, bounds, indices);
            return;
        }

        let axis = bounds.longest_axis();
        let split_pos = axis_component(bounds.center(), axis);

        let (left, right): (Vec<usize>, Vec<usize>) = indices.iter().copied().partition(|&i| {
            primitives[i]
                .center()
                .is_some_and(|c| axis_component(c, axis) < split_pos)
        });

        if left.is_empty() || right.is_empty() {
            self.make_leaf(node, bounds, indices);
            return;
        }

        let left_node = self.nodes.len();
        let right_node = left_node + 1;
        for _ in 0..2 {
            self.nodes.push(BvhNode::leaf(BoundingBox::new(), Vec::new()));
            self.parents.push(Some(node));
        }
        self.nodes[node] = BvhNode {
            bounds,
            kind: NodeKind::Branch {
                left: left_node,
                right: right_node,
            },
        };

        self.split(scene, boxes, left_node, left, depth - 1);
        self.split(scene, boxes, right_node, right, depth - 1);
    }

    fn make_leaf(&mut self, node: usize, bounds: BoundingBox, indices: Vec<usize>) {
        for &i in &indices {
            self.leaf_of[i] = Some(node);
        }
        self.nodes[node] = BvhNode::leaf(bounds, indices);
    }

    pub fn nodes(&self) -> &[BvhNode] {
        &self.nodes
    }

    pub fn node(&self, index: usize) -> Option<&BvhNode> {
        self.nodes.get(index)
    }

    pub fn root(&self) -> &BvhNode {
        &self.nodes[Self::ROOT]
    }

    pub fn parent(&self, node: usize) -> Option<usize> {
        self.parents.get(node).copied().flatten()
    }

    /// Leaf containing `primitive`, if it is part of the tree.
    pub fn leaf_of(&self, primitive: usize) -> Option<usize> {
        self.leaf_of.get(primitive).copied().flatten()
    }

    /// Scene indices kept out of the tree (planes).
    pub fn unbounded(&self) -> &[usize] {
        &self.unbounded
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Sum of surface areas of all leaf boxes.
    pub fn leaf_surface_area(&self) -> f32 {
        self.nodes
            .iter()
            .filter(|n| n.is_leaf())
            .map(|n| n.bounds.surface_area())
            .sum()
    }
}
