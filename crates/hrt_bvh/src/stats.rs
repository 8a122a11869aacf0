use crate::{Bvh, NodeKind};

/// Shape summary of a built BVH.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BvhStats {
    pub node_count: usize,
    pub leaf_count: usize,
    /// Levels below the root (a lone root leaf has depth 0)
    pub max_depth: usize,
    /// Most primitives held by a single leaf
    pub largest_leaf: usize,
    pub leaf_surface_area: f32,
}

impl Bvh {
    pub fn stats(&self) -> BvhStats {
        let mut stats = BvhStats {
            node_count: self.nodes.len(),
            leaf_surface_area: self.leaf_surface_area(),
            ..Default::default()
        };

        let mut stack = vec![(Self::ROOT, 0usize)];
        while let Some((index, depth)) = stack.pop() {
            stats.max_depth = stats.max_depth.max(depth);
            match &self.nodes[index].kind {
                NodeKind::Leaf { primitives } => {
                    stats.leaf_count += 1;
                    stats.largest_leaf = stats.largest_leaf.max(primitives.len());
                }
                NodeKind::Branch { left, right } => {
                    stack.push((*left, depth + 1));
                    stack.push((*right, depth + 1));
                }
            }
        }
        stats
    }
}
