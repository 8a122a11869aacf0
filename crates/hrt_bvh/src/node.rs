use hrt_math::BoundingBox;

/// Payload of a BVH node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Internal node. Children are arena indices; `right == left + 1`.
    Branch { left: usize, right: usize },
    /// Leaf holding scene primitive indices.
    Leaf { primitives: Vec<usize> },
}

/// A node in the BVH arena.
#[derive(Debug, Clone, PartialEq)]
pub struct BvhNode {
    pub bounds: BoundingBox,
    pub kind: NodeKind,
}

impl BvhNode {
    pub(crate) fn leaf(bounds: BoundingBox, primitives: Vec<usize>) -> Self {
        Self {
            bounds,
            kind: NodeKind::Leaf { primitives },
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf { .. })
    }

    /// Leaf primitive indices (empty for branches).
    pub fn primitives(&self) -> &[usize] {
        match &self.kind {
            NodeKind::Leaf { primitives } => primitives,
            NodeKind::Branch { .. } => &[],
        }
    }

    pub fn children(&self) -> Option<(usize, usize)> {
        match self.kind {
            NodeKind::Branch { left, right } => Some((left, right)),
            NodeKind::Leaf { .. } => None,
        }
    }
}
