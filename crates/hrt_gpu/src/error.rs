use thiserror::Error;

/// Errors raised while encoding, decoding or syncing flat GPU records.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("unknown shape kind tag {0}")]
    UnknownShapeKind(i32),

    #[error("node buffer holds {expected} records but the BVH has {found} nodes")]
    NodeCountMismatch { expected: usize, found: usize },

    #[error("shape buffer holds {expected} records but the scene has {found} primitives")]
    ShapeCountMismatch { expected: usize, found: usize },
}

/// Result type for layout operations.
pub type LayoutResult<T> = Result<T, LayoutError>;
