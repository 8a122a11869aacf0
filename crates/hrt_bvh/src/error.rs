use hrt_core::SceneError;
use thiserror::Error;

/// Errors reported while maintaining a BVH.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BvhError {
    #[error("BVH was built for {built_for} primitives but the scene now has {scene_len}; rebuild required")]
    StaleHierarchy { built_for: usize, scene_len: usize },

    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// Result type for BVH operations.
pub type BvhResult<T> = Result<T, BvhError>;
