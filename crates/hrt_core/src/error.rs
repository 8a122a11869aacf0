use thiserror::Error;

/// Errors reported by the scene construction API.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    #[error("primitive index {index} out of range (scene has {len} primitives)")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Result type for scene operations.
pub type SceneResult<T> = Result<T, SceneError>;
