//! BVH build and maintenance settings.

use serde::{Deserialize, Serialize};

/// Default recursion cap for [`Bvh::build`](crate::Bvh::build).
pub const DEFAULT_MAX_DEPTH: u32 = 15;

/// When [`Bvh::update`](crate::Bvh::update) falls back to a full rebuild
/// instead of refitting.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RebuildPolicy {
    /// Only ever refit; boxes grow without bound.
    #[default]
    Never,
    /// Rebuild after this many refits.
    EveryNFrames(u32),
    /// Rebuild once the summed leaf surface area exceeds this multiple of
    /// the sum measured at build time.
    LoosenessAbove(f32),
}

/// BVH configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BvhConfig {
    /// Maximum recursion depth; nodes at depth zero become leaves
    pub max_depth: u32,
    /// Refit/rebuild policy for animated scenes
    pub rebuild: RebuildPolicy,
}

impl Default for BvhConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            rebuild: RebuildPolicy::Never,
        }
    }
}

impl BvhConfig {
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_rebuild(mut self, rebuild: RebuildPolicy) -> Self {
        self.rebuild = rebuild;
        self
    }
}
