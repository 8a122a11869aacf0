//! HRT BVH - spatial acceleration for the hybrid ray tracer.
//!
//! - [`Bvh`]: arena hierarchy built with a spatial-midpoint split, refit in
//!   place for animated primitives, and traversed on the CPU
//! - [`BvhConfig`] / [`RebuildPolicy`]: depth cap and refit-vs-rebuild policy
//! - [`TriangleIndex`]: an in-process [`TriangleAccelerator`](hrt_core::TriangleAccelerator)

mod bvh;
mod config;
mod error;
mod node;
mod refit;
mod stats;
mod traverse;
mod triangle_index;

pub use bvh::Bvh;
pub use config::{BvhConfig, RebuildPolicy, DEFAULT_MAX_DEPTH};
pub use error::{BvhError, BvhResult};
pub use node::{BvhNode, NodeKind};
pub use refit::BvhUpdate;
pub use stats::BvhStats;
pub use triangle_index::TriangleIndex;
