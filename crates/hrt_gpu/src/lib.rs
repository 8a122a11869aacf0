//! HRT GPU - flat buffer layout for the compute-shader tracer.
//!
//! Converts the live [`Scene`](hrt_core::Scene) and [`Bvh`](hrt_bvh::Bvh)
//! into `bytemuck::Pod` record arrays and keeps them in sync with animation:
//!
//! - [`GpuScene::new`] serializes everything once
//! - [`GpuScene::sync_animated`] rewrites only animated shapes and refitted
//!   node boxes, reporting [`DirtyRange`]s for partial uploads
//! - [`GpuScene::sync_rebuilt`] replaces the hierarchy after a rebuild
//!
//! A shader finds the closest hit by walking the node buffer from record 0
//! through the leaf slices of the index buffer, then scanning the shapes
//! listed in the unbounded buffer (planes, which have no box).
//!
//! Buffer upload itself belongs to the caller's GPU backend.

mod dirty;
mod error;
mod layout;
mod scene;

pub use dirty::{coalesce, DirtyRange};
pub use error::{LayoutError, LayoutResult};
pub use layout::{FlatCamera, FlatLight, FlatMaterial, FlatNode, FlatShape, NO_CHILD};
pub use scene::{GpuScene, SyncReport};
