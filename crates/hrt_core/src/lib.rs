//! HRT Core - scene model and ray/primitive intersection.
//!
//! This crate provides:
//!
//! - **Primitives**: the closed shape set `Sphere`, `Plane`, `Wall`, `Triangle`
//!   wrapped in [`Primitive`] together with material and animation state
//! - **Intersection**: tagged [`Intersection`] results (inner/outer face)
//! - **Bounding**: per-variant box growth via [`GrowToInclude`]
//! - **Scene**: index-addressed primitive list, camera, light and the
//!   animated-index list consumed by the BVH refit
//!
//! # Example
//!
//! ```
//! use hrt_core::{Primitive, Scene};
//! use hrt_math::{Ray, Vec3};
//!
//! let mut scene = Scene::new();
//! let ball = scene.add(Primitive::sphere(Vec3::new(0.0, 0.0, -5.0), 1.0));
//! scene.mark_animated(ball).unwrap();
//!
//! let hit = scene.closest_hit_linear(&Ray::new(Vec3::ZERO, Vec3::NEG_Z));
//! assert_eq!(hit.map(|h| h.primitive), Some(ball));
//! ```

pub mod accel;
pub mod animation;
pub mod bounds;
pub mod camera;
pub mod error;
pub mod intersection;
pub mod light;
pub mod material;
pub mod primitive;
pub mod scene;
pub mod shapes;

// Re-export commonly used types
pub use accel::{AcceleratorHandle, AcceleratorHit, GeometryId, TriangleAccelerator};
pub use bounds::GrowToInclude;
pub use camera::Camera;
pub use error::{SceneError, SceneResult};
pub use intersection::{Hit, IntersectKind, Intersection};
pub use light::Light;
pub use material::Material;
pub use primitive::{Primitive, Shape, ShapeKind};
pub use scene::Scene;
pub use shapes::{Plane, Sphere, Triangle, TriangleAlgorithm, Wall};
