//! The closed set of geometric shapes.

mod plane;
mod sphere;
mod triangle;
mod wall;

pub use plane::Plane;
pub use sphere::Sphere;
pub use triangle::{moller_trumbore, Triangle, TriangleAlgorithm};
pub use wall::Wall;
