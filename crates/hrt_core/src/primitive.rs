//! Scene primitives: a closed shape variant plus material and animation state.

use hrt_math::{BoundingBox, Ray, Vec3};

use crate::bounds::GrowToInclude;
use crate::{Intersection, Material, Plane, Sphere, Triangle, Wall};

/// Geometry of a primitive.
#[derive(Debug, Clone)]
pub enum Shape {
    Sphere(Sphere),
    Plane(Plane),
    Wall(Wall),
    Triangle(Triangle),
}

/// Discriminant of [`Shape`], matching the GPU record's type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ShapeKind {
    Sphere = 0,
    Plane = 1,
    Wall = 2,
    Triangle = 3,
}

impl ShapeKind {
    pub fn tag(self) -> i32 {
        self as i32
    }

    pub fn from_tag(tag: i32) -> Option<Self> {
        match tag {
            0 => Some(ShapeKind::Sphere),
            1 => Some(ShapeKind::Plane),
            2 => Some(ShapeKind::Wall),
            3 => Some(ShapeKind::Triangle),
            _ => None,
        }
    }
}

/// A renderable object in the scene.
#[derive(Debug, Clone)]
pub struct Primitive {
    pub shape: Shape,
    pub material: Material,
    /// Reference point captured at construction (animation anchor)
    pub origin: Vec3,
    /// Set by [`Scene::mark_animated`](crate::Scene::mark_animated)
    pub animated: bool,
}

impl Primitive {
    /// Wrap an already-built shape with the default material.
    pub fn from_shape(shape: Shape, origin: Vec3) -> Self {
        Self {
            shape,
            material: Material::default(),
            origin,
            animated: false,
        }
    }

    pub fn sphere(center: Vec3, radius: f32) -> Self {
        Self::from_shape(Shape::Sphere(Sphere::new(center, radius)), center)
    }

    pub fn plane(normal: Vec3, point: Vec3) -> Self {
        Self::from_shape(Shape::Plane(Plane::new(normal, point)), point)
    }

    pub fn wall(start: Vec3, width: f32, height: f32, normal: Vec3) -> Self {
        Self::from_shape(Shape::Wall(Wall::new(start, width, height, normal)), start)
    }

    pub fn triangle(triangle: Triangle) -> Self {
        let origin = triangle.center();
        Self::from_shape(Shape::Triangle(triangle), origin)
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    pub fn kind(&self) -> ShapeKind {
        match self.shape {
            Shape::Sphere(_) => ShapeKind::Sphere,
            Shape::Plane(_) => ShapeKind::Plane,
            Shape::Wall(_) => ShapeKind::Wall,
            Shape::Triangle(_) => ShapeKind::Triangle,
        }
    }

    /// Surface normal at `point`.
    pub fn normal(&self, point: Vec3) -> Vec3 {
        match &self.shape {
            Shape::Sphere(s) => s.normal(point),
            Shape::Plane(p) => p.normal,
            Shape::Wall(w) => w.plane.normal,
            Shape::Triangle(t) => t.normal(),
        }
    }

    pub fn intersect(&self, ray: &Ray) -> Intersection {
        match &self.shape {
            Shape::Sphere(s) => s.intersect(ray),
            Shape::Plane(p) => p.intersect(ray),
            Shape::Wall(w) => w.intersect(ray),
            Shape::Triangle(t) => t.intersect(ray),
        }
    }

    /// Point used to partition the primitive during BVH construction.
    ///
    /// Planes have no meaningful center and return `None`.
    pub fn center(&self) -> Option<Vec3> {
        match &self.shape {
            Shape::Sphere(s) => Some(s.center),
            Shape::Plane(_) => None,
            Shape::Wall(w) => Some(w.center()),
            Shape::Triangle(t) => Some(t.center()),
        }
    }

    /// Planes are infinite and cannot be placed in the BVH.
    pub fn is_bounded(&self) -> bool {
        !matches!(self.shape, Shape::Plane(_))
    }

    /// The primitive's own bounding box (empty for planes and malformed
    /// triangles).
    pub fn bounds(&self) -> BoundingBox {
        let mut bbox = BoundingBox::new();
        bbox.grow_to_include_primitive(self);
        bbox
    }

    pub fn as_sphere_mut(&mut self) -> Option<&mut Sphere> {
        match &mut self.shape {
            Shape::Sphere(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_triangle(&self) -> Option<&Triangle> {
        match &self.shape {
            Shape::Triangle(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_triangle_mut(&mut self) -> Option<&mut Triangle> {
        match &mut self.shape {
            Shape::Triangle(t) => Some(t),
            _ => None,
        }
    }
}
