//! Fixed-layout records shared with the compute shader.
//!
//! Every `vec3` starts on a 16-byte boundary and is followed by a scalar or
//! explicit padding, so arrays of these structs can be indexed uniformly in
//! std430 storage buffers.

use bytemuck::{Pod, Zeroable};
use hrt_bvh::{BvhNode, NodeKind};
use hrt_core::{Camera, Light, Material, Plane, Primitive, Shape, ShapeKind, Sphere, Triangle, Wall};
use hrt_math::Vec3;

use crate::{LayoutError, LayoutResult};

/// Child index marking a leaf in [`FlatNode`].
pub const NO_CHILD: i32 = -1;

/// Surface material (32 bytes).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct FlatMaterial {
    pub color: [f32; 3],
    pub fresnel_strength: f32,
    pub ambient_strength: f32,
    pub diffuse_strength: f32,
    pub specular_strength: f32,
    pub shininess: i32,
}

impl From<&Material> for FlatMaterial {
    fn from(m: &Material) -> Self {
        Self {
            color: m.color.to_array(),
            fresnel_strength: m.fresnel_strength,
            ambient_strength: m.ambient_strength,
            diffuse_strength: m.diffuse_strength,
            specular_strength: m.specular_strength,
            shininess: m.shininess,
        }
    }
}

impl FlatMaterial {
    pub fn to_material(&self) -> Material {
        Material {
            color: Vec3::from_array(self.color),
            fresnel_strength: self.fresnel_strength,
            ambient_strength: self.ambient_strength,
            diffuse_strength: self.diffuse_strength,
            specular_strength: self.specular_strength,
            shininess: self.shininess,
        }
    }
}

/// Tagged primitive record (160 bytes).
///
/// `kind` selects the meaningful fields:
/// - 0 Sphere: `sphere_center`, `sphere_radius`
/// - 1 Plane: `plane_normal`, `plane_d`
/// - 2 Wall: plane fields plus `wall_start`, `wall_width`, `wall_height`
/// - 3 Triangle: plane fields plus `tri_a`, `tri_b`, `tri_c`
///
/// Unused fields are zero.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct FlatShape {
    pub kind: i32,
    pub _pad0: [i32; 3],

    pub material: FlatMaterial,

    pub sphere_center: [f32; 3],
    pub sphere_radius: f32,

    pub plane_normal: [f32; 3],
    pub plane_d: f32,

    pub wall_start: [f32; 3],
    pub wall_width: f32,

    pub wall_height: f32,
    pub _pad1: [f32; 3],

    pub tri_a: [f32; 3],
    pub _pad2: f32,
    pub tri_b: [f32; 3],
    pub _pad3: f32,
    pub tri_c: [f32; 3],
    pub _pad4: f32,
}

impl FlatShape {
    pub fn from_primitive(primitive: &Primitive) -> Self {
        let mut flat = Self::zeroed();
        flat.kind = primitive.kind().tag();
        flat.material = FlatMaterial::from(&primitive.material);

        match &primitive.shape {
            Shape::Sphere(s) => {
                flat.sphere_center = s.center.to_array();
                flat.sphere_radius = s.radius;
            }
            Shape::Plane(p) => flat.set_plane(p),
            Shape::Wall(w) => {
                flat.set_plane(&w.plane);
                flat.wall_start = w.start.to_array();
                flat.wall_width = w.width;
                flat.wall_height = w.height;
            }
            Shape::Triangle(t) => {
                flat.set_plane(&t.plane);
                flat.tri_a = t.a.to_array();
                flat.tri_b = t.b.to_array();
                flat.tri_c = t.c.to_array();
            }
        }
        flat
    }

    fn set_plane(&mut self, plane: &Plane) {
        self.plane_normal = plane.normal.to_array();
        self.plane_d = plane.d;
    }

    fn plane(&self) -> Plane {
        Plane {
            normal: Vec3::from_array(self.plane_normal),
            d: self.plane_d,
        }
    }

    pub fn shape_kind(&self) -> LayoutResult<ShapeKind> {
        ShapeKind::from_tag(self.kind).ok_or(LayoutError::UnknownShapeKind(self.kind))
    }

    /// Rebuild the live primitive this record was written from.
    ///
    /// The `animated` flag is not part of the record and comes back unset.
    pub fn to_primitive(&self) -> LayoutResult<Primitive> {
        let (shape, origin) = match self.shape_kind()? {
            ShapeKind::Sphere => {
                let center = Vec3::from_array(self.sphere_center);
                let sphere = Sphere {
                    center,
                    radius: self.sphere_radius,
                };
                (Shape::Sphere(sphere), center)
            }
            ShapeKind::Plane => {
                let plane = self.plane();
                (Shape::Plane(plane), plane.normal * -plane.d)
            }
            ShapeKind::Wall => {
                let start = Vec3::from_array(self.wall_start);
                let wall = Wall {
                    plane: self.plane(),
                    start,
                    width: self.wall_width,
                    height: self.wall_height,
                };
                (Shape::Wall(wall), start)
            }
            ShapeKind::Triangle => {
                let mut triangle = Triangle::new(
                    Vec3::from_array(self.tri_a),
                    Vec3::from_array(self.tri_b),
                    Vec3::from_array(self.tri_c),
                );
                if triangle.normal().dot(Vec3::from_array(self.plane_normal)) < 0.0 {
                    triangle.invert_normal();
                }
                let origin = triangle.center();
                (Shape::Triangle(triangle), origin)
            }
        };

        Ok(Primitive::from_shape(shape, origin).with_material(self.material.to_material()))
    }
}

/// BVH node record (48 bytes).
///
/// Leaves have both children set to [`NO_CHILD`] and own the slice
/// `start_shape_idx .. start_shape_idx + num_shapes` of the index buffer.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct FlatNode {
    pub bounds_min: [f32; 3],
    pub left_child: i32,
    pub bounds_max: [f32; 3],
    pub right_child: i32,
    pub start_shape_idx: i32,
    pub num_shapes: i32,
    pub _pad: [i32; 2],
}

impl FlatNode {
    /// Encode `node`, whose leaf slice starts at `start` in the index buffer.
    pub fn from_node(node: &BvhNode, start: usize) -> Self {
        let (left_child, right_child) = match node.kind {
            NodeKind::Branch { left, right } => (left as i32, right as i32),
            NodeKind::Leaf { .. } => (NO_CHILD, NO_CHILD),
        };
        Self {
            bounds_min: node.bounds.min.to_array(),
            left_child,
            bounds_max: node.bounds.max.to_array(),
            right_child,
            start_shape_idx: start as i32,
            num_shapes: node.primitives().len() as i32,
            _pad: [0; 2],
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.left_child == NO_CHILD
    }

    /// Overwrite only the box, keeping topology and leaf slice.
    pub fn set_bounds(&mut self, node: &BvhNode) {
        self.bounds_min = node.bounds.min.to_array();
        self.bounds_max = node.bounds.max.to_array();
    }
}

/// Camera record (80 bytes).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct FlatCamera {
    pub position: [f32; 3],
    pub aspect_ratio: f32,
    pub front: [f32; 3],
    pub _pad0: f32,
    pub up: [f32; 3],
    pub _pad1: f32,
    pub right: [f32; 3],
    pub _pad2: f32,
    /// Vertical field of view in degrees
    pub fov: f32,
    pub _pad3: [f32; 3],
}

impl From<&Camera> for FlatCamera {
    fn from(camera: &Camera) -> Self {
        Self {
            position: camera.position.to_array(),
            aspect_ratio: camera.aspect_ratio,
            front: camera.front.to_array(),
            up: camera.up.to_array(),
            right: camera.right.to_array(),
            fov: camera.fov,
            ..Self::zeroed()
        }
    }
}

/// Point light record (32 bytes).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct FlatLight {
    pub position: [f32; 3],
    pub intensity: f32,
    pub color: [f32; 3],
    pub _pad: f32,
}

impl From<&Light> for FlatLight {
    fn from(light: &Light) -> Self {
        Self {
            position: light.position.to_array(),
            intensity: light.intensity,
            color: light.color.to_array(),
            _pad: 0.0,
        }
    }
}
