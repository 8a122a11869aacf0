//! Demo scene generators and their per-frame animation.

use std::sync::Arc;

use hrt_bvh::TriangleIndex;
use hrt_core::animation::{bounce_sphere, rotate_about};
use hrt_core::{Camera, Light, Material, Primitive, Scene, SceneResult, ShapeKind, Triangle, TriangleAccelerator};
use hrt_math::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{DemoConfig, SceneKind};

const ASPECT_RATIO: f32 = 800.0 / 600.0;

const BOUNCE_AMPLITUDE: f32 = 2.0;
const BOUNCE_FREQUENCY: f32 = 1.0;

/// Radians per second for spinning triangles.
const SPIN_SPEED: f32 = 1.0;

/// A generated scene plus the accelerator its triangles report to.
pub struct DemoScene {
    pub scene: Scene,
    pub accelerator: Option<Arc<dyn TriangleAccelerator>>,
}

impl DemoScene {
    pub fn generate(config: &DemoConfig) -> SceneResult<Self> {
        let mut demo = match config.scene {
            SceneKind::Spheres => spheres(config.seed)?,
            SceneKind::Triangle => triangle()?,
        };
        demo.scene.set_triangle_algorithm(config.triangle_algorithm);
        Ok(demo)
    }

    /// Move every animated primitive to its pose at `time`.
    ///
    /// Spheres bounce around their origin; triangles spin about their
    /// centroid by `dt` worth of rotation. Pending accelerator updates are
    /// committed afterwards.
    pub fn advance(&mut self, time: f32, dt: f32) -> SceneResult<()> {
        let animated = self.scene.animated_indices().to_vec();
        for index in animated {
            let primitive = self.scene.primitive_mut(index)?;
            match (primitive.kind(), primitive.center()) {
                (ShapeKind::Sphere, _) => {
                    bounce_sphere(primitive, time, BOUNCE_AMPLITUDE, BOUNCE_FREQUENCY);
                }
                (ShapeKind::Triangle, Some(pivot)) => {
                    rotate_about(primitive, pivot, Vec3::Y, SPIN_SPEED * dt);
                }
                _ => {}
            }
        }

        if let Some(accelerator) = &self.accelerator {
            accelerator.commit();
        }
        Ok(())
    }
}

/// Spheres over a mirror wall and a floor, with a field of small balls.
fn spheres(seed: u64) -> SceneResult<DemoScene> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut scene = Scene::new();

    let mut camera = Camera::new(Vec3::new(30.0, -5.0, 40.0), ASPECT_RATIO);
    scene.set_light(Light::new(Vec3::new(0.0, -14.0, 0.0), Vec3::ONE).with_intensity(50.0));

    let big = scene.add(
        Primitive::sphere(Vec3::new(0.0, 10.0, -8.0), 5.0)
            .with_material(Material::new(Vec3::new(0.0, 0.37, 0.0)).with_fresnel(0.0).with_phong(0.2, 1.0, 0.1)),
    );
    let medium = scene.add(
        Primitive::sphere(Vec3::new(12.0, 10.0, -8.0), 4.0)
            .with_material(Material::new(Vec3::new(0.58, 0.18, 0.48)).with_fresnel(0.0).with_phong(0.0, 0.5, 0.0)),
    );
    let small = scene.add(
        Primitive::sphere(Vec3::new(20.0, 7.5, -8.0), 2.5)
            .with_material(Material::new(Vec3::new(0.8, 0.2, 0.8)).with_phong(0.06, 0.06, 0.5)),
    );
    scene.add(
        Primitive::sphere(Vec3::new(0.0, 23.0, -8.0), 1.5)
            .with_material(Material::new(Vec3::new(0.0, 0.37, 0.0)).with_fresnel(0.0).with_phong(0.0, 0.5, 0.0)),
    );

    // Mirror
    scene.add(
        Primitive::wall(Vec3::new(-15.0, 23.0, 10.0), 30.0, 20.0, Vec3::new(-1.0, 0.2, 0.0))
            .with_material(Material::default().with_phong(0.1, 0.0, 1.0)),
    );

    let mut tri = Triangle::new(
        Vec3::new(-15.0, 20.0, 25.0),
        Vec3::new(-12.0, 20.0, 10.0),
        Vec3::new(-15.0, 0.0, 20.0),
    );
    tri.invert_normal();
    scene.add(
        Primitive::triangle(tri)
            .with_material(Material::new(Vec3::new(0.19, 0.66, 0.32)).with_phong(0.06, 0.06, 0.5)),
    );

    let mut balls = Vec::with_capacity(25);
    for _ in 0..25 {
        let x = rng.gen_range(-40.0..40.0);
        let z = rng.gen_range(-40.0..40.0);
        let color = Vec3::new(rng.gen(), rng.gen(), rng.gen());
        balls.push(scene.add(Primitive::sphere(Vec3::new(x, 23.0, z), 1.5).with_material(Material::new(color))));
    }

    scene.add(
        Primitive::plane(Vec3::Y, Vec3::new(0.0, 25.0, 0.0))
            .with_material(Material::new(Vec3::new(0.65, 0.17, 0.35)).with_phong(0.4, 1.0, 0.0)),
    );

    for index in [big, medium, small].into_iter().chain(balls) {
        scene.mark_animated(index)?;
    }

    camera.look_at(Vec3::new(0.0, 10.0, -8.0));
    scene.set_camera(camera);

    Ok(DemoScene { scene, accelerator: None })
}

/// One spinning triangle answered by the in-process accelerator.
fn triangle() -> SceneResult<DemoScene> {
    let accelerator: Arc<dyn TriangleAccelerator> = Arc::new(TriangleIndex::new());
    let mut scene = Scene::new();

    let mut camera = Camera::new(Vec3::new(0.0, -10.0, 40.0), ASPECT_RATIO);
    scene.set_light(Light::new(Vec3::new(14.8, -17.0, 17.0), Vec3::ONE).with_intensity(26.0));

    let origin = Vec3::ZERO;
    let tri = Triangle::new(origin, origin + Vec3::new(5.0, 0.0, 0.0), origin + Vec3::new(2.5, -5.0, 0.0))
        .with_accelerator(&accelerator);
    let index = scene.add(Primitive::triangle(tri));
    scene.mark_animated(index)?;
    accelerator.commit();

    camera.look_at(origin);
    scene.set_camera(camera);

    Ok(DemoScene {
        scene,
        accelerator: Some(accelerator),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spheres_scene_layout() {
        let demo = DemoScene::generate(&DemoConfig::default()).unwrap();
        let scene = &demo.scene;

        // 4 spheres, wall, triangle, 25 balls, floor
        assert_eq!(scene.len(), 32);
        assert_eq!(scene.animated_indices().len(), 28);
        assert_eq!(scene.primitives().last().map(|p| p.kind()), Some(ShapeKind::Plane));
        assert!(demo.accelerator.is_none());
    }

    #[test]
    fn test_spheres_scene_is_seeded() {
        let config = DemoConfig::default();
        let a = DemoScene::generate(&config).unwrap();
        let b = DemoScene::generate(&config).unwrap();
        let centers = |d: &DemoScene| d.scene.primitives().iter().filter_map(|p| p.center()).collect::<Vec<_>>();
        assert_eq!(centers(&a), centers(&b));

        let other = DemoScene::generate(&DemoConfig { seed: 7, ..config }).unwrap();
        assert_ne!(centers(&a), centers(&other));
    }

    #[test]
    fn test_bounce_moves_only_animated_spheres() {
        let mut demo = DemoScene::generate(&DemoConfig::default()).unwrap();
        let still_before = demo.scene.primitive(3).unwrap().center();
        demo.advance(std::f32::consts::FRAC_PI_2, 0.1).unwrap();

        let big = demo.scene.primitive(0).unwrap();
        assert!((big.center().unwrap().y - 12.0).abs() < 1e-4);
        assert_eq!(demo.scene.primitive(3).unwrap().center(), still_before);
    }

    #[test]
    fn test_triangle_scene_spins_through_accelerator() {
        let config = DemoConfig {
            scene: SceneKind::Triangle,
            triangle_algorithm: hrt_core::TriangleAlgorithm::Accelerated,
            ..DemoConfig::default()
        };
        let mut demo = DemoScene::generate(&config).unwrap();
        assert_eq!(demo.scene.len(), 1);

        let before = demo.scene.primitive(0).unwrap().as_triangle().unwrap().vertices();
        demo.advance(0.5, 0.5).unwrap();
        let after = demo.scene.primitive(0).unwrap().as_triangle().unwrap().vertices();
        assert!((before[0] - after[0]).length() > 1e-3);

        // Committed accelerator state tracks the rotated vertices
        let center = demo.scene.primitive(0).unwrap().center().unwrap();
        let ray = hrt_math::Ray::new(center + Vec3::new(0.0, 0.0, 20.0), Vec3::NEG_Z);
        let hit = demo.scene.closest_hit_linear(&ray).unwrap();
        assert_eq!(hit.primitive, 0);
    }
}
