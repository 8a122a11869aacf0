//! HRT Demo - headless driver for the hybrid ray tracer core.
//!
//! Builds a demo scene, its BVH and the flat GPU buffers, then runs the
//! animation loop: move primitives, refit (or rebuild) the hierarchy and
//! collect the dirty byte ranges a renderer would upload. Before and after
//! the loop a grid of camera rays is traced through the BVH and checked
//! against brute-force tracing.
//!
//! Usage: `hrt_demo [config.json]`

mod config;
mod scenes;

use anyhow::{bail, Context, Result};
use env_logger::Env;
use hrt_bvh::{Bvh, BvhUpdate};
use hrt_core::Scene;
use hrt_gpu::GpuScene;

use config::DemoConfig;
use scenes::DemoScene;

/// Distance tolerance when comparing BVH and linear hits.
const HIT_TOLERANCE: f32 = 1e-3;

/// Trace a `grid × grid` set of primary rays both ways and return the
/// number of disagreements.
fn cross_check(scene: &Scene, bvh: &Bvh, grid: u32) -> usize {
    let mut mismatches = 0;
    for j in 0..grid {
        for i in 0..grid {
            let x = (i as f32 + 0.5) / grid as f32 * 2.0 - 1.0;
            let y = 1.0 - (j as f32 + 0.5) / grid as f32 * 2.0;
            let ray = scene.camera.ray_through(x, y);

            let fast = bvh.closest_hit(scene, &ray);
            let slow = scene.closest_hit_linear(&ray);
            let agree = match (fast, slow) {
                (None, None) => true,
                (Some(a), Some(b)) => (a.distance - b.distance).abs() <= HIT_TOLERANCE * b.distance.max(1.0),
                _ => false,
            };
            if !agree {
                log::warn!("Probe ({}, {}) disagrees: bvh={:?} linear={:?}", i, j, fast, slow);
                mismatches += 1;
            }
        }
    }
    mismatches
}

fn load_config() -> Result<DemoConfig> {
    match std::env::args().nth(1) {
        Some(path) => DemoConfig::load(&path),
        None => Ok(DemoConfig::default()),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    log::info!("Starting HRT Demo");

    let config = load_config()?;
    log::info!("Config: {:?}", config);

    let mut demo = DemoScene::generate(&config).context("Failed to generate demo scene")?;
    let world = demo.scene.world_bounds();
    log::info!(
        "Scene: {} primitives ({} animated), bounds {:?} .. {:?}",
        demo.scene.len(),
        demo.scene.animated_indices().len(),
        world.min,
        world.max
    );
    let mut bvh = Bvh::build(&demo.scene, &config.bvh);
    let mut gpu = GpuScene::new(&demo.scene, &bvh);

    let mismatches = cross_check(&demo.scene, &bvh, config.probe_grid);
    if mismatches > 0 {
        bail!("{} probe rays disagree after build", mismatches);
    }

    let mut uploaded = 0usize;
    let mut rebuilds = 0u32;
    for frame in 0..config.frames {
        let time = frame as f32 * config.time_step;
        demo.advance(time, config.time_step)?;

        let update = bvh.update(&demo.scene)?;
        if update == BvhUpdate::Rebuilt {
            rebuilds += 1;
        }
        let report = gpu.apply_update(&demo.scene, &bvh, &update)?;

        uploaded += report.dirty_bytes();
        log::debug!(
            "Frame {}: {} shape ranges, {} node ranges, {} bytes{}",
            frame,
            report.shapes.len(),
            report.nodes.len(),
            report.dirty_bytes(),
            if report.resized { " (resized)" } else { "" }
        );
    }

    let mismatches = cross_check(&demo.scene, &bvh, config.probe_grid);
    if mismatches > 0 {
        bail!("{} probe rays disagree after {} frames", mismatches, config.frames);
    }

    let stats = bvh.stats();
    log::info!(
        "Done: {} frames, {} rebuilds, {} bytes uploaded, looseness {:.2}, {} nodes / {} leaves",
        config.frames,
        rebuilds,
        uploaded,
        bvh.looseness(),
        stats.node_count,
        stats.leaf_count
    );
    log::info!(
        "GPU buffers: {} shapes ({} B), {} nodes ({} B), {} indices, {} unbounded",
        gpu.shapes().len(),
        gpu.shapes_bytes().len(),
        gpu.nodes().len(),
        gpu.nodes_bytes().len(),
        gpu.indices().len(),
        gpu.unbounded().len()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hrt_bvh::{BvhConfig, RebuildPolicy};

    #[test]
    fn test_cross_check_through_animation() {
        let config = DemoConfig::default();
        let mut demo = DemoScene::generate(&config).unwrap();
        let mut bvh = Bvh::build(&demo.scene, &config.bvh);
        assert_eq!(cross_check(&demo.scene, &bvh, 16), 0);

        for frame in 0..20 {
            demo.advance(frame as f32 * 0.1, 0.1).unwrap();
            bvh.update(&demo.scene).unwrap();
        }
        assert_eq!(cross_check(&demo.scene, &bvh, 16), 0);
    }

    #[test]
    fn test_periodic_rebuild_keeps_gpu_in_step() {
        let config = DemoConfig {
            bvh: BvhConfig::default().with_rebuild(RebuildPolicy::EveryNFrames(4)),
            ..DemoConfig::default()
        };
        let mut demo = DemoScene::generate(&config).unwrap();
        let mut bvh = Bvh::build(&demo.scene, &config.bvh);
        let mut gpu = GpuScene::new(&demo.scene, &bvh);

        let mut rebuilds = 0;
        for frame in 0..8 {
            demo.advance(frame as f32 * 0.25, 0.25).unwrap();
            demo.scene.camera.position.x += 1.0;
            let update = bvh.update(&demo.scene).unwrap();
            if update == BvhUpdate::Rebuilt {
                rebuilds += 1;
            }
            gpu.apply_update(&demo.scene, &bvh, &update).unwrap();
            assert_eq!(gpu.nodes().len(), bvh.node_count());
            // Camera travels with every update, refit or rebuild
            assert_eq!(gpu.camera().position, demo.scene.camera.position.to_array());
        }
        assert_eq!(rebuilds, 2);
    }
}
