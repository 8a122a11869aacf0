//! Demo run configuration.

use std::path::Path;

use anyhow::{Context, Result};
use hrt_bvh::BvhConfig;
use hrt_core::TriangleAlgorithm;
use serde::Deserialize;

/// Which scene to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneKind {
    /// Spheres, a mirror wall, a floor plane and a field of animated balls
    #[default]
    Spheres,
    /// A single triangle registered with the in-process accelerator
    Triangle,
}

/// Settings for one headless run.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub scene: SceneKind,
    pub frames: u32,
    /// Seconds of animation time per frame
    pub time_step: f32,
    pub seed: u64,
    pub bvh: BvhConfig,
    pub triangle_algorithm: TriangleAlgorithm,
    /// Probe rays per side; the cross-check casts `probe_grid²` rays
    pub probe_grid: u32,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            scene: SceneKind::default(),
            frames: 120,
            time_step: 1.0 / 60.0,
            seed: 42,
            bvh: BvhConfig::default(),
            triangle_algorithm: TriangleAlgorithm::default(),
            probe_grid: 32,
        }
    }
}

impl DemoConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Invalid demo config")
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("Failed to parse {}", path.display()))
    }
}
