//! Per-frame BVH maintenance for animated primitives.
//!
//! Refit grows the leaf of each animated primitive and then its ancestors.
//! Topology and leaf membership never change, so the flat GPU layout stays
//! valid and only the returned nodes need re-uploading.

use hrt_core::Scene;

use crate::{Bvh, BvhError, BvhResult, RebuildPolicy};

/// Outcome of [`Bvh::update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BvhUpdate {
    /// Boxes were grown in place; sorted, deduplicated changed node indices.
    Refit { changed: Vec<usize> },
    /// The hierarchy was rebuilt from scratch; every node must be resent.
    Rebuilt,
}

impl Bvh {
    fn check_fresh(&self, scene: &Scene) -> BvhResult<()> {
        if scene.len() != self.built_for {
            return Err(BvhError::StaleHierarchy {
                built_for: self.built_for,
                scene_len: scene.len(),
            });
        }
        Ok(())
    }

    /// Grow node boxes to the current geometry of every animated primitive.
    ///
    /// Boxes never shrink. Returns the sorted list of nodes whose bounds
    /// changed.
    pub fn refit(&mut self, scene: &Scene) -> BvhResult<Vec<usize>> {
        self.check_fresh(scene)?;

        let mut changed = Vec::new();
        for &index in scene.animated_indices() {
            let primitive = scene.primitive(index)?;
            // Already reported when the hierarchy was built
            if primitive.as_triangle().is_some_and(|t| !t.is_finite()) {
                log::debug!("Refit skipping non-finite triangle {}", index);
                continue;
            }
            let bounds = primitive.bounds();
            let Some(leaf) = self.leaf_of(index) else {
                continue;
            };

            let mut node = Some(leaf);
            while let Some(n) = node {
                let before = self.nodes[n].bounds;
                self.nodes[n].bounds.grow_to_include_box(&bounds);
                // Ancestors already contain an unchanged box
                if self.nodes[n].bounds == before {
                    break;
                }
                changed.push(n);
                node = self.parents[n];
            }
        }

        changed.sort_unstable();
        changed.dedup();
        self.refits += 1;

        log::debug!(
            "BVH refit: {} animated primitives, {} nodes changed",
            scene.animated_indices().len(),
            changed.len()
        );
        Ok(changed)
    }

    /// Refit, then rebuild if the configured [`RebuildPolicy`] asks for it.
    pub fn update(&mut self, scene: &Scene) -> BvhResult<BvhUpdate> {
        let changed = self.refit(scene)?;

        if self.should_rebuild() {
            log::debug!(
                "BVH rebuild triggered after {} refits (leaf area {:.1} vs {:.1} at build)",
                self.refits,
                self.leaf_surface_area(),
                self.built_leaf_area
            );
            *self = Bvh::build(scene, &self.config);
            return Ok(BvhUpdate::Rebuilt);
        }
        Ok(BvhUpdate::Refit { changed })
    }

    /// Current leaf surface area relative to the area right after build.
    pub fn looseness(&self) -> f32 {
        if self.built_leaf_area > 0.0 {
            self.leaf_surface_area() / self.built_leaf_area
        } else {
            1.0
        }
    }

    fn should_rebuild(&self) -> bool {
        match self.config.rebuild {
            RebuildPolicy::Never => false,
            RebuildPolicy::EveryNFrames(n) => n > 0 && self.refits >= n,
            RebuildPolicy::LoosenessAbove(ratio) => self.looseness() > ratio,
        }
    }
}
