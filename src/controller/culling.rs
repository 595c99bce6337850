use std::time::Duration;

use glam::Vec3;
use tracing::trace;

use crate::config::CullingConfig;
use crate::model::VoxelWorld;

/// Periodic distance culling of terrain blocks.
///
/// Hidden blocks are skipped by both the renderer and collision. Blocks the
/// player placed are never touched.
pub struct VisibilityCuller {
    pub interval: Duration,
    pub distance: f32,
    last_pass: Duration,
}

impl VisibilityCuller {
    pub fn new(config: &CullingConfig) -> Self {
        Self {
            interval: Duration::from_millis(config.interval_ms),
            distance: config.distance,
            last_pass: Duration::ZERO,
        }
    }

    /// Run a pass if more than `interval` has elapsed since the previous one.
    /// Returns whether a pass ran.
    pub fn maybe_run(&mut self, world: &mut VoxelWorld, player_pos: Vec3, now: Duration) -> bool {
        if now.saturating_sub(self.last_pass) <= self.interval {
            return false;
        }
        self.last_pass = now;
        let changed = self.run(world, player_pos);
        trace!(changed, "culling pass");
        true
    }

    /// Unconditional pass; returns the number of blocks whose visibility flipped
    pub fn run(&self, world: &mut VoxelWorld, player_pos: Vec3) -> usize {
        let max_sq = self.distance * self.distance;
        world.update_visibility(|block| {
            block
                .is_terrain()
                .then(|| block.coord().center().distance_squared(player_pos) < max_sq)
        })
    }
}

impl Default for VisibilityCuller {
    fn default() -> Self {
        Self::new(&CullingConfig::default())
    }
}
