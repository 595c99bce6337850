use rand::Rng;
use tracing::info;

use super::block::BlockKind;
use super::voxel_world::VoxelWorld;
use crate::utils::GridCoord;

/// Flat-ish starting terrain: a square of columns one or two blocks tall
#[derive(Clone, Copy, Debug)]
pub struct TerrainGenerator {
    /// terrain spans [-half_extent, half_extent] on x and z
    pub half_extent: i32,
}

impl TerrainGenerator {
    pub fn new(half_extent: i32) -> Self {
        Self { half_extent }
    }

    /// Kind of the block at height `y` in a column of height `height`
    pub fn layer_kind(y: i32, height: i32) -> BlockKind {
        if y == 0 {
            BlockKind::Dirt
        } else {
            // the top layer and anything between it and the base
            debug_assert!(y < height);
            BlockKind::Grass
        }
    }

    /// Fill `world` with terrain blocks. Column heights are drawn from `rng`,
    /// so a seeded generator reproduces the same terrain.
    pub fn generate<R: Rng + ?Sized>(&self, world: &mut VoxelWorld, rng: &mut R) -> usize {
        let r = self.half_extent;
        let mut placed = 0;
        for x in -r..=r {
            for z in -r..=r {
                let height = rng.gen_range(1..=2);
                for y in 0..height {
                    if world.put(GridCoord(x, y, z), Self::layer_kind(y, height), true).is_inserted() {
                        placed += 1;
                    }
                }
            }
        }
        info!("generated terrain: {} blocks over {}x{} columns", placed, 2 * r + 1, 2 * r + 1);
        placed
    }
}

impl Default for TerrainGenerator {
    fn default() -> Self {
        Self::new(15)
    }
}
