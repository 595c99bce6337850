pub mod block;
pub mod voxel_world;
pub mod terrain;

pub use block::{Block, BlockKind, FaceSlot};
pub use voxel_world::{Put, VoxelWorld};
pub use terrain::TerrainGenerator;
