// VIEW: Rendering and graphics
pub mod textures;
pub mod mesh;
pub mod render;
pub mod gpu_init;

pub use textures::{TextureAtlas, TileRect};
pub use mesh::{build_block_mesh, build_ground_mesh, BlockMeshCache};
pub use render::{EguiFrame, RenderState};
pub use gpu_init::GpuContext;
