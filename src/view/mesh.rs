use glam::IVec3;

use crate::model::{Block, FaceSlot, VoxelWorld};
use crate::utils::{GridCoord, Mesh};
use crate::view::textures::TextureAtlas;

const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

/// Per face: outward normal and the four corners (bottom-left, bottom-right,
/// top-right, top-left as seen from outside) in unit-cube coordinates, where
/// x/z run 0..1 across the cell and y runs 0..1 up from the cell's floor.
const FACES: [(IVec3, [[f32; 3]; 4]); 6] = [
    (IVec3::X, [[1.0, 0.0, 1.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [1.0, 1.0, 1.0]]),
    (IVec3::NEG_X, [[0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 1.0], [0.0, 1.0, 0.0]]),
    (IVec3::Y, [[0.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]]),
    (IVec3::NEG_Y, [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 0.0, 1.0], [0.0, 0.0, 1.0]]),
    (IVec3::Z, [[0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [1.0, 1.0, 1.0], [0.0, 1.0, 1.0]]),
    (IVec3::NEG_Z, [[1.0, 0.0, 0.0], [0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 1.0, 0.0]]),
];

fn slot_for(normal: IVec3) -> FaceSlot {
    match normal.y {
        1 => FaceSlot::Top,
        -1 => FaceSlot::Bottom,
        _ => FaceSlot::Side,
    }
}

/// Is the face of `coord` towards `normal` covered by a visible block?
fn is_hidden(world: &VoxelWorld, coord: GridCoord, normal: IVec3) -> bool {
    world.get(coord.offset(normal)).is_some_and(Block::is_visible)
}

/// Mesh of every visible block, leaving out faces pressed against another
/// visible block
pub fn build_block_mesh(world: &VoxelWorld) -> Mesh {
    let mut mesh = Mesh::empty();
    for block in world.visible() {
        let c = block.coord();
        // cell origin: cubes are centred on x/z and sit on y
        let origin = [c.0 as f32 - 0.5, c.1 as f32, c.2 as f32 - 0.5];
        for &(normal, corners) in FACES.iter() {
            if is_hidden(world, c, normal) {
                continue;
            }
            let corners = corners.map(|p| [origin[0] + p[0], origin[1] + p[1], origin[2] + p[2]]);
            let uvs = TextureAtlas::tile(block.kind(), slot_for(normal)).quad_uvs();
            mesh.push_quad(corners, normal.as_vec3().to_array(), uvs, WHITE);
        }
    }
    mesh
}

/// Square ground plane at y = 0 centred on the origin, split into `repeat` x `repeat`
/// quads that each show the whole ground tile
pub fn build_ground_mesh(size: f32, repeat: u32) -> Mesh {
    let mut mesh = Mesh::empty();
    let repeat = repeat.max(1);
    let step = size / repeat as f32;
    let half = size / 2.0;
    let uvs = TextureAtlas::ground_tile().quad_uvs();
    for i in 0..repeat {
        for j in 0..repeat {
            let x0 = -half + i as f32 * step;
            let z0 = -half + j as f32 * step;
            let (x1, z1) = (x0 + step, z0 + step);
            mesh.push_quad(
                [[x0, 0.0, z1], [x1, 0.0, z1], [x1, 0.0, z0], [x0, 0.0, z0]],
                [0.0, 1.0, 0.0],
                uvs,
                WHITE,
            );
        }
    }
    mesh
}

/// Rebuilds the block mesh only when the world has changed
#[derive(Default)]
pub struct BlockMeshCache {
    revision: Option<u64>,
}

impl BlockMeshCache {
    /// A fresh mesh if `world` changed since the last call, otherwise None
    pub fn refresh(&mut self, world: &VoxelWorld) -> Option<Mesh> {
        if self.revision == Some(world.revision()) {
            return None;
        }
        self.revision = Some(world.revision());
        Some(build_block_mesh(world))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BlockKind;
    use glam::Vec3;

    fn quads(mesh: &Mesh) -> usize {
        assert_eq!(mesh.indices.len() % 6, 0);
        mesh.indices.len() / 6
    }

    #[test]
    fn test_lone_block_has_six_faces() {
        let mut world = VoxelWorld::new();
        world.put(GridCoord(0, 0, 0), BlockKind::Grass, true);
        let mesh = build_block_mesh(&world);
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.indices.len(), 36);
    }

    #[test]
    fn test_block_spans_its_cell() {
        let mut world = VoxelWorld::new();
        world.put(GridCoord(2, 3, -1), BlockKind::Stone, false);
        let mesh = build_block_mesh(&world);
        let (mut min, mut max) = (Vec3::splat(f32::MAX), Vec3::splat(f32::MIN));
        for v in &mesh.vertices {
            min = min.min(Vec3::from(v.pos));
            max = max.max(Vec3::from(v.pos));
        }
        let bounds = GridCoord(2, 3, -1).bounds();
        assert_eq!(min, bounds.min);
        assert_eq!(max, bounds.max);
    }

    #[test]
    fn test_faces_wind_counter_clockwise_outward() {
        let mut world = VoxelWorld::new();
        world.put(GridCoord(0, 0, 0), BlockKind::Dirt, true);
        let mesh = build_block_mesh(&world);
        for tri in mesh.indices.chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| Vec3::from(mesh.vertices[i as usize].pos));
            let n = Vec3::from(mesh.vertices[tri[0] as usize].normal);
            assert!((b - a).cross(c - a).dot(n) > 0.0);
        }
    }

    #[test]
    fn test_shared_faces_are_skipped() {
        let mut world = VoxelWorld::new();
        world.put(GridCoord(0, 0, 0), BlockKind::Grass, true);
        world.put(GridCoord(1, 0, 0), BlockKind::Grass, true);
        assert_eq!(quads(&build_block_mesh(&world)), 10);

        world.put(GridCoord(0, 1, 0), BlockKind::Grass, false);
        assert_eq!(quads(&build_block_mesh(&world)), 14);
    }

    #[test]
    fn test_culled_neighbour_exposes_face() {
        let mut world = VoxelWorld::new();
        world.put(GridCoord(0, 0, 0), BlockKind::Grass, false);
        world.put(GridCoord(1, 0, 0), BlockKind::Grass, true);
        world.update_visibility(|b| b.is_terrain().then_some(false));
        assert_eq!(quads(&build_block_mesh(&world)), 6);
    }

    #[test]
    fn test_top_face_uses_top_tile() {
        let mut world = VoxelWorld::new();
        world.put(GridCoord(0, 0, 0), BlockKind::Grass, true);
        let mesh = build_block_mesh(&world);
        let top = TextureAtlas::tile(BlockKind::Grass, FaceSlot::Top);
        let up: Vec<_> = mesh.vertices.iter().filter(|v| v.normal == [0.0, 1.0, 0.0]).collect();
        assert_eq!(up.len(), 4);
        for v in up {
            assert!(v.uv[0] >= top.min[0] && v.uv[0] <= top.max[0]);
            assert!(v.uv[1] >= top.min[1] && v.uv[1] <= top.max[1]);
        }
    }

    #[test]
    fn test_ground_plane() {
        let mesh = build_ground_mesh(500.0, 50);
        assert_eq!(quads(&mesh), 2500);
        assert!(mesh.vertices.iter().all(|v| v.pos[1] == 0.0));
        let max_x = mesh.vertices.iter().map(|v| v.pos[0]).fold(f32::MIN, f32::max);
        assert_eq!(max_x, 250.0);
    }

    #[test]
    fn test_cache_rebuilds_on_change_only() {
        let mut world = VoxelWorld::new();
        world.put(GridCoord(0, 0, 0), BlockKind::Grass, true);
        let mut cache = BlockMeshCache::default();
        assert!(cache.refresh(&world).is_some());
        assert!(cache.refresh(&world).is_none());
        world.put(GridCoord(0, 1, 0), BlockKind::Dirt, false);
        assert!(cache.refresh(&world).is_some());
    }
}
