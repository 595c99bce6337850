use glam::{IVec3, Vec3};
use wgpu::util::DeviceExt;
use bytemuck::NoUninit;

#[repr(C)]
#[derive(Debug, Clone, Copy, NoUninit)]
pub struct Vertex {
    pub pos: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 4],
    pub uv: [f32; 2],
}

pub struct MeshBuffer {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

#[derive(Debug, Clone)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn empty() -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.indices.is_empty()
    }

    /// Append a quad given its four corners in counter-clockwise order (seen from the front)
    pub fn push_quad(&mut self, corners: [[f32; 3]; 4], normal: [f32; 3], uvs: [[f32; 2]; 4], color: [f32; 4]) {
        let base = self.vertices.len() as u32;
        for (pos, uv) in corners.into_iter().zip(uvs) {
            self.vertices.push(Vertex { pos, normal, color, uv });
        }
        self.indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    pub fn upload(&self, device: &wgpu::Device) -> MeshBuffer {

        let vertices = bytemuck::cast_slice(&self.vertices);
        let indices = bytemuck::cast_slice(&self.indices);

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Vertex Buffer"),
            contents: vertices,
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Index Buffer"),
            contents: indices,
            usage: wgpu::BufferUsages::INDEX,
        });

        MeshBuffer {
            vertex_buffer,
            index_buffer,
            index_count: self.indices.len() as u32,
        }
    }
}

/// Integer cell of the voxel lattice. Hashable, so it doubles as the world index key.
#[derive(Debug, Eq, Hash, PartialEq, Clone, Copy, PartialOrd, Ord)]
pub struct GridCoord(pub i32, pub i32, pub i32);

impl GridCoord {
    /// Offsets of the six cells sharing a face with a cell
    pub const FACE_OFFSETS: [IVec3; 6] = [
        IVec3::X,
        IVec3::NEG_X,
        IVec3::Y,
        IVec3::NEG_Y,
        IVec3::Z,
        IVec3::NEG_Z,
    ];

    /// Snap a continuous position to the nearest cell. Halves round toward +inf,
    /// so -0.5 lands in cell 0 and 0.5 in cell 1.
    pub fn from_position(pos: Vec3) -> Self {
        let snap = |v: f32| (v + 0.5).floor() as i32;
        GridCoord(snap(pos.x), snap(pos.y), snap(pos.z))
    }

    /// Centre of the unit cube drawn for this cell. Cubes sit on their cell's
    /// y value, so only the vertical component is shifted.
    pub fn center(&self) -> Vec3 {
        Vec3::new(self.0 as f32, self.1 as f32 + 0.5, self.2 as f32)
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_half_extents(self.center(), Vec3::splat(0.5))
    }

    pub fn offset(&self, by: IVec3) -> GridCoord {
        GridCoord(self.0 + by.x, self.1 + by.y, self.2 + by.z)
    }

    pub fn neighbors(&self) -> impl Iterator<Item = GridCoord> + '_ {
        Self::FACE_OFFSETS.iter().map(move |o| self.offset(*o))
    }
}

/// Axis-aligned box. Touching boxes count as intersecting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn from_center_half_extents(center: Vec3, half: Vec3) -> Self {
        Self { min: center - half, max: center + half }
    }

    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x && self.max.x >= other.min.x &&
        self.min.y <= other.max.y && self.max.y >= other.min.y &&
        self.min.z <= other.max.z && self.max.z >= other.min.z
    }

    /// Slab test. Returns the entry distance along `dir` and the outward normal
    /// of the face that was entered, or None if the ray misses within `max_distance`.
    /// Rays starting inside the box report no hit.
    pub fn ray_hit(&self, origin: Vec3, dir: Vec3, max_distance: f32) -> Option<(f32, IVec3)> {
        let mut t_enter = f32::NEG_INFINITY;
        let mut t_exit = f32::INFINITY;
        let mut enter_normal = IVec3::ZERO;

        for axis in 0..3 {
            let o = origin[axis];
            let d = dir[axis];
            let (lo, hi) = (self.min[axis], self.max[axis]);

            if d.abs() < f32::EPSILON {
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }

            let mut t0 = (lo - o) / d;
            let mut t1 = (hi - o) / d;
            // entering through the min face means the outward normal points to -axis
            let mut sign = -1;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
                sign = 1;
            }
            if t0 > t_enter {
                t_enter = t0;
                enter_normal = IVec3::ZERO;
                enter_normal[axis] = sign;
            }
            t_exit = t_exit.min(t1);
            if t_enter > t_exit {
                return None;
            }
        }

        if t_enter < 0.0 || t_enter > max_distance {
            return None;
        }
        Some((t_enter, enter_normal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_rounding() {
        assert_eq!(GridCoord::from_position(Vec3::new(0.4, 1.6, -2.2)), GridCoord(0, 2, -2));
        assert_eq!(GridCoord::from_position(Vec3::new(-0.5, 0.5, 2.5)), GridCoord(0, 1, 3));
    }

    #[test]
    fn test_cell_bounds() {
        let b = GridCoord(2, 0, -1).bounds();
        assert_eq!(b.min, Vec3::new(1.5, 0.0, -1.5));
        assert_eq!(b.max, Vec3::new(2.5, 1.0, -0.5));
    }

    #[test]
    fn test_touching_boxes_intersect() {
        let a = Aabb::new(Vec3::ZERO, Vec3::ONE);
        let b = Aabb::new(Vec3::new(1.0, 0.0, 0.0), Vec3::new(2.0, 1.0, 1.0));
        let c = Aabb::new(Vec3::new(1.01, 0.0, 0.0), Vec3::new(2.0, 1.0, 1.0));
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_ray_hits_top_face() {
        let cell = GridCoord(0, 0, 0).bounds();
        let (t, normal) = cell.ray_hit(Vec3::new(0.0, 4.0, 0.0), Vec3::NEG_Y, 10.0).unwrap();
        assert!((t - 3.0).abs() < 1e-5);
        assert_eq!(normal, IVec3::Y);
    }

    #[test]
    fn test_ray_hits_side_face() {
        let cell = GridCoord(0, 0, 0).bounds();
        let (t, normal) = cell.ray_hit(Vec3::new(-3.0, 0.5, 0.0), Vec3::X, 10.0).unwrap();
        assert!((t - 2.5).abs() < 1e-5);
        assert_eq!(normal, IVec3::NEG_X);
    }

    #[test]
    fn test_ray_misses() {
        let cell = GridCoord(0, 0, 0).bounds();
        assert!(cell.ray_hit(Vec3::new(3.0, 4.0, 0.0), Vec3::NEG_Y, 10.0).is_none());
        assert!(cell.ray_hit(Vec3::new(0.0, 4.0, 0.0), Vec3::Y, 10.0).is_none());
        assert!(cell.ray_hit(Vec3::new(0.0, 40.0, 0.0), Vec3::NEG_Y, 10.0).is_none());
    }
}
