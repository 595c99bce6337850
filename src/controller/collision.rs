use glam::Vec3;

use crate::config::{PhysicsConfig, PlayerConfig};
use crate::model::{Player, VoxelWorld};
use crate::utils::{Aabb, GridCoord};

/// Which axes were blocked during one resolve
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Contacts {
    pub x: bool,
    pub y: bool,
    pub z: bool,
}

/// Axis-separated box collision of the player against visible blocks.
///
/// Each axis is tried on its own (x, then y, then z), combining the candidate
/// value on that axis with the position committed at the start of the step on
/// the other two, so a wall stops one component and the player slides along it.
pub struct CollisionResolver {
    pub half_width: f32,
    pub eye_height: f32,
    pub head_room: f32,
    pub ground_level: f32,
    pub bounce_threshold: f32,
}

impl CollisionResolver {
    pub fn new(player: &PlayerConfig, physics: &PhysicsConfig) -> Self {
        Self {
            half_width: player.half_width,
            eye_height: player.eye_height,
            head_room: player.head_room,
            ground_level: physics.ground_level,
            bounce_threshold: physics.bounce_threshold,
        }
    }

    /// Box occupied by a player whose eye point is `pos`
    pub fn player_box(&self, pos: Vec3) -> Aabb {
        Aabb::new(
            Vec3::new(pos.x - self.half_width, pos.y - self.eye_height, pos.z - self.half_width),
            Vec3::new(pos.x + self.half_width, pos.y + self.head_room, pos.z + self.half_width),
        )
    }

    /// Does the player box at `pos` touch any visible block?
    ///
    /// Only cells the box can reach are looked up, which gives the same answer
    /// as testing every visible block.
    pub fn collides(&self, pos: Vec3, world: &VoxelWorld) -> bool {
        let b = self.player_box(pos);
        // cell c spans [c - 0.5, c + 0.5] on x/z and [c, c + 1] on y
        let xs = (b.min.x - 0.5).ceil() as i32..=(b.max.x + 0.5).floor() as i32;
        let ys = (b.min.y - 1.0).ceil() as i32..=b.max.y.floor() as i32;
        let zs = (b.min.z - 0.5).ceil() as i32..=(b.max.z + 0.5).floor() as i32;

        for x in xs {
            for y in ys.clone() {
                for z in zs.clone() {
                    let coord = GridCoord(x, y, z);
                    if let Some(block) = world.get(coord) {
                        if block.is_visible() && b.intersects(&coord.bounds()) {
                            return true;
                        }
                    }
                }
            }
        }
        false
    }

    /// Commit as much of `candidate` as the visible blocks allow, adjusting velocity
    /// and `can_jump` on contact.
    pub fn resolve(&self, player: &mut Player, candidate: Vec3, world: &VoxelWorld) -> Contacts {
        let start = player.position;
        let mut contacts = Contacts::default();

        // X
        if !self.collides(Vec3::new(candidate.x, start.y, start.z), world) {
            player.position.x = candidate.x;
        } else {
            contacts.x = true;
            // soft bounce
            if player.velocity.x.abs() > self.bounce_threshold {
                player.velocity.x *= 0.5;
            }
        }

        // Y
        if !self.collides(Vec3::new(start.x, candidate.y, start.z), world) {
            player.position.y = candidate.y;
            if player.position.y < self.ground_level {
                player.position.y = self.ground_level;
                player.velocity.y = 0.0;
                player.can_jump = true;
            }
        } else {
            contacts.y = true;
            if player.velocity.y < 0.0 {
                // landed
                player.velocity.y = 0.0;
                player.can_jump = true;
                if player.position.y < self.ground_level {
                    player.position.y = self.ground_level;
                }
            } else if player.velocity.y > 0.0 {
                // bumped a ceiling: no jump granted
                player.velocity.y = 0.0;
            }
        }

        // Z
        if !self.collides(Vec3::new(start.x, start.y, candidate.z), world) {
            player.position.z = candidate.z;
        } else {
            contacts.z = true;
            if player.velocity.z.abs() > self.bounce_threshold {
                player.velocity.z *= 0.5;
            }
        }

        contacts
    }
}

impl Default for CollisionResolver {
    fn default() -> Self {
        Self::new(&PlayerConfig::default(), &PhysicsConfig::default())
    }
}
