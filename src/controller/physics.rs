use glam::{Quat, Vec2, Vec3};

use crate::config::PhysicsConfig;
use crate::controller::input::InputSnapshot;
use crate::model::Player;

/// Per-tick velocity integration (damping, walking, gravity, jumping).
/// Produces a candidate position; committing it is the collision pass's job.
pub struct MotionIntegrator {
    pub damping: f32,
    pub acceleration: f32,
    pub gravity: f32,
    pub jump_impulse: f32,
    pub ground_level: f32,
    pub max_dt: f32,
}

impl MotionIntegrator {
    pub fn new(config: &PhysicsConfig) -> Self {
        Self {
            damping: config.damping,
            acceleration: config.acceleration,
            gravity: config.gravity,
            jump_impulse: config.jump_impulse,
            ground_level: config.ground_level,
            max_dt: config.max_dt,
        }
    }

    pub fn clamp_dt(&self, dt: f32) -> f32 {
        dt.clamp(0.0, self.max_dt)
    }

    /// Update `player.velocity` / `player.can_jump` and return the candidate position
    pub fn integrate(&self, player: &mut Player, input: &InputSnapshot, dt: f32) -> Vec3 {
        let dt = self.clamp_dt(dt);
        let vel = &mut player.velocity;

        // Horizontal damping, frame-rate dependent
        let keep = (1.0 - self.damping * dt).max(0.0);
        vel.x *= keep;
        vel.z *= keep;

        // Walking, in the local frame where -z is forward
        let moves = input.moves;
        let dir = Vec2::new(
            moves.right as i32 as f32 - moves.left as i32 as f32,
            moves.forward as i32 as f32 - moves.backward as i32 as f32,
        );
        if dir.length_squared() > 0.0 {
            let dir = dir.normalize();
            if moves.forward || moves.backward {
                vel.z -= dir.y * self.acceleration * dt;
            }
            if moves.left || moves.right {
                vel.x += dir.x * self.acceleration * dt;
            }
        }

        vel.y -= self.gravity * dt;

        // Jump is an impulse, not an acceleration
        if input.jump && player.can_jump {
            vel.y += self.jump_impulse;
            player.can_jump = false;
        }

        let horizontal = Quat::from_rotation_y(player.yaw) * Vec3::new(vel.x, 0.0, vel.z);
        let mut candidate = player.position + Vec3::new(horizontal.x * dt, vel.y * dt, horizontal.z * dt);

        // World-bottom safety floor, independent of blocks
        if candidate.y < self.ground_level {
            candidate.y = self.ground_level;
            if vel.y < 0.0 {
                vel.y = 0.0;
                player.can_jump = true;
            }
        }

        candidate
    }
}

impl Default for MotionIntegrator {
    fn default() -> Self {
        Self::new(&PhysicsConfig::default())
    }
}
