use glam::{EulerRot, Quat, Vec3};

pub const PI_HALF: f32 = std::f32::consts::FRAC_PI_2;

/// The first-person body. `position` is the eye point; the collision box hangs below it.
#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub position: Vec3,
    /// x/z are in the player's local frame (-z forward), y is world up
    pub velocity: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub can_jump: bool,
}

impl Player {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
            can_jump: false,
        }
    }

    /// Turn by the given angles, keeping pitch within straight up/down
    pub fn turn(&mut self, d_yaw: f32, d_pitch: f32) {
        self.yaw += d_yaw;
        self.pitch = (self.pitch + d_pitch).clamp(-PI_HALF, PI_HALF);
    }

    pub fn orientation(&self) -> Quat {
        orientation(self.yaw, self.pitch)
    }

    /// Unit vector through the centre of the view
    pub fn look_direction(&self) -> Vec3 {
        self.orientation() * Vec3::NEG_Z
    }
}

/// Yaw about +y then pitch about the rotated x axis
pub fn orientation(yaw: f32, pitch: f32) -> Quat {
    Quat::from_euler(EulerRot::YXZ, yaw, pitch, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn test_look_direction() {
        let mut p = Player::new(Vec3::ZERO);
        assert!(close(p.look_direction(), Vec3::NEG_Z));

        p.yaw = PI_HALF;
        assert!(close(p.look_direction(), Vec3::NEG_X));

        p.yaw = 0.0;
        p.pitch = -PI_HALF;
        assert!(close(p.look_direction(), Vec3::NEG_Y));
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut p = Player::new(Vec3::ZERO);
        p.turn(0.3, 10.0);
        assert_eq!(p.pitch, PI_HALF);
        p.turn(0.0, -20.0);
        assert_eq!(p.pitch, -PI_HALF);
        assert!((p.yaw - 0.3).abs() < 1e-6);
    }
}
