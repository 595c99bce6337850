use crate::config::LookConfig;
use crate::controller::input::InputSnapshot;
use crate::model::Player;

/// Turns mouse deltas into player orientation
pub struct CameraController {
    pub mouse_sensitivity: f32,
    pub drag_factor: f32,
}

impl CameraController {
    pub fn new(config: &LookConfig) -> Self {
        Self {
            mouse_sensitivity: config.mouse_sensitivity,
            drag_factor: config.drag_factor,
        }
    }

    /// Apply this tick's look and drag deltas. Moving the mouse right or down
    /// turns right or looks down.
    pub fn apply_look(&self, player: &mut Player, input: &InputSnapshot) {
        let (lx, ly) = input.look_delta;
        let (dx, dy) = input.drag_delta;
        let drag = self.mouse_sensitivity * self.drag_factor;

        let d_yaw = -(lx * self.mouse_sensitivity + dx * drag);
        let d_pitch = -(ly * self.mouse_sensitivity + dy * drag);
        if d_yaw != 0.0 || d_pitch != 0.0 {
            player.turn(d_yaw, d_pitch);
        }
    }
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new(&LookConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::player::PI_HALF;
    use glam::Vec3;

    #[test]
    fn test_locked_look_uses_full_sensitivity() {
        let controller = CameraController::default();
        let mut player = Player::new(Vec3::ZERO);
        let input = InputSnapshot { look_delta: (100.0, 50.0), ..Default::default() };
        controller.apply_look(&mut player, &input);
        assert!((player.yaw + 0.2).abs() < 1e-6);
        assert!((player.pitch + 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_drag_look_is_damped() {
        let controller = CameraController::default();
        let mut player = Player::new(Vec3::ZERO);
        let input = InputSnapshot { drag_delta: (100.0, 0.0), ..Default::default() };
        controller.apply_look(&mut player, &input);
        assert!((player.yaw + 0.02).abs() < 1e-6);
        assert_eq!(player.pitch, 0.0);
    }

    #[test]
    fn test_pitch_never_passes_vertical() {
        let controller = CameraController::default();
        let mut player = Player::new(Vec3::ZERO);
        let input = InputSnapshot { look_delta: (0.0, -10_000.0), ..Default::default() };
        controller.apply_look(&mut player, &input);
        assert_eq!(player.pitch, PI_HALF);
    }
}
