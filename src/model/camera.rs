use glam::{Mat4, Vec3};

use super::player::{orientation, Player};

pub struct Camera {
    pub eye: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub fov_y: f32,
    pub aspect: f32,
    pub z_near: f32,
    pub z_far: f32,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            eye: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
            fov_y: 75f32.to_radians(),
            aspect: width as f32 / height.max(1) as f32,
            z_near: 0.1,
            z_far: 1000.0,
        }
    }

    /// Take the player's eye point and orientation as the camera pose
    pub fn sync_from_player(&mut self, player: &Player) {
        self.eye = player.position;
        self.yaw = player.yaw;
        self.pitch = player.pitch;
    }

    pub fn forward(&self) -> Vec3 {
        orientation(self.yaw, self.pitch) * Vec3::NEG_Z
    }

    pub fn set_aspect(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    // built from the rotation directly so looking straight up or down stays well defined
    pub fn view(&self) -> Mat4 {
        Mat4::from_rotation_translation(orientation(self.yaw, self.pitch), self.eye).inverse()
    }

    pub fn view_proj(&self) -> Mat4 {
        let proj = Mat4::perspective_rh(self.fov_y, self.aspect, self.z_near, self.z_far);
        proj * self.view()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_maps_forward_to_negative_z() {
        let mut cam = Camera::new(800, 600);
        let mut player = Player::new(Vec3::new(1.0, 3.0, -2.0));
        player.yaw = 0.7;
        player.pitch = -0.4;
        cam.sync_from_player(&player);

        let ahead = cam.eye + cam.forward() * 5.0;
        let in_view = cam.view().transform_point3(ahead);
        assert!(in_view.x.abs() < 1e-4 && in_view.y.abs() < 1e-4);
        assert!((in_view.z + 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_aspect_survives_zero_height() {
        let mut cam = Camera::new(800, 600);
        cam.set_aspect(640, 0);
        assert!(cam.aspect.is_finite());
    }
}
