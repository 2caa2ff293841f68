//! First-person camera consumed by the frame renderer.

use glam::{Mat3, Mat4, Quat, Vec3};

const PITCH_LIMIT_DEGREES: f32 = 89.0;

/// What the renderer needs to know about the viewer each frame.
pub trait CameraView {
    fn view_matrix(&self) -> Mat4;
    fn eye_position(&self) -> Vec3;
    /// Unit vector the camera looks along.
    fn view_direction(&self) -> Vec3;
}

/// Drops the translation of a view matrix so the skybox stays centred on the eye.
pub fn rotation_only(view: Mat4) -> Mat4 {
    Mat4::from_mat3(Mat3::from_mat4(view))
}

/// Free-flying camera with yaw about +Y and clamped pitch.
#[derive(Clone, Debug, PartialEq)]
pub struct FlyCamera {
    eye: Vec3,
    yaw: f32,
    pitch: f32,
    /// Radians per pixel of mouse motion.
    sensitivity: f32,
}

impl FlyCamera {
    /// Looks down -Z from `eye`; `degrees_per_pixel` scales mouse look.
    pub fn new(eye: Vec3, degrees_per_pixel: f32) -> Self {
        Self {
            eye,
            yaw: 0.0,
            pitch: 0.0,
            sensitivity: degrees_per_pixel.to_radians(),
        }
    }

    fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw) * Quat::from_rotation_x(self.pitch)
    }

    fn right(&self) -> Vec3 {
        Quat::from_rotation_y(self.yaw) * Vec3::X
    }

    /// Positive `dx` turns right, positive `dy` (mouse moving down) looks down.
    pub fn mouse_look(&mut self, dx: f32, dy: f32) {
        let limit = PITCH_LIMIT_DEGREES.to_radians();
        self.yaw -= dx * self.sensitivity;
        self.pitch = (self.pitch - dy * self.sensitivity).clamp(-limit, limit);
    }

    pub fn move_forward(&mut self, speed: f32) {
        self.eye += self.view_direction() * speed;
    }

    pub fn move_backward(&mut self, speed: f32) {
        self.eye -= self.view_direction() * speed;
    }

    pub fn move_left(&mut self, speed: f32) {
        self.eye -= self.right() * speed;
    }

    pub fn move_right(&mut self, speed: f32) {
        self.eye += self.right() * speed;
    }
}

impl Default for FlyCamera {
    fn default() -> Self {
        Self::new(Vec3::ZERO, 0.1)
    }
}

impl CameraView for FlyCamera {
    fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.eye + self.view_direction(), Vec3::Y)
    }

    fn eye_position(&self) -> Vec3 {
        self.eye
    }

    fn view_direction(&self) -> Vec3 {
        self.rotation() * Vec3::NEG_Z
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn starts_looking_down_negative_z() {
        let camera = FlyCamera::new(Vec3::new(0.0, 20.0, 0.0), 0.1);
        assert!(close(camera.view_direction(), Vec3::NEG_Z));
        assert_eq!(camera.eye_position(), Vec3::new(0.0, 20.0, 0.0));
    }

    #[test]
    fn strafing_stays_horizontal_while_pitched() {
        let mut camera = FlyCamera::new(Vec3::ZERO, 1.0);
        camera.mouse_look(0.0, 30.0);
        camera.move_right(2.0);
        assert!(close(camera.eye_position(), Vec3::new(2.0, 0.0, 0.0)));
        camera.move_left(2.0);
        assert!(close(camera.eye_position(), Vec3::ZERO));
    }

    #[test]
    fn turning_right_looks_toward_positive_x() {
        let mut camera = FlyCamera::new(Vec3::ZERO, 1.0);
        camera.mouse_look(90.0, 0.0);
        assert!(close(camera.view_direction(), Vec3::X));
        camera.move_forward(3.0);
        assert!(close(camera.eye_position(), Vec3::new(3.0, 0.0, 0.0)));
    }

    #[test]
    fn pitch_is_clamped_short_of_the_pole() {
        let mut camera = FlyCamera::new(Vec3::ZERO, 1.0);
        camera.mouse_look(0.0, -500.0);
        let direction = camera.view_direction();
        assert!(direction.y < 1.0);
        assert!(direction.y > 0.99);
    }

    #[test]
    fn rotation_only_view_drops_translation() {
        let camera = FlyCamera::new(Vec3::new(5.0, 20.0, -3.0), 0.1);
        let sky = rotation_only(camera.view_matrix());
        assert_eq!(sky.w_axis, glam::Vec4::W);
        assert!(close(sky.transform_point3(Vec3::ZERO), Vec3::ZERO));
    }
}
