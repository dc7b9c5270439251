//! Perspective camera
//!
//! Position/target/up with a standard perspective projection. Matrices come
//! from nalgebra-glm: column-major, right-handed, OpenGL-style NDC with z in
//! [-1, 1]. The camera looks down its local -Z axis.

use nalgebra_glm as glm;

const DRAG_SPEED: f32 = 0.02;

pub struct Camera {
    position: glm::Vec3,
    target: glm::Vec3,
    up: glm::Vec3,
    fov_y: f32,
    aspect: f32,
    near: f32,
    far: f32,
}

impl Camera {
    pub fn new() -> Self {
        Self {
            position: glm::vec3(0.0, 0.0, 1.0),
            target: glm::vec3(0.0, 0.0, 0.0),
            up: glm::vec3(0.0, 1.0, 0.0),
            fov_y: std::f32::consts::PI / 3.0,
            aspect: 1.0,
            near: 0.1,
            far: 1000.0,
        }
    }

    /// Place the camera. Asserts a non-degenerate view direction.
    pub fn set_transform(&mut self, position: glm::Vec3, target: glm::Vec3) {
        assert!(glm::length(&(target - position)) > 1e-6);
        self.position = position;
        self.target = target;
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    pub fn set_fov(&mut self, fov_y: f32) {
        self.fov_y = fov_y;
    }

    pub fn set_near(&mut self, near: f32) {
        self.near = near;
    }

    pub fn set_far(&mut self, far: f32) {
        self.far = far;
    }

    pub fn set_up(&mut self, up: glm::Vec3) {
        self.up = up;
    }

    pub fn position(&self) -> glm::Vec3 {
        self.position
    }

    pub fn target(&self) -> glm::Vec3 {
        self.target
    }

    pub fn forward(&self) -> glm::Vec3 {
        glm::normalize(&(self.target - self.position))
    }

    pub fn fov(&self) -> f32 {
        self.fov_y
    }

    pub fn near(&self) -> f32 {
        self.near
    }

    pub fn view_matrix(&self) -> glm::Mat4 {
        glm::look_at(&self.position, &self.target, &self.up)
    }

    pub fn projection_matrix(&self) -> glm::Mat4 {
        glm::perspective(self.aspect, self.fov_y, self.near, self.far)
    }

    /// Orbit the camera around its target from a mouse drag
    pub fn rotate_by_drag(&mut self, delta_x: f32, delta_y: f32) {
        let mut dir = self.position - self.target;
        let y_axis = -glm::normalize(&glm::cross(&dir, &self.up));
        let x_axis = glm::normalize(&glm::cross(&y_axis, &dir));
        self.up = -x_axis;

        if delta_x.abs() > 1e-6 {
            dir = glm::rotate_vec3(&dir, delta_x * DRAG_SPEED, &x_axis);
        }
        if delta_y.abs() > 1e-6 {
            dir = glm::rotate_vec3(&dir, delta_y * DRAG_SPEED, &y_axis);
        }

        self.position = self.target + dir;
    }

    /// Move along the view direction, keeping a minimum standoff
    pub fn dolly(&mut self, delta: f32) {
        let dir = self.position - self.target;
        let dist = glm::length(&dir);
        let new_dist = (dist + delta).max(self.near * 2.0);
        self.position = self.target + dir * (new_dist / dist);
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
