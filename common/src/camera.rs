//! Orbital camera for 3D height-field scenes

use glam::{Mat4, Vec3};

/// 3D perspective camera with orbital controls.
///
/// The world is Z-up: surfaces lie in the XY plane and heights grow along +Z.
#[derive(Debug, Clone)]
pub struct Camera3D {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
    // Orbital parameters
    pub distance: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Camera3D {
    pub fn new(aspect_ratio: f32) -> Self {
        Self::looking_at(Vec3::new(2.0, 2.0, 2.0), Vec3::ZERO, aspect_ratio)
    }

    /// Place the camera at `position`, orbiting around `target`.
    pub fn looking_at(position: Vec3, target: Vec3, aspect_ratio: f32) -> Self {
        let offset = position - target;
        let distance = offset.length().max(f32::EPSILON);
        let pitch = (offset.z / distance).clamp(-1.0, 1.0).asin();
        let yaw = offset.y.atan2(offset.x);

        let mut camera = Self {
            position,
            target,
            up: Vec3::Z,
            fov: 75.0f32.to_radians(),
            aspect_ratio,
            near: 0.1,
            far: 1000.0,
            distance,
            yaw,
            pitch,
            min_distance: 0.5,
            max_distance: 100.0,
        };
        camera.update_orbital();
        camera
    }

    /// Update camera position based on orbital parameters
    pub fn update_orbital(&mut self) {
        self.position = self.target
            + Vec3::new(
                self.distance * self.pitch.cos() * self.yaw.cos(),
                self.distance * self.pitch.cos() * self.yaw.sin(),
                self.distance * self.pitch.sin(),
            );
    }

    /// Restrict the orbit distance, pulling the camera inside the range if needed.
    pub fn set_distance_limits(&mut self, min: f32, max: f32) {
        self.min_distance = min;
        self.max_distance = max.max(min);
        self.distance = self.distance.clamp(self.min_distance, self.max_distance);
        self.update_orbital();
    }

    /// Orbit the camera around the target
    pub fn orbit(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.yaw += delta_yaw;
        self.pitch = (self.pitch + delta_pitch).clamp(-1.5, 1.5);
        self.update_orbital();
    }

    /// Zoom in/out
    pub fn zoom(&mut self, delta: f32) {
        self.distance = (self.distance - delta).clamp(self.min_distance, self.max_distance);
        self.update_orbital();
    }

    /// Get the view matrix
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// Get the projection matrix
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect_ratio, self.near, self.far)
    }

    /// Get the combined view-projection matrix
    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn update_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
    }
}

/// Camera uniform data for shaders
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub position: [f32; 4],
}

impl CameraUniform {
    pub fn from_camera_3d(camera: &Camera3D) -> Self {
        Self {
            view_proj: camera.view_projection().to_cols_array_2d(),
            position: [camera.position.x, camera.position.y, camera.position.z, 1.0],
        }
    }
}
