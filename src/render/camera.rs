use nalgebra::*;

use crate::config::CameraConfig;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

pub const PITCH_LIMIT: f32 = 89.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Projection {
    Perspective,
    Orthographic,
}

#[derive(Clone, Debug)]
pub struct Camera {
    pub view_matrix: Matrix4<f32>,
    pub proj_matrix: Matrix4<f32>,

    pub aspect: f32,
    /// Degrees.
    pub fovy: f32,
    pub znear: f32,
    pub zfar: f32,
    pub ortho_height: f32,
    pub projection: Projection,

    pub position: Point3<f32>,
    /// Degrees around +Y, -90 looks down -Z.
    pub yaw: f32,
    /// Degrees above the horizon.
    pub pitch: f32,
    pub up: Vector3<f32>,
}

impl Default for Camera {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default(), 16.0 / 9.0)
    }
}

impl Camera {
    pub fn from_config(config: &CameraConfig, aspect: f32) -> Self {
        let mut camera = Self {
            view_matrix: Matrix4::identity(),
            proj_matrix: Matrix4::identity(),

            aspect,
            fovy: config.fovy,
            znear: config.znear,
            zfar: config.zfar,
            ortho_height: config.ortho_height,
            projection: Projection::Perspective,

            position: Point3::from(config.position),
            yaw: config.yaw,
            pitch: config.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT),
            up: Vector3::y(),
        };
        camera.calculate();
        camera
    }

    pub fn direction(&self) -> Vector3<f32> {
        let (sin_y, cos_y) = self.yaw.to_radians().sin_cos();
        let (sin_p, cos_p) = self.pitch.to_radians().sin_cos();
        Vector3::new(cos_y * cos_p, sin_p, sin_y * cos_p)
    }

    pub fn calculate_view(&mut self) {
        let target = self.position + self.direction();
        let view = Isometry3::look_at_rh(&self.position, &target, &self.up);
        self.view_matrix = view.to_homogeneous();
    }

    pub fn calculate_proj(&mut self) {
        let proj = match self.projection {
            Projection::Perspective => {
                Perspective3::new(self.aspect, self.fovy.to_radians(), self.znear, self.zfar)
                    .into_inner()
            }
            Projection::Orthographic => {
                let h = self.ortho_height;
                let w = h * self.aspect;
                Orthographic3::new(-w, w, -h, h, self.znear, self.zfar).into_inner()
            }
        };
        self.proj_matrix = OPENGL_TO_WGPU_MATRIX * proj;
    }

    pub fn calculate(&mut self) {
        self.calculate_view();
        self.calculate_proj();
    }

    pub fn set_aspect(&mut self, width: u32, height: u32) {
        if height > 0 {
            self.aspect = width as f32 / height as f32;
            self.calculate_proj();
        }
    }

    pub fn set_projection(&mut self, projection: Projection) {
        self.projection = projection;
        self.calculate_proj();
    }

    /// Moves by `local` given in camera space (x right, y up, -z forward).
    pub fn translate_local(&mut self, local: &Vector3<f32>) {
        if let Some(inv) = self.view_matrix.try_inverse() {
            self.position += inv.transform_vector(local);
        }
    }

    /// Mouse look. `dx`/`dy` in pixels, screen y grows downward.
    pub fn turn(&mut self, dx: f32, dy: f32, sensitivity: f32) {
        self.yaw += dx * sensitivity;
        self.pitch = (self.pitch - dy * sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    pub fn view_proj(&self) -> Matrix4<f32> {
        self.proj_matrix * self.view_matrix
    }
}
