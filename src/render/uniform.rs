//! CPU mirrors of the WGSL uniform blocks in `shader/scene.wgsl`.
//! Every member is a `vec4` or `mat4x4` so the std140-style layout needs
//! no padding fields.

use nalgebra::{Matrix4, Vector3};

use crate::scene::{draw::ShaderState, lights::LightRig};

use super::camera::Camera;

#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointLightUniform {
    /// `w` is 1.0 for an active light.
    pub position: [f32; 4],
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameUniform {
    pub view: [[f32; 4]; 4],
    pub proj: [[f32; 4]; 4],
    pub view_position: [f32; 4],
    pub lights: [PointLightUniform; 4],
    /// `x`: lighting enabled.
    pub flags: [u32; 4],
}

fn vec4(v: &Vector3<f32>, w: f32) -> [f32; 4] {
    [v.x, v.y, v.z, w]
}

impl FrameUniform {
    pub fn new(camera: &Camera, rig: &LightRig) -> Self {
        let mut lights = [PointLightUniform::default(); 4];
        for (dst, light) in lights.iter_mut().zip(rig.lights.iter()) {
            *dst = PointLightUniform {
                position: vec4(&light.position, if light.active { 1.0 } else { 0.0 }),
                ambient: vec4(&light.ambient, 0.0),
                diffuse: vec4(&light.diffuse, 0.0),
                specular: vec4(&light.specular, 0.0),
            };
        }
        Self {
            view: camera.view_matrix.into(),
            proj: camera.proj_matrix.into(),
            view_position: vec4(&camera.position.coords, 1.0),
            lights,
            flags: [rig.use_lighting as u32, 0, 0, 0],
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    /// Inverse transpose of `model`; the shader uses its upper 3x3.
    pub normal_matrix: [[f32; 4]; 4],
    pub color: [f32; 4],
    /// `w` is the shininess.
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
    /// `xy` scale, `z` is 1.0 when the draw samples its texture.
    pub uv_scale: [f32; 4],
}

impl ObjectUniform {
    pub fn from_state(state: &ShaderState) -> Self {
        let normal_matrix = state
            .model
            .try_inverse()
            .map(|m| m.transpose())
            .unwrap_or_else(Matrix4::identity);
        let textured = if state.texture_slot.is_some() { 1.0 } else { 0.0 };
        Self {
            model: state.model.into(),
            normal_matrix: normal_matrix.into(),
            color: state.color.into(),
            diffuse: vec4(&state.material.diffuse_color, state.material.shininess),
            specular: vec4(&state.material.specular_color, 0.0),
            uv_scale: [state.uv_scale.x, state.uv_scale.y, textured, 0.0],
        }
    }
}
