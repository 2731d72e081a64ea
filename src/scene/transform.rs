use nalgebra::{Matrix4, Rotation3, Vector3};

/// Scale, rotation (degrees per axis) and translation of one drawn part.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub scale: Vector3<f32>,
    pub rotation_degrees: Vector3<f32>,
    pub position: Vector3<f32>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            scale: Vector3::new(1.0, 1.0, 1.0),
            rotation_degrees: Vector3::zeros(),
            position: Vector3::zeros(),
        }
    }
}

impl Transform {
    pub fn new(scale: [f32; 3], rotation_degrees: [f32; 3], position: [f32; 3]) -> Self {
        Self {
            scale: scale.into(),
            rotation_degrees: rotation_degrees.into(),
            position: position.into(),
        }
    }

    pub fn offset(mut self, by: &Vector3<f32>) -> Self {
        self.position += by;
        self
    }

    pub fn rotated(mut self, by_degrees: &Vector3<f32>) -> Self {
        self.rotation_degrees += by_degrees;
        self
    }

    pub fn to_matrix(&self) -> Matrix4<f32> {
        model_matrix(
            &self.scale,
            self.rotation_degrees.x,
            self.rotation_degrees.y,
            self.rotation_degrees.z,
            &self.position,
        )
    }
}

/// `T * Rz * Ry * Rx * S`
pub fn model_matrix(
    scale: &Vector3<f32>,
    x_rotation_degrees: f32,
    y_rotation_degrees: f32,
    z_rotation_degrees: f32,
    position: &Vector3<f32>,
) -> Matrix4<f32> {
    let scale = Matrix4::new_nonuniform_scaling(scale);
    let rotation_x = Rotation3::from_axis_angle(&Vector3::x_axis(), x_rotation_degrees.to_radians());
    let rotation_y = Rotation3::from_axis_angle(&Vector3::y_axis(), y_rotation_degrees.to_radians());
    let rotation_z = Rotation3::from_axis_angle(&Vector3::z_axis(), z_rotation_degrees.to_radians());
    let translation = Matrix4::new_translation(position);
    translation
        * (rotation_z * rotation_y * rotation_x).to_homogeneous()
        * scale
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::{Point3, Vector4};

    #[test]
    fn identity_by_default() {
        assert_relative_eq!(Transform::default().to_matrix(), Matrix4::identity());
    }

    #[test]
    fn scale_then_rotate_then_translate() {
        // unit x scaled by 2, turned 90 degrees about z, moved up by 3
        let t = Transform::new([2.0, 1.0, 1.0], [0.0, 0.0, 90.0], [0.0, 3.0, 0.0]);
        let p = t.to_matrix().transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p, Point3::new(0.0, 5.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn x_is_applied_before_y() {
        // +y -> x rotation 90 -> +z -> y rotation 90 -> +x
        let m = model_matrix(&Vector3::new(1.0, 1.0, 1.0), 90.0, 90.0, 0.0, &Vector3::zeros());
        let v = m * Vector4::new(0.0, 1.0, 0.0, 0.0);
        assert_relative_eq!(v, Vector4::new(1.0, 0.0, 0.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn offsets_accumulate() {
        let t = Transform::new([1.0; 3], [0.0, 0.0, 0.0], [1.0, 2.0, 3.0])
            .offset(&Vector3::new(-0.5, 1.4, -6.5))
            .rotated(&Vector3::new(0.0, 0.0, -7.5));
        assert_relative_eq!(t.position, Vector3::new(0.5, 3.4, -3.5), epsilon = 1e-6);
        assert_relative_eq!(t.rotation_degrees.z, -7.5);
    }
}
