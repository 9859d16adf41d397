use glam::{Mat3, Mat4, Vec3};

/// Yaw/pitch rotation, uniform scale and a position. Scene nodes and the
/// camera are both placed with one of these.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub yaw: f32,
    pub pitch: f32,
    pub scale: f32,
    pub position: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self { yaw: 0.0, pitch: 0.0, scale: 1.0, position: Vec3::ZERO }
    }
}

fn transform_vector(ihat: Vec3, jhat: Vec3, khat: Vec3, v: Vec3) -> Vec3 {
    ihat * v.x + jhat * v.y + khat * v.z
}

impl Transform {
    pub fn new(yaw: f32, pitch: f32, position: Vec3) -> Self {
        Self { yaw, pitch, scale: 1.0, position }
    }

    /// Rotated unit axes: yaw about Y applied after pitch about X.
    pub fn get_basis_vectors(&self) -> (Vec3, Vec3, Vec3) {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        let ihat_yaw = Vec3::new(cos_yaw, 0.0, sin_yaw);
        let jhat_yaw = Vec3::Y;
        let khat_yaw = Vec3::new(-sin_yaw, 0.0, cos_yaw);
        let ihat_pitch = Vec3::X;
        let jhat_pitch = Vec3::new(0.0, cos_pitch, -sin_pitch);
        let khat_pitch = Vec3::new(0.0, sin_pitch, cos_pitch);
        let ihat = transform_vector(ihat_yaw, jhat_yaw, khat_yaw, ihat_pitch);
        let jhat = transform_vector(ihat_yaw, jhat_yaw, khat_yaw, jhat_pitch);
        let khat = transform_vector(ihat_yaw, jhat_yaw, khat_yaw, khat_pitch);
        (ihat, jhat, khat)
    }

    /// Local-to-parent matrix.
    pub fn to_matrix(&self) -> Mat4 {
        let (ihat, jhat, khat) = self.get_basis_vectors();
        Mat4::from_cols(
            (ihat * self.scale).extend(0.0),
            (jhat * self.scale).extend(0.0),
            (khat * self.scale).extend(0.0),
            self.position.extend(1.0),
        )
    }

    /// Parent-to-local matrix for an unscaled transform; the rotation is
    /// orthonormal so its inverse is the transpose.
    pub fn to_local_matrix(&self) -> Mat4 {
        let (ihat, jhat, khat) = self.get_basis_vectors();
        let inv_rotation = Mat3::from_cols(ihat, jhat, khat).transpose();
        Mat4::from_mat3(inv_rotation) * Mat4::from_translation(-self.position)
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn matrix_is_translate_yaw_pitch_scale() {
        let t = Transform { yaw: 0.7, pitch: -0.3, scale: 2.0, position: Vec3::new(1.0, 2.0, 3.0) };
        let expected = Mat4::from_translation(t.position)
            * Mat4::from_rotation_y(-t.yaw)
            * Mat4::from_rotation_x(-t.pitch)
            * Mat4::from_scale(Vec3::splat(t.scale));
        assert!(t.to_matrix().abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn local_matrix_inverts_unscaled_transform() {
        let t = Transform::new(1.1, 0.4, Vec3::new(-3.0, 0.5, 9.0));
        let p = Vec3::new(2.0, -1.0, 0.5);
        let round = t.to_local_matrix().transform_point3(t.to_matrix().transform_point3(p));
        assert_relative_eq!(round.x, p.x, epsilon = 1e-4);
        assert_relative_eq!(round.y, p.y, epsilon = 1e-4);
        assert_relative_eq!(round.z, p.z, epsilon = 1e-4);
    }

    #[test]
    fn identity_by_default() {
        assert_eq!(Transform::default().to_matrix(), Mat4::IDENTITY);
    }
}
