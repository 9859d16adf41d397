use glam::Mat4;

use crate::transform::Transform;

/// View and projection handed to the rasterizer once per frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraMatrices {
    pub view: Mat4,
    pub projection: Mat4,
}

impl CameraMatrices {
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }
}

pub struct Camera {
    /// Vertical field of view in radians.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub transform: Transform,
}

impl Camera {
    pub fn new(fov: f32, near: f32, far: f32, transform: Transform) -> Self {
        Self { fov, near, far, transform }
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.transform.to_local_matrix()
    }

    /// Right-handed perspective with depth mapped to [0, 1].
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        // Clamp fov so the projection can't flip inside-out
        let fov = self.fov.clamp(1.0_f32.to_radians(), 170.0_f32.to_radians());
        Mat4::perspective_rh(fov, aspect, self.near, self.far)
    }

    pub fn matrices(&self, aspect: f32) -> CameraMatrices {
        CameraMatrices { view: self.view_matrix(), projection: self.projection_matrix(aspect) }
    }
}
