//! Fixed perspective camera for the scrolling background.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3, Vec4};

/// Narrow symmetric frustum looking down -Z, with the terrain pushed a few
/// units in front of the eye so the unit-sized mesh fills the view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackgroundCamera {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
    /// Near clipping plane.
    pub near: f32,
    /// Far clipping plane.
    pub far: f32,
    /// Distance the model is pushed along -Z.
    pub distance: f32,
}

impl Default for BackgroundCamera {
    fn default() -> Self {
        Self {
            left: -0.10,
            right: 0.10,
            bottom: -0.075,
            top: 0.075,
            near: 1.0,
            far: 100.0,
            distance: 4.0,
        }
    }
}

impl BackgroundCamera {
    /// Off-center perspective projection, right-handed, depth mapped to
    /// `[0, 1]` (near -> 0, far -> 1) as wgpu expects.
    pub fn projection_matrix(&self) -> Mat4 {
        let (l, r, b, t, n, f) = (self.left, self.right, self.bottom, self.top, self.near, self.far);
        Mat4::from_cols(
            Vec4::new(2.0 * n / (r - l), 0.0, 0.0, 0.0),
            Vec4::new(0.0, 2.0 * n / (t - b), 0.0, 0.0),
            Vec4::new((r + l) / (r - l), (t + b) / (t - b), f / (n - f), -1.0),
            Vec4::new(0.0, 0.0, n * f / (n - f), 0.0),
        )
    }

    /// Identity model-view translated `distance` units along the view axis.
    pub fn model_view_matrix(&self) -> Mat4 {
        Mat4::from_translation(Vec3::new(0.0, 0.0, -self.distance))
    }
}

/// Camera uniform data for GPU.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
        }
    }

    pub fn update(&mut self, projection: Mat4, model_view: Mat4) {
        self.view_proj = (projection * model_view).to_cols_array_2d();
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}
