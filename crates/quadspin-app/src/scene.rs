//! Camera and model transforms for one frame.

use glam::{Mat4, Vec3};
use quadspin_engine::coords::Viewport;

use crate::animation::AnimationState;

pub const EYE: Vec3 = Vec3::new(0.0, 0.0, 5.0);
pub const FOV_Y_DEGREES: f32 = 60.0;
pub const Z_NEAR: f32 = 0.1;
pub const Z_FAR: f32 = 100.0;

/// Fixed camera at `EYE` looking at the origin, +Y up.
pub fn view_matrix() -> Mat4 {
    Mat4::look_at_rh(EYE, Vec3::ZERO, Vec3::Y)
}

/// Perspective projection for the current viewport (wgpu depth range `[0, 1]`).
pub fn projection_matrix(viewport: Viewport) -> Mat4 {
    Mat4::perspective_rh(
        FOV_Y_DEGREES.to_radians(),
        viewport.aspect_ratio(),
        Z_NEAR,
        Z_FAR,
    )
}

/// Uniform scale followed by a rotation about +Y.
///
/// Column-vector convention: the rightmost factor applies to the point first.
pub fn model_matrix(anim: &AnimationState) -> Mat4 {
    Mat4::from_rotation_y(anim.rotation) * Mat4::from_scale(Vec3::splat(anim.scale))
}

/// The three matrices uploaded for a frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transforms {
    pub model: Mat4,
    pub view: Mat4,
    pub proj: Mat4,
}

impl Transforms {
    pub fn for_frame(anim: &AnimationState, viewport: Viewport) -> Self {
        Self {
            model: model_matrix(anim),
            view: view_matrix(),
            proj: projection_matrix(viewport),
        }
    }

    /// `proj * view * model`, the product the vertex shader computes.
    pub fn clip_from_local(&self) -> Mat4 {
        self.proj * self.view * self.model
    }
}
