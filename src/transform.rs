//! Per-frame transform pipeline: model, view, projection and normal matrices.
//!
//! [`SceneParams`] holds the fixed inputs (model placement, camera, light) and
//! [`TransformState::compute`] turns them into the four matrices the Phong
//! shader consumes.
//!
//! ```
//! use phong_sphere::{SceneParams, TransformState};
//!
//! let state = TransformState::compute(&SceneParams::default());
//! assert_eq!(state.projection.col(2).w, -1.0);
//! ```

use crate::camera::CameraState;
use glam::{Mat4, Vec3};

/// Where the sphere sits in the world: a translation applied after a uniform scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModelPlacement {
    pub translation: Vec3,
    pub scale: f32,
}

impl Default for ModelPlacement {
    fn default() -> Self {
        Self {
            translation: Vec3::new(0.0, 0.0, -7.0),
            scale: 2.0,
        }
    }
}

impl ModelPlacement {
    /// `translate(translation) * scale(scale)`.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_translation(self.translation) * Mat4::from_scale(Vec3::splat(self.scale))
    }
}

/// Point light and viewer parameters uploaded alongside the matrices.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightState {
    pub light_pos: Vec3,
    /// World-space viewer position used for the specular term.
    pub view_pos: Vec3,
    pub light_color: Vec3,
}

impl Default for LightState {
    fn default() -> Self {
        Self {
            light_pos: Vec3::new(-4.0, 4.0, -3.0),
            view_pos: Vec3::ZERO,
            light_color: Vec3::ONE,
        }
    }
}

/// All fixed inputs of a frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SceneParams {
    pub model: ModelPlacement,
    pub camera: CameraState,
    pub light: LightState,
}

/// Inverse-transpose of `model`, used to carry normals through non-uniform scale.
///
/// `model` must be invertible.
pub fn normal_matrix(model: Mat4) -> Mat4 {
    model.inverse().transpose()
}

/// Matrices derived from [`SceneParams`] for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformState {
    pub modeling: Mat4,
    pub camera: Mat4,
    pub projection: Mat4,
    pub modeling_inv_tr: Mat4,
}

impl TransformState {
    pub fn compute(scene: &SceneParams) -> Self {
        let modeling = scene.model.matrix();

        Self {
            modeling,
            camera: scene.camera.view_matrix(),
            projection: scene.camera.projection_matrix(),
            modeling_inv_tr: normal_matrix(modeling),
        }
    }
}
