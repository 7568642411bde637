use glam::{Mat4, Vec3, Vec4};

/// Clip planes of an off-axis (asymmetric) perspective frustum.
///
/// `left`/`right`/`bottom`/`top` are measured on the near plane; `near` and
/// `far` are positive distances along the view direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frustum {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Frustum {
    fn default() -> Self {
        Self {
            left: -0.1,
            right: 0.1,
            bottom: -0.1,
            top: 0.1,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl Frustum {
    pub fn new(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Self {
        Self {
            left,
            right,
            bottom,
            top,
            near,
            far,
        }
    }

    /// Builds the OpenGL-style projection matrix for this frustum.
    ///
    /// The result is column-major with clip-space depth in `[-1, 1]`:
    ///
    /// ```text
    /// | 2n/(r-l)    0       (r+l)/(r-l)      0       |
    /// |    0     2n/(t-b)   (t+b)/(t-b)      0       |
    /// |    0        0      -(f+n)/(f-n)  -2fn/(f-n)  |
    /// |    0        0          -1            0       |
    /// ```
    pub fn matrix(&self) -> Mat4 {
        let Self {
            left: l,
            right: r,
            bottom: b,
            top: t,
            near: n,
            far: f,
        } = *self;

        Mat4::from_cols(
            Vec4::new(2.0 * n / (r - l), 0.0, 0.0, 0.0),
            Vec4::new(0.0, 2.0 * n / (t - b), 0.0, 0.0),
            Vec4::new((r + l) / (r - l), (t + b) / (t - b), -(f + n) / (f - n), -1.0),
            Vec4::new(0.0, 0.0, -2.0 * f * n / (f - n), 0.0),
        )
    }
}

/// A fixed camera: eye position, look-at target, up vector, and projection frustum.
///
/// There is no interactive control; the values are set once and the view and
/// projection matrices are derived from them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraState {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub frustum: Frustum,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            eye: Vec3::ZERO,
            target: Vec3::NEG_Z,
            up: Vec3::Y,
            frustum: Frustum::default(),
        }
    }
}

impl CameraState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(mut self, eye: Vec3) -> Self {
        self.eye = eye;
        self
    }

    pub fn looking_at(mut self, target: Vec3) -> Self {
        self.target = target;
        self
    }

    pub fn with_up(mut self, up: Vec3) -> Self {
        self.up = up;
        self
    }

    pub fn with_frustum(mut self, frustum: Frustum) -> Self {
        self.frustum = frustum;
        self
    }

    /// Right-handed look-at view matrix (world to camera space).
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    /// Off-axis perspective projection from the frustum planes.
    pub fn projection_matrix(&self) -> Mat4 {
        self.frustum.matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-6;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() <= EPSILON * a.abs().max(b.abs()).max(1.0)
    }

    #[test]
    fn default_frustum_entries_match_formula() {
        let (l, r, b, t, n, f) = (-0.1f32, 0.1f32, -0.1f32, 0.1f32, 0.1f32, 1000.0f32);
        let m = Frustum::default().matrix().to_cols_array_2d();

        assert!(close(m[0][0], 2.0 * n / (r - l)));
        assert!(close(m[1][1], 2.0 * n / (t - b)));
        assert!(close(m[2][0], (r + l) / (r - l)));
        assert!(close(m[2][1], (t + b) / (t - b)));
        assert!(close(m[2][2], -(f + n) / (f - n)));
        assert_eq!(m[2][3], -1.0);
        assert!(close(m[3][2], -2.0 * f * n / (f - n)));

        // Symmetric frustum: the off-axis terms are zero
        assert!(close(m[0][0], 1.0));
        assert!(close(m[1][1], 1.0));
        assert_eq!(m[2][0], 0.0);
        assert_eq!(m[2][1], 0.0);
    }

    #[test]
    fn remaining_entries_are_zero() {
        let m = Frustum::default().matrix().to_cols_array_2d();
        let non_zero = [(0, 0), (1, 1), (2, 0), (2, 1), (2, 2), (2, 3), (3, 2)];

        for col in 0..4 {
            for row in 0..4 {
                if !non_zero.contains(&(col, row)) {
                    assert_eq!(m[col][row], 0.0, "entry [{col}][{row}]");
                }
            }
        }
    }

    #[test]
    fn off_axis_frustum_shifts_center() {
        let frustum = Frustum::new(-0.1, 0.3, -0.2, 0.2, 0.5, 50.0);
        let m = frustum.matrix().to_cols_array_2d();

        assert!(close(m[0][0], 2.5));
        assert!(close(m[1][1], 2.5));
        assert!(close(m[2][0], 0.5));
        assert!(close(m[2][1], 0.0));
    }

    #[test]
    fn near_and_far_planes_map_to_clip_bounds() {
        let proj = Frustum::default().matrix();

        let near = proj * Vec4::new(0.0, 0.0, -0.1, 1.0);
        let far = proj * Vec4::new(0.0, 0.0, -1000.0, 1.0);

        assert!((near.z / near.w + 1.0).abs() < 1e-4);
        assert!((far.z / far.w - 1.0).abs() < 1e-4);
    }

    #[test]
    fn default_view_is_identity() {
        let view = CameraState::default().view_matrix();
        assert!(view.abs_diff_eq(Mat4::IDENTITY, EPSILON));
    }

    #[test]
    fn view_moves_eye_to_origin() {
        let camera = CameraState::new()
            .at(Vec3::new(0.0, 0.0, 5.0))
            .looking_at(Vec3::ZERO);
        let eye_in_view = camera.view_matrix().transform_point3(camera.eye);
        let target_in_view = camera.view_matrix().transform_point3(camera.target);

        assert!(eye_in_view.abs_diff_eq(Vec3::ZERO, 1e-5));
        assert!(target_in_view.abs_diff_eq(Vec3::new(0.0, 0.0, -5.0), 1e-5));
    }

    #[test]
    fn up_vector_and_frustum_feed_the_matrices() {
        let frustum = Frustum::new(-0.1, 0.3, -0.2, 0.2, 0.5, 50.0);
        let camera = CameraState::new().with_up(Vec3::X).with_frustum(frustum);

        assert_eq!(camera.projection_matrix(), frustum.matrix());
        // With +X as up, world +X maps to view +Y
        let up_in_view = camera.view_matrix().transform_vector3(Vec3::X);
        assert!(up_in_view.abs_diff_eq(Vec3::Y, 1e-5));
    }
}
