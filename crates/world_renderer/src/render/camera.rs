//! Per-frame camera description

use crate::foundation::math::{Mat4, Point3, Quat, Vec3};

/// How the camera relates to the player's avatar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CameraMode {
    /// Looking out of the avatar's eyes; the avatar itself is not drawn
    FirstPerson,
    /// Orbiting behind the avatar
    #[default]
    Chase,
    /// Detached from the avatar
    Free,
}

/// Camera state the scene pipeline needs for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraView {
    /// World to eye transform
    pub view: Mat4,
    /// Eye to clip transform
    pub projection: Mat4,
    /// World to eye rotation, used to turn billboards toward the viewer
    pub orientation: Quat,
    /// Camera mode
    pub mode: CameraMode,
}

impl CameraView {
    /// Create a camera view from its matrices
    pub fn new(view: Mat4, projection: Mat4, orientation: Quat, mode: CameraMode) -> Self {
        Self { view, projection, orientation, mode }
    }

    /// Squared distance from the eye to a world position
    pub fn distance_sq(&self, position: &Point3) -> f32 {
        let eye = self.view.transform_point(position);
        eye.coords.magnitude_squared()
    }

    /// The heading (rotation about +Z) part of the camera orientation
    pub fn yaw_rotation(&self) -> Quat {
        let (_, _, yaw) = self.orientation.euler_angles();
        Quat::from_axis_angle(&Vec3::z_axis(), yaw)
    }
}

impl Default for CameraView {
    fn default() -> Self {
        Self {
            view: Mat4::identity(),
            projection: Mat4::identity(),
            orientation: Quat::identity(),
            mode: CameraMode::default(),
        }
    }
}
