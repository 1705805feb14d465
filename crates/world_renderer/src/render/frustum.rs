//! View frustum extraction and sphere culling
//!
//! The frustum is computed once per frame from the camera's projection and
//! view matrices and is read-only for the rest of the frame.

use crate::foundation::math::{AxisBox, Mat4, Point3, Vec3, Vec4};

/// Radius used for entities that report no bounding box
const DEFAULT_CULL_RADIUS: f32 = 1.0;

/// Plane defined by a unit normal and a distance from the origin.
/// Points with a positive signed distance are on the inner side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Normal vector (normalized)
    pub normal: Vec3,
    /// Distance from origin along the normal
    pub distance: f32,
}

impl Plane {
    /// Create a new plane from normal and distance
    pub fn new(normal: Vec3, distance: f32) -> Self {
        let length = normal.magnitude();
        if length > f32::EPSILON {
            Self { normal: normal / length, distance: distance / length }
        } else {
            Self { normal, distance }
        }
    }

    /// Build a plane from `ax + by + cz + d` coefficients, normalizing them
    pub fn from_coefficients(coefficients: Vec4) -> Self {
        Self::new(coefficients.xyz(), coefficients.w)
    }

    /// Calculate signed distance from plane to point
    pub fn distance_to_point(&self, point: &Point3) -> f32 {
        self.normal.dot(&point.coords) + self.distance
    }
}

/// Six inward-facing planes: left, right, bottom, top, near, far
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    /// The frustum planes
    pub planes: [Plane; 6],
}

impl Frustum {
    /// Create a frustum from six planes
    pub fn new(planes: [Plane; 6]) -> Self {
        Self { planes }
    }

    /// Whether a sphere is at least partly on the inner side of every plane
    pub fn contains_sphere(&self, center: &Point3, radius: f32) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.distance_to_point(center) >= -radius)
    }
}

/// Extract the frustum planes from the projection and view matrices.
///
/// Uses the Gribb-Hartmann method on the combined clip matrix: each plane is
/// the fourth row plus or minus one of the first three, normalized.
pub fn compute_frustum(projection: &Mat4, view: &Mat4) -> Frustum {
    let clip = projection * view;
    let row = |i: usize| -> Vec4 { clip.row(i).transpose() };
    let (r0, r1, r2, r3) = (row(0), row(1), row(2), row(3));

    Frustum::new([
        Plane::from_coefficients(r3 + r0),
        Plane::from_coefficients(r3 - r0),
        Plane::from_coefficients(r3 + r1),
        Plane::from_coefficients(r3 - r1),
        Plane::from_coefficients(r3 + r2),
        Plane::from_coefficients(r3 - r2),
    ])
}

/// Test an entity's bounds against the frustum.
///
/// The box is approximated by the smallest sphere about the entity origin
/// that encloses it, centred on the entity's world position. This may keep
/// objects near a frustum corner but never culls one that is inside.
pub fn sphere_in_frustum(frustum: &Frustum, bbox: Option<&AxisBox>, position: &Point3) -> bool {
    let radius = bbox.map_or(DEFAULT_CULL_RADIUS, AxisBox::radius_about_origin);
    frustum.contains_sphere(position, radius)
}
