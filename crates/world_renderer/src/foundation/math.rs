//! Math utilities and types
//!
//! Provides the math types used by the scene pipeline. World space is Z-up:
//! terrain lies in the XY plane and "vertical" rotations are about +Z.

pub use nalgebra::{
    Vector3, Vector4,
    Matrix4,
    Quaternion,
    Unit,
};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Position and orientation pair, e.g. the pose of a named anchor on a model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PosAndOrient {
    /// Position relative to the owning model
    pub position: Point3,
    /// Orientation relative to the owning model
    pub orientation: Quat,
}

impl Default for PosAndOrient {
    fn default() -> Self {
        Self {
            position: Point3::origin(),
            orientation: Quat::identity(),
        }
    }
}

/// Axis-aligned bounding box, expressed relative to the entity origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisBox {
    /// Minimum corner
    pub low: Vec3,
    /// Maximum corner
    pub high: Vec3,
}

impl AxisBox {
    /// Create a box from two opposite corners in any order
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            low: a.inf(&b),
            high: a.sup(&b),
        }
    }

    /// A box is valid when every coordinate is finite and it has some volume
    pub fn is_valid(&self) -> bool {
        let finite = self.low.iter().chain(self.high.iter()).all(|v| v.is_finite());
        finite && self.high.x >= self.low.x && self.high.y >= self.low.y && self.high.z >= self.low.z
            && self.extents() != Vec3::zeros()
    }

    /// Size of the box along each axis
    pub fn extents(&self) -> Vec3 {
        self.high - self.low
    }

    /// Radius of the smallest origin-centred sphere that contains the whole box
    pub fn radius_about_origin(&self) -> f32 {
        let far = Vec3::new(
            self.low.x.abs().max(self.high.x.abs()),
            self.low.y.abs().max(self.high.y.abs()),
            self.low.z.abs().max(self.high.z.abs()),
        );
        far.magnitude()
    }
}

/// Math utility functions
pub mod utils {
    /// Clamp a value between min and max
    pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
        if value < min { min } else if value > max { max } else { value }
    }
}

/// Extension trait for Mat4 with additional convenience methods
pub trait Mat4Ext {
    /// OpenGL-style perspective projection (clip depth in [-1, 1])
    fn perspective_gl(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4;

    /// Right-handed look-at view matrix
    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4;
}

impl Mat4Ext for Mat4 {
    fn perspective_gl(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        Mat4::new_perspective(aspect, fov_y, near, far)
    }

    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
        Mat4::look_at_rh(&Point3::from(eye), &Point3::from(target), &up)
    }
}
