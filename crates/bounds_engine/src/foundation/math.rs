//! Math utilities and types
//!
//! Provides the vector, quaternion and transform types used by every
//! bounding volume and intersection routine.

pub use nalgebra::{
    Vector3,
    Matrix4,
    Quaternion,
    Unit,
};

use serde::{Deserialize, Serialize};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Transform representing position, rotation, and scale
///
/// Y-up right-handed: `up` is +Y, `right` is +X and `forward` is -Z.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Position in 3D space
    pub position: Vec3,

    /// Rotation quaternion
    pub rotation: Quat,

    /// Scale factors (may be non-uniform or negative)
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with only position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a transform with position and rotation
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            ..Default::default()
        }
    }

    /// Create a transform from all three components
    pub fn from_parts(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    /// Convert to a transformation matrix (TRS order)
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * self.rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }

    /// Apply this transform to a point
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.position + self.rotation * self.scale.component_mul(&point)
    }

    /// Combine this transform (parent) with another (child)
    pub fn combine(&self, other: &Transform) -> Transform {
        Transform {
            position: self.position + self.rotation * (self.scale.component_mul(&other.position)),
            rotation: self.rotation * other.rotation,
            scale: self.scale.component_mul(&other.scale),
        }
    }

    /// Return a copy moved by `delta` in world space
    pub fn translated(&self, delta: Vec3) -> Transform {
        Transform {
            position: self.position + delta,
            ..*self
        }
    }

    /// Unit "up" vector of this transform's rotation
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::y()
    }

    /// Unit "right" vector of this transform's rotation
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::x()
    }

    /// Unit "forward" vector of this transform's rotation (-Z)
    pub fn forward(&self) -> Vec3 {
        self.rotation * -Vec3::z()
    }

    /// Largest absolute scale component
    ///
    /// Spheres and capsules collapse non-uniform scale to this single factor.
    pub fn max_scale(&self) -> f32 {
        utils::max_abs_component(&self.scale)
    }
}

/// Math utility functions
pub mod utils {
    use super::Vec3;

    /// Largest absolute component of a vector
    pub fn max_abs_component(v: &Vec3) -> f32 {
        v.x.abs().max(v.y.abs()).max(v.z.abs())
    }

    /// A unit vector perpendicular to `v` (which need not be normalized)
    pub fn any_perpendicular(v: &Vec3) -> Vec3 {
        let reference = if v.x.abs() < 0.9 { Vec3::x() } else { Vec3::y() };
        let perpendicular = v.cross(&reference);
        if perpendicular.magnitude_squared() > f32::EPSILON {
            perpendicular.normalize()
        } else {
            Vec3::z()
        }
    }
}
