//! Serializable scene descriptions

use serde::{Deserialize, Serialize};

use crate::foundation::math::{Quat, Transform, Vec3};
use crate::physics::collision::{BoundingTriangles, BoundingVolume, BoundsError};
use super::Config;

/// Bounding volume as written in a scene file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundsDescription {
    /// Capsule along local +Y
    Capsule {
        /// Full height, tip to tip
        height: f32,
        /// Radius
        radius: f32,
    },
    /// Sphere at the node origin
    Sphere {
        /// Radius
        radius: f32,
    },
    /// Axis-aligned box at the node origin
    Aabb {
        /// Size along X
        width: f32,
        /// Size along Y
        height: f32,
        /// Size along Z
        depth: f32,
    },
    /// Indexed triangle list in model space
    Triangles {
        /// Vertex positions
        vertices: Vec<Vec3>,
        /// Three indices per triangle
        indices: Vec<u32>,
    },
}

impl BoundsDescription {
    /// Build the runtime volume
    pub fn build(&self) -> Result<BoundingVolume, BoundsError> {
        Ok(match self {
            Self::Capsule { height, radius } => BoundingVolume::capsule(*height, *radius),
            Self::Sphere { radius } => BoundingVolume::sphere(*radius),
            Self::Aabb { width, height, depth } => BoundingVolume::aabb(*width, *height, *depth),
            Self::Triangles { vertices, indices } => {
                BoundingVolume::Triangles(BoundingTriangles::from_indexed(vertices, indices)?)
            }
        })
    }
}

fn unit_scale() -> Vec3 {
    Vec3::new(1.0, 1.0, 1.0)
}

/// One node of a scene file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDescription {
    /// Unique node name
    pub name: String,

    /// Name of the parent node (declared earlier in the list)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,

    /// Local position
    #[serde(default = "Vec3::zeros")]
    pub position: Vec3,

    /// Local rotation as roll/pitch/yaw Euler angles in radians
    #[serde(default = "Vec3::zeros")]
    pub rotation: Vec3,

    /// Local scale
    #[serde(default = "unit_scale")]
    pub scale: Vec3,

    /// Bounding volume carried by the node
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<BoundsDescription>,
}

impl NodeDescription {
    /// Root node at the origin with no volume
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            position: Vec3::zeros(),
            rotation: Vec3::zeros(),
            scale: unit_scale(),
            bounds: None,
        }
    }

    /// Set the parent node name
    #[must_use]
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Set the local position
    #[must_use]
    pub fn at(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Set the local Euler rotation (radians)
    #[must_use]
    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    /// Set the local scale
    #[must_use]
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Attach a bounding volume
    #[must_use]
    pub fn with_bounds(mut self, bounds: BoundsDescription) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Local transform described by this node
    pub fn transform(&self) -> Transform {
        Transform::from_parts(
            self.position,
            Quat::from_euler_angles(self.rotation.x, self.rotation.y, self.rotation.z),
            self.scale,
        )
    }
}

/// A whole scene as written in a scene file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDescription {
    /// Nodes in creation order; parents must come before their children
    #[serde(default)]
    pub nodes: Vec<NodeDescription>,
}

impl Config for SceneDescription {}
