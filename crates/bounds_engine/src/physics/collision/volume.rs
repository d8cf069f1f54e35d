//! Model-space bounding volumes
//!
//! Volumes store only their local dimensions. Position, rotation and scale
//! come from the owning node's world transform at query time.

use log::debug;

use crate::foundation::math::{Transform, Vec3};
use super::mesh::BoundingTriangles;
use super::primitives::{WorldAabb, WorldCapsule, WorldSphere};
use super::shape::WorldShape;

/// Capsule aligned with the node's local +Y axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingCapsule {
    height: f32,
    radius: f32,
}

impl BoundingCapsule {
    /// Create a capsule; `height` is raised to at least `radius`
    pub fn new(height: f32, radius: f32) -> Self {
        Self { height: Self::clamped_height(height, radius), radius }
    }

    fn clamped_height(height: f32, radius: f32) -> f32 {
        if height < radius {
            debug!("Capsule height {height} below radius {radius}, clamping");
            radius
        } else {
            height
        }
    }

    /// Full local height, tip to tip
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Local radius
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Change the height (clamped to the radius)
    pub fn set_height(&mut self, height: f32) {
        self.height = Self::clamped_height(height, self.radius);
    }

    /// Change the radius, re-clamping the height
    pub fn set_radius(&mut self, radius: f32) {
        self.radius = radius;
        self.height = Self::clamped_height(self.height, radius);
    }

    /// World-space capsule for `transform`
    pub fn to_world(&self, transform: &Transform) -> WorldCapsule {
        let scale = transform.max_scale();
        WorldCapsule::new(
            transform.position,
            transform.up(),
            self.height * scale,
            self.radius * scale,
        )
    }
}

/// Sphere centred on the node origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    /// Local radius
    pub radius: f32,
}

impl BoundingSphere {
    /// Create a sphere with the given local radius
    pub fn new(radius: f32) -> Self {
        Self { radius }
    }

    /// World-space sphere for `transform` (largest scale axis)
    pub fn to_world(&self, transform: &Transform) -> WorldSphere {
        WorldSphere::new(transform.position, self.radius * transform.max_scale())
    }
}

/// Axis-aligned box centred on the node origin
///
/// Dimensions are full sizes. The box ignores node rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingAabb {
    dimensions: Vec3,
}

impl BoundingAabb {
    /// Create a box from full width (X), height (Y) and depth (Z)
    pub fn new(width: f32, height: f32, depth: f32) -> Self {
        Self { dimensions: Vec3::new(width, height, depth) }
    }

    /// Full local dimensions as (width, height, depth)
    pub fn dimensions(&self) -> Vec3 {
        self.dimensions
    }

    /// Replace the local dimensions
    pub fn set_dimensions(&mut self, dimensions: Vec3) {
        self.dimensions = dimensions;
    }

    /// World-space box for `transform`
    pub fn to_world(&self, transform: &Transform) -> WorldAabb {
        let half_extents = (self.dimensions * 0.5).component_mul(&transform.scale.abs());
        WorldAabb::new(transform.position, half_extents)
    }
}

/// The four bounding volume kinds a node can carry
#[derive(Debug, Clone, PartialEq)]
pub enum BoundingVolume {
    /// Capsule along local +Y
    Capsule(BoundingCapsule),
    /// Sphere at the node origin
    Sphere(BoundingSphere),
    /// Axis-aligned box at the node origin
    Aabb(BoundingAabb),
    /// Model-space triangle list
    Triangles(BoundingTriangles),
}

impl BoundingVolume {
    /// Capsule volume (height clamped to at least the radius)
    pub fn capsule(height: f32, radius: f32) -> Self {
        Self::Capsule(BoundingCapsule::new(height, radius))
    }

    /// Sphere volume
    pub fn sphere(radius: f32) -> Self {
        Self::Sphere(BoundingSphere::new(radius))
    }

    /// Box volume from full dimensions
    pub fn aabb(width: f32, height: f32, depth: f32) -> Self {
        Self::Aabb(BoundingAabb::new(width, height, depth))
    }

    /// Short kind name for logging
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Capsule(_) => "capsule",
            Self::Sphere(_) => "sphere",
            Self::Aabb(_) => "aabb",
            Self::Triangles(_) => "triangles",
        }
    }

    /// Build the world-space snapshot for `transform`
    pub fn to_world(&self, transform: &Transform) -> WorldShape {
        match self {
            Self::Capsule(capsule) => WorldShape::Capsule(capsule.to_world(transform)),
            Self::Sphere(sphere) => WorldShape::Sphere(sphere.to_world(transform)),
            Self::Aabb(aabb) => WorldShape::Aabb(aabb.to_world(transform)),
            Self::Triangles(mesh) => WorldShape::Triangles(mesh.to_world(transform)),
        }
    }
}

impl From<BoundingCapsule> for BoundingVolume {
    fn from(capsule: BoundingCapsule) -> Self {
        Self::Capsule(capsule)
    }
}

impl From<BoundingSphere> for BoundingVolume {
    fn from(sphere: BoundingSphere) -> Self {
        Self::Sphere(sphere)
    }
}

impl From<BoundingAabb> for BoundingVolume {
    fn from(aabb: BoundingAabb) -> Self {
        Self::Aabb(aabb)
    }
}

impl From<BoundingTriangles> for BoundingVolume {
    fn from(mesh: BoundingTriangles) -> Self {
        Self::Triangles(mesh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Quat;
    use approx::assert_relative_eq;
    use std::f32::consts::PI;

    #[test]
    fn test_capsule_height_clamped_to_radius() {
        let mut capsule = BoundingCapsule::new(0.5, 1.0);
        assert_relative_eq!(capsule.height(), 1.0);

        capsule.set_radius(2.0);
        assert_relative_eq!(capsule.height(), 2.0);

        capsule.set_height(6.0);
        assert_relative_eq!(capsule.height(), 6.0);
    }

    #[test]
    fn test_capsule_world_uses_max_scale() {
        let capsule = BoundingCapsule::new(4.0, 1.0);
        let transform = Transform::from_parts(
            Vec3::new(0.0, 3.0, 0.0),
            Quat::identity(),
            Vec3::new(1.0, 2.0, -3.0),
        );
        let world = capsule.to_world(&transform);
        assert_relative_eq!(world.radius, 3.0);
        assert_relative_eq!(world.height, 12.0);
        assert_relative_eq!(world.top(), Vec3::new(0.0, 9.0, 0.0));
    }

    #[test]
    fn test_capsule_follows_rotation() {
        let capsule = BoundingCapsule::new(4.0, 1.0);
        let rotation = Quat::from_axis_angle(&Vec3::z_axis(), -PI / 2.0);
        let world = capsule.to_world(&Transform::from_position_rotation(Vec3::zeros(), rotation));
        assert_relative_eq!(world.line_top(), Vec3::new(1.0, 0.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn test_sphere_world_radius() {
        let sphere = BoundingSphere::new(0.5);
        let transform = Transform::from_parts(Vec3::zeros(), Quat::identity(), Vec3::new(1.0, 4.0, 1.0));
        assert_relative_eq!(sphere.to_world(&transform).radius, 2.0);
    }

    #[test]
    fn test_aabb_per_axis_scale_ignores_rotation() {
        let aabb = BoundingAabb::new(2.0, 4.0, 6.0);
        let transform = Transform::from_parts(
            Vec3::new(1.0, 1.0, 1.0),
            Quat::from_axis_angle(&Vec3::y_axis(), 0.7),
            Vec3::new(1.0, -0.5, 2.0),
        );
        let world = aabb.to_world(&transform);
        assert_relative_eq!(world.half_extents, Vec3::new(1.0, 1.0, 6.0));
        assert_relative_eq!(world.min(), Vec3::new(0.0, 0.0, -5.0));
        assert_relative_eq!(world.max(), Vec3::new(2.0, 2.0, 7.0));
    }

    #[test]
    fn test_volume_dispatches_to_world_kind() {
        let volume = BoundingVolume::sphere(1.0);
        assert_eq!(volume.kind(), "sphere");
        assert!(matches!(volume.to_world(&Transform::identity()), WorldShape::Sphere(_)));
    }
}
