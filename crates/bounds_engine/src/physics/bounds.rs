//! Resolved collision view of a node's bounding volume

use crate::foundation::math::{Transform, Vec3};
use crate::physics::collision::{BoundingVolume, Collision, PairRole, WorldShape};
use crate::physics::collision_system;
use crate::scene::{NodeId, TransformProvider};

/// A bounding volume paired with its node's current world transform
///
/// Derived quantities are recomputed from the transform on every call.
#[derive(Debug, Clone, Copy)]
pub struct Bounds<'a> {
    id: NodeId,
    volume: &'a BoundingVolume,
    transform: Transform,
}

impl<'a> Bounds<'a> {
    /// View of `volume` placed by `transform`
    pub fn new(id: NodeId, volume: &'a BoundingVolume, transform: Transform) -> Self {
        Self { id, volume, transform }
    }

    /// View of `volume` placed by the provider's world transform for `id`
    pub fn resolve(provider: &impl TransformProvider, id: NodeId, volume: &'a BoundingVolume) -> Option<Self> {
        Some(Self::new(id, volume, provider.world_transform(id)?))
    }

    /// Owning node
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Model-space volume
    pub fn volume(&self) -> &'a BoundingVolume {
        self.volume
    }

    /// World transform used for this view
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// World-space shape for this view
    pub fn world_shape(&self) -> WorldShape {
        self.volume.to_world(&self.transform)
    }

    /// World radius of a capsule, sphere or mesh bounding sphere
    pub fn world_radius(&self) -> Option<f32> {
        match self.world_shape() {
            WorldShape::Capsule(capsule) => Some(capsule.radius),
            WorldShape::Sphere(sphere) => Some(sphere.radius),
            WorldShape::Triangles(mesh) => Some(mesh.bounding_radius),
            WorldShape::Aabb(_) => None,
        }
    }

    /// Topmost point of a capsule
    pub fn top(&self) -> Option<Vec3> {
        match self.world_shape() {
            WorldShape::Capsule(capsule) => Some(capsule.top()),
            _ => None,
        }
    }

    /// Bottommost point of a capsule
    pub fn bottom(&self) -> Option<Vec3> {
        match self.world_shape() {
            WorldShape::Capsule(capsule) => Some(capsule.bottom()),
            _ => None,
        }
    }

    /// Full world size of a box
    pub fn world_extents(&self) -> Option<Vec3> {
        match self.world_shape() {
            WorldShape::Aabb(aabb) => Some(aabb.half_extents * 2.0),
            _ => None,
        }
    }

    /// Minimum corner of a box
    pub fn world_min(&self) -> Option<Vec3> {
        match self.world_shape() {
            WorldShape::Aabb(aabb) => Some(aabb.min()),
            _ => None,
        }
    }

    /// Maximum corner of a box
    pub fn world_max(&self) -> Option<Vec3> {
        match self.world_shape() {
            WorldShape::Aabb(aabb) => Some(aabb.max()),
            _ => None,
        }
    }

    /// Whether `point` lies inside the volume
    pub fn point_inside(&self, point: Vec3) -> bool {
        self.world_shape().point_inside(point)
    }

    /// Closest point of the volume to `point`
    pub fn closest_point(&self, point: Vec3) -> Option<Vec3> {
        self.world_shape().closest_point(point)
    }

    /// Contact data against `other`; `None` when apart or the same node
    pub fn collision(&self, other: &Bounds<'_>) -> Option<Collision> {
        if self.id == other.id {
            return None;
        }
        let role = PairRole::between(self.id, other.id);
        Collision::new(other.id, self.world_shape().intersections_as(&other.world_shape(), role))
    }

    /// Whether this volume overlaps `other`
    pub fn colliding(&self, other: &Bounds<'_>) -> bool {
        self.id != other.id && self.world_shape().intersects(&other.world_shape())
    }

    /// Collisions after moving by `delta`, nearest first
    pub fn collision_test(&self, delta: Vec3, others: &[Bounds<'_>]) -> Vec<Collision> {
        collision_system::sweep(self, delta, others)
    }

    /// [`Self::collision_test`] with the delta given per axis
    pub fn collision_test_xyz(&self, dx: f32, dy: f32, dz: f32, others: &[Bounds<'_>]) -> Vec<Collision> {
        self.collision_test(Vec3::new(dx, dy, dz), others)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Quat;
    use crate::physics::collision::BoundingTriangles;
    use crate::scene::SceneGraph;
    use approx::assert_relative_eq;

    #[test]
    fn test_accessors_by_kind() {
        let mut scene = SceneGraph::new();
        let capsule = scene.add_node("capsule", Transform::from_position(Vec3::new(0.0, 3.0, 0.0)));
        let aabb = scene.add_node(
            "aabb",
            Transform::from_parts(Vec3::zeros(), Quat::identity(), Vec3::new(2.0, 1.0, 1.0)),
        );
        scene.set_bounds(capsule, BoundingVolume::capsule(4.0, 1.0)).unwrap();
        scene.set_bounds(aabb, BoundingVolume::aabb(1.0, 2.0, 3.0)).unwrap();

        let capsule = scene.bounds(capsule).unwrap();
        assert_relative_eq!(capsule.world_radius().unwrap(), 1.0);
        assert_relative_eq!(capsule.top().unwrap(), Vec3::new(0.0, 5.0, 0.0));
        assert_relative_eq!(capsule.bottom().unwrap(), Vec3::new(0.0, 1.0, 0.0));
        assert!(capsule.world_extents().is_none());

        let aabb = scene.bounds(aabb).unwrap();
        assert_relative_eq!(aabb.world_extents().unwrap(), Vec3::new(2.0, 2.0, 3.0));
        assert_relative_eq!(aabb.world_min().unwrap(), Vec3::new(-1.0, -1.0, -1.5));
        assert!(aabb.world_radius().is_none());
        assert!(aabb.top().is_none());
    }

    #[test]
    fn test_point_queries() {
        let mut scene = SceneGraph::new();
        let sphere = scene.add_node("sphere", Transform::from_position(Vec3::new(1.0, 0.0, 0.0)));
        scene.set_bounds(sphere, BoundingVolume::sphere(1.0)).unwrap();
        let sphere = scene.bounds(sphere).unwrap();

        assert!(sphere.point_inside(Vec3::new(1.5, 0.0, 0.0)));
        assert!(!sphere.point_inside(Vec3::new(2.0, 0.0, 0.0)));
        assert_relative_eq!(
            sphere.closest_point(Vec3::new(5.0, 0.0, 0.0)).unwrap(),
            Vec3::new(2.0, 0.0, 0.0)
        );
    }

    #[test]
    fn test_mesh_world_radius_scales() {
        let mut scene = SceneGraph::new();
        let mesh = BoundingTriangles::from_indexed(
            &[Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0), Vec3::new(-1.0, 0.0, 0.0)],
            &[0, 1, 2],
        )
        .unwrap();
        let id = scene.add_node(
            "mesh",
            Transform::from_parts(Vec3::zeros(), Quat::identity(), Vec3::new(3.0, 1.0, 1.0)),
        );
        scene.set_bounds(id, mesh).unwrap();
        assert_relative_eq!(scene.bounds(id).unwrap().world_radius().unwrap(), 3.0);
    }
}
