//! World-space shape dispatch
//!
//! A [`WorldShape`] is the temporary world-space form of a
//! [`BoundingVolume`](super::volume::BoundingVolume). Pair dispatch lives
//! here: every ordered pair of kinds is routed to its canonical routine in
//! [`super::pairs`], and reversed pairs are inverted.

use log::trace;

use crate::foundation::math::Vec3;
use super::contact::Intersection;
use super::mesh::WorldTriangles;
use super::pairs::{self, PairRole};
use super::primitives::{WorldAabb, WorldCapsule, WorldSphere};

/// World-space shape (temporary, created on demand for collision tests)
#[derive(Debug, Clone, PartialEq)]
pub enum WorldShape {
    /// World-space capsule
    Capsule(WorldCapsule),
    /// World-space sphere
    Sphere(WorldSphere),
    /// World-space axis-aligned box
    Aabb(WorldAabb),
    /// World-space triangle list
    Triangles(WorldTriangles),
}

fn inverted(intersections: Vec<Intersection>) -> Vec<Intersection> {
    intersections.iter().map(Intersection::inverted).collect()
}

fn same_kind<T>(
    shape: &T,
    other: &T,
    role: PairRole,
    routine: impl Fn(&T, &T) -> Vec<Intersection>,
) -> Vec<Intersection> {
    match role {
        PairRole::Leading => routine(shape, other),
        PairRole::Trailing => inverted(routine(other, shape)),
    }
}

impl WorldShape {
    /// Short kind name for logging
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Capsule(_) => "capsule",
            Self::Sphere(_) => "sphere",
            Self::Aabb(_) => "aabb",
            Self::Triangles(_) => "triangles",
        }
    }

    /// World position of the shape's origin
    pub fn center(&self) -> Vec3 {
        match self {
            Self::Capsule(capsule) => capsule.center,
            Self::Sphere(sphere) => sphere.center,
            Self::Aabb(aabb) => aabb.center,
            Self::Triangles(mesh) => mesh.center,
        }
    }

    /// Copy of the shape moved by `delta`
    #[must_use]
    pub fn translated(&self, delta: Vec3) -> Self {
        match self {
            Self::Capsule(capsule) => Self::Capsule(capsule.translated(delta)),
            Self::Sphere(sphere) => Self::Sphere(sphere.translated(delta)),
            Self::Aabb(aabb) => Self::Aabb(aabb.translated(delta)),
            Self::Triangles(mesh) => Self::Triangles(mesh.translated(delta)),
        }
    }

    /// Closest point of the shape to `point`
    ///
    /// Capsules answer with the closest point on their central segment,
    /// spheres with the closest surface point, boxes with the clamped point
    /// and meshes with the closest point on any triangle (`None` when empty).
    pub fn closest_point(&self, point: Vec3) -> Option<Vec3> {
        match self {
            Self::Capsule(capsule) => Some(capsule.closest_point(point)),
            Self::Sphere(sphere) => Some(sphere.closest_point(point)),
            Self::Aabb(aabb) => Some(aabb.closest_point(point)),
            Self::Triangles(mesh) => mesh.closest_point(point),
        }
    }

    /// Whether `point` lies inside the shape
    ///
    /// Triangle lists have no interior and always answer `false`.
    pub fn point_inside(&self, point: Vec3) -> bool {
        match self {
            Self::Capsule(capsule) => capsule.point_inside(point),
            Self::Sphere(sphere) => sphere.point_inside(point),
            Self::Aabb(aabb) => aabb.contains_point(point),
            Self::Triangles(_) => false,
        }
    }

    /// All intersections of this shape with `other`, `self` leading
    ///
    /// MTVs and normals are expressed for `self`. Empty when the shapes do
    /// not overlap.
    pub fn intersections(&self, other: &WorldShape) -> Vec<Intersection> {
        self.intersections_as(other, PairRole::Leading)
    }

    /// All intersections of this shape with `other` in the given role
    ///
    /// `role` only matters when both shapes have the same kind.
    pub fn intersections_as(&self, other: &WorldShape, role: PairRole) -> Vec<Intersection> {
        trace!("Testing {} against {} ({role:?})", self.kind(), other.kind());

        match (self, other) {
            (Self::Capsule(a), Self::Capsule(b)) => same_kind(a, b, role, pairs::capsule_capsule),
            (Self::Capsule(a), Self::Sphere(b)) => inverted(pairs::sphere_capsule(b, a)),
            (Self::Capsule(a), Self::Aabb(b)) => pairs::capsule_aabb(a, b),
            (Self::Capsule(a), Self::Triangles(b)) => pairs::capsule_triangles(a, b),

            (Self::Sphere(a), Self::Capsule(b)) => pairs::sphere_capsule(a, b),
            (Self::Sphere(a), Self::Sphere(b)) => same_kind(a, b, role, pairs::sphere_sphere),
            (Self::Sphere(a), Self::Aabb(b)) => pairs::sphere_aabb(a, b),
            (Self::Sphere(a), Self::Triangles(b)) => pairs::sphere_triangles(a, b),

            (Self::Aabb(a), Self::Capsule(b)) => inverted(pairs::capsule_aabb(b, a)),
            (Self::Aabb(a), Self::Sphere(b)) => inverted(pairs::sphere_aabb(b, a)),
            (Self::Aabb(a), Self::Aabb(b)) => same_kind(a, b, role, pairs::aabb_aabb),
            (Self::Aabb(a), Self::Triangles(b)) => pairs::aabb_triangles(a, b),

            (Self::Triangles(a), Self::Capsule(b)) => inverted(pairs::capsule_triangles(b, a)),
            (Self::Triangles(a), Self::Sphere(b)) => inverted(pairs::sphere_triangles(b, a)),
            (Self::Triangles(a), Self::Aabb(b)) => inverted(pairs::aabb_triangles(b, a)),
            (Self::Triangles(a), Self::Triangles(b)) => pairs::triangles_triangles(a, b, role),
        }
    }

    /// Whether this shape overlaps `other`
    pub fn intersects(&self, other: &WorldShape) -> bool {
        !self.intersections(other).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_reverse_pair_is_inverted() {
        let sphere = WorldShape::Sphere(WorldSphere::new(Vec3::zeros(), 1.0));
        let capsule = WorldShape::Capsule(WorldCapsule::new(Vec3::new(0.0, 2.0, 0.0), Vec3::y(), 4.0, 1.0));

        let forward = sphere.intersections(&capsule);
        let reverse = capsule.intersections(&sphere);
        assert_eq!(forward.len(), 1);
        assert_eq!(reverse.len(), 1);
        assert_relative_eq!(forward[0].mtv, -reverse[0].mtv, epsilon = 1e-6);
        assert_relative_eq!(forward[0].normal, -reverse[0].normal, epsilon = 1e-6);
        assert_relative_eq!(forward[0].contact_point, reverse[0].contact_point, epsilon = 1e-6);
    }

    #[test]
    fn test_translated_moves_center() {
        let aabb = WorldShape::Aabb(WorldAabb::new(Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0)));
        let moved = aabb.translated(Vec3::new(1.0, 2.0, 3.0));
        assert_relative_eq!(moved.center(), Vec3::new(1.0, 2.0, 3.0));
        assert!(moved.point_inside(Vec3::new(1.5, 2.5, 3.5)));
        assert!(!aabb.point_inside(Vec3::new(1.5, 2.5, 3.5)));
    }

    #[test]
    fn test_mesh_has_no_interior() {
        let mesh = WorldShape::Triangles(WorldTriangles {
            triangles: Vec::new(),
            center: Vec3::zeros(),
            bounding_radius: 0.0,
        });
        assert!(!mesh.point_inside(Vec3::zeros()));
        assert!(mesh.closest_point(Vec3::zeros()).is_none());
    }
}
