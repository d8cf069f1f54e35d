//! World-space primitive shapes
//!
//! Temporary world-space snapshots of the bounding volumes (spheres,
//! capsules, boxes, triangles). They are rebuilt from the node transform on
//! every query and never stored.

use crate::foundation::geometry::{closest_point_on_segment, EPSILON};
use crate::foundation::math::{utils, Vec3};

/// A sphere in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldSphere {
    /// The center position of the sphere in world space
    pub center: Vec3,
    /// The radius of the sphere
    pub radius: f32,
}

impl WorldSphere {
    /// Creates a new world-space sphere
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Copy moved by `delta`
    pub fn translated(&self, delta: Vec3) -> Self {
        Self::new(self.center + delta, self.radius)
    }

    /// Strict containment test
    pub fn point_inside(&self, point: Vec3) -> bool {
        (point - self.center).magnitude_squared() < self.radius * self.radius
    }

    /// Point on the surface nearest to `point`
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        let offset = point - self.center;
        let distance = offset.magnitude();
        if distance <= EPSILON {
            return self.center + Vec3::y() * self.radius;
        }
        self.center + offset * (self.radius / distance)
    }
}

/// A capsule in world space
///
/// The central segment runs along `up` through `center`; `height` is the
/// full tip-to-tip height, including both hemispherical caps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldCapsule {
    /// Center of the capsule in world space
    pub center: Vec3,
    /// Unit axis of the capsule
    pub up: Vec3,
    /// Full height in world units
    pub height: f32,
    /// Radius in world units
    pub radius: f32,
}

impl WorldCapsule {
    /// Creates a new world-space capsule
    pub fn new(center: Vec3, up: Vec3, height: f32, radius: f32) -> Self {
        Self { center, up, height, radius }
    }

    /// Copy moved by `delta`
    pub fn translated(&self, delta: Vec3) -> Self {
        Self { center: self.center + delta, ..*self }
    }

    fn half_line(&self) -> f32 {
        (self.height / 2.0 - self.radius).max(0.0)
    }

    /// Top end of the central segment (inset by the radius)
    pub fn line_top(&self) -> Vec3 {
        self.center + self.up * self.half_line()
    }

    /// Bottom end of the central segment (inset by the radius)
    pub fn line_bottom(&self) -> Vec3 {
        self.center - self.up * self.half_line()
    }

    /// Topmost point of the capsule
    pub fn top(&self) -> Vec3 {
        self.center + self.up * (self.height / 2.0)
    }

    /// Bottommost point of the capsule
    pub fn bottom(&self) -> Vec3 {
        self.center - self.up * (self.height / 2.0)
    }

    /// Closest point on the central segment to `point`
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        closest_point_on_segment(self.line_bottom(), self.line_top(), point).0
    }

    /// Strict containment test
    pub fn point_inside(&self, point: Vec3) -> bool {
        (self.closest_point(point) - point).magnitude_squared() < self.radius * self.radius
    }
}

/// An axis-aligned box in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldAabb {
    /// Center of the box
    pub center: Vec3,
    /// Half-size along each world axis
    pub half_extents: Vec3,
}

impl WorldAabb {
    /// Create a box from its center and half-extents
    pub fn new(center: Vec3, half_extents: Vec3) -> Self {
        Self { center, half_extents }
    }

    /// Create a box from min and max corners
    pub fn from_min_max(min: Vec3, max: Vec3) -> Self {
        Self {
            center: (min + max) * 0.5,
            half_extents: (max - min) * 0.5,
        }
    }

    /// Copy moved by `delta`
    pub fn translated(&self, delta: Vec3) -> Self {
        Self::new(self.center + delta, self.half_extents)
    }

    /// Minimum corner
    pub fn min(&self) -> Vec3 {
        self.center - self.half_extents
    }

    /// Maximum corner
    pub fn max(&self) -> Vec3 {
        self.center + self.half_extents
    }

    /// Check if this box contains a point (boundary included)
    pub fn contains_point(&self, point: Vec3) -> bool {
        let (min, max) = (self.min(), self.max());
        point.x >= min.x && point.x <= max.x &&
        point.y >= min.y && point.y <= max.y &&
        point.z >= min.z && point.z <= max.z
    }

    /// Closest point inside or on the box to `point`
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        let (min, max) = (self.min(), self.max());
        Vec3::new(
            min.x.max(point.x.min(max.x)),
            min.y.max(point.y.min(max.y)),
            min.z.max(point.z.min(max.z)),
        )
    }

    /// Clip segment `[start, end]` against the box (slab method)
    ///
    /// Returns the parameter of the first point of the segment inside the
    /// box, or `None` if the segment misses it. A zero-length segment hits
    /// when its point lies inside.
    pub fn clip_segment(&self, start: Vec3, end: Vec3) -> Option<f32> {
        let (min, max) = (self.min(), self.max());
        let direction = end - start;
        let mut t_enter = 0.0_f32;
        let mut t_exit = 1.0_f32;

        for axis in 0..3 {
            if direction[axis].abs() <= EPSILON {
                // Parallel to this slab: reject if outside it
                if start[axis] < min[axis] || start[axis] > max[axis] {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / direction[axis];
            let t1 = (min[axis] - start[axis]) * inv;
            let t2 = (max[axis] - start[axis]) * inv;
            t_enter = t_enter.max(t1.min(t2));
            t_exit = t_exit.min(t1.max(t2));
            if t_enter > t_exit {
                return None;
            }
        }

        Some(t_enter)
    }

    /// The eight corners of the box
    pub fn corners(&self) -> [Vec3; 8] {
        let (min, max) = (self.min(), self.max());
        [
            Vec3::new(min.x, min.y, min.z),
            Vec3::new(max.x, min.y, min.z),
            Vec3::new(min.x, max.y, min.z),
            Vec3::new(max.x, max.y, min.z),
            Vec3::new(min.x, min.y, max.z),
            Vec3::new(max.x, min.y, max.z),
            Vec3::new(min.x, max.y, max.z),
            Vec3::new(max.x, max.y, max.z),
        ]
    }

    /// The twelve edges of the box as corner pairs
    pub fn edges(&self) -> [(Vec3, Vec3); 12] {
        let corners = self.corners();
        // Corner index bits select max on x (1), y (2) and z (4)
        let mut edges = [(Vec3::zeros(), Vec3::zeros()); 12];
        let mut next = 0;
        for (index, corner) in corners.iter().enumerate() {
            for bit in [1, 2, 4] {
                if index & bit == 0 {
                    edges[next] = (*corner, corners[index | bit]);
                    next += 1;
                }
            }
        }
        edges
    }
}

/// Which feature of a triangle a closest point lies on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriangleRegion {
    /// One of the three corners
    Vertex,
    /// One of the three edges
    Edge,
    /// Strictly inside the face
    Face,
}

/// A triangle for collision detection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// First vertex
    pub v0: Vec3,
    /// Second vertex
    pub v1: Vec3,
    /// Third vertex
    pub v2: Vec3,
}

impl Triangle {
    /// Creates a new triangle
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        Self { v0, v1, v2 }
    }

    /// Vertices as an array
    pub fn vertices(&self) -> [Vec3; 3] {
        [self.v0, self.v1, self.v2]
    }

    /// Edges as `(start, end)` pairs
    pub fn edges(&self) -> [(Vec3, Vec3); 3] {
        [(self.v0, self.v1), (self.v1, self.v2), (self.v2, self.v0)]
    }

    /// Edge direction vectors
    pub fn edge_vectors(&self) -> [Vec3; 3] {
        [self.v1 - self.v0, self.v2 - self.v1, self.v0 - self.v2]
    }

    /// Twice the area, as an unnormalized normal (right-hand rule)
    pub fn area_normal(&self) -> Vec3 {
        (self.v1 - self.v0).cross(&(self.v2 - self.v0))
    }

    /// True when the triangle has (near) zero area
    pub fn is_degenerate(&self) -> bool {
        self.area_normal().magnitude_squared() <= EPSILON * EPSILON
    }

    /// Unit normal of the triangle (right-hand rule); zero if degenerate
    pub fn normal(&self) -> Vec3 {
        self.area_normal().try_normalize(EPSILON * EPSILON).unwrap_or_else(Vec3::zeros)
    }

    /// Unit normal flipped to face `point`; zero if degenerate
    pub fn normal_facing(&self, point: Vec3) -> Vec3 {
        let normal = self.normal();
        if normal.dot(&(point - self.v0)) < 0.0 { -normal } else { normal }
    }

    /// Calculates the centroid (center point) of the triangle
    pub fn centroid(&self) -> Vec3 {
        (self.v0 + self.v1 + self.v2) / 3.0
    }

    /// Copy with every vertex moved by `delta`
    pub fn translated(&self, delta: Vec3) -> Self {
        Self::new(self.v0 + delta, self.v1 + delta, self.v2 + delta)
    }

    /// Copy with every vertex mapped through `map`
    pub fn map_vertices(&self, map: impl Fn(Vec3) -> Vec3) -> Self {
        Self::new(map(self.v0), map(self.v1), map(self.v2))
    }

    /// Largest vertex distance from the local origin
    pub fn max_vertex_distance(&self) -> f32 {
        self.vertices()
            .iter()
            .map(|v| v.magnitude())
            .fold(0.0, f32::max)
    }

    /// Where segment `[start, end]` passes through the triangle, if it does
    ///
    /// Möller-Trumbore with the segment direction left unnormalized, so the
    /// hit parameter must land in `[0, 1]`. Segments lying in the triangle's
    /// plane are reported as misses; the edge distance tests cover them.
    pub fn intersect_segment(&self, start: Vec3, end: Vec3) -> Option<Vec3> {
        let direction = end - start;
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;

        let h = direction.cross(&edge2);
        let a = edge1.dot(&h);

        // Segment parallel to the triangle plane (or zero length)?
        if a.abs() < EPSILON {
            return None;
        }

        let f = 1.0 / a;
        let s = start - self.v0;
        let u = f * s.dot(&h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(&edge1);
        let v = f * direction.dot(&q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = f * edge2.dot(&q);
        if (0.0..=1.0).contains(&t) {
            Some(start + direction * t)
        } else {
            None
        }
    }

    /// Closest point on the triangle to a given point
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        self.closest_point_with_region(point).0
    }

    /// Closest point on the triangle plus the feature it lies on
    ///
    /// Voronoi-region walk from Ericson 5.1.5: vertices, then edges, then the
    /// face interior.
    pub fn closest_point_with_region(&self, point: Vec3) -> (Vec3, TriangleRegion) {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;

        // Vertex region outside v0
        let v0_to_point = point - self.v0;
        let d1 = edge1.dot(&v0_to_point);
        let d2 = edge2.dot(&v0_to_point);
        if d1 <= 0.0 && d2 <= 0.0 {
            return (self.v0, TriangleRegion::Vertex);
        }

        // Vertex region outside v1
        let v1_to_point = point - self.v1;
        let d3 = edge1.dot(&v1_to_point);
        let d4 = edge2.dot(&v1_to_point);
        if d3 >= 0.0 && d4 <= d3 {
            return (self.v1, TriangleRegion::Vertex);
        }

        // Edge region v0-v1
        let vc = d1 * d4 - d3 * d2;
        if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
            let v = d1 / (d1 - d3);
            return (self.v0 + edge1 * v, TriangleRegion::Edge);
        }

        // Vertex region outside v2
        let v2_to_point = point - self.v2;
        let d5 = edge1.dot(&v2_to_point);
        let d6 = edge2.dot(&v2_to_point);
        if d6 >= 0.0 && d5 <= d6 {
            return (self.v2, TriangleRegion::Vertex);
        }

        // Edge region v0-v2
        let vb = d5 * d2 - d1 * d6;
        if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
            let w = d2 / (d2 - d6);
            return (self.v0 + edge2 * w, TriangleRegion::Edge);
        }

        // Edge region v1-v2
        let va = d3 * d6 - d5 * d4;
        if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
            let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
            return (self.v1 + (self.v2 - self.v1) * w, TriangleRegion::Edge);
        }

        let denom = 1.0 / (va + vb + vc);
        let v = vb * denom;
        let w = vc * denom;
        (self.v0 + edge1 * v + edge2 * w, TriangleRegion::Face)
    }
}

/// Perpendicular fallback direction for coincident centers
pub(crate) fn fallback_direction(axis: &Vec3) -> Vec3 {
    utils::any_perpendicular(axis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn floor_triangle() -> Triangle {
        Triangle::new(
            Vec3::new(-1.0, 0.0, 1.0),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(0.0, 0.0, -1.0),
        )
    }

    #[test]
    fn test_capsule_line_endpoints() {
        let capsule = WorldCapsule::new(Vec3::new(0.0, 3.0, 0.0), Vec3::y(), 4.0, 1.0);
        assert_relative_eq!(capsule.line_bottom(), Vec3::new(0.0, 2.0, 0.0));
        assert_relative_eq!(capsule.line_top(), Vec3::new(0.0, 4.0, 0.0));
        assert_relative_eq!(capsule.bottom(), Vec3::new(0.0, 1.0, 0.0));
        assert_relative_eq!(capsule.top(), Vec3::new(0.0, 5.0, 0.0));
    }

    #[test]
    fn test_capsule_point_inside() {
        let capsule = WorldCapsule::new(Vec3::zeros(), Vec3::y(), 4.0, 1.0);
        assert!(capsule.point_inside(Vec3::new(0.5, 1.0, 0.0)));
        assert!(capsule.point_inside(Vec3::new(0.0, 1.9, 0.0)));
        assert!(!capsule.point_inside(Vec3::new(0.0, 2.1, 0.0)));
        assert!(!capsule.point_inside(Vec3::new(1.5, 0.0, 0.0)));
    }

    #[test]
    fn test_sphere_closest_point_on_surface() {
        let sphere = WorldSphere::new(Vec3::zeros(), 2.0);
        assert_relative_eq!(sphere.closest_point(Vec3::new(5.0, 0.0, 0.0)), Vec3::new(2.0, 0.0, 0.0));
        assert!(sphere.point_inside(Vec3::new(1.0, 1.0, 0.0)));
        assert!(!sphere.point_inside(Vec3::new(2.0, 0.0, 0.0)));
    }

    #[test]
    fn test_aabb_closest_point_and_contains() {
        let aabb = WorldAabb::new(Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0));
        assert!(aabb.contains_point(Vec3::new(0.5, 0.5, 0.5)));
        assert!(!aabb.contains_point(Vec3::new(2.0, 0.0, 0.0)));
        assert_relative_eq!(
            aabb.closest_point(Vec3::new(3.0, 0.5, -4.0)),
            Vec3::new(1.0, 0.5, -1.0)
        );
    }

    #[test]
    fn test_aabb_clip_segment() {
        let aabb = WorldAabb::new(Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0));

        let t = aabb.clip_segment(Vec3::new(-3.0, 0.0, 0.0), Vec3::new(3.0, 0.0, 0.0));
        assert_relative_eq!(t.unwrap(), 1.0 / 3.0, epsilon = 1e-6);

        assert!(aabb.clip_segment(Vec3::new(-3.0, 2.0, 0.0), Vec3::new(3.0, 2.0, 0.0)).is_none());
        assert!(aabb.clip_segment(Vec3::new(-3.0, 0.0, 0.0), Vec3::new(-2.0, 0.0, 0.0)).is_none());

        // Zero-length segments act as point containment
        assert!(aabb.clip_segment(Vec3::zeros(), Vec3::zeros()).is_some());
        assert!(aabb.clip_segment(Vec3::new(0.0, 5.0, 0.0), Vec3::new(0.0, 5.0, 0.0)).is_none());
    }

    #[test]
    fn test_triangle_normal_and_degenerate() {
        let tri = floor_triangle();
        assert_relative_eq!(tri.normal(), Vec3::y(), epsilon = 1e-6);
        assert_relative_eq!(tri.normal_facing(Vec3::new(0.0, -3.0, 0.0)), -Vec3::y(), epsilon = 1e-6);

        let flat = Triangle::new(Vec3::zeros(), Vec3::x(), Vec3::x() * 2.0);
        assert!(flat.is_degenerate());
        assert_relative_eq!(flat.normal(), Vec3::zeros());
    }

    #[test]
    fn test_triangle_closest_point_regions() {
        let tri = floor_triangle();

        let (point, region) = tri.closest_point_with_region(Vec3::new(0.0, 2.0, 0.0));
        assert_relative_eq!(point, Vec3::zeros(), epsilon = 1e-6);
        assert_eq!(region, TriangleRegion::Face);

        let (point, region) = tri.closest_point_with_region(Vec3::new(0.0, 0.0, 3.0));
        assert_relative_eq!(point, Vec3::new(0.0, 0.0, 1.0), epsilon = 1e-6);
        assert_eq!(region, TriangleRegion::Edge);

        let (point, region) = tri.closest_point_with_region(Vec3::new(0.0, 1.0, -5.0));
        assert_relative_eq!(point, Vec3::new(0.0, 0.0, -1.0), epsilon = 1e-6);
        assert_eq!(region, TriangleRegion::Vertex);
    }

    #[test]
    fn test_triangle_segment_crossing() {
        let tri = floor_triangle();
        let hit = tri.intersect_segment(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, -1.0, 0.0));
        assert_relative_eq!(hit.unwrap(), Vec3::zeros(), epsilon = 1e-6);

        // Stops short of the plane
        assert!(tri.intersect_segment(Vec3::new(0.0, 2.0, 0.0), Vec3::new(0.0, 0.5, 0.0)).is_none());
        // Passes beside the triangle
        assert!(tri.intersect_segment(Vec3::new(3.0, 1.0, 0.0), Vec3::new(3.0, -1.0, 0.0)).is_none());
    }

    #[test]
    fn test_aabb_edges_join_adjacent_corners() {
        let aabb = WorldAabb::new(Vec3::new(1.0, 0.0, 0.0), Vec3::new(1.0, 2.0, 3.0));
        let edges = aabb.edges();
        for (a, b) in edges {
            let differing = (0..3).filter(|&axis| (a[axis] - b[axis]).abs() > 0.0).count();
            assert_eq!(differing, 1);
        }
        let total: f32 = edges.iter().map(|(a, b)| (b - a).magnitude()).sum();
        assert_relative_eq!(total, 4.0 * (2.0 + 4.0 + 6.0), epsilon = 1e-5);
    }

    #[test]
    fn test_aabb_from_min_max() {
        let aabb = WorldAabb::from_min_max(Vec3::new(-1.0, 0.0, 2.0), Vec3::new(3.0, 2.0, 4.0));
        assert_relative_eq!(aabb.center, Vec3::new(1.0, 1.0, 3.0));
        assert_relative_eq!(aabb.half_extents, Vec3::new(2.0, 1.0, 1.0));
        assert_relative_eq!(aabb.corners()[7], Vec3::new(3.0, 2.0, 4.0));
    }
}
