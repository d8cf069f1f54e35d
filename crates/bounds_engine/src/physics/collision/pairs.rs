//! Pairwise intersection routines
//!
//! One canonical routine per unordered pair of volume kinds. Every routine
//! reports the MTV for its FIRST argument; the reverse pairs are produced
//! in [`super::shape`] by swapping the arguments and inverting. Same-kind
//! pairs follow [`PairRole`] so both directions stay opposite on ties.
//!
//! Overlap is strict throughout: volumes that only touch do not collide.

use crate::foundation::geometry::{
    closest_points_between_segments, least_overlap_axis, AxisPush, Interval, EPSILON,
};
use crate::foundation::math::Vec3;
use crate::scene::NodeId;
use super::contact::Intersection;
use super::mesh::WorldTriangles;
use super::primitives::{
    fallback_direction, Triangle, TriangleRegion, WorldAabb, WorldCapsule, WorldSphere,
};

/// Which side of a same-kind pair a routine answers for
///
/// The trailing side reports the leading side's result inverted, so the two
/// directions of a same-kind pair are exact opposites, ties included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairRole {
    /// Computes the contact directly
    Leading,
    /// Inverts the leading side's contact
    Trailing,
}

impl PairRole {
    /// Role of the volume owned by `id` against the one owned by `other`
    pub fn between(id: NodeId, other: NodeId) -> Self {
        if id <= other {
            Self::Leading
        } else {
            Self::Trailing
        }
    }
}

/// Sphere against sphere, with centres and radii given explicitly
///
/// `fallback` is the push direction used when the centres coincide. The
/// contact point is the midpoint between the two surface points.
fn sphere_contact(
    center: Vec3,
    radius: f32,
    other_center: Vec3,
    other_radius: f32,
    fallback: Vec3,
) -> Option<Intersection> {
    let delta = center - other_center;
    let distance = delta.magnitude();
    let reach = radius + other_radius;
    if distance >= reach {
        return None;
    }

    let direction = if distance > EPSILON { delta / distance } else { fallback };
    let surface = center - direction * radius;
    let other_surface = other_center + direction * other_radius;

    Some(Intersection::with_normal(
        direction * (reach - distance),
        direction,
        (surface + other_surface) * 0.5,
    ))
}

/// Sphere vs sphere
pub fn sphere_sphere(sphere: &WorldSphere, other: &WorldSphere) -> Vec<Intersection> {
    sphere_contact(sphere.center, sphere.radius, other.center, other.radius, Vec3::y())
        .into_iter()
        .collect()
}

/// Sphere vs capsule: sphere test against the closest point on the segment
pub fn sphere_capsule(sphere: &WorldSphere, capsule: &WorldCapsule) -> Vec<Intersection> {
    let closest = capsule.closest_point(sphere.center);
    sphere_contact(
        sphere.center,
        sphere.radius,
        closest,
        capsule.radius,
        fallback_direction(&capsule.up),
    )
    .into_iter()
    .collect()
}

/// Sphere vs box: the zero-length case of the capsule test
pub fn sphere_aabb(sphere: &WorldSphere, aabb: &WorldAabb) -> Vec<Intersection> {
    segment_aabb(sphere.center, sphere.center, sphere.radius, aabb)
        .into_iter()
        .collect()
}

/// Sphere vs triangle mesh: the zero-length case of the capsule test
pub fn sphere_triangles(sphere: &WorldSphere, mesh: &WorldTriangles) -> Vec<Intersection> {
    segment_triangles(sphere.center, sphere.center, sphere.radius, mesh)
}

/// Capsule vs capsule via closest points between the central segments
pub fn capsule_capsule(capsule: &WorldCapsule, other: &WorldCapsule) -> Vec<Intersection> {
    let (point, other_point) = closest_points_between_segments(
        capsule.line_bottom(),
        capsule.line_top(),
        other.line_bottom(),
        other.line_top(),
    );

    let fallback = capsule
        .up
        .cross(&other.up)
        .try_normalize(EPSILON)
        .unwrap_or_else(|| fallback_direction(&capsule.up));

    sphere_contact(point, capsule.radius, other_point, other.radius, fallback)
        .into_iter()
        .collect()
}

/// Capsule vs box
pub fn capsule_aabb(capsule: &WorldCapsule, aabb: &WorldAabb) -> Vec<Intersection> {
    segment_aabb(capsule.line_bottom(), capsule.line_top(), capsule.radius, aabb)
        .into_iter()
        .collect()
}

/// Capsule vs triangle mesh
pub fn capsule_triangles(capsule: &WorldCapsule, mesh: &WorldTriangles) -> Vec<Intersection> {
    segment_triangles(capsule.line_bottom(), capsule.line_top(), capsule.radius, mesh)
}

fn aabb_interval(aabb: &WorldAabb, axis: &Vec3) -> Interval {
    let reach = aabb.half_extents.dot(&axis.abs());
    Interval::around(axis.dot(&aabb.center), reach)
}

const WORLD_AXES: [Vec3; 3] = [
    Vec3::new(1.0, 0.0, 0.0),
    Vec3::new(0.0, 1.0, 0.0),
    Vec3::new(0.0, 0.0, 1.0),
];

/// Box vs box: separating axes are the three world axes
pub fn aabb_aabb(aabb: &WorldAabb, other: &WorldAabb) -> Vec<Intersection> {
    let Some(AxisPush { direction, depth }) = least_overlap_axis(
        &WORLD_AXES,
        |axis| aabb_interval(aabb, axis),
        |axis| aabb_interval(other, axis),
    ) else {
        return Vec::new();
    };

    let overlap = WorldAabb::from_min_max(aabb.min().sup(&other.min()), aabb.max().inf(&other.max()));
    vec![Intersection::with_normal(direction * depth, direction, overlap.center)]
}

/// Box vs triangle mesh: 13-axis separating-axis test per triangle
pub fn aabb_triangles(aabb: &WorldAabb, mesh: &WorldTriangles) -> Vec<Intersection> {
    if !mesh.may_touch_sphere(aabb.center, aabb.half_extents.magnitude()) {
        return Vec::new();
    }

    let mut intersections = Vec::new();
    for (index, triangle) in mesh.triangles.iter().enumerate() {
        let mut axes = Vec::with_capacity(13);
        axes.extend_from_slice(&WORLD_AXES);
        axes.push(triangle.area_normal());
        for edge in triangle.edge_vectors() {
            axes.extend(WORLD_AXES.iter().map(|axis| edge.cross(axis)));
        }

        let vertices = triangle.vertices();
        let Some(AxisPush { direction, depth }) = least_overlap_axis(
            &axes,
            |axis| aabb_interval(aabb, axis),
            |axis| Interval::of_points(axis, &vertices),
        ) else {
            continue;
        };

        let contact = aabb.closest_point(triangle.closest_point(aabb.center));
        intersections.push(
            Intersection::with_normal(direction * depth, direction, contact).on_triangle(index),
        );
    }
    intersections
}

/// Mesh vs mesh: separating-axis test per triangle pair
///
/// Triangle indices in the result refer to the partner mesh. A trailing
/// mesh reports the leading mesh's per-pair result, inverted.
pub fn triangles_triangles(
    mesh: &WorldTriangles,
    other: &WorldTriangles,
    role: PairRole,
) -> Vec<Intersection> {
    if !other.may_touch_sphere(mesh.center, mesh.bounding_radius) {
        return Vec::new();
    }

    let mut intersections = Vec::new();
    for triangle in &mesh.triangles {
        for (index, other_triangle) in other.triangles.iter().enumerate() {
            let hit = match role {
                PairRole::Leading => triangle_triangle(triangle, other_triangle),
                PairRole::Trailing => triangle_triangle(other_triangle, triangle)
                    .as_ref()
                    .map(Intersection::inverted),
            };
            if let Some(hit) = hit {
                intersections.push(hit.on_triangle(index));
            }
        }
    }
    intersections
}

fn triangle_triangle(triangle: &Triangle, other: &Triangle) -> Option<Intersection> {
    let normal = triangle.normal();
    let other_normal = other.normal();
    let edges = triangle.edge_vectors();
    let other_edges = other.edge_vectors();

    // In-plane edge normals separate coplanar triangles
    let mut axes: Vec<Vec3> = edges
        .iter()
        .map(|edge| normal.cross(edge))
        .chain(other_edges.iter().map(|edge| other_normal.cross(edge)))
        .collect();

    let coplanar = normal.cross(&other_normal).magnitude_squared() < EPSILON
        && normal.dot(&(other.v0 - triangle.v0)).abs() < EPSILON;
    if !coplanar {
        axes.push(normal);
        axes.push(other_normal);
        for edge in &edges {
            axes.extend(other_edges.iter().map(|other_edge| edge.cross(other_edge)));
        }
    }

    let vertices = triangle.vertices();
    let other_vertices = other.vertices();
    let AxisPush { direction, depth } = least_overlap_axis(
        &axes,
        |axis| Interval::of_points(axis, &vertices),
        |axis| Interval::of_points(axis, &other_vertices),
    )?;

    let contact = (triangle.closest_point(other.centroid()) + other.closest_point(triangle.centroid())) * 0.5;
    Some(Intersection::with_normal(direction * depth, direction, contact))
}

/// Swept sphere `[start, end]` with `radius` against a box
///
/// A segment touching or crossing the box is resolved by a separating-axis
/// test on the world axes. Otherwise the closest pair lies on an endpoint or
/// on one of the box edges, so those candidates are searched exactly.
fn segment_aabb(start: Vec3, end: Vec3, radius: f32, aabb: &WorldAabb) -> Option<Intersection> {
    if let Some(t) = aabb.clip_segment(start, end) {
        let AxisPush { direction, depth } = least_overlap_axis(
            &WORLD_AXES,
            |axis| {
                let interval = Interval::new(axis.dot(&start), axis.dot(&end));
                Interval::new(interval.min - radius, interval.max + radius)
            },
            |axis| aabb_interval(aabb, axis),
        )?;

        // Project the entry point onto the box face the push exits through
        let inside = start + (end - start) * t;
        let face = direction.dot(&aabb.center) + direction.abs().dot(&aabb.half_extents);
        let contact = inside + direction * (face - direction.dot(&inside));
        return Some(Intersection::with_normal(direction * depth, direction, contact));
    }

    // Closest pair: an endpoint clamped into the box, or the segment against a box edge
    let mut best = (start, aabb.closest_point(start));
    let mut best_distance = (best.0 - best.1).magnitude_squared();
    let mut consider = |point: Vec3, on_box: Vec3| {
        let distance = (point - on_box).magnitude_squared();
        if distance < best_distance {
            best_distance = distance;
            best = (point, on_box);
        }
    };

    consider(end, aabb.closest_point(end));
    for (edge_start, edge_end) in aabb.edges() {
        let (point, on_edge) = closest_points_between_segments(start, end, edge_start, edge_end);
        consider(point, on_edge);
    }

    let (point, box_point) = best;
    let offset = point - box_point;
    let distance = offset.magnitude();
    if distance >= radius {
        return None;
    }

    let direction = if distance > EPSILON {
        offset / distance
    } else {
        (point - aabb.center).try_normalize(EPSILON).unwrap_or_else(Vec3::y)
    };
    Some(Intersection::with_normal(direction * (radius - distance), direction, box_point))
}

/// Swept sphere `[start, end]` with `radius` against every mesh triangle
///
/// Emits one intersection per overlapping triangle, in mesh order.
fn segment_triangles(start: Vec3, end: Vec3, radius: f32, mesh: &WorldTriangles) -> Vec<Intersection> {
    let middle = (start + end) * 0.5;
    let reach = (end - start).magnitude() * 0.5 + radius;
    if !mesh.may_touch_sphere(middle, reach) {
        return Vec::new();
    }

    mesh.triangles
        .iter()
        .enumerate()
        .filter_map(|(index, triangle)| {
            segment_triangle(start, end, radius, middle, triangle).map(|hit| hit.on_triangle(index))
        })
        .collect()
}

fn segment_triangle(
    start: Vec3,
    end: Vec3,
    radius: f32,
    middle: Vec3,
    triangle: &Triangle,
) -> Option<Intersection> {
    let face_normal = triangle.normal_facing(middle);

    // Segment passes through the face: push out past the deepest endpoint
    if let Some(crossing) = triangle.intersect_segment(start, end) {
        let behind = face_normal.dot(&(start - triangle.v0)).min(face_normal.dot(&(end - triangle.v0)));
        let depth = (-behind).max(0.0);
        return Some(Intersection::with_normal(face_normal * (radius + depth), face_normal, crossing));
    }

    // Closest feature pair: endpoints against the face, segment against edges
    let mut best: Option<(Vec3, Vec3, TriangleRegion)> = None;
    let mut best_distance = f32::INFINITY;
    let mut consider = |point: Vec3, on_triangle: Vec3, region: TriangleRegion| {
        let distance = (point - on_triangle).magnitude_squared();
        if distance < best_distance {
            best_distance = distance;
            best = Some((point, on_triangle, region));
        }
    };

    for endpoint in [start, end] {
        let (on_triangle, region) = triangle.closest_point_with_region(endpoint);
        consider(endpoint, on_triangle, region);
    }
    for (edge_start, edge_end) in triangle.edges() {
        let (point, on_edge) = closest_points_between_segments(start, end, edge_start, edge_end);
        consider(point, on_edge, TriangleRegion::Edge);
    }

    let (point, on_triangle, region) = best?;
    let distance = best_distance.sqrt();
    if distance >= radius {
        return None;
    }

    let separation = if distance > EPSILON { (point - on_triangle) / distance } else { face_normal };
    let normal = if region == TriangleRegion::Face { face_normal } else { separation };
    Some(Intersection::with_normal(separation * (radius - distance), normal, on_triangle))
}
