//! Contact data returned by intersection queries

use crate::foundation::math::Vec3;
use crate::scene::NodeId;

/// One overlap between two volumes
///
/// `mtv` is the displacement that moves the querying volume out of the
/// partner. `normal` is its unit direction (pointing from the partner toward
/// the querying volume).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// Minimum translation vector for the querying volume
    pub mtv: Vec3,
    /// Unit contact normal
    pub normal: Vec3,
    /// World-space contact point
    pub contact_point: Vec3,
    /// Index of the mesh triangle involved, if any
    pub triangle: Option<usize>,
}

impl Intersection {
    /// Intersection whose normal is the direction of `mtv`
    pub fn new(mtv: Vec3, contact_point: Vec3) -> Self {
        let normal = mtv.try_normalize(f32::EPSILON).unwrap_or_else(Vec3::zeros);
        Self { mtv, normal, contact_point, triangle: None }
    }

    /// Intersection with an explicit normal
    pub fn with_normal(mtv: Vec3, normal: Vec3, contact_point: Vec3) -> Self {
        Self { mtv, normal, contact_point, triangle: None }
    }

    /// Tag the intersection with a mesh triangle index
    #[must_use]
    pub fn on_triangle(mut self, index: usize) -> Self {
        self.triangle = Some(index);
        self
    }

    /// The same contact seen from the partner
    #[must_use]
    pub fn inverted(&self) -> Self {
        Self {
            mtv: -self.mtv,
            normal: -self.normal,
            ..*self
        }
    }

    /// Penetration depth (length of the MTV)
    pub fn depth(&self) -> f32 {
        self.mtv.magnitude()
    }
}

/// All intersections between the querying volume and one partner
#[derive(Debug, Clone, PartialEq)]
pub struct Collision {
    /// Node owning the partner volume
    pub collided: NodeId,
    /// Individual overlaps, never empty
    pub intersections: Vec<Intersection>,
}

impl Collision {
    /// Wrap a non-empty intersection list
    pub fn new(collided: NodeId, intersections: Vec<Intersection>) -> Option<Self> {
        if intersections.is_empty() {
            None
        } else {
            Some(Self { collided, intersections })
        }
    }

    fn average(&self, field: impl Fn(&Intersection) -> Vec3) -> Vec3 {
        let sum: Vec3 = self.intersections.iter().map(field).sum();
        sum / self.intersections.len().max(1) as f32
    }

    /// Mean MTV over all intersections
    pub fn average_mtv(&self) -> Vec3 {
        self.average(|i| i.mtv)
    }

    /// Mean normal, renormalized (zero if the normals cancel)
    pub fn average_normal(&self) -> Vec3 {
        self.average(|i| i.normal)
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(Vec3::zeros)
    }

    /// Mean contact point
    pub fn average_contact_point(&self) -> Vec3 {
        self.average(|i| i.contact_point)
    }

    /// Remove the part of `movement` that pushes into the partner
    ///
    /// Only the component against the average normal is removed; movement
    /// away from the surface passes through unchanged.
    pub fn slide_against_average_normal(&self, movement: Vec3) -> Vec3 {
        let normal = self.average_normal();
        let into = movement.dot(&normal);
        if into < 0.0 {
            movement - normal * into
        } else {
            movement
        }
    }

    /// Distance from `from` to the nearest contact point
    pub fn closest_contact_distance(&self, from: Vec3) -> f32 {
        self.intersections
            .iter()
            .map(|i| (i.contact_point - from).magnitude())
            .fold(f32::INFINITY, f32::min)
    }
}
