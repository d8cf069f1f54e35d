//! Triangle-mesh bounding volumes
//!
//! A mesh volume keeps its triangles in MODEL SPACE and is transformed to
//! world space on demand, once per query. Nothing world-space is cached.

use log::warn;
use thiserror::Error;

use crate::foundation::math::{Transform, Vec3};
use super::primitives::{Triangle, WorldSphere};

/// Errors raised while building a mesh volume
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoundsError {
    /// Index buffer length is not a multiple of three
    #[error("Index count {0} is not a multiple of 3")]
    IndexCount(usize),

    /// An index points past the end of the vertex buffer
    #[error("Index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        /// Offending index
        index: u32,
        /// Number of vertices supplied
        vertex_count: usize,
    },
}

/// A triangle list stored in model space
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoundingTriangles {
    triangles: Vec<Triangle>,
    local_radius: f32,
}

impl BoundingTriangles {
    /// Build from model-space triangles
    ///
    /// Zero-area triangles carry no usable normal and are dropped.
    pub fn from_triangles(triangles: impl IntoIterator<Item = Triangle>) -> Self {
        let triangles: Vec<Triangle> = triangles
            .into_iter()
            .enumerate()
            .filter_map(|(index, triangle)| {
                if triangle.is_degenerate() {
                    warn!("Skipping degenerate triangle {index} in bounding mesh");
                    None
                } else {
                    Some(triangle)
                }
            })
            .collect();

        let local_radius = triangles
            .iter()
            .map(Triangle::max_vertex_distance)
            .fold(0.0, f32::max);

        Self { triangles, local_radius }
    }

    /// Build from model-space vertices and a triangle index list
    pub fn from_indexed(vertices: &[Vec3], indices: &[u32]) -> Result<Self, BoundsError> {
        if indices.len() % 3 != 0 {
            return Err(BoundsError::IndexCount(indices.len()));
        }

        let vertex = |index: u32| {
            vertices
                .get(index as usize)
                .copied()
                .ok_or(BoundsError::IndexOutOfRange { index, vertex_count: vertices.len() })
        };

        let triangles = indices
            .chunks_exact(3)
            .map(|chunk| Ok(Triangle::new(vertex(chunk[0])?, vertex(chunk[1])?, vertex(chunk[2])?)))
            .collect::<Result<Vec<_>, BoundsError>>()?;

        Ok(Self::from_triangles(triangles))
    }

    /// Model-space triangles
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Distance from the model origin to the furthest vertex
    pub fn local_radius(&self) -> f32 {
        self.local_radius
    }

    /// Number of triangles kept after construction
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    /// True when no triangles survived construction
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Transform every vertex by the full TRS of `transform`
    pub fn to_world(&self, transform: &Transform) -> WorldTriangles {
        WorldTriangles {
            triangles: self
                .triangles
                .iter()
                .map(|triangle| triangle.map_vertices(|v| transform.transform_point(v)))
                .collect(),
            center: transform.position,
            bounding_radius: self.local_radius * transform.max_scale(),
        }
    }
}

/// World-space triangle list (temporary, built per query)
#[derive(Debug, Clone, PartialEq)]
pub struct WorldTriangles {
    /// Triangles in world space, in model order
    pub triangles: Vec<Triangle>,
    /// World position of the model origin
    pub center: Vec3,
    /// Radius of a sphere around `center` holding every vertex
    pub bounding_radius: f32,
}

impl WorldTriangles {
    /// Bounding sphere used for early-outs
    pub fn bounding_sphere(&self) -> WorldSphere {
        WorldSphere::new(self.center, self.bounding_radius)
    }

    /// Copy moved by `delta`
    pub fn translated(&self, delta: Vec3) -> Self {
        Self {
            triangles: self.triangles.iter().map(|t| t.translated(delta)).collect(),
            center: self.center + delta,
            bounding_radius: self.bounding_radius,
        }
    }

    /// Closest point on any triangle to `point`
    pub fn closest_point(&self, point: Vec3) -> Option<Vec3> {
        self.triangles
            .iter()
            .map(|triangle| triangle.closest_point(point))
            .min_by(|a, b| {
                (a - point).magnitude_squared().total_cmp(&(b - point).magnitude_squared())
            })
    }

    /// Whether the sphere at `center` with `radius` could touch the mesh
    pub fn may_touch_sphere(&self, center: Vec3, radius: f32) -> bool {
        let bounds = self.bounding_sphere();
        let reach = bounds.radius + radius;
        (center - bounds.center).magnitude_squared() < reach * reach
    }
}
