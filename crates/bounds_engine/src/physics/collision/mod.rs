//! Narrow-phase collision detection between bounding volumes
//!
//! # Architecture
//!
//! - **Model Space Storage**: volumes keep only local dimensions
//! - **On-Demand Transformation**: world-space shapes are built from the
//!   node transform for each query and dropped afterwards
//! - **Canonical Pairs**: one routine per unordered pair of kinds, the
//!   reverse order is derived by inverting the result
//!
//! # Module Organization
//!
//! - [`volume`] - Model-space capsule, sphere and box volumes
//! - [`mesh`] - Model-space triangle lists
//! - [`primitives`] - World-space capsule, sphere, box and triangle
//! - [`shape`] - World-space shape enum and pair dispatch
//! - [`pairs`] - The pairwise intersection routines
//! - [`contact`] - Intersection and collision results

pub mod contact;
pub mod mesh;
pub mod pairs;
pub mod primitives;
pub mod shape;
pub mod volume;

pub use contact::{Collision, Intersection};
pub use mesh::{BoundingTriangles, BoundsError, WorldTriangles};
pub use pairs::PairRole;
pub use primitives::{Triangle, TriangleRegion, WorldAabb, WorldCapsule, WorldSphere};
pub use shape::WorldShape;
pub use volume::{BoundingAabb, BoundingCapsule, BoundingSphere, BoundingVolume};
