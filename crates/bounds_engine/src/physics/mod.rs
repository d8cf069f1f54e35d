//! Physics module for collision detection
//!
//! Narrow-phase overlap tests between bounding volumes plus the sweep query
//! used for simple movement resolution. There is no dynamics here: results
//! are overlap flags and correction vectors.

pub mod bounds;
pub mod collision;
pub mod collision_system;

#[cfg(test)]
mod tests;

pub use bounds::Bounds;
pub use collision::{
    BoundingAabb,
    BoundingCapsule,
    BoundingSphere,
    BoundingTriangles,
    BoundingVolume,
    BoundsError,
    Collision,
    Intersection,
    PairRole,
    Triangle,
    WorldShape,
};
pub use collision_system::sweep;
