//! # Bounds Engine
//!
//! Narrow-phase collision detection for scene-graph bounding volumes.
//!
//! ## Features
//!
//! - **Four Volume Kinds**: capsule, sphere, axis-aligned box, triangle mesh
//! - **Contact Data**: minimum translation vector, normal and contact point
//! - **Sweep Queries**: "would moving by this delta collide?", nearest first
//! - **Scene Graph**: parent-chain transforms with generational node handles
//! - **Scene Files**: TOML or RON scene descriptions
//!
//! ## Quick Start
//!
//! ```rust
//! use bounds_engine::prelude::*;
//!
//! let mut scene = SceneGraph::new();
//! let player = scene.add_node("player", Transform::from_position(Vec3::new(0.0, 2.0, 0.0)));
//! let ball = scene.add_node("ball", Transform::identity());
//! scene.set_bounds(player, BoundingVolume::capsule(4.0, 1.0)).unwrap();
//! scene.set_bounds(ball, BoundingVolume::sphere(1.0)).unwrap();
//!
//! let collision = scene.collision(player, ball).unwrap().unwrap();
//! assert!(collision.average_mtv().y > 0.0);
//!
//! let hits = scene.collision_test(player, Vec3::new(0.0, 5.0, 0.0), &[ball]).unwrap();
//! assert!(hits.is_empty());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod foundation;
pub mod physics;
pub mod scene;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{BoundsDescription, Config, ConfigError, NodeDescription, SceneDescription},
        foundation::math::{Quat, Transform, Vec3},
        physics::{
            Bounds, BoundingAabb, BoundingCapsule, BoundingSphere, BoundingTriangles,
            BoundingVolume, BoundsError, Collision, Intersection, PairRole, Triangle,
        },
        scene::{NodeId, SceneError, SceneGraph, TransformProvider},
    };
}
