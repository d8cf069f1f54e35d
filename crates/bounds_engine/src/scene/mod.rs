//! Scene graph
//!
//! Supplies world transforms for nodes and owns their bounding volumes.
//! Collision code never stores nodes; it addresses them by [`NodeId`].

mod scene_graph;

pub use scene_graph::{Node, NodeId, SceneError, SceneGraph, TransformProvider};
