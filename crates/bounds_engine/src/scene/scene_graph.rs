//! Scene graph owning nodes and their bounding volumes
//!
//! Nodes live in a generational slot map, so a [`NodeId`] held after its
//! node was removed is detected instead of aliasing a new node. World
//! transforms are composed from the parent chain on every call.

use log::{debug, info};
use slotmap::{new_key_type, SlotMap};
use thiserror::Error;

use crate::config::SceneDescription;
use crate::foundation::math::{Quat, Transform, Vec3};
use crate::physics::collision::{BoundingVolume, BoundsError, Collision};
use crate::physics::Bounds;

new_key_type! {
    /// Generation-checked handle to a scene node
    pub struct NodeId;
}

/// Scene graph errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    /// Handle refers to a removed node
    #[error("Node {0:?} not found")]
    NodeNotFound(NodeId),

    /// Node carries no bounding volume
    #[error("Node '{0}' has no bounding volume")]
    MissingBounds(String),

    /// A description names a parent that was not declared before it
    #[error("Unknown parent '{parent}' for node '{node}'")]
    UnknownParent {
        /// Node being created
        node: String,
        /// Missing parent name
        parent: String,
    },

    /// Reparenting would make a node its own ancestor
    #[error("Node {0:?} cannot become a descendant of itself")]
    Cycle(NodeId),

    /// A described bounding volume could not be built
    #[error("Invalid bounds: {0}")]
    Bounds(#[from] BoundsError),
}

/// Source of world transforms for collision queries
pub trait TransformProvider {
    /// World transform of `id`, or `None` for a stale handle
    fn world_transform(&self, id: NodeId) -> Option<Transform>;
}

/// A named node with a local transform
#[derive(Debug, Clone)]
pub struct Node {
    name: String,
    local: Transform,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    bounds: Option<BoundingVolume>,
}

impl Node {
    fn new(name: String, local: Transform) -> Self {
        Self { name, local, parent: None, children: Vec::new(), bounds: None }
    }

    /// Node name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Transform relative to the parent
    pub fn local_transform(&self) -> &Transform {
        &self.local
    }

    /// Mutable transform relative to the parent
    pub fn local_transform_mut(&mut self) -> &mut Transform {
        &mut self.local
    }

    /// Parent handle, `None` for roots
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child handles in insertion order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Bounding volume, if any
    pub fn bounds(&self) -> Option<&BoundingVolume> {
        self.bounds.as_ref()
    }

    /// Mutable bounding volume, if any
    pub fn bounds_mut(&mut self) -> Option<&mut BoundingVolume> {
        self.bounds.as_mut()
    }
}

/// Hierarchy of nodes with optional bounding volumes
#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    nodes: SlotMap<NodeId, Node>,
}

impl SceneGraph {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a scene from a description
    ///
    /// Parents must be declared before their children.
    pub fn from_description(description: &SceneDescription) -> Result<Self, SceneError> {
        let mut scene = Self::new();
        for node in &description.nodes {
            let id = match &node.parent {
                Some(parent) => {
                    let parent_id = scene.find_by_name(parent).ok_or_else(|| SceneError::UnknownParent {
                        node: node.name.clone(),
                        parent: parent.clone(),
                    })?;
                    scene.add_child(parent_id, node.name.clone(), node.transform())?
                }
                None => scene.add_node(node.name.clone(), node.transform()),
            };
            if let Some(bounds) = &node.bounds {
                scene.set_bounds(id, bounds.build()?)?;
            }
        }
        info!("Built scene with {} nodes", scene.len());
        Ok(scene)
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the scene has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Add a root node
    pub fn add_node(&mut self, name: impl Into<String>, local: Transform) -> NodeId {
        self.nodes.insert(Node::new(name.into(), local))
    }

    /// Add a node under `parent`
    pub fn add_child(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        local: Transform,
    ) -> Result<NodeId, SceneError> {
        if !self.nodes.contains_key(parent) {
            return Err(SceneError::NodeNotFound(parent));
        }
        let id = self.add_node(name, local);
        self.attach(id, parent);
        Ok(id)
    }

    fn attach(&mut self, id: NodeId, parent: NodeId) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.parent = Some(parent);
        }
        if let Some(parent_node) = self.nodes.get_mut(parent) {
            parent_node.children.push(id);
        }
    }

    fn detach(&mut self, id: NodeId) {
        let parent = self.nodes.get_mut(id).and_then(|node| node.parent.take());
        if let Some(parent_node) = parent.and_then(|parent| self.nodes.get_mut(parent)) {
            parent_node.children.retain(|child| *child != id);
        }
    }

    /// Move `id` under `parent`, or make it a root with `None`
    ///
    /// The local transform is kept as is, so the world transform changes.
    pub fn set_parent(&mut self, id: NodeId, parent: Option<NodeId>) -> Result<(), SceneError> {
        if !self.nodes.contains_key(id) {
            return Err(SceneError::NodeNotFound(id));
        }
        if let Some(parent) = parent {
            if !self.nodes.contains_key(parent) {
                return Err(SceneError::NodeNotFound(parent));
            }
            // Walk up from the new parent; meeting `id` means a cycle
            let mut ancestor = Some(parent);
            while let Some(current) = ancestor {
                if current == id {
                    return Err(SceneError::Cycle(id));
                }
                ancestor = self.nodes.get(current).and_then(Node::parent);
            }
        }

        self.detach(id);
        if let Some(parent) = parent {
            self.attach(id, parent);
        }
        Ok(())
    }

    /// Remove a node and all of its descendants
    pub fn remove_node(&mut self, id: NodeId) -> Result<(), SceneError> {
        if !self.nodes.contains_key(id) {
            return Err(SceneError::NodeNotFound(id));
        }
        self.detach(id);

        let mut pending = vec![id];
        while let Some(current) = pending.pop() {
            if let Some(node) = self.nodes.remove(current) {
                debug!("Removed node '{}'", node.name);
                pending.extend(node.children);
            }
        }
        Ok(())
    }

    /// Node for `id`
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Mutable node for `id`
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    fn node_mut_or_err(&mut self, id: NodeId) -> Result<&mut Node, SceneError> {
        self.nodes.get_mut(id).ok_or(SceneError::NodeNotFound(id))
    }

    /// First node with the given name
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|(_, node)| node.name == name)
            .map(|(id, _)| id)
    }

    /// Every node handle
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys()
    }

    /// Set the local position
    pub fn set_local_position(&mut self, id: NodeId, position: Vec3) -> Result<(), SceneError> {
        self.node_mut_or_err(id)?.local.position = position;
        Ok(())
    }

    /// Move the node by `delta` in its parent's space
    pub fn translate(&mut self, id: NodeId, delta: Vec3) -> Result<(), SceneError> {
        self.node_mut_or_err(id)?.local.position += delta;
        Ok(())
    }

    /// Set the local rotation
    pub fn set_local_rotation(&mut self, id: NodeId, rotation: Quat) -> Result<(), SceneError> {
        self.node_mut_or_err(id)?.local.rotation = rotation;
        Ok(())
    }

    /// Set the local scale
    pub fn set_local_scale(&mut self, id: NodeId, scale: Vec3) -> Result<(), SceneError> {
        self.node_mut_or_err(id)?.local.scale = scale;
        Ok(())
    }

    /// Attach a bounding volume, replacing any previous one
    pub fn set_bounds(&mut self, id: NodeId, bounds: impl Into<BoundingVolume>) -> Result<(), SceneError> {
        self.node_mut_or_err(id)?.bounds = Some(bounds.into());
        Ok(())
    }

    /// Detach and return the node's bounding volume
    pub fn take_bounds(&mut self, id: NodeId) -> Result<Option<BoundingVolume>, SceneError> {
        Ok(self.node_mut_or_err(id)?.bounds.take())
    }

    /// World transform of `id`, composed through every ancestor
    pub fn world_transform(&self, id: NodeId) -> Option<Transform> {
        let node = self.nodes.get(id)?;
        match node.parent {
            Some(parent) => Some(self.world_transform(parent)?.combine(&node.local)),
            None => Some(node.local),
        }
    }

    /// Resolved collision view of a node's bounding volume
    pub fn bounds(&self, id: NodeId) -> Result<Bounds<'_>, SceneError> {
        let node = self.nodes.get(id).ok_or(SceneError::NodeNotFound(id))?;
        let volume = node
            .bounds
            .as_ref()
            .ok_or_else(|| SceneError::MissingBounds(node.name.clone()))?;
        Bounds::resolve(self, id, volume).ok_or(SceneError::NodeNotFound(id))
    }

    /// Collision views of every node carrying a volume
    pub fn all_bounds(&self) -> Vec<Bounds<'_>> {
        self.ids()
            .filter_map(|id| self.bounds(id).ok())
            .collect()
    }

    fn resolve_all(&self, ids: &[NodeId]) -> Result<Vec<Bounds<'_>>, SceneError> {
        ids.iter().map(|id| self.bounds(*id)).collect()
    }

    /// Contact data for `id` against `other`, if they overlap
    pub fn collision(&self, id: NodeId, other: NodeId) -> Result<Option<Collision>, SceneError> {
        Ok(self.bounds(id)?.collision(&self.bounds(other)?))
    }

    /// Whether `id` overlaps `other`
    pub fn colliding(&self, id: NodeId, other: NodeId) -> Result<bool, SceneError> {
        Ok(self.bounds(id)?.colliding(&self.bounds(other)?))
    }

    /// Collisions `id` would have after moving by `delta`, nearest first
    pub fn collision_test(
        &self,
        id: NodeId,
        delta: Vec3,
        others: &[NodeId],
    ) -> Result<Vec<Collision>, SceneError> {
        let others = self.resolve_all(others)?;
        Ok(self.bounds(id)?.collision_test(delta, &others))
    }
}

impl TransformProvider for SceneGraph {
    fn world_transform(&self, id: NodeId) -> Option<Transform> {
        SceneGraph::world_transform(self, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BoundsDescription, NodeDescription};
    use approx::assert_relative_eq;
    use std::f32::consts::PI;

    #[test]
    fn test_world_transform_composes_parents() {
        let mut scene = SceneGraph::new();
        let root = scene.add_node(
            "root",
            Transform::from_parts(
                Vec3::new(1.0, 0.0, 0.0),
                Quat::from_axis_angle(&Vec3::y_axis(), PI / 2.0),
                Vec3::new(2.0, 2.0, 2.0),
            ),
        );
        let child = scene.add_child(root, "child", Transform::from_position(Vec3::new(0.0, 0.0, 1.0))).unwrap();

        let world = scene.world_transform(child).unwrap();
        assert_relative_eq!(world.position, Vec3::new(3.0, 0.0, 0.0), epsilon = 1e-5);
        assert_relative_eq!(world.scale, Vec3::new(2.0, 2.0, 2.0));
    }

    #[test]
    fn test_remove_node_removes_descendants() {
        let mut scene = SceneGraph::new();
        let root = scene.add_node("root", Transform::identity());
        let child = scene.add_child(root, "child", Transform::identity()).unwrap();
        let grandchild = scene.add_child(child, "grandchild", Transform::identity()).unwrap();

        scene.remove_node(child).unwrap();
        assert_eq!(scene.len(), 1);
        assert!(scene.node(grandchild).is_none());
        assert!(scene.node(root).unwrap().children().is_empty());
        assert_eq!(scene.remove_node(child), Err(SceneError::NodeNotFound(child)));
    }

    #[test]
    fn test_stale_handle_is_not_reused() {
        let mut scene = SceneGraph::new();
        let old = scene.add_node("old", Transform::identity());
        scene.remove_node(old).unwrap();
        let new = scene.add_node("new", Transform::identity());
        assert_ne!(old, new);
        assert!(scene.world_transform(old).is_none());
    }

    #[test]
    fn test_set_parent_rejects_cycles() {
        let mut scene = SceneGraph::new();
        let a = scene.add_node("a", Transform::identity());
        let b = scene.add_child(a, "b", Transform::identity()).unwrap();
        assert_eq!(scene.set_parent(a, Some(b)), Err(SceneError::Cycle(a)));
        assert_eq!(scene.set_parent(a, Some(a)), Err(SceneError::Cycle(a)));

        scene.set_parent(b, None).unwrap();
        assert!(scene.node(b).unwrap().parent().is_none());
        assert!(scene.node(a).unwrap().children().is_empty());
    }

    #[test]
    fn test_bounds_requires_volume() {
        let mut scene = SceneGraph::new();
        let empty = scene.add_node("empty", Transform::identity());
        assert_eq!(
            scene.bounds(empty).err(),
            Some(SceneError::MissingBounds("empty".to_string()))
        );

        scene.set_bounds(empty, BoundingVolume::sphere(1.0)).unwrap();
        assert_eq!(scene.all_bounds().len(), 1);
        assert_eq!(scene.take_bounds(empty).unwrap(), Some(BoundingVolume::sphere(1.0)));
        assert!(scene.all_bounds().is_empty());
        assert_eq!(scene.ids().count(), 1);
    }

    #[test]
    fn test_translate_moves_bounds() {
        let mut scene = SceneGraph::new();
        let a = scene.add_node("a", Transform::identity());
        let b = scene.add_node("b", Transform::from_position(Vec3::new(3.0, 0.0, 0.0)));
        scene.set_bounds(a, BoundingVolume::sphere(1.0)).unwrap();
        scene.set_bounds(b, BoundingVolume::sphere(1.0)).unwrap();
        assert!(!scene.colliding(a, b).unwrap());

        scene.translate(a, Vec3::new(1.5, 0.0, 0.0)).unwrap();
        assert!(scene.colliding(a, b).unwrap());
    }

    #[test]
    fn test_from_description_links_parents() {
        let description = SceneDescription {
            nodes: vec![
                NodeDescription::new("body").at(Vec3::new(0.0, 2.0, 0.0)),
                NodeDescription::new("head")
                    .with_parent("body")
                    .at(Vec3::new(0.0, 1.0, 0.0))
                    .with_bounds(BoundsDescription::Sphere { radius: 0.3 }),
            ],
        };
        let scene = SceneGraph::from_description(&description).unwrap();
        let head = scene.find_by_name("head").unwrap();
        assert_relative_eq!(scene.world_transform(head).unwrap().position, Vec3::new(0.0, 3.0, 0.0));
        assert!(scene.bounds(head).is_ok());
    }

    #[test]
    fn test_from_description_unknown_parent() {
        let description = SceneDescription {
            nodes: vec![NodeDescription::new("orphan").with_parent("nobody")],
        };
        assert_eq!(
            SceneGraph::from_description(&description).err(),
            Some(SceneError::UnknownParent {
                node: "orphan".to_string(),
                parent: "nobody".to_string(),
            })
        );
    }
}
