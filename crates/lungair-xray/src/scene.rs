//! Scene collaborator contract.

use std::collections::BTreeMap;
use std::fmt;

/// Handle of a node registered with a [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// What a scene node holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Volume,
    Segmentation,
    Transform,
}

/// Registry of displayable resources.
pub trait Scene {
    /// Register a node and return its handle.
    fn add_node(&mut self, kind: NodeKind, name: &str) -> NodeId;

    /// Remove a node. Removing an unknown node does nothing.
    fn remove_node(&mut self, id: NodeId);

    /// Drop subject groupings that no longer contain any volume.
    fn prune_unused_subjects(&mut self);
}

/// A registered node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneNode {
    pub kind: NodeKind,
    pub name: String,
}

/// In-memory scene.
#[derive(Debug, Default)]
pub struct MemoryScene {
    next_id: u64,
    nodes: BTreeMap<NodeId, SceneNode>,
    prune_count: usize,
}

impl MemoryScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of live nodes of `kind`.
    pub fn count(&self, kind: NodeKind) -> usize {
        self.nodes.values().filter(|node| node.kind == kind).count()
    }

    /// How many times unused subjects were pruned.
    pub fn prune_count(&self) -> usize {
        self.prune_count
    }
}

impl Scene for MemoryScene {
    fn add_node(&mut self, kind: NodeKind, name: &str) -> NodeId {
        self.next_id += 1;
        let id = NodeId(self.next_id);
        self.nodes.insert(
            id,
            SceneNode {
                kind,
                name: name.to_string(),
            },
        );
        id
    }

    fn remove_node(&mut self, id: NodeId) {
        self.nodes.remove(&id);
    }

    fn prune_unused_subjects(&mut self) {
        self.prune_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_scene_add_remove() {
        let mut scene = MemoryScene::new();
        let a = scene.add_node(NodeKind::Volume, "cxr");
        let b = scene.add_node(NodeKind::Transform, "t");
        assert_ne!(a, b);
        assert_eq!(scene.count(NodeKind::Volume), 1);

        scene.remove_node(a);
        scene.remove_node(a);
        assert!(!scene.contains(a));
        assert_eq!(scene.node(b).map(|n| n.name.as_str()), Some("t"));
    }
}
