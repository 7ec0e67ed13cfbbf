//! Arena-backed scene graph storage
//!
//! Nodes live in a slot map so the per-frame render artifacts (render list,
//! light list, id lookup) can hold stable keys instead of references into
//! the tree. Parent/child structure is the root key list plus each node's
//! child key list.

use slotmap::SlotMap;

use crate::scene::entity::Entity;
use crate::scene::light::Light;
use crate::scene::node::SceneNode;

slotmap::new_key_type! {
    /// Stable handle to a node in the scene graph
    pub struct NodeKey;
}

/// Tree of scene nodes with slot-map storage
#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: SlotMap<NodeKey, SceneNode>,
    roots: Vec<NodeKey>,
}

impl SceneGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node at the top level of the graph
    pub fn insert_root(&mut self, node: SceneNode) -> NodeKey {
        let key = self.nodes.insert(node);
        self.roots.push(key);
        key
    }

    /// Insert a node as a child of `parent`.
    ///
    /// If the parent no longer exists the node is attached at the top level
    /// instead, so it is not silently lost.
    pub fn insert_child(&mut self, parent: NodeKey, node: SceneNode) -> NodeKey {
        let key = self.nodes.insert(node);
        if let Some(parent_node) = self.nodes.get_mut(parent) {
            parent_node.common.children.push(key);
        } else {
            log::warn!("insert_child: parent key is stale, attaching node as root");
            self.roots.push(key);
        }
        key
    }

    /// Remove a top-level node and its entire subtree
    pub fn remove_root(&mut self, key: NodeKey) -> Option<SceneNode> {
        self.roots.retain(|&k| k != key);
        self.remove_subtree(key)
    }

    /// Remove a child node (unlinking it from `parent`) and its subtree
    pub fn remove_child(&mut self, parent: NodeKey, key: NodeKey) -> Option<SceneNode> {
        if let Some(parent_node) = self.nodes.get_mut(parent) {
            parent_node.common.children.retain(|&k| k != key);
        }
        self.remove_subtree(key)
    }

    fn remove_subtree(&mut self, key: NodeKey) -> Option<SceneNode> {
        let node = self.nodes.remove(key)?;
        for &child in &node.common.children {
            self.remove_subtree(child);
        }
        Some(node)
    }

    /// Top-level node keys, in insertion order
    pub fn roots(&self) -> &[NodeKey] {
        &self.roots
    }

    /// Look up a node
    pub fn get(&self, key: NodeKey) -> Option<&SceneNode> {
        self.nodes.get(key)
    }

    /// Look up a node mutably
    pub fn get_mut(&mut self, key: NodeKey) -> Option<&mut SceneNode> {
        self.nodes.get_mut(key)
    }

    /// Entity payload of a node, if the key names an entity node
    pub fn entity(&self, key: NodeKey) -> Option<&Entity> {
        self.get(key).and_then(SceneNode::as_entity)
    }

    /// Mutable entity payload of a node
    pub fn entity_mut(&mut self, key: NodeKey) -> Option<&mut Entity> {
        self.get_mut(key).and_then(SceneNode::as_entity_mut)
    }

    /// Light payload of a node, if the key names a light node
    pub fn light(&self, key: NodeKey) -> Option<&Light> {
        self.get(key).and_then(SceneNode::as_light)
    }

    /// Number of live nodes in the graph
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph holds no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_lookup() {
        let mut graph = SceneGraph::new();
        let root = graph.insert_root(SceneNode::group().with_id("root"));
        let child = graph.insert_child(root, SceneNode::group().with_id("child"));

        assert_eq!(graph.roots(), &[root]);
        assert_eq!(graph.get(root).unwrap().common.children, vec![child]);
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn test_remove_root_drops_subtree() {
        let mut graph = SceneGraph::new();
        let root = graph.insert_root(SceneNode::group());
        let child = graph.insert_child(root, SceneNode::group());
        let grandchild = graph.insert_child(child, SceneNode::group());

        graph.remove_root(root);
        assert!(graph.is_empty());
        assert!(graph.get(grandchild).is_none());
    }

    #[test]
    fn test_stale_parent_falls_back_to_root() {
        let mut graph = SceneGraph::new();
        let root = graph.insert_root(SceneNode::group());
        graph.remove_root(root);

        let orphan = graph.insert_child(root, SceneNode::group());
        assert_eq!(graph.roots(), &[orphan]);
    }
}
