//! Search tree with arena allocation.
//!
//! All nodes are stored in one `Vec` and referenced by [`NodeId`]. The root
//! is always `NodeId(0)`. Children are only created through
//! [`Tree::add_child`], which keeps every node's tried actions a subset of
//! its legal actions.

use tracing::debug;

use crate::error::MctsError;
use crate::node::{Node, NodeId};
use crate::state::{Reward, State};

/// Search tree owning every node built by one search.
#[derive(Debug, Clone)]
pub struct Tree<S: State> {
    nodes: Vec<Node<S>>,
}

impl<S: State> Tree<S> {
    /// Create a tree holding a single unvisited root.
    pub fn new(root_state: S) -> Self {
        Self {
            nodes: vec![Node::new_root(root_state)],
        }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Get a node by ID.
    ///
    /// IDs are only handed out by this tree, so an out-of-range ID is a bug
    /// in the caller and panics.
    #[inline]
    pub fn get(&self, id: NodeId) -> &Node<S> {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut Node<S> {
        &mut self.nodes[id.index()]
    }

    /// Number of nodes allocated.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false; a tree has at least its root.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Expand `action` under `parent`.
    ///
    /// The action must be legal in the parent's state and not expanded yet.
    /// The new child starts with zero visits and zero reward.
    pub fn add_child(&mut self, parent: NodeId, action: S::Action) -> Result<NodeId, MctsError> {
        let parent_node = self.get(parent);
        if parent_node.tried_actions.contains(&action) {
            return Err(MctsError::ActionAlreadyTried(action.to_string()));
        }
        if !parent_node.state().actions().contains(&action) {
            return Err(MctsError::IllegalAction(action.to_string()));
        }
        let child_state = parent_node.state().next_state(action)?;

        let child_id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::new_child(child_state, parent, action));

        let parent_node = self.get_mut(parent);
        parent_node.children.push(child_id);
        parent_node.tried_actions.push(action);

        debug!(parent = parent.0, child = child_id.0, %action, "expanded node");
        Ok(child_id)
    }

    /// Walk from `leaf` up to the root, counting a visit and applying
    /// `reward` at every node on the way.
    pub fn backpropagate(&mut self, leaf: NodeId, reward: &S::Reward) {
        let mut current = Some(leaf);
        while let Some(id) = current {
            let node = self.get_mut(id);
            node.record_visit();
            reward.apply(node);
            current = node.parent();
        }
    }

    /// IDs from the root down to `id`, inclusive.
    pub fn path_to(&self, id: NodeId) -> Vec<NodeId> {
        let mut path = vec![id];
        let mut current = self.get(id).parent();
        while let Some(p) = current {
            path.push(p);
            current = self.get(p).parent();
        }
        path.reverse();
        path
    }

    /// Iterate over all nodes in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node<S>)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId(i as u32), n))
    }
}
