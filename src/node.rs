//! Search tree node.
//!
//! Nodes live in the [`crate::tree::Tree`] arena and refer to each other by
//! [`NodeId`]. The parent link is a plain index, so the tree has a single
//! owner and no reference cycles.

use std::fmt;

use crate::state::State;

/// Index into the node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A node in the search tree.
///
/// `accumulated_reward` is kept from the point of view of the player who
/// chose the action leading here.
#[derive(Debug, Clone)]
pub struct Node<S: State> {
    state: S,
    visits: u32,
    accumulated_reward: f64,
    parent: Option<NodeId>,
    action: Option<S::Action>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) tried_actions: Vec<S::Action>,
}

impl<S: State> Node<S> {
    pub(crate) fn new_root(state: S) -> Self {
        Self {
            state,
            visits: 0,
            accumulated_reward: 0.0,
            parent: None,
            action: None,
            children: Vec::new(),
            tried_actions: Vec::new(),
        }
    }

    pub(crate) fn new_child(state: S, parent: NodeId, action: S::Action) -> Self {
        Self {
            parent: Some(parent),
            action: Some(action),
            ..Self::new_root(state)
        }
    }

    #[inline]
    pub fn state(&self) -> &S {
        &self.state
    }

    #[inline]
    pub fn visits(&self) -> u32 {
        self.visits
    }

    #[inline]
    pub fn accumulated_reward(&self) -> f64 {
        self.accumulated_reward
    }

    /// Parent node, `None` for the root.
    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Action that led here from the parent, `None` for the root.
    #[inline]
    pub fn action(&self) -> Option<S::Action> {
        self.action
    }

    /// Children in expansion order.
    #[inline]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Actions already expanded into children, in expansion order.
    #[inline]
    pub fn tried_actions(&self) -> &[S::Action] {
        &self.tried_actions
    }

    /// Mean reward, or `None` before the first visit.
    pub fn average_reward(&self) -> Option<f64> {
        if self.visits > 0 {
            Some(self.accumulated_reward / self.visits as f64)
        } else {
            None
        }
    }

    /// Legal actions without a child yet, in `State::actions` order.
    pub fn untried_actions(&self) -> Vec<S::Action> {
        self.state
            .actions()
            .into_iter()
            .filter(|a| !self.tried_actions.contains(a))
            .collect()
    }

    pub fn is_fully_expanded(&self) -> bool {
        self.untried_actions().is_empty()
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// Used by [`crate::state::Reward::apply`] implementations.
    pub fn add_reward(&mut self, delta: f64) {
        self.accumulated_reward += delta;
    }

    pub(crate) fn record_visit(&mut self) {
        self.visits += 1;
    }
}
