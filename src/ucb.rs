//! Upper Confidence Bound scoring.
//!
//! ```text
//! score = scaler(avg_reward(child)) + C * sqrt(2 * ln(N_parent) / N_child)
//! ```

use crate::error::MctsError;
use crate::node::{Node, NodeId};
use crate::state::State;
use crate::tree::Tree;

/// Leaves rewards unchanged.
pub fn identity(x: f64) -> f64 {
    x
}

/// Maps a reward in [-1, 1] onto [0, 1].
pub fn unit_interval(x: f64) -> f64 {
    0.5 * (x + 1.0)
}

/// UCB1 scorer with a configurable exploration constant and reward scaler.
#[derive(Debug, Clone, Copy)]
pub struct Ucb {
    exploration_constant: f64,
    scaler: fn(f64) -> f64,
}

impl Default for Ucb {
    fn default() -> Self {
        Self::new(crate::constants::DEFAULT_EXPLORATION_CONSTANT, unit_interval)
    }
}

impl Ucb {
    pub fn new(exploration_constant: f64, scaler: fn(f64) -> f64) -> Self {
        Self {
            exploration_constant,
            scaler,
        }
    }

    /// Scorer without scaling.
    pub fn unscaled(exploration_constant: f64) -> Self {
        Self::new(exploration_constant, identity)
    }

    #[inline]
    pub fn exploration_constant(&self) -> f64 {
        self.exploration_constant
    }

    #[inline]
    pub fn scale(&self, reward: f64) -> f64 {
        (self.scaler)(reward)
    }

    /// Score `child` as seen from `parent`. Both must have been visited.
    pub fn calc<S: State>(&self, parent: &Node<S>, child: &Node<S>) -> Option<f64> {
        let average = child.average_reward()?;
        if parent.visits() == 0 {
            return None;
        }
        let parent_visits = parent.visits() as f64;
        let child_visits = child.visits() as f64;
        let exploration = (2.0 * parent_visits.ln() / child_visits).sqrt();
        Some(self.scale(average) + self.exploration_constant * exploration)
    }

    /// [`Ucb::calc`] on tree nodes, reporting which node was unvisited.
    pub fn score<S: State>(
        &self,
        tree: &Tree<S>,
        parent: NodeId,
        child: NodeId,
    ) -> Result<f64, MctsError> {
        let parent_node = tree.get(parent);
        let child_node = tree.get(child);
        if parent_node.visits() == 0 {
            return Err(MctsError::UnvisitedNode(parent.0));
        }
        self.calc(parent_node, child_node)
            .ok_or(MctsError::UnvisitedNode(child.0))
    }
}
