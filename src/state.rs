//! The contract a domain implements to be searched.
//!
//! A [`State`] is an immutable snapshot of a position. Transitions produce new
//! values, they never mutate. The engine only ever talks to a domain through
//! these two traits.

use std::fmt::{Debug, Display};

use crate::error::MctsError;
use crate::node::Node;

/// A position in a sequential decision problem.
pub trait State: Sized {
    /// A move. Ordering is only used to sort diagnostic output.
    type Action: Copy + Eq + Ord + Debug + Display;

    /// Outcome summary produced by [`State::playout`].
    type Reward: Reward<Self>;

    /// Legal actions from this position. Empty means terminal.
    fn actions(&self) -> Vec<Self::Action>;

    /// The position reached by playing `action`.
    ///
    /// Returns [`MctsError::IllegalAction`] if `action` is not in
    /// [`State::actions`].
    fn next_state(&self, action: Self::Action) -> Result<Self, MctsError>;

    fn is_terminal(&self) -> bool {
        self.actions().is_empty()
    }

    /// Play random legal moves to the end of the game and summarize the
    /// result. Domains may average several rollouts.
    fn playout(&self, rng: &mut fastrand::Rng) -> Self::Reward;
}

/// Result of a playout, folded into each node on the backup path.
pub trait Reward<S: State> {
    /// Add this reward to `node`, from the point of view of whoever moved
    /// into it.
    fn apply(&self, node: &mut Node<S>);
}
