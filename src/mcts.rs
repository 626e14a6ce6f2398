//! Monte Carlo Tree Search with UCB1 selection and random playouts.
//!
//! Each iteration of the search has four phases:
//! - Selection: descend through fully expanded nodes by UCB score
//! - Expansion: add one child for a random untried action
//! - Simulation: run the new node's playout
//! - Backpropagation: count the visit and apply the reward up to the root
//!
//! Descent always uses UCB. The move finally returned is chosen with a
//! separate [`BestChildMode`], by default the highest average reward.
//!
//! Every call to [`Mcts::search`] builds a fresh tree; nothing is reused
//! between calls.

use std::fmt;
use std::str::FromStr;

use tracing::{debug, trace};

use crate::budget::Budget;
use crate::error::MctsError;
use crate::node::NodeId;
use crate::report::tree_size;
use crate::state::State;
use crate::tree::Tree;
use crate::ucb::Ucb;

/// How [`Mcts::best_child`] ranks children.
///
/// In every mode an unvisited child outranks all visited siblings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BestChildMode {
    /// UCB score against the parent.
    Ucb,
    /// Mean reward, ignoring the exploration term.
    #[default]
    AverageReward,
    /// Visit count ("robust child").
    MostVisited,
}

impl BestChildMode {
    pub fn as_str(self) -> &'static str {
        match self {
            BestChildMode::Ucb => "ucb",
            BestChildMode::AverageReward => "average-reward",
            BestChildMode::MostVisited => "most-visited",
        }
    }
}

impl fmt::Display for BestChildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BestChildMode {
    type Err = MctsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "ucb" => Ok(BestChildMode::Ucb),
            "average-reward" => Ok(BestChildMode::AverageReward),
            "most-visited" => Ok(BestChildMode::MostVisited),
            _ => Err(MctsError::UnknownMode(s.to_string())),
        }
    }
}

/// Everything a search produced.
///
/// The tree is handed back so callers can inspect statistics, and the budget
/// so they can report how much of it was spent.
#[derive(Debug)]
pub struct SearchResult<S: State, B> {
    pub tree: Tree<S>,
    pub ucb: Ucb,
    pub budget: B,
    pub best_action: S::Action,
    /// Number of completed iterations.
    pub iterations: u32,
}

impl<S: State, B> SearchResult<S, B> {
    #[inline]
    pub fn root(&self) -> NodeId {
        self.tree.root()
    }
}

/// MCTS solver.
///
/// Owns the random source used both for picking untried actions and for
/// playouts, so a seeded solver gives reproducible searches.
#[derive(Debug, Clone)]
pub struct Mcts {
    ucb: Ucb,
    decision: BestChildMode,
    rng: fastrand::Rng,
}

impl Mcts {
    /// Create a solver seeded from system entropy.
    pub fn new(ucb: Ucb) -> Self {
        Self::with_rng(ucb, fastrand::Rng::new())
    }

    pub fn with_seed(ucb: Ucb, seed: u64) -> Self {
        Self::with_rng(ucb, fastrand::Rng::with_seed(seed))
    }

    pub fn with_rng(ucb: Ucb, rng: fastrand::Rng) -> Self {
        Self {
            ucb,
            decision: BestChildMode::default(),
            rng,
        }
    }

    /// Builder pattern: set how the final action is picked.
    pub fn with_decision(mut self, decision: BestChildMode) -> Self {
        self.decision = decision;
        self
    }

    #[inline]
    pub fn ucb(&self) -> &Ucb {
        &self.ucb
    }

    #[inline]
    pub fn decision(&self) -> BestChildMode {
        self.decision
    }

    /// Search from `state` until `budget` is exhausted and return the best
    /// action found together with the tree.
    pub fn search<S: State, B: Budget>(
        &mut self,
        state: S,
        mut budget: B,
    ) -> Result<SearchResult<S, B>, MctsError> {
        if state.is_terminal() {
            return Err(MctsError::TerminalState);
        }

        let mut tree = Tree::new(state);
        let root = tree.root();
        let mut iterations = 0u32;

        while !budget.is_exhausted() {
            let leaf = self.select_and_expand(&mut tree, root)?;
            let reward = tree.get(leaf).state().playout(&mut self.rng);
            tree.backpropagate(leaf, &reward);
            budget.consume();
            iterations += 1;

            trace!(
                iteration = iterations,
                leaf = leaf.0,
                leaf_visits = tree.get(leaf).visits(),
                "MCTS iteration complete"
            );
        }

        let best = self
            .best_child(&tree, root, self.decision)?
            .ok_or(MctsError::NoIterations)?;
        let best_action = tree
            .get(best)
            .action()
            .ok_or(MctsError::NoIterations)?;

        debug!(
            iterations,
            tree_size = tree_size(&tree, root),
            best_action = %best_action,
            decision = %self.decision,
            elapsed_secs = budget.elapsed().as_secs_f64(),
            "search finished"
        );

        Ok(SearchResult {
            tree,
            ucb: self.ucb,
            budget,
            best_action,
            iterations,
        })
    }

    /// Descend from `node` to the node the next playout should start from.
    ///
    /// Fully expanded nodes are passed through by UCB. The first node with an
    /// untried action gets a new child, which is returned. A terminal node
    /// is returned as is.
    pub fn select_and_expand<S: State>(
        &mut self,
        tree: &mut Tree<S>,
        node: NodeId,
    ) -> Result<NodeId, MctsError> {
        let mut current = node;

        while !tree.get(current).is_terminal() {
            if !tree.get(current).is_fully_expanded() {
                return self.expand(tree, current);
            }
            current = self
                .best_child(tree, current, BestChildMode::Ucb)?
                .ok_or(MctsError::NoChildren(current.0))?;
        }

        Ok(current)
    }

    /// Add a child for one untried action picked uniformly at random.
    pub fn expand<S: State>(
        &mut self,
        tree: &mut Tree<S>,
        node: NodeId,
    ) -> Result<NodeId, MctsError> {
        let untried = tree.get(node).untried_actions();
        if untried.is_empty() {
            return Err(MctsError::NoChildren(node.0));
        }
        let action = untried[self.rng.usize(..untried.len())];
        tree.add_child(node, action)
    }

    /// Child of `node` with the highest score under `mode`.
    ///
    /// Unvisited children score `+inf`. Ties go to the earliest child.
    /// Returns `None` if `node` has no children.
    pub fn best_child<S: State>(
        &self,
        tree: &Tree<S>,
        node: NodeId,
        mode: BestChildMode,
    ) -> Result<Option<NodeId>, MctsError> {
        let mut max_score = f64::NEG_INFINITY;
        let mut best = None;

        for &child in tree.get(node).children() {
            let child_node = tree.get(child);
            let score = if child_node.visits() == 0 {
                f64::INFINITY
            } else {
                match mode {
                    BestChildMode::Ucb => self.ucb.score(tree, node, child)?,
                    BestChildMode::AverageReward => child_node
                        .average_reward()
                        .ok_or(MctsError::UnvisitedNode(child.0))?,
                    BestChildMode::MostVisited => child_node.visits() as f64,
                }
            };

            if score > max_score || best.is_none() {
                best = Some(child);
                max_score = score;
            }
        }

        Ok(best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::CountBudget;
    use crate::twentyone::{Player, TwentyOneReward, TwentyOneState};
    use crate::ucb::unit_interval;

    fn solver() -> Mcts {
        Mcts::with_seed(Ucb::new(1.0, unit_interval), 42)
    }

    /// Root at the opening with children for actions 1, 2, 3 whose averages
    /// (from player One's view) are given.
    fn scored_root(averages: &[(u32, f64, u32)]) -> Tree<TwentyOneState> {
        let mut tree = Tree::new(TwentyOneState::new(1));
        let root = tree.root();
        for &(action, avg, visits) in averages {
            let child = tree.add_child(root, action).unwrap();
            let reward = TwentyOneReward::new(-avg, Player::Two);
            for _ in 0..visits {
                tree.backpropagate(child, &reward);
            }
        }
        tree
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("ucb".parse::<BestChildMode>(), Ok(BestChildMode::Ucb));
        assert_eq!(
            "average_reward".parse::<BestChildMode>(),
            Ok(BestChildMode::AverageReward)
        );
        assert_eq!(
            "Most-Visited".parse::<BestChildMode>(),
            Ok(BestChildMode::MostVisited)
        );
        assert_eq!(
            "minimax".parse::<BestChildMode>(),
            Err(MctsError::UnknownMode("minimax".to_string()))
        );
        assert_eq!(BestChildMode::default(), BestChildMode::AverageReward);
    }

    #[test]
    fn test_best_child_by_average() {
        let tree = scored_root(&[(1, 0.2, 3), (2, 0.8, 1), (3, -0.5, 6)]);
        let best = solver()
            .best_child(&tree, tree.root(), BestChildMode::AverageReward)
            .unwrap()
            .unwrap();
        assert_eq!(tree.get(best).action(), Some(2));
    }

    #[test]
    fn test_best_child_most_visited() {
        let tree = scored_root(&[(1, 0.2, 3), (2, 0.8, 1), (3, -0.5, 6)]);
        let best = solver()
            .best_child(&tree, tree.root(), BestChildMode::MostVisited)
            .unwrap()
            .unwrap();
        assert_eq!(tree.get(best).action(), Some(3));
    }

    #[test]
    fn test_best_child_prefers_unvisited() {
        let mut tree = scored_root(&[(1, 1.0, 5), (2, 1.0, 5)]);
        let root = tree.root();
        let fresh = tree.add_child(root, 3).unwrap();
        for mode in [
            BestChildMode::Ucb,
            BestChildMode::AverageReward,
            BestChildMode::MostVisited,
        ] {
            let best = solver().best_child(&tree, root, mode).unwrap();
            assert_eq!(best, Some(fresh), "mode {mode}");
        }
    }

    #[test]
    fn test_best_child_ties_go_to_first() {
        let tree = scored_root(&[(3, 0.5, 2), (1, 0.5, 2), (2, 0.5, 2)]);
        let root = tree.root();
        let first = tree.get(root).children()[0];
        for mode in [BestChildMode::Ucb, BestChildMode::AverageReward] {
            let best = solver().best_child(&tree, root, mode).unwrap();
            assert_eq!(best, Some(first));
        }
    }

    #[test]
    fn test_best_child_without_children() {
        let tree = Tree::new(TwentyOneState::new(1));
        let best = solver()
            .best_child(&tree, tree.root(), BestChildMode::Ucb)
            .unwrap();
        assert!(best.is_none());
    }

    #[test]
    fn test_expand_adds_one_untried_child() {
        let mut tree = Tree::new(TwentyOneState::new(1));
        let root = tree.root();
        let mut mcts = solver();
        let mut seen = Vec::new();
        for _ in 0..3 {
            let child = mcts.expand(&mut tree, root).unwrap();
            let action = tree.get(child).action().unwrap();
            assert!(!seen.contains(&action));
            seen.push(action);
        }
        seen.sort();
        assert_eq!(seen, vec![1, 2, 3]);
        assert_eq!(
            mcts.expand(&mut tree, root),
            Err(MctsError::NoChildren(root.0))
        );
    }

    #[test]
    fn test_select_returns_terminal_node() {
        let terminal = TwentyOneState::with_cursor(Player::One, 22, 1);
        let mut tree = Tree::new(terminal);
        let root = tree.root();
        let selected = solver().select_and_expand(&mut tree, root).unwrap();
        assert_eq!(selected, root);
        assert!(tree.get(root).children().is_empty());
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_search_rejects_terminal_root() {
        let terminal = TwentyOneState::with_cursor(Player::Two, 22, 1);
        let err = solver().search(terminal, CountBudget::new(10)).unwrap_err();
        assert_eq!(err, MctsError::TerminalState);
    }

    #[test]
    fn test_search_with_empty_budget() {
        let err = solver()
            .search(TwentyOneState::new(1), CountBudget::new(0))
            .unwrap_err();
        assert_eq!(err, MctsError::NoIterations);
    }

    #[test]
    fn test_search_counts_iterations() {
        let result = solver()
            .search(TwentyOneState::new(2), CountBudget::new(50))
            .unwrap();
        assert_eq!(result.iterations, 50);
        assert_eq!(result.tree.get(result.root()).visits(), 50);
        assert!(result.budget.is_exhausted());
        assert!((1..=3).contains(&result.best_action));
    }
}
