//! Read-only tree diagnostics.
//!
//! These walk a finished tree and never modify it. They are meant for the
//! verbose output of the driver.

use std::fmt;

use crate::budget::Budget;
use crate::error::MctsError;
use crate::mcts::SearchResult;
use crate::node::NodeId;
use crate::state::State;
use crate::tree::Tree;
use crate::ucb::Ucb;

/// Number of nodes in the subtree rooted at `node`.
pub fn tree_size<S: State>(tree: &Tree<S>, node: NodeId) -> usize {
    1 + tree
        .get(node)
        .children()
        .iter()
        .map(|&c| tree_size(tree, c))
        .sum::<usize>()
}

/// Number of nodes on the longest downward path from `node`. A leaf has
/// depth 1.
pub fn tree_depth<S: State>(tree: &Tree<S>, node: NodeId) -> usize {
    1 + tree
        .get(node)
        .children()
        .iter()
        .map(|&c| tree_depth(tree, c))
        .max()
        .unwrap_or(0)
}

/// Statistics of one child as seen from its parent.
#[derive(Debug, Clone, PartialEq)]
pub struct ChildInfo<A> {
    pub action: A,
    pub average_reward: f64,
    pub ucb: f64,
    pub visits: u32,
}

impl<A: fmt::Display> fmt::Display for ChildInfo<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "act:{} / R_ave:{:.3} / ucb:{:.3} / Nv:{}",
            self.action, self.average_reward, self.ucb, self.visits
        )
    }
}

/// One entry per child of `node`, sorted by action.
pub fn children_info<S: State>(
    tree: &Tree<S>,
    ucb: &Ucb,
    node: NodeId,
) -> Result<Vec<ChildInfo<S::Action>>, MctsError> {
    let mut infos = tree
        .get(node)
        .children()
        .iter()
        .map(|&c| {
            let child = tree.get(c);
            Ok(ChildInfo {
                action: child.action().ok_or(MctsError::NoChildren(node.0))?,
                average_reward: child
                    .average_reward()
                    .ok_or(MctsError::UnvisitedNode(c.0))?,
                ucb: ucb.score(tree, node, c)?,
                visits: child.visits(),
            })
        })
        .collect::<Result<Vec<_>, MctsError>>()?;
    infos.sort_by(|a, b| a.action.cmp(&b.action));
    Ok(infos)
}

/// Summary line followed by one line per root child.
pub fn format_report<S: State, B: Budget>(result: &SearchResult<S, B>) -> Result<String, MctsError> {
    let root = result.root();
    let mut lines = vec![format!(
        "tree_size : {} / tree_depth : {} / elapsed : {:.3} secs",
        tree_size(&result.tree, root),
        tree_depth(&result.tree, root),
        result.budget.elapsed().as_secs_f64()
    )];
    lines.extend(
        children_info(&result.tree, &result.ucb, root)?
            .iter()
            .map(ToString::to_string),
    );
    Ok(lines.join("\n"))
}
