//! Contract violations raised by the engine.
//!
//! None of these are recoverable runtime conditions: each one means a caller
//! or a domain implementation broke the contract of [`crate::state::State`]
//! or of the tree. They are surfaced as values so that callers fail fast
//! instead of searching on garbage.

use thiserror::Error;

/// Errors that can occur while building or searching a tree.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MctsError {
    #[error("illegal action {0}")]
    IllegalAction(String),

    #[error("action {0} was already expanded")]
    ActionAlreadyTried(String),

    #[error("node {0} has not been visited")]
    UnvisitedNode(u32),

    #[error("unknown selection mode: {0}")]
    UnknownMode(String),

    #[error("cannot search from a terminal state")]
    TerminalState,

    #[error("budget was exhausted before any iteration ran")]
    NoIterations,

    #[error("node {0} is fully expanded but has no children")]
    NoChildren(u32),
}
