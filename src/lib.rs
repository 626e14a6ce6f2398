//! ucb-mcts: a generic Monte Carlo Tree Search engine.
//!
//! The engine searches any sequential two-player (or single-player) game that
//! implements the [`state::State`] contract. It grows a tree one node per
//! iteration, selects with UCB1, evaluates new nodes with random playouts and
//! backs the rewards up to the root, until a [`budget::Budget`] runs out.
//!
//! ## Modules
//!
//! - [`constants`] - Default tuning values and the 21 game's rules
//! - [`budget`] - Iteration and wall-clock stopping criteria
//! - [`state`] - The `State`/`Reward` contract implemented by domains
//! - [`node`] - Tree nodes and their statistics
//! - [`tree`] - Arena-allocated search tree and backpropagation
//! - [`ucb`] - UCB1 scoring
//! - [`mcts`] - The search loop
//! - [`report`] - Tree size/depth counters and per-child diagnostics
//! - [`twentyone`] - The "21 game", a small demo domain
//!
//! ## Example
//!
//! ```
//! use ucb_mcts::budget::CountBudget;
//! use ucb_mcts::mcts::Mcts;
//! use ucb_mcts::twentyone::TwentyOneState;
//! use ucb_mcts::ucb::{Ucb, unit_interval};
//!
//! let mut solver = Mcts::with_seed(Ucb::new(0.1, unit_interval), 7);
//! let result = solver
//!     .search(TwentyOneState::new(5), CountBudget::new(200))
//!     .unwrap();
//!
//! assert!((1..=3).contains(&result.best_action));
//! assert_eq!(result.tree.get(result.root()).visits(), 200);
//! ```

pub mod budget;
pub mod constants;
pub mod error;
pub mod mcts;
pub mod node;
pub mod report;
pub mod state;
pub mod tree;
pub mod twentyone;
pub mod ucb;

pub use error::MctsError;
