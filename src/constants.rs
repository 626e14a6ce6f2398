//! Default tuning values for the search engine and the 21 game driver.
//!
//! Everything here is a default only. The engine takes its configuration
//! through constructor parameters, and the CLI exposes each value as a flag.

// =============================================================================
// UCB / MCTS Parameters
// =============================================================================

/// Default exploration constant `C` of the UCB formula.
pub const DEFAULT_EXPLORATION_CONSTANT: f64 = 0.1;

/// Default thinking time per computer move, in seconds.
pub const DEFAULT_TIME_LIMIT_SECS: f64 = 3.0;

/// Default number of random rollouts averaged by a single playout.
pub const DEFAULT_PLAYOUTS: u32 = 5;

// =============================================================================
// 21 Game Rules
// =============================================================================

/// The number nobody wants to say.
pub const TARGET: u32 = 21;

/// Cursor value once the target has been said; the game is over.
pub const TERMINAL_CURSOR: u32 = TARGET + 1;

/// First number said in a game.
pub const START_CURSOR: u32 = 1;

/// Most numbers a player may say in one turn.
pub const MAX_STEP: u32 = 3;
