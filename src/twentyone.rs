//! The "21 game".
//!
//! Two players take turns saying one to three consecutive numbers, counting
//! up from 1. Whoever has to say 21 loses. The state's `cursor` is the next
//! number to be said, so the game is over once the cursor reaches 22, and the
//! player to move at that point is the winner.

use std::fmt;
use std::str::FromStr;

use crate::constants::{MAX_STEP, START_CURSOR, TERMINAL_CURSOR};
use crate::error::MctsError;
use crate::node::Node;
use crate::state::{Reward, State};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    One,
    Two,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    pub fn id(self) -> u8 {
        match self {
            Player::One => 1,
            Player::Two => 2,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player{}", self.id())
    }
}

impl FromStr for Player {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(Player::One),
            "2" => Ok(Player::Two),
            other => Err(format!("player must be 1 or 2, got {other:?}")),
        }
    }
}

/// A position of the 21 game.
///
/// `playouts` is the number of random rollouts averaged by
/// [`State::playout`]; it is carried over to every successor state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TwentyOneState {
    player: Player,
    cursor: u32,
    playouts: u32,
}

impl TwentyOneState {
    /// Opening position, player one to move.
    pub fn new(playouts: u32) -> Self {
        Self::with_cursor(Player::One, START_CURSOR, playouts)
    }

    /// Arbitrary position. A cursor past the end is clamped to the terminal
    /// cursor and `playouts` is at least 1.
    pub fn with_cursor(player: Player, cursor: u32, playouts: u32) -> Self {
        Self {
            player,
            cursor: cursor.clamp(START_CURSOR, TERMINAL_CURSOR),
            playouts: playouts.max(1),
        }
    }

    /// Player to move.
    #[inline]
    pub fn player(&self) -> Player {
        self.player
    }

    /// Next number to be said.
    #[inline]
    pub fn cursor(&self) -> u32 {
        self.cursor
    }

    #[inline]
    pub fn playouts(&self) -> u32 {
        self.playouts
    }

    /// The winner, once the game is over.
    pub fn winner(&self) -> Option<Player> {
        self.is_terminal().then_some(self.player)
    }

    fn max_step(&self) -> u32 {
        (TERMINAL_CURSOR - self.cursor).min(MAX_STEP)
    }

    fn advance(&self, action: u32) -> Self {
        Self {
            player: self.player.opponent(),
            cursor: self.cursor + action,
            playouts: self.playouts,
        }
    }

    /// Play uniformly random moves to the end and return the final state.
    fn rollout(&self, rng: &mut fastrand::Rng) -> Self {
        let mut s = *self;
        while !s.is_terminal() {
            let action = rng.u32(1..=s.max_step());
            s = s.advance(action);
        }
        s
    }
}

impl State for TwentyOneState {
    type Action = u32;
    type Reward = TwentyOneReward;

    fn actions(&self) -> Vec<u32> {
        (1..=self.max_step()).collect()
    }

    fn next_state(&self, action: u32) -> Result<Self, MctsError> {
        if action == 0 || action > self.max_step() {
            return Err(MctsError::IllegalAction(action.to_string()));
        }
        Ok(self.advance(action))
    }

    fn is_terminal(&self) -> bool {
        self.cursor >= TERMINAL_CURSOR
    }

    /// Score +1 for each rollout won by the player to move here, -1 for each
    /// lost, and average.
    fn playout(&self, rng: &mut fastrand::Rng) -> TwentyOneReward {
        let total: f64 = (0..self.playouts)
            .map(|_| {
                if self.rollout(rng).player == self.player {
                    1.0
                } else {
                    -1.0
                }
            })
            .sum();
        TwentyOneReward::new(total / self.playouts as f64, self.player)
    }
}

/// Playout result from the point of view of `player`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TwentyOneReward {
    value: f64,
    player: Player,
}

impl TwentyOneReward {
    pub fn new(value: f64, player: Player) -> Self {
        Self { value, player }
    }

    #[inline]
    pub fn value(&self) -> f64 {
        self.value
    }

    #[inline]
    pub fn player(&self) -> Player {
        self.player
    }
}

impl Reward<TwentyOneState> for TwentyOneReward {
    // A node's reward belongs to whoever moved into it, i.e. the opponent of
    // the player to move there.
    fn apply(&self, node: &mut Node<TwentyOneState>) {
        if node.state().player() == self.player {
            node.add_reward(-self.value);
        } else {
            node.add_reward(self.value);
        }
    }
}
