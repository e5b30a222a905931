//! Remaining-time collaborator.
//!
//! The game driver owns the real clock. The engine only asks how much time a
//! player has left and derives its own per-move budget from that.

use std::time::Duration;

use crate::board::Player;

/// Source of each player's remaining clock time.
pub trait Timer {
    fn remaining(&self, player: Player) -> Duration;
}

/// A timer reporting fixed remaining times. Useful for tests and one-shot tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedTimer {
    remaining: [Duration; 2],
}

impl FixedTimer {
    pub fn new(player_one: Duration, player_two: Duration) -> Self {
        Self {
            remaining: [player_one, player_two],
        }
    }

    /// Both players have the same time left.
    pub fn uniform(remaining: Duration) -> Self {
        Self::new(remaining, remaining)
    }
}

impl Timer for FixedTimer {
    fn remaining(&self, player: Player) -> Duration {
        self.remaining[player.index()]
    }
}
