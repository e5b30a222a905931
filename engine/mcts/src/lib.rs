//! Time-bounded Monte Carlo Tree Search move selection.
//!
//! This crate picks one legal move for a two-player board game, given a
//! board snapshot, the acting player and a time budget. Game rules come from
//! an [`engine_core::RulesOracle`]; nothing here knows what a win looks like.
//!
//! # Overview
//!
//! Each search iteration has four phases:
//!
//! 1. **Selection**: descend the tree with UCT, optionally blended with RAVE
//!    (all-moves-as-first) estimates, and follow a node's last good reply
//!    when one is recorded
//! 2. **Expansion**: add one untried child, in the oracle's move order
//! 3. **Rollout**: play the game out, preferring the session's last good
//!    replies and the N-gram statistics over uniform random moves
//! 4. **Backpropagation**: update visits, values and RAVE tables from the
//!    leaf to the root, inverting the outcome at every ply
//!
//! Before searching, the selector returns an immediate win, a block of the
//! opponent's immediate win, or the only legal move.
//!
//! # Usage
//!
//! ```rust,ignore
//! use mcts::{choose_move, MctsConfig, SessionStats};
//! use engine_core::{Board, Player};
//! use games_lines::LineRules;
//! use rand_chacha::ChaCha20Rng;
//! use rand::SeedableRng;
//! use std::time::Duration;
//!
//! let rules = LineRules::tictactoe();
//! let board: Board = "1 1 0\n2 2 0\n0 0 0".parse().unwrap();
//!
//! // One session per game; reset it when a new game starts
//! let mut session = SessionStats::new();
//! let mut rng = ChaCha20Rng::seed_from_u64(42);
//!
//! let result = choose_move(
//!     &rules,
//!     &mut session,
//!     MctsConfig::default(),
//!     board,
//!     Player::One,
//!     None,
//!     Duration::from_millis(100),
//!     &mut rng,
//! ).unwrap();
//!
//! println!("Best move: {} ({:?})", result.mv, result.decision);
//! ```
//!
//! # Configuration
//!
//! [`MctsConfig`] presets follow the refinements in order:
//! [`MctsConfig::plain_uct`], [`MctsConfig::with_rave`],
//! [`MctsConfig::with_lgrf`] and [`MctsConfig::full`] (the default).
//!
//! [`MctsPlayer`] wraps the selector for a whole game: it owns the
//! [`SessionStats`] and derives each move's budget from a [`engine_core::Timer`].

pub mod config;
pub mod node;
pub mod player;
pub mod rollout;
pub mod search;
pub mod stats;
pub mod tree;

#[cfg(test)]
mod tests;

// Re-export main types
pub use config::{MctsConfig, ScoringStrategy};
pub use node::{AmafStats, NodeId, SearchNode};
pub use player::{MctsPlayer, DEFAULT_TIME_DIVISOR};
pub use rollout::{Playout, RolloutPolicy};
pub use search::{choose_move, Decision, MctsSearch, SearchError, SearchResult, SearchStats};
pub use stats::{LastGoodReply, NGramCounts, NGramTable, SessionStats};
pub use tree::{SearchTree, TreeStats};
