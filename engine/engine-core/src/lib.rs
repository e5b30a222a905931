//! Core types and contracts for the ringfork move-selection engine
//!
//! This crate provides the pieces the search consumes from the outside world:
//! - `Board`, `Cell`, `Player`, `Move`: immutable-per-node grid snapshots
//! - `RulesOracle`: legal moves and win detection, supplied by the game
//! - `Timer`: remaining clock time, supplied by the game driver

pub mod board;
pub mod game_utils;
pub mod rules;
pub mod timer;

// Re-export main types for convenience
pub use board::{Board, BoardError, Cell, Move, Player};
pub use rules::RulesOracle;
pub use timer::{FixedTimer, Timer};
