//! The rules oracle contract consumed by the search.
//!
//! Implementations decide legality and wins (rings, forks, bridges, lines, ...).
//! The search treats the oracle as pure: the same inputs must always produce the
//! same answers, and nothing may be cached between calls on its behalf.

use crate::board::{Board, Move, Player};

/// Pure game rules queried by the move selector.
pub trait RulesOracle {
    /// All legal moves from `board`, in a fixed enumeration order.
    ///
    /// Expansion tries moves in exactly this order, so it must be deterministic.
    fn legal_moves(&self, board: &Board) -> Vec<Move> {
        board.empty_cells()
    }

    /// True if `player`'s stone at `last_move` completes a winning structure.
    fn check_win(&self, board: &Board, last_move: Move, player: Player) -> bool;

    /// True if either player has won through `last_move`.
    fn is_terminal(&self, board: &Board, last_move: Move) -> bool {
        self.check_win(board, last_move, Player::One)
            || self.check_win(board, last_move, Player::Two)
    }
}

impl<R: RulesOracle + ?Sized> RulesOracle for &R {
    fn legal_moves(&self, board: &Board) -> Vec<Move> {
        (**self).legal_moves(board)
    }

    fn check_win(&self, board: &Board, last_move: Move, player: Player) -> bool {
        (**self).check_win(board, last_move, player)
    }

    fn is_terminal(&self, board: &Board, last_move: Move) -> bool {
        (**self).is_terminal(board, last_move)
    }
}
