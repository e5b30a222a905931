//! k-in-a-row rules for the ringfork engine
//!
//! A player wins by completing a straight line (horizontal, vertical or either
//! diagonal) of `length` stones through the move just played. Blocked cells
//! interrupt lines like opponent stones do.
//!
//! This is a reference [`RulesOracle`] used by tests, benches and the advisor
//! binary. Tournament rule sets (rings, forks, bridges) plug in through the same
//! trait.
//!
//! # Usage
//!
//! ```rust
//! use engine_core::{Board, Move, Player, RulesOracle};
//! use games_lines::LineRules;
//!
//! let rules = LineRules::new(3);
//! let board = Board::from_codes(3, 3, &[1, 1, 1, 0, 2, 0, 0, 2, 0]).unwrap();
//! assert!(rules.check_win(&board, Move::new(0, 2), Player::One));
//! ```

use engine_core::{Board, Cell, Move, Player, RulesOracle};

/// Direction vectors: horizontal, vertical, diagonal \, diagonal /
const DIRECTIONS: [(i32, i32); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// Straight-line connection rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRules {
    length: usize,
}

impl LineRules {
    /// Rules requiring `length` stones in a row. A length of zero is treated as one.
    pub fn new(length: usize) -> Self {
        Self {
            length: length.max(1),
        }
    }

    /// Classic three in a row.
    pub fn tictactoe() -> Self {
        Self::new(3)
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// Count consecutive `player` stones from `origin` stepping by (dr, dc), excluding origin.
    fn run_length(board: &Board, origin: Move, dr: i32, dc: i32, player: Player) -> usize {
        let mut count = 0;
        let (mut r, mut c) = (origin.row as i32 + dr, origin.col as i32 + dc);

        while r >= 0 && c >= 0 {
            let mv = Move::new(r as u16, c as u16);
            if board.cell(mv) != Some(Cell::Stone(player)) {
                break;
            }
            count += 1;
            r += dr;
            c += dc;
        }

        count
    }
}

impl Default for LineRules {
    fn default() -> Self {
        Self::tictactoe()
    }
}

impl RulesOracle for LineRules {
    fn check_win(&self, board: &Board, last_move: Move, player: Player) -> bool {
        if board.cell(last_move) != Some(Cell::Stone(player)) {
            return false;
        }

        DIRECTIONS.iter().any(|&(dr, dc)| {
            let count = 1
                + Self::run_length(board, last_move, dr, dc, player)
                + Self::run_length(board, last_move, -dr, -dc, player);
            count >= self.length
        })
    }
}
