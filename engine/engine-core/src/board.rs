//! Board snapshot types shared by the rules oracle and the search.
//!
//! A [`Board`] is a rectangular grid of [`Cell`]s. Search nodes hold their own
//! copy and never mutate it: child states are produced with [`Board::with_move`].
//! Only rollouts work on a scratch copy through [`Board::place`].

use std::fmt;
use std::str::FromStr;

/// Errors raised when a board snapshot or move is malformed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("Invalid board dimensions {rows}x{cols}")]
    InvalidDimensions { rows: usize, cols: usize },
    #[error("Expected {expected} cells but got {actual}")]
    CellCountMismatch { expected: usize, actual: usize },
    #[error("Unknown cell code: {0}")]
    UnknownCell(u8),
    #[error("Move ({row}, {col}) is outside the board")]
    OutOfBounds { row: u16, col: u16 },
    #[error("Cell ({row}, {col}) is not empty")]
    Occupied { row: u16, col: u16 },
    #[error("Failed to parse board: {0}")]
    Parse(String),
}

/// One of the two players. Player one moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Player {
    One,
    Two,
}

impl Player {
    /// The other player.
    #[inline]
    pub fn opponent(self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// Cell code used in board snapshots (1 or 2).
    #[inline]
    pub fn code(self) -> u8 {
        match self {
            Player::One => 1,
            Player::Two => 2,
        }
    }

    pub fn from_code(code: u8) -> Option<Player> {
        match code {
            1 => Some(Player::One),
            2 => Some(Player::Two),
            _ => None,
        }
    }

    /// Array index (0 or 1) for per-player tables.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Player::One => 0,
            Player::Two => 1,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Contents of a single board cell.
///
/// Snapshot codes: 0 = empty, 1 = player one, 2 = player two, 3 = blocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Blocked,
    Stone(Player),
}

impl Cell {
    pub fn code(self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::Stone(player) => player.code(),
            Cell::Blocked => 3,
        }
    }

    pub fn from_code(code: u8) -> Result<Cell, BoardError> {
        match code {
            0 => Ok(Cell::Empty),
            1 => Ok(Cell::Stone(Player::One)),
            2 => Ok(Cell::Stone(Player::Two)),
            3 => Ok(Cell::Blocked),
            other => Err(BoardError::UnknownCell(other)),
        }
    }
}

/// A board coordinate.
///
/// Ordering is lexicographic on `(row, col)`; the rollout policy relies on it
/// to break win-rate ties deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Move {
    pub row: u16,
    pub col: u16,
}

impl Move {
    #[inline]
    pub const fn new(row: u16, col: u16) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Rectangular grid snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Create an empty board.
    pub fn new(rows: usize, cols: usize) -> Result<Self, BoardError> {
        Self::check_dimensions(rows, cols)?;
        Ok(Self {
            rows,
            cols,
            cells: vec![Cell::Empty; rows * cols],
        })
    }

    /// Build a board from row-major cell codes.
    pub fn from_codes(rows: usize, cols: usize, codes: &[u8]) -> Result<Self, BoardError> {
        Self::check_dimensions(rows, cols)?;
        if codes.len() != rows * cols {
            return Err(BoardError::CellCountMismatch {
                expected: rows * cols,
                actual: codes.len(),
            });
        }
        let cells = codes
            .iter()
            .map(|&code| Cell::from_code(code))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rows, cols, cells })
    }

    fn check_dimensions(rows: usize, cols: usize) -> Result<(), BoardError> {
        if rows == 0 || cols == 0 || rows > u16::MAX as usize || cols > u16::MAX as usize {
            return Err(BoardError::InvalidDimensions { rows, cols });
        }
        Ok(())
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn contains(&self, mv: Move) -> bool {
        (mv.row as usize) < self.rows && (mv.col as usize) < self.cols
    }

    #[inline]
    fn index(&self, mv: Move) -> usize {
        mv.row as usize * self.cols + mv.col as usize
    }

    /// Cell at `mv`, or `None` when the coordinate is off the board.
    pub fn cell(&self, mv: Move) -> Option<Cell> {
        if self.contains(mv) {
            Some(self.cells[self.index(mv)])
        } else {
            None
        }
    }

    #[inline]
    pub fn is_empty(&self, mv: Move) -> bool {
        self.cell(mv) == Some(Cell::Empty)
    }

    /// All empty cells in row-major order.
    pub fn empty_cells(&self) -> Vec<Move> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| **cell == Cell::Empty)
            .map(|(idx, _)| Move::new((idx / self.cols) as u16, (idx % self.cols) as u16))
            .collect()
    }

    /// Number of stones on the board (blocked cells excluded).
    pub fn stones(&self) -> usize {
        self.cells
            .iter()
            .filter(|cell| matches!(cell, Cell::Stone(_)))
            .count()
    }

    /// Return a copy of this board with `player` placed at `mv`.
    pub fn with_move(&self, mv: Move, player: Player) -> Result<Board, BoardError> {
        let mut next = self.clone();
        next.place(mv, player)?;
        Ok(next)
    }

    /// Place `player` at `mv` in place.
    pub fn place(&mut self, mv: Move, player: Player) -> Result<(), BoardError> {
        match self.cell(mv) {
            None => Err(BoardError::OutOfBounds {
                row: mv.row,
                col: mv.col,
            }),
            Some(Cell::Empty) => {
                let idx = self.index(mv);
                self.cells[idx] = Cell::Stone(player);
                Ok(())
            }
            Some(_) => Err(BoardError::Occupied {
                row: mv.row,
                col: mv.col,
            }),
        }
    }

    /// Row-major cell codes.
    pub fn codes(&self) -> Vec<u8> {
        self.cells.iter().map(|cell| cell.code()).collect()
    }
}

/// Parses a whitespace separated grid of cell codes, one row per line.
///
/// ```
/// use engine_core::Board;
///
/// let board: Board = "1 1 0\n0 3 0\n2 0 0".parse().unwrap();
/// assert_eq!(board.rows(), 3);
/// assert_eq!(board.cols(), 3);
/// ```
impl FromStr for Board {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut cols = None;
        let mut codes = Vec::new();
        let mut rows = 0;

        for line in s.lines().map(str::trim).filter(|line| !line.is_empty()) {
            let row = line
                .split_whitespace()
                .map(|token| {
                    token
                        .parse::<u8>()
                        .map_err(|_| BoardError::Parse(format!("invalid cell '{}'", token)))
                })
                .collect::<Result<Vec<_>, _>>()?;

            match cols {
                None => cols = Some(row.len()),
                Some(expected) if expected != row.len() => {
                    return Err(BoardError::Parse(format!(
                        "row {} has {} cells, expected {}",
                        rows,
                        row.len(),
                        expected
                    )));
                }
                Some(_) => {}
            }

            codes.extend(row);
            rows += 1;
        }

        Board::from_codes(rows, cols.unwrap_or(0), &codes)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.cols) {
            let line: Vec<String> = row.iter().map(|cell| cell.code().to_string()).collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}
