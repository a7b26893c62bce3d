//! The 8x8 board.
//!
//! A board is a plain array of `Option<Piece>`. Pieces are `Copy`, so
//! `Board::clone()` is a full, independent copy: the engine relies on
//! this to simulate a move without touching the real game.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Color, Piece, PieceType, Position, RulesError};

/// Back rank order from the a-file to the h-file.
const BACK_RANK: [PieceType; 8] = [
    PieceType::Rook,
    PieceType::Knight,
    PieceType::Bishop,
    PieceType::Queen,
    PieceType::King,
    PieceType::Bishop,
    PieceType::Knight,
    PieceType::Rook,
];

/// An 8x8 grid of optional pieces. At most one piece per square.
///
/// Serialized as 8 rows (row 1 first) of 8 nullable pieces.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    squares: [[Option<Piece>; 8]; 8],
}

impl Board {
    /// A board with no pieces.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A board in the standard starting layout.
    pub fn standard() -> Self {
        let mut board = Self::empty();
        board.reset_to_standard();
        board
    }

    /// Returns the piece on `pos`, if any.
    pub fn get(&self, pos: Position) -> Option<Piece> {
        let (r, c) = pos.index();
        self.squares[r][c]
    }

    /// Puts `piece` on `pos` (or clears it with `None`), replacing
    /// whatever was there.
    pub fn set(&mut self, pos: Position, piece: Option<Piece>) {
        let (r, c) = pos.index();
        self.squares[r][c] = piece;
    }

    /// Clears the board and places the 32 starting pieces.
    pub fn reset_to_standard(&mut self) {
        *self = Self::empty();
        for (i, kind) in BACK_RANK.into_iter().enumerate() {
            let col = i as u8 + 1;
            self.set(Position::new(1, col), Some(Piece::new(Color::White, kind)));
            self.set(
                Position::new(2, col),
                Some(Piece::new(Color::White, PieceType::Pawn)),
            );
            self.set(
                Position::new(7, col),
                Some(Piece::new(Color::Black, PieceType::Pawn)),
            );
            self.set(Position::new(8, col), Some(Piece::new(Color::Black, kind)));
        }
    }

    /// Iterates over occupied squares, row by row from a1.
    pub fn pieces(&self) -> impl Iterator<Item = (Position, Piece)> + '_ {
        Position::all().filter_map(move |pos| self.get(pos).map(|piece| (pos, piece)))
    }

    /// Number of occupied squares.
    pub fn occupied_count(&self) -> usize {
        self.pieces().count()
    }

    /// Linear scan for `color`'s king.
    pub fn find_king(&self, color: Color) -> Option<Position> {
        self.pieces()
            .find(|(_, p)| *p == Piece::new(color, PieceType::King))
            .map(|(pos, _)| pos)
    }

    pub(crate) fn king_count(&self, color: Color) -> usize {
        self.pieces()
            .filter(|(_, p)| *p == Piece::new(color, PieceType::King))
            .count()
    }
}

/// Diagram with row 8 on top, `.` for empty squares.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (1..=8u8).rev() {
            for col in 1..=8u8 {
                let c = self
                    .get(Position::new(row, col))
                    .map_or('.', Piece::symbol);
                write!(f, "{c}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Parses the [`Display`](fmt::Display) diagram: eight non-blank lines,
/// row 8 first, `KQRBNP` for white, `kqrbnp` for black, `.` for empty.
/// Leading and trailing whitespace on each line is ignored.
impl FromStr for Board {
    type Err = RulesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines: Vec<&str> = s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        if lines.len() != 8 {
            return Err(RulesError::BadLayout(format!(
                "expected 8 rows, got {}",
                lines.len()
            )));
        }

        let mut board = Self::empty();
        for (i, line) in lines.iter().enumerate() {
            let row = 8 - i as u8;
            let cells: Vec<char> = line.chars().collect();
            if cells.len() != 8 {
                return Err(RulesError::BadLayout(format!(
                    "row {row} has {} squares",
                    cells.len()
                )));
            }
            for (j, c) in cells.into_iter().enumerate() {
                let pos = Position::new(row, j as u8 + 1);
                match c {
                    '.' => {}
                    _ => {
                        let piece = Piece::from_symbol(c).ok_or_else(|| {
                            RulesError::BadLayout(format!("unknown piece {c:?} on {pos}"))
                        })?;
                        board.set(pos, Some(piece));
                    }
                }
            }
        }
        Ok(board)
    }
}
