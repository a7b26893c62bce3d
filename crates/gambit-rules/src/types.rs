//! Value types: colors, piece kinds, pieces, and squares.
//!
//! All of these are small `Copy` values compared by value. A [`Position`]
//! can only be built through a range check, so the rest of the engine
//! never has to re-validate coordinates.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::RulesError;

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// One of the two sides.
///
/// Serialized as `"WHITE"` / `"BLACK"` to match the wire protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// Returns the other side.
    pub fn opponent(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// Row delta a pawn of this color advances by.
    pub(crate) fn forward(self) -> i8 {
        match self {
            Self::White => 1,
            Self::Black => -1,
        }
    }

    /// Row this color's pawns start on (and may double-step from).
    pub(crate) fn pawn_row(self) -> u8 {
        match self {
            Self::White => 2,
            Self::Black => 7,
        }
    }

    /// The opponent's back rank, where this color's pawns promote.
    pub(crate) fn promotion_row(self) -> u8 {
        match self {
            Self::White => 8,
            Self::Black => 1,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::White => write!(f, "white"),
            Self::Black => write!(f, "black"),
        }
    }
}

// ---------------------------------------------------------------------------
// PieceType / Piece
// ---------------------------------------------------------------------------

/// The closed set of piece families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PieceType {
    King,
    Queen,
    Rook,
    Bishop,
    Knight,
    Pawn,
}

impl PieceType {
    /// Promotion choices, in the order moves are generated.
    pub const PROMOTIONS: [PieceType; 4] =
        [Self::Queen, Self::Rook, Self::Bishop, Self::Knight];

    /// Uppercase letter used in diagrams and move notation.
    pub fn symbol(self) -> char {
        match self {
            Self::King => 'K',
            Self::Queen => 'Q',
            Self::Rook => 'R',
            Self::Bishop => 'B',
            Self::Knight => 'N',
            Self::Pawn => 'P',
        }
    }

    /// Inverse of [`symbol`](Self::symbol), case-insensitive.
    pub fn from_symbol(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'K' => Some(Self::King),
            'Q' => Some(Self::Queen),
            'R' => Some(Self::Rook),
            'B' => Some(Self::Bishop),
            'N' => Some(Self::Knight),
            'P' => Some(Self::Pawn),
            _ => None,
        }
    }
}

/// A piece: a color and a family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    #[serde(rename = "teamColor")]
    pub color: Color,
    #[serde(rename = "pieceType")]
    pub kind: PieceType,
}

impl Piece {
    pub const fn new(color: Color, kind: PieceType) -> Self {
        Self { color, kind }
    }

    /// Diagram letter: uppercase for white, lowercase for black.
    pub fn symbol(self) -> char {
        let c = self.kind.symbol();
        match self.color {
            Color::White => c,
            Color::Black => c.to_ascii_lowercase(),
        }
    }

    /// Parses a diagram letter back into a piece.
    pub fn from_symbol(c: char) -> Option<Self> {
        let kind = PieceType::from_symbol(c)?;
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        Some(Self::new(color, kind))
    }
}

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// A square on the board: `row` and `col`, both in `[1, 8]`.
///
/// Row 1 is white's back rank; column 1 is the a-file. Deserialization
/// runs through [`Position::try_new`], so a position decoded from the wire
/// is always on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPosition")]
pub struct Position {
    row: u8,
    col: u8,
}

/// Unchecked wire shape of a position.
#[derive(Deserialize)]
struct RawPosition {
    row: i32,
    col: i32,
}

impl TryFrom<RawPosition> for Position {
    type Error = RulesError;

    fn try_from(raw: RawPosition) -> Result<Self, Self::Error> {
        Self::try_new(raw.row, raw.col)
    }
}

impl Position {
    /// Builds a position from in-range literals.
    ///
    /// # Panics
    /// Panics if `row` or `col` is outside `[1, 8]`. Use
    /// [`try_new`](Self::try_new) for untrusted input.
    pub fn new(row: u8, col: u8) -> Self {
        match Self::try_new(i32::from(row), i32::from(col)) {
            Ok(pos) => pos,
            Err(e) => panic!("{e}"),
        }
    }

    /// Builds a position, rejecting coordinates outside `[1, 8]`.
    pub fn try_new(row: i32, col: i32) -> Result<Self, RulesError> {
        if (1..=8).contains(&row) && (1..=8).contains(&col) {
            Ok(Self {
                row: row as u8,
                col: col as u8,
            })
        } else {
            Err(RulesError::OutOfBounds { row, col })
        }
    }

    pub fn row(self) -> u8 {
        self.row
    }

    pub fn col(self) -> u8 {
        self.col
    }

    /// The square `(dr, dc)` away, or `None` if that falls off the board.
    pub fn offset(self, dr: i8, dc: i8) -> Option<Self> {
        Self::try_new(
            i32::from(self.row) + i32::from(dr),
            i32::from(self.col) + i32::from(dc),
        )
        .ok()
    }

    /// All 64 squares, row by row from a1.
    pub fn all() -> impl Iterator<Item = Self> {
        (1..=8u8).flat_map(|row| (1..=8u8).map(move |col| Self { row, col }))
    }

    /// Zero-based array indices.
    pub(crate) fn index(self) -> (usize, usize) {
        (usize::from(self.row - 1), usize::from(self.col - 1))
    }
}

/// Algebraic square name, e.g. `e2`.
impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = char::from(b'a' + self.col - 1);
        write!(f, "{file}{}", self.row)
    }
}

impl FromStr for Position {
    type Err = RulesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(RulesError::BadLayout(format!("bad square {s:?}")));
        }
        let col = i32::from(bytes[0].to_ascii_lowercase()) - i32::from(b'a') + 1;
        let row = i32::from(bytes[1]) - i32::from(b'0');
        Self::try_new(row, col)
    }
}
