//! Error types for the rules engine.

use crate::{ChessMove, Color};

/// Errors produced by the rules engine.
///
/// None of these are transport or storage problems: every variant means
/// the caller asked for something the rules (or the board's invariants)
/// forbid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RulesError {
    /// No piece at the start square, wrong side to move, or the move is
    /// not in the legal set for that square.
    #[error("illegal move {0}")]
    IllegalMove(ChessMove),

    /// The game is finished; the board can no longer change.
    #[error("game is already over")]
    GameOver,

    /// A color has no king. Only reachable through malformed external
    /// data, never through play.
    #[error("no {0} king on the board")]
    MissingKing(Color),

    /// A color has more than one king.
    #[error("more than one {0} king on the board")]
    ExtraKing(Color),

    /// A coordinate outside `[1, 8]`.
    #[error("square ({row}, {col}) is off the board")]
    OutOfBounds { row: i32, col: i32 },

    /// A board diagram or square name could not be parsed.
    #[error("bad board layout: {0}")]
    BadLayout(String),
}
