//! The game engine: legal moves, move application, and end-of-game
//! detection.
//!
//! Legality is decided by simulation: every pseudo-legal candidate is
//! applied to a cloned board and kept only if the mover's king is not
//! attacked afterwards.

use serde::{Deserialize, Serialize};

use crate::{Board, ChessMove, Color, Piece, Position, RulesError, pseudo_legal_moves};

/// Where a side stands after a move, from that side's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Standing {
    /// Not in check, has moves.
    Normal,
    /// In check, has moves.
    Check,
    /// In check, no legal moves. The game is finished.
    Checkmate,
    /// Not in check, no legal moves. The game is finished.
    Stalemate,
}

impl Standing {
    /// Returns `true` if this standing ends the game.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Checkmate | Self::Stalemate)
    }
}

/// A game in progress (or finished): board, side to move, and whether the
/// game is over.
///
/// ```text
///   ACTIVE ──(checkmate | stalemate | resign)──→ FINISHED
/// ```
///
/// FINISHED is terminal; once there, [`make_move`](Self::make_move) always
/// fails and [`valid_moves`](Self::valid_moves) reports nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GameRepr")]
pub struct Game {
    board: Board,
    #[serde(rename = "teamTurn")]
    turn: Color,
    finished: bool,
}

/// Unchecked wire shape; validated into a [`Game`] on deserialize.
#[derive(Deserialize)]
struct GameRepr {
    board: Board,
    #[serde(rename = "teamTurn")]
    turn: Color,
    #[serde(default)]
    finished: bool,
}

impl TryFrom<GameRepr> for Game {
    type Error = RulesError;

    fn try_from(repr: GameRepr) -> Result<Self, Self::Error> {
        let mut game = Self::from_board(repr.board, repr.turn)?;
        game.finished = repr.finished;
        Ok(game)
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// A new game: standard layout, white to move.
    pub fn new() -> Self {
        Self {
            board: Board::standard(),
            turn: Color::White,
            finished: false,
        }
    }

    /// Builds a game from an arbitrary position.
    ///
    /// # Errors
    /// [`RulesError::MissingKing`] / [`RulesError::ExtraKing`] unless each
    /// color has exactly one king.
    pub fn from_board(board: Board, turn: Color) -> Result<Self, RulesError> {
        for color in [Color::White, Color::Black] {
            match board.king_count(color) {
                0 => return Err(RulesError::MissingKing(color)),
                1 => {}
                _ => return Err(RulesError::ExtraKing(color)),
            }
        }
        Ok(Self {
            board,
            turn,
            finished: false,
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The side to move.
    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Ends the game without a move.
    pub fn resign(&mut self) {
        self.finished = true;
    }

    /// Legal moves for the piece on `from`.
    ///
    /// Returns `None` when the square is empty. A piece that belongs to
    /// the side not on move, or any piece once the game is finished, has
    /// no legal moves (`Some` of an empty vector).
    pub fn valid_moves(&self, from: Position) -> Option<Vec<ChessMove>> {
        let piece = self.board.get(from)?;
        if self.finished || piece.color != self.turn {
            return Some(Vec::new());
        }
        Some(self.legal_moves_from(from, piece.color))
    }

    /// Plays `mv` for the side to move.
    ///
    /// # Errors
    /// - [`RulesError::GameOver`] if the game is finished.
    /// - [`RulesError::IllegalMove`] if there is no piece on `mv.start`,
    ///   the piece is not the side to move's, or `mv` is not one of its
    ///   legal moves.
    ///
    /// On error the game is unchanged.
    pub fn make_move(&mut self, mv: ChessMove) -> Result<(), RulesError> {
        if self.finished {
            return Err(RulesError::GameOver);
        }
        let piece = self
            .board
            .get(mv.start)
            .ok_or(RulesError::IllegalMove(mv))?;
        if piece.color != self.turn {
            return Err(RulesError::IllegalMove(mv));
        }
        if !self.legal_moves_from(mv.start, piece.color).contains(&mv) {
            return Err(RulesError::IllegalMove(mv));
        }

        apply(&mut self.board, &mv);
        self.turn = self.turn.opponent();
        Ok(())
    }

    /// Returns `true` if any pseudo-legal enemy move lands on `color`'s
    /// king.
    ///
    /// # Errors
    /// [`RulesError::MissingKing`] if `color` has no king.
    pub fn is_in_check(&self, color: Color) -> Result<bool, RulesError> {
        king_attacked(&self.board, color).ok_or(RulesError::MissingKing(color))
    }

    /// In check with no legal moves. Finishes the game when true.
    pub fn is_in_checkmate(&mut self, color: Color) -> Result<bool, RulesError> {
        let mate = self.is_in_check(color)? && !self.has_legal_move(color);
        if mate {
            self.finished = true;
        }
        Ok(mate)
    }

    /// Not in check with no legal moves. Finishes the game when true.
    pub fn is_in_stalemate(&mut self, color: Color) -> Result<bool, RulesError> {
        let stale = !self.is_in_check(color)? && !self.has_legal_move(color);
        if stale {
            self.finished = true;
        }
        Ok(stale)
    }

    /// Classifies `color`'s position, finishing the game on checkmate or
    /// stalemate.
    pub fn evaluate(&mut self, color: Color) -> Result<Standing, RulesError> {
        if self.is_in_checkmate(color)? {
            Ok(Standing::Checkmate)
        } else if self.is_in_stalemate(color)? {
            Ok(Standing::Stalemate)
        } else if self.is_in_check(color)? {
            Ok(Standing::Check)
        } else {
            Ok(Standing::Normal)
        }
    }

    /// Pseudo-legal moves from `from` that keep `color`'s king safe.
    /// Ignores whose turn it is.
    fn legal_moves_from(&self, from: Position, color: Color) -> Vec<ChessMove> {
        pseudo_legal_moves(&self.board, from)
            .into_iter()
            .filter(|mv| {
                let mut sim = self.board.clone();
                apply(&mut sim, mv);
                // A position without our king is never legal.
                king_attacked(&sim, color) == Some(false)
            })
            .collect()
    }

    fn has_legal_move(&self, color: Color) -> bool {
        self.board
            .pieces()
            .filter(|(_, piece)| piece.color == color)
            .any(|(pos, _)| !self.legal_moves_from(pos, color).is_empty())
    }
}

/// Moves the piece, promoting if requested. Whatever stood on `end` is
/// overwritten.
fn apply(board: &mut Board, mv: &ChessMove) {
    if let Some(piece) = board.get(mv.start) {
        let placed = match mv.promotion {
            Some(kind) => Piece::new(piece.color, kind),
            None => piece,
        };
        board.set(mv.start, None);
        board.set(mv.end, Some(placed));
    }
}

/// `None` when `color` has no king on `board`.
fn king_attacked(board: &Board, color: Color) -> Option<bool> {
    let king = board.find_king(color)?;
    Some(
        board
            .pieces()
            .filter(|(_, piece)| piece.color != color)
            .any(|(pos, _)| pseudo_legal_moves(board, pos).iter().any(|mv| mv.end == king)),
    )
}
