//! Moves and pseudo-legal move generation.
//!
//! "Pseudo-legal" means a move follows the piece's movement rules but may
//! leave the mover's own king in check. [`Game`](crate::Game) filters
//! these down to legal moves.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Board, Color, PieceType, Position, RulesError};

const DIAGONALS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];
const ORTHOGONALS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const KING_OFFSETS: [(i8, i8); 8] = [
    (1, 1),
    (1, -1),
    (-1, -1),
    (-1, 1),
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
];
const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (1, -2),
    (-1, 2),
    (-1, -2),
    (2, 1),
    (2, -1),
    (-2, 1),
    (-2, -1),
];

/// A move from `start` to `end`, with an optional promotion.
///
/// `promotion` is only set for a pawn move that ends on the opponent's
/// back rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChessMove {
    #[serde(rename = "startPosition")]
    pub start: Position,
    #[serde(rename = "endPosition")]
    pub end: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promotion: Option<PieceType>,
}

impl ChessMove {
    pub fn new(start: Position, end: Position) -> Self {
        Self {
            start,
            end,
            promotion: None,
        }
    }

    pub fn promoting(start: Position, end: Position, kind: PieceType) -> Self {
        Self {
            start,
            end,
            promotion: Some(kind),
        }
    }
}

/// Coordinate notation: `e2e4`, or `e7e8q` with a promotion.
impl fmt::Display for ChessMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.start, self.end)?;
        if let Some(kind) = self.promotion {
            write!(f, "{}", kind.symbol().to_ascii_lowercase())?;
        }
        Ok(())
    }
}

impl FromStr for ChessMove {
    type Err = RulesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || RulesError::BadLayout(format!("bad move {s:?}"));
        if !s.is_ascii() || !(4..=5).contains(&s.len()) {
            return Err(bad());
        }
        let start: Position = s[0..2].parse()?;
        let end: Position = s[2..4].parse()?;
        match s[4..].chars().next() {
            None => Ok(Self::new(start, end)),
            Some(c) => {
                let kind = PieceType::from_symbol(c).ok_or_else(bad)?;
                Ok(Self::promoting(start, end, kind))
            }
        }
    }
}

/// Generates the pseudo-legal moves of the piece on `from`.
///
/// An empty square yields an empty vector.
pub fn pseudo_legal_moves(board: &Board, from: Position) -> Vec<ChessMove> {
    let Some(piece) = board.get(from) else {
        return Vec::new();
    };

    let mut moves = Vec::new();
    match piece.kind {
        PieceType::Bishop => slide(board, from, piece.color, &DIAGONALS, &mut moves),
        PieceType::Rook => slide(board, from, piece.color, &ORTHOGONALS, &mut moves),
        PieceType::Queen => {
            slide(board, from, piece.color, &DIAGONALS, &mut moves);
            slide(board, from, piece.color, &ORTHOGONALS, &mut moves);
        }
        PieceType::King => step(board, from, piece.color, &KING_OFFSETS, &mut moves),
        PieceType::Knight => step(board, from, piece.color, &KNIGHT_OFFSETS, &mut moves),
        PieceType::Pawn => pawn(board, from, piece.color, &mut moves),
    }
    moves
}

/// Walks each direction until the edge, a friendly piece (excluded), or
/// an enemy piece (included, then stop).
fn slide(
    board: &Board,
    from: Position,
    color: Color,
    directions: &[(i8, i8)],
    moves: &mut Vec<ChessMove>,
) {
    for &(dr, dc) in directions {
        let mut cursor = from;
        while let Some(to) = cursor.offset(dr, dc) {
            match board.get(to) {
                None => {
                    moves.push(ChessMove::new(from, to));
                    cursor = to;
                }
                Some(other) => {
                    if other.color != color {
                        moves.push(ChessMove::new(from, to));
                    }
                    break;
                }
            }
        }
    }
}

/// One hop per offset; any on-board target not held by a friend.
fn step(
    board: &Board,
    from: Position,
    color: Color,
    offsets: &[(i8, i8)],
    moves: &mut Vec<ChessMove>,
) {
    for &(dr, dc) in offsets {
        if let Some(to) = from.offset(dr, dc) {
            if board.get(to).is_none_or(|other| other.color != color) {
                moves.push(ChessMove::new(from, to));
            }
        }
    }
}

fn pawn(board: &Board, from: Position, color: Color, moves: &mut Vec<ChessMove>) {
    let dir = color.forward();

    if let Some(one) = from.offset(dir, 0) {
        if board.get(one).is_none() {
            push_pawn_move(from, one, color, moves);

            if from.row() == color.pawn_row() {
                if let Some(two) = one.offset(dir, 0) {
                    if board.get(two).is_none() {
                        moves.push(ChessMove::new(from, two));
                    }
                }
            }
        }
    }

    for dc in [-1, 1] {
        if let Some(to) = from.offset(dir, dc) {
            if board.get(to).is_some_and(|other| other.color != color) {
                push_pawn_move(from, to, color, moves);
            }
        }
    }
}

/// Emits one move, or four when the pawn reaches the back rank.
fn push_pawn_move(from: Position, to: Position, color: Color, moves: &mut Vec<ChessMove>) {
    if to.row() == color.promotion_row() {
        for kind in PieceType::PROMOTIONS {
            moves.push(ChessMove::promoting(from, to, kind));
        }
    } else {
        moves.push(ChessMove::new(from, to));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Piece;

    fn sq(name: &str) -> Position {
        name.parse().unwrap()
    }

    fn targets(moves: &[ChessMove]) -> Vec<String> {
        let mut out: Vec<String> = moves.iter().map(|m| m.end.to_string()).collect();
        out.sort();
        out
    }

    fn board(diagram: &str) -> Board {
        diagram.parse().unwrap()
    }

    #[test]
    fn test_empty_square_yields_nothing() {
        assert!(pseudo_legal_moves(&Board::standard(), sq("e4")).is_empty());
    }

    #[test]
    fn test_rook_stops_at_friend_and_captures_enemy() {
        let b = board(
            "
            ........
            ........
            ...p....
            ........
            ........
            ........
            ........
            ...R..N.
            ",
        );
        let moves = pseudo_legal_moves(&b, sq("d1"));
        assert_eq!(
            targets(&moves),
            vec!["a1", "b1", "c1", "d2", "d3", "d4", "d5", "d6", "e1", "f1"]
        );
    }

    #[test]
    fn test_bishop_in_corner_has_one_diagonal() {
        let b = board(
            "
            ........
            ........
            ........
            ........
            ........
            ........
            ........
            B.......
            ",
        );
        assert_eq!(pseudo_legal_moves(&b, sq("a1")).len(), 7);
    }

    #[test]
    fn test_queen_is_rook_plus_bishop() {
        let mut b = Board::empty();
        b.set(sq("d4"), Some(Piece::new(Color::White, PieceType::Queen)));
        assert_eq!(pseudo_legal_moves(&b, sq("d4")).len(), 27);
    }

    #[test]
    fn test_knight_jumps_over_pieces() {
        let moves = pseudo_legal_moves(&Board::standard(), sq("b1"));
        assert_eq!(targets(&moves), vec!["a3", "c3"]);
    }

    #[test]
    fn test_king_skips_friendly_squares() {
        let b = board(
            "
            ........
            ........
            ........
            ........
            ........
            ........
            PPp.....
            .K......
            ",
        );
        let moves = pseudo_legal_moves(&b, sq("b1"));
        assert_eq!(targets(&moves), vec!["a1", "c1", "c2"]);
    }

    #[test]
    fn test_pawn_double_step_only_from_start_row() {
        let b = Board::standard();
        assert_eq!(targets(&pseudo_legal_moves(&b, sq("e2"))), vec!["e3", "e4"]);
        assert_eq!(targets(&pseudo_legal_moves(&b, sq("d7"))), vec!["d5", "d6"]);

        let mut moved = b.clone();
        moved.set(sq("e2"), None);
        moved.set(sq("e3"), Some(Piece::new(Color::White, PieceType::Pawn)));
        assert_eq!(targets(&pseudo_legal_moves(&moved, sq("e3"))), vec!["e4"]);
    }

    #[test]
    fn test_pawn_blocked_cannot_advance_or_jump() {
        let b = board(
            "
            ........
            ........
            ........
            ........
            ........
            ....n...
            ....P...
            ........
            ",
        );
        assert!(pseudo_legal_moves(&b, sq("e2")).is_empty());

        let b = board(
            "
            ........
            ........
            ........
            ........
            ....n...
            ........
            ....P...
            ........
            ",
        );
        assert_eq!(targets(&pseudo_legal_moves(&b, sq("e2"))), vec!["e3"]);
    }

    #[test]
    fn test_pawn_captures_diagonally_only_enemies() {
        let b = board(
            "
            ........
            ........
            ........
            ........
            ........
            ...p.N..
            ....P...
            ........
            ",
        );
        assert_eq!(
            targets(&pseudo_legal_moves(&b, sq("e2"))),
            vec!["d3", "e3", "e4"]
        );
    }

    #[test]
    fn test_pawn_promotion_emits_four_moves_per_target() {
        let b = board(
            "
            .r......
            P.......
            ........
            ........
            ........
            ........
            ........
            ........
            ",
        );
        let moves = pseudo_legal_moves(&b, sq("a7"));
        assert_eq!(moves.len(), 8);
        assert!(moves.iter().all(|m| m.promotion.is_some()));
        assert!(moves.contains(&ChessMove::promoting(sq("a7"), sq("b8"), PieceType::Knight)));
    }

    #[test]
    fn test_black_pawn_promotes_on_row_one() {
        let b = board(
            "
            ........
            ........
            ........
            ........
            ........
            ........
            ...p....
            ........
            ",
        );
        let moves = pseudo_legal_moves(&b, sq("d2"));
        let kinds: Vec<_> = moves.iter().filter_map(|m| m.promotion).collect();
        assert_eq!(kinds, PieceType::PROMOTIONS.to_vec());
    }

    #[test]
    fn test_move_notation_round_trips() {
        let mv: ChessMove = "e7e8q".parse().unwrap();
        assert_eq!(mv, ChessMove::promoting(sq("e7"), sq("e8"), PieceType::Queen));
        assert_eq!(mv.to_string(), "e7e8q");
        assert!("e7".parse::<ChessMove>().is_err());
        assert!("e7e8x".parse::<ChessMove>().is_err());
    }

    #[test]
    fn test_move_json_uses_wire_names() {
        let mv = ChessMove::new(sq("e2"), sq("e4"));
        let json = serde_json::to_string(&mv).unwrap();
        assert_eq!(
            json,
            r#"{"startPosition":{"row":2,"col":5},"endPosition":{"row":4,"col":5}}"#
        );
        let promo: ChessMove = serde_json::from_str(
            r#"{"startPosition":{"row":7,"col":1},"endPosition":{"row":8,"col":1},"promotion":"ROOK"}"#,
        )
        .unwrap();
        assert_eq!(promo.promotion, Some(PieceType::Rook));
    }
}
