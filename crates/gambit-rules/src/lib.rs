//! Rules engine for Gambit.
//!
//! Everything in this crate is pure and synchronous: no I/O, no locks, no
//! async. The session layer calls into it while holding a game's
//! single-writer slot, so every function here must be cheap to run inline.
//!
//! # Layers
//!
//! ```text
//! types (Color, Piece, Position)
//!     ↓
//! Board (8x8 grid, deep clone)
//!     ↓
//! moves (pseudo-legal generation per piece family)
//!     ↓
//! Game (legal filtering, move application, check/mate/stalemate)
//! ```

mod board;
mod error;
mod game;
mod moves;
mod types;

pub use board::Board;
pub use error::RulesError;
pub use game::{Game, Standing};
pub use moves::{ChessMove, pseudo_legal_moves};
pub use types::{Color, Piece, PieceType, Position};
