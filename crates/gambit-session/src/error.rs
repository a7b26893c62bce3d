//! Error types for the session layer.

use gambit_protocol::GameId;
use gambit_rules::Color;

/// Errors a store can report.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing store failed (I/O, connection, corruption).
    #[error("store failure: {0}")]
    Backend(String),

    /// The game does not exist.
    #[error("unknown game {0}")]
    UnknownGame(GameId),

    /// Another user already sits in that seat.
    #[error("{color} seat in game {game_id} is already taken")]
    SeatTaken { game_id: GameId, color: Color },
}
