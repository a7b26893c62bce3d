//! Error types for the Gambit server.

use gambit_protocol::{GameId, ProtocolError};
use gambit_room::RoomError;
use gambit_rules::RulesError;
use gambit_session::StoreError;
use gambit_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant lets `?` convert sub-crate
/// errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum GambitError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode, invalid message).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A rules-engine error.
    #[error(transparent)]
    Rules(#[from] RulesError),

    /// A store error (identity or game persistence).
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A room-level error (registry membership, actor gone).
    #[error(transparent)]
    Room(#[from] RoomError),
}

/// Why a client command was rejected.
///
/// The `Display` text is exactly what the client sees in the `ERROR`
/// message's `errorMessage`.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Unknown or revoked auth token.
    #[error("unauthorized")]
    Unauthorized,

    #[error("game {0} not found")]
    GameNotFound(GameId),

    #[error("game is already over")]
    GameFinished,

    /// An observer tried a seated-player action.
    #[error("observers cannot do that")]
    ObserverForbidden,

    #[error("it is not your turn")]
    NotYourTurn,

    #[error("that is not your piece")]
    NotYourPiece,

    /// No piece on the start square, or the move is not legal.
    #[error("illegal move")]
    IllegalMove,

    /// The stored game failed validation.
    #[error("corrupt game state: {0}")]
    Rules(RulesError),

    /// The store failed. The stored record is unchanged.
    #[error("game storage is unavailable")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Room(#[from] RoomError),

    #[error("invalid command: {0}")]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl From<RulesError> for CommandError {
    fn from(err: RulesError) -> Self {
        match err {
            RulesError::IllegalMove(_) => Self::IllegalMove,
            RulesError::GameOver => Self::GameFinished,
            other => Self::Rules(other),
        }
    }
}
