//! Error types for the room layer.

use gambit_protocol::GameId;
use gambit_transport::ConnectionId;

/// Errors that can occur during registry or room operations.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// The connection is not registered for that game.
    #[error("{conn_id} is not registered for game {game_id}")]
    ConnectionNotFound {
        game_id: GameId,
        conn_id: ConnectionId,
    },

    /// The room actor's queue is closed, or it dropped the job.
    #[error("room for game {0} is unavailable")]
    Unavailable(GameId),
}
