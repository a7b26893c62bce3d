//! Message and record types for Gambit's wire format.
//!
//! Field names follow the JSON protocol exactly (`gameID`, `authToken`,
//! `serverMessageType`, ...); Rust-side names are snake_case and mapped
//! with `#[serde(rename)]`.

use std::fmt;

use gambit_rules::{ChessMove, Color, Game};
use serde::{Deserialize, Serialize};

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Identifier of a stored game.
///
/// Serialized as a bare integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(pub u32);

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "G-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// GameRecord
// ---------------------------------------------------------------------------

/// A stored game: who sits where, its name, and the engine state.
///
/// Owned by the game store and passed around by value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    #[serde(rename = "gameID")]
    pub game_id: GameId,
    #[serde(
        rename = "whiteUsername",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub white_username: Option<String>,
    #[serde(
        rename = "blackUsername",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub black_username: Option<String>,
    #[serde(rename = "gameName")]
    pub game_name: String,
    pub game: Game,
}

impl GameRecord {
    /// A fresh record: no players seated, standard starting position.
    pub fn new(game_id: GameId, game_name: impl Into<String>) -> Self {
        Self {
            game_id,
            white_username: None,
            black_username: None,
            game_name: game_name.into(),
            game: Game::new(),
        }
    }

    /// The username in `color`'s seat.
    pub fn seat(&self, color: Color) -> Option<&str> {
        match color {
            Color::White => self.white_username.as_deref(),
            Color::Black => self.black_username.as_deref(),
        }
    }

    /// Sets or clears `color`'s seat.
    pub fn set_seat(&mut self, color: Color, username: Option<String>) {
        match color {
            Color::White => self.white_username = username,
            Color::Black => self.black_username = username,
        }
    }

    /// The color `username` plays as, or `None` for an observer.
    ///
    /// A user seated on both sides plays whichever color is to move.
    pub fn color_of(&self, username: &str) -> Option<Color> {
        let turn = self.game.turn();
        [turn, turn.opponent()]
            .into_iter()
            .find(|&color| self.seat(color) == Some(username))
    }
}

// ---------------------------------------------------------------------------
// Inbound
// ---------------------------------------------------------------------------

/// The four things a client can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommandType {
    Connect,
    MakeMove,
    Leave,
    Resign,
}

/// A client command exactly as it appears on the wire.
///
/// ```json
/// { "commandType": "MAKE_MOVE", "authToken": "...", "gameID": 7,
///   "move": { "startPosition": {"row":2,"col":5},
///             "endPosition":   {"row":4,"col":5} } }
/// ```
///
/// Convert with [`Command::try_from`] before acting on it; that is where
/// a `MAKE_MOVE` without a move is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserGameCommand {
    #[serde(rename = "commandType")]
    pub command_type: CommandType,
    #[serde(rename = "authToken")]
    pub auth_token: String,
    #[serde(rename = "gameID")]
    pub game_id: GameId,
    #[serde(rename = "move", default, skip_serializing_if = "Option::is_none")]
    pub chess_move: Option<ChessMove>,
}

impl UserGameCommand {
    fn plain(command_type: CommandType, token: impl Into<String>, game_id: GameId) -> Self {
        Self {
            command_type,
            auth_token: token.into(),
            game_id,
            chess_move: None,
        }
    }

    pub fn connect(token: impl Into<String>, game_id: GameId) -> Self {
        Self::plain(CommandType::Connect, token, game_id)
    }

    pub fn make_move(token: impl Into<String>, game_id: GameId, mv: ChessMove) -> Self {
        Self {
            chess_move: Some(mv),
            ..Self::plain(CommandType::MakeMove, token, game_id)
        }
    }

    pub fn leave(token: impl Into<String>, game_id: GameId) -> Self {
        Self::plain(CommandType::Leave, token, game_id)
    }

    pub fn resign(token: impl Into<String>, game_id: GameId) -> Self {
        Self::plain(CommandType::Resign, token, game_id)
    }
}

/// What a validated command asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Connect,
    MakeMove(ChessMove),
    Leave,
    Resign,
}

/// A structurally valid command, ready for the coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub auth_token: String,
    pub game_id: GameId,
    pub action: Action,
}

impl TryFrom<UserGameCommand> for Command {
    type Error = ProtocolError;

    fn try_from(raw: UserGameCommand) -> Result<Self, Self::Error> {
        let action = match raw.command_type {
            CommandType::Connect => Action::Connect,
            CommandType::Leave => Action::Leave,
            CommandType::Resign => Action::Resign,
            CommandType::MakeMove => match raw.chess_move {
                Some(mv) => Action::MakeMove(mv),
                None => {
                    return Err(ProtocolError::InvalidMessage(
                        "MAKE_MOVE requires a move".into(),
                    ));
                }
            },
        };
        Ok(Self {
            auth_token: raw.auth_token,
            game_id: raw.game_id,
            action,
        })
    }
}

// ---------------------------------------------------------------------------
// Outbound
// ---------------------------------------------------------------------------

/// Everything the server sends.
///
/// Internally tagged on `serverMessageType`:
///
/// ```json
/// { "serverMessageType": "NOTIFICATION", "message": "alice moved e2 to e4." }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "serverMessageType", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServerMessage {
    /// The full, current game record.
    LoadGame { game: GameRecord },
    /// Human-readable event text.
    Notification { message: String },
    /// A rejected command. Only ever sent to the connection that issued it.
    Error {
        #[serde(rename = "errorMessage")]
        error_message: String,
    },
}

impl ServerMessage {
    pub fn load_game(game: GameRecord) -> Self {
        Self::LoadGame { game }
    }

    pub fn notification(message: impl Into<String>) -> Self {
        Self::Notification {
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            error_message: message.into(),
        }
    }
}
