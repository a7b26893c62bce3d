//! # Gambit
//!
//! Real-time chess server: players and observers connect over WebSockets,
//! send commands for a stored game, and receive the resulting game state
//! and notifications.
//!
//! The crate wires the layers together:
//!
//! ```text
//! gambit-transport  (WebSocket connections)
//!        ↓
//! gambit-protocol   (JSON commands and server messages)
//!        ↓
//! Coordinator       (auth, checks, rules engine, persistence, fan-out)
//!        ↓
//! gambit-room       (per-game registry and single-writer actor)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use gambit::prelude::*;
//!
//! # async fn start() -> Result<(), GambitError> {
//! let store = Arc::new(MemoryStore::new());
//! let game = store.create_game("casual").await;
//! store.seat_player(game, Color::White, "alice").await?;
//!
//! let server = GambitServerBuilder::new()
//!     .bind("0.0.0.0:8080")
//!     .build(Arc::clone(&store), store)
//!     .await?;
//! server.run().await
//! # }
//! ```

mod coordinator;
mod error;
mod handler;
mod server;

pub use coordinator::{Coordinator, Dispatch};
pub use error::{CommandError, GambitError};
pub use handler::handle_connection;
pub use server::{GambitServer, GambitServerBuilder, ServerConfig};

pub use gambit_protocol as protocol;
pub use gambit_room as room;
pub use gambit_rules as rules;
pub use gambit_session as session;
pub use gambit_transport as transport;

/// The types most servers and tests need.
pub mod prelude {
    pub use crate::{
        CommandError, Coordinator, Dispatch, GambitError, GambitServer, GambitServerBuilder,
        ServerConfig,
    };
    pub use gambit_protocol::{Codec, GameId, GameRecord, JsonCodec, ServerMessage, UserGameCommand};
    pub use gambit_rules::{ChessMove, Color, Game, PieceType, Position};
    pub use gambit_session::{GameStore, IdentityStore, MemoryStore, StoreError};
    pub use gambit_transport::{Connection, ConnectionId};
}
