//! Wire protocol for Gambit.
//!
//! - **Types** ([`UserGameCommand`], [`ServerMessage`], [`GameRecord`]):
//!   the JSON shapes clients and the server exchange.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): bytes to and from those
//!   types.
//! - **Errors** ([`ProtocolError`]).
//!
//! The protocol layer does not know about connections or stores. It only
//! knows how messages look on the wire.
//!
//! ```text
//! Transport (bytes) → Protocol (Command / ServerMessage) → Coordinator
//! ```

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{Action, Command, CommandType, GameId, GameRecord, ServerMessage, UserGameCommand};
