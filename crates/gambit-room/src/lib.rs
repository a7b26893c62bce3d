//! Per-game fan-out and serialization for Gambit.
//!
//! Two independent pieces, both keyed by [`GameId`](gambit_protocol::GameId):
//!
//! - [`ConnectionRegistry`]: which connections watch which game, and
//!   broadcast to them.
//! - [`RoomManager`] / [`RoomHandle`]: one actor task per game that runs
//!   mutating jobs strictly one after another.
//!
//! Neither knows anything about chess; the coordinator decides what to
//! send and what a job does.

mod config;
mod error;
mod manager;
mod registry;
mod room;

pub use config::RoomConfig;
pub use error::RoomError;
pub use manager::RoomManager;
pub use registry::ConnectionRegistry;
pub use room::RoomHandle;
