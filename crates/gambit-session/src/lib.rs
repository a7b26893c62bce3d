//! Identity and persistence boundary for Gambit.
//!
//! Gambit does not issue credentials or own a database. It talks to two
//! collaborators through traits:
//!
//! 1. [`IdentityStore`]: auth token to username
//! 2. [`GameStore`]: load, save, and unseat on [`GameRecord`]s
//!
//! [`MemoryStore`] implements both and backs the tests and the demo
//! server.
//!
//! ```text
//! Coordinator (above)  ← resolves users and loads/saves games
//!     ↕
//! Session Layer (this crate)
//!     ↕
//! Protocol Layer (below)  ← GameRecord, GameId
//! ```
//!
//! [`GameRecord`]: gambit_protocol::GameRecord

#![allow(async_fn_in_trait)]

mod error;
mod memory;
mod store;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use store::{GameStore, IdentityStore};
