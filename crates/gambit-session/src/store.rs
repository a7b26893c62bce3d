//! Collaborator traits.
//!
//! Both traits return `impl Future + Send` rather than using `async fn`
//! so the futures can be awaited inside spawned tasks.

use std::future::Future;
use std::sync::Arc;

use gambit_protocol::{GameId, GameRecord};
use gambit_rules::Color;

use crate::StoreError;

/// Resolves auth tokens to usernames.
///
/// # Example
///
/// ```rust
/// use gambit_session::{IdentityStore, StoreError};
///
/// /// Treats every token as its own username.
/// struct EchoIdentity;
///
/// impl IdentityStore for EchoIdentity {
///     async fn resolve_user(&self, token: &str) -> Result<Option<String>, StoreError> {
///         Ok(Some(token.to_string()))
///     }
/// }
/// ```
pub trait IdentityStore: Send + Sync + 'static {
    /// `Ok(None)` means the token is unknown or revoked.
    fn resolve_user(
        &self,
        token: &str,
    ) -> impl Future<Output = Result<Option<String>, StoreError>> + Send;
}

/// Loads and stores game records.
pub trait GameStore: Send + Sync + 'static {
    /// `Ok(None)` means no game has that id.
    fn get_game(
        &self,
        id: GameId,
    ) -> impl Future<Output = Result<Option<GameRecord>, StoreError>> + Send;

    /// Replaces the stored record with the same `game_id`.
    fn save_game(&self, record: GameRecord)
    -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Empties `color`'s seat.
    fn clear_seat(
        &self,
        id: GameId,
        color: Color,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}

impl<T: IdentityStore> IdentityStore for Arc<T> {
    fn resolve_user(
        &self,
        token: &str,
    ) -> impl Future<Output = Result<Option<String>, StoreError>> + Send {
        (**self).resolve_user(token)
    }
}

impl<T: GameStore> GameStore for Arc<T> {
    fn get_game(
        &self,
        id: GameId,
    ) -> impl Future<Output = Result<Option<GameRecord>, StoreError>> + Send {
        (**self).get_game(id)
    }

    fn save_game(
        &self,
        record: GameRecord,
    ) -> impl Future<Output = Result<(), StoreError>> + Send {
        (**self).save_game(record)
    }

    fn clear_seat(
        &self,
        id: GameId,
        color: Color,
    ) -> impl Future<Output = Result<(), StoreError>> + Send {
        (**self).clear_seat(id, color)
    }
}
