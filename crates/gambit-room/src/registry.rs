//! Connection registry: game id to the set of live connections watching it.
//!
//! Locking is two-level. The outer map lock is held only long enough to
//! find or create a game's group; each group has its own lock. A broadcast
//! holds the group lock just long enough to copy the member list, then
//! sends without it, so one slow socket never blocks membership changes.
//! [`add_with`](ConnectionRegistry::add_with) holds the group lock across
//! its join work, which orders it against every broadcast's member copy.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use gambit_protocol::GameId;
use gambit_transport::{Connection, ConnectionId};
use tokio::sync::Mutex;

use crate::RoomError;

type Group<C> = Arc<Mutex<Vec<Arc<C>>>>;

/// Tracks which connections are registered for which game.
///
/// Groups are created lazily on first [`add`](Self::add) and never
/// deleted; an empty group costs one map entry.
pub struct ConnectionRegistry<C: Connection> {
    games: Mutex<HashMap<GameId, Group<C>>>,
}

impl<C: Connection> Default for ConnectionRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Connection> ConnectionRegistry<C> {
    pub fn new() -> Self {
        Self {
            games: Mutex::new(HashMap::new()),
        }
    }

    async fn group(&self, game_id: GameId) -> Group<C> {
        let mut games = self.games.lock().await;
        Arc::clone(games.entry(game_id).or_default())
    }

    async fn existing_group(&self, game_id: GameId) -> Option<Group<C>> {
        self.games.lock().await.get(&game_id).map(Arc::clone)
    }

    /// Registers `conn` for `game_id`.
    ///
    /// Registering the same connection again replaces the old entry, so a
    /// connection appears at most once per game.
    pub async fn add(&self, game_id: GameId, conn: Arc<C>) {
        let group = self.group(game_id).await;
        let mut members = group.lock().await;
        let conn_id = conn.id();
        members.retain(|c| c.id() != conn_id);
        members.push(conn);
        tracing::debug!(%game_id, %conn_id, members = members.len(), "connection registered");
    }

    /// Runs `join` and, if it succeeds, registers `conn` for `game_id`,
    /// all under the game's group lock.
    ///
    /// A broadcast for the game either copies its member list before
    /// `join` starts (so anything `join` reads already reflects it) or
    /// after `conn` is registered (so `conn` receives it after whatever
    /// `join` sent). If `join` fails, `conn` is not registered.
    pub async fn add_with<F, Fut, T, E>(&self, game_id: GameId, conn: Arc<C>, join: F) -> Result<T, E>
    where
        F: FnOnce(Arc<C>) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let group = self.group(game_id).await;
        let mut members = group.lock().await;
        let out = join(Arc::clone(&conn)).await?;
        let conn_id = conn.id();
        members.retain(|c| c.id() != conn_id);
        members.push(conn);
        tracing::debug!(%game_id, %conn_id, members = members.len(), "connection registered");
        Ok(out)
    }

    /// Unregisters `conn_id` from `game_id`.
    ///
    /// # Errors
    /// [`RoomError::ConnectionNotFound`] if it was not registered.
    pub async fn remove(&self, game_id: GameId, conn_id: ConnectionId) -> Result<(), RoomError> {
        let not_found = || RoomError::ConnectionNotFound { game_id, conn_id };
        let group = self.existing_group(game_id).await.ok_or_else(not_found)?;
        let mut members = group.lock().await;
        let index = members
            .iter()
            .position(|c| c.id() == conn_id)
            .ok_or_else(not_found)?;
        members.remove(index);
        tracing::debug!(%game_id, %conn_id, members = members.len(), "connection unregistered");
        Ok(())
    }

    /// Sends `data` to every open connection registered for `game_id`
    /// except `excluding`.
    ///
    /// Recipients are the members at the moment the call starts. Closed
    /// connections are skipped. A failed send is logged and the remaining
    /// recipients still get the message. Returns the number of successful
    /// deliveries.
    pub async fn broadcast(
        &self,
        game_id: GameId,
        excluding: Option<ConnectionId>,
        data: &[u8],
    ) -> usize {
        let Some(group) = self.existing_group(game_id).await else {
            return 0;
        };
        let members = group.lock().await.clone();
        let mut delivered = 0;
        for conn in &members {
            if Some(conn.id()) == excluding || !conn.is_open() {
                continue;
            }
            if self.send(conn, data).await {
                delivered += 1;
            }
        }
        delivered
    }

    /// Sends `data` to one connection. Failures are logged, not returned.
    pub async fn send(&self, conn: &C, data: &[u8]) -> bool {
        match conn.send(data).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(conn_id = %conn.id(), error = %e, "delivery failed");
                false
            }
        }
    }

    /// Number of connections registered for `game_id`, open or not.
    pub async fn len(&self, game_id: GameId) -> usize {
        match self.existing_group(game_id).await {
            Some(group) => group.lock().await.len(),
            None => 0,
        }
    }
}
