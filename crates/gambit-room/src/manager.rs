//! Room manager: one lazily spawned actor per game.

use std::collections::HashMap;

use gambit_protocol::GameId;

use crate::RoomConfig;
use crate::room::{RoomHandle, spawn_room};

/// Hands out the room actor for a game, spawning it on first use.
///
/// Rooms live for the rest of the process. Callers hold the manager's lock
/// only while fetching a handle, never while a job runs.
pub struct RoomManager {
    rooms: HashMap<GameId, RoomHandle>,
    config: RoomConfig,
}

impl Default for RoomManager {
    fn default() -> Self {
        Self::new()
    }
}

impl RoomManager {
    /// Creates an empty manager with default settings.
    pub fn new() -> Self {
        Self::with_config(RoomConfig::default())
    }

    pub fn with_config(config: RoomConfig) -> Self {
        Self {
            rooms: HashMap::new(),
            config,
        }
    }

    /// Returns the room for `game_id`, spawning one if there is none or
    /// the previous actor has stopped.
    pub fn room(&mut self, game_id: GameId) -> RoomHandle {
        if let Some(handle) = self.rooms.get(&game_id) {
            if !handle.is_closed() {
                return handle.clone();
            }
            tracing::warn!(%game_id, "room actor stopped, respawning");
        }
        let handle = spawn_room(game_id, self.config.queue_capacity);
        self.rooms.insert(game_id, handle.clone());
        tracing::debug!(%game_id, "room created");
        handle
    }

    /// Number of rooms spawned so far.
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_room_spawns_once_per_game() {
        let mut manager = RoomManager::new();
        assert!(manager.is_empty());

        let a = manager.room(GameId(1));
        let again = manager.room(GameId(1));
        let b = manager.room(GameId(2));

        assert_eq!(manager.len(), 2);
        assert_eq!(a.game_id(), again.game_id());
        assert_eq!(b.game_id(), GameId(2));
    }

    #[tokio::test]
    async fn test_room_handles_share_one_queue() {
        let mut manager = RoomManager::with_config(RoomConfig { queue_capacity: 1 });
        let first = manager.room(GameId(1));
        let second = manager.room(GameId(1));
        assert_eq!(first.run(async { "a" }).await.unwrap(), "a");
        assert_eq!(second.run(async { "b" }).await.unwrap(), "b");
    }
}
