//! In-memory [`IdentityStore`] and [`GameStore`].
//!
//! Everything lives in two `RwLock`ed maps and is lost on restart. Token
//! issuing, game creation, and seating live here because a real backend
//! would own them too; the coordinator never calls them.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU32, Ordering};

use gambit_protocol::{GameId, GameRecord};
use gambit_rules::Color;
use rand::Rng;
use tokio::sync::RwLock;

use crate::{GameStore, IdentityStore, StoreError};

/// Tokens and games held in process memory.
#[derive(Debug)]
pub struct MemoryStore {
    tokens: RwLock<HashMap<String, String>>,
    games: RwLock<BTreeMap<GameId, GameRecord>>,
    next_game_id: AtomicU32,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            tokens: RwLock::new(HashMap::new()),
            games: RwLock::new(BTreeMap::new()),
            next_game_id: AtomicU32::new(1),
        }
    }

    /// Issues a fresh auth token for `username`.
    ///
    /// A user may hold several tokens at once.
    pub async fn issue_token(&self, username: impl Into<String>) -> String {
        let username = username.into();
        let token = generate_token();
        self.tokens.write().await.insert(token.clone(), username.clone());
        tracing::debug!(%username, "issued auth token");
        token
    }

    /// Invalidates `token`. Returns `true` if it existed.
    pub async fn revoke_token(&self, token: &str) -> bool {
        self.tokens.write().await.remove(token).is_some()
    }

    /// Creates an empty game in the starting position.
    pub async fn create_game(&self, name: impl Into<String>) -> GameId {
        let id = GameId(self.next_game_id.fetch_add(1, Ordering::Relaxed));
        let record = GameRecord::new(id, name);
        tracing::info!(game_id = %id, name = %record.game_name, "game created");
        self.games.write().await.insert(id, record);
        id
    }

    /// Puts `username` in `color`'s seat.
    ///
    /// Re-seating the same user is a no-op.
    ///
    /// # Errors
    /// - [`StoreError::UnknownGame`] if `id` does not exist.
    /// - [`StoreError::SeatTaken`] if another user holds the seat.
    pub async fn seat_player(
        &self,
        id: GameId,
        color: Color,
        username: impl Into<String>,
    ) -> Result<(), StoreError> {
        let username = username.into();
        let mut games = self.games.write().await;
        let record = games.get_mut(&id).ok_or(StoreError::UnknownGame(id))?;
        match record.seat(color) {
            Some(current) if current != username => Err(StoreError::SeatTaken {
                game_id: id,
                color,
            }),
            _ => {
                record.set_seat(color, Some(username));
                Ok(())
            }
        }
    }

    /// Snapshot of every game, ordered by id.
    pub async fn list_games(&self) -> Vec<GameRecord> {
        self.games.read().await.values().cloned().collect()
    }
}

impl IdentityStore for MemoryStore {
    async fn resolve_user(&self, token: &str) -> Result<Option<String>, StoreError> {
        Ok(self.tokens.read().await.get(token).cloned())
    }
}

impl GameStore for MemoryStore {
    async fn get_game(&self, id: GameId) -> Result<Option<GameRecord>, StoreError> {
        Ok(self.games.read().await.get(&id).cloned())
    }

    async fn save_game(&self, record: GameRecord) -> Result<(), StoreError> {
        let mut games = self.games.write().await;
        match games.get_mut(&record.game_id) {
            Some(slot) => {
                *slot = record;
                Ok(())
            }
            None => Err(StoreError::UnknownGame(record.game_id)),
        }
    }

    async fn clear_seat(&self, id: GameId, color: Color) -> Result<(), StoreError> {
        let mut games = self.games.write().await;
        let record = games.get_mut(&id).ok_or(StoreError::UnknownGame(id))?;
        record.set_seat(color, None);
        Ok(())
    }
}

/// Generates a random 32-character hex string (128 bits of entropy).
fn generate_token() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 16] = rng.random();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use gambit_rules::{ChessMove, Position};

    #[tokio::test]
    async fn test_issue_token_resolves_to_username() {
        let store = MemoryStore::new();
        let token = store.issue_token("alice").await;
        assert_eq!(token.len(), 32);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(
            store.resolve_user(&token).await.unwrap(),
            Some("alice".to_string())
        );
    }

    #[tokio::test]
    async fn test_issue_token_twice_gives_distinct_tokens() {
        let store = MemoryStore::new();
        let a = store.issue_token("alice").await;
        let b = store.issue_token("alice").await;
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_resolve_user_unknown_token_returns_none() {
        let store = MemoryStore::new();
        assert_eq!(store.resolve_user("nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_revoke_token_stops_resolution() {
        let store = MemoryStore::new();
        let token = store.issue_token("alice").await;
        assert!(store.revoke_token(&token).await);
        assert!(!store.revoke_token(&token).await);
        assert_eq!(store.resolve_user(&token).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_create_game_assigns_increasing_ids() {
        let store = MemoryStore::new();
        let a = store.create_game("first").await;
        let b = store.create_game("second").await;
        assert!(b > a);

        let record = store.get_game(a).await.unwrap().unwrap();
        assert_eq!(record.game_name, "first");
        assert_eq!(record.white_username, None);
        assert!(!record.game.is_finished());
    }

    #[tokio::test]
    async fn test_get_game_unknown_returns_none() {
        let store = MemoryStore::new();
        assert!(store.get_game(GameId(99)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_seat_player_taken_by_other_returns_error() {
        let store = MemoryStore::new();
        let id = store.create_game("g").await;
        store.seat_player(id, Color::White, "alice").await.unwrap();
        store.seat_player(id, Color::White, "alice").await.unwrap();

        let err = store.seat_player(id, Color::White, "bob").await.unwrap_err();
        assert!(matches!(err, StoreError::SeatTaken { color: Color::White, .. }));
    }

    #[tokio::test]
    async fn test_seat_player_unknown_game_returns_error() {
        let store = MemoryStore::new();
        let err = store
            .seat_player(GameId(5), Color::Black, "bob")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UnknownGame(GameId(5))));
    }

    #[tokio::test]
    async fn test_save_game_replaces_record() {
        let store = MemoryStore::new();
        let id = store.create_game("g").await;
        let mut record = store.get_game(id).await.unwrap().unwrap();
        record
            .game
            .make_move(ChessMove::new(Position::new(2, 5), Position::new(4, 5)))
            .unwrap();
        store.save_game(record.clone()).await.unwrap();

        assert_eq!(store.get_game(id).await.unwrap(), Some(record));
    }

    #[tokio::test]
    async fn test_save_game_unknown_id_returns_error() {
        let store = MemoryStore::new();
        let record = GameRecord::new(GameId(42), "ghost");
        assert!(matches!(
            store.save_game(record).await,
            Err(StoreError::UnknownGame(GameId(42)))
        ));
    }

    #[tokio::test]
    async fn test_clear_seat_empties_only_that_color() {
        let store = MemoryStore::new();
        let id = store.create_game("g").await;
        store.seat_player(id, Color::White, "alice").await.unwrap();
        store.seat_player(id, Color::Black, "bob").await.unwrap();

        store.clear_seat(id, Color::White).await.unwrap();
        let record = store.get_game(id).await.unwrap().unwrap();
        assert_eq!(record.white_username, None);
        assert_eq!(record.black_username.as_deref(), Some("bob"));
    }

    #[tokio::test]
    async fn test_list_games_ordered_by_id() {
        let store = MemoryStore::new();
        store.create_game("a").await;
        store.create_game("b").await;
        let names: Vec<_> = store
            .list_games()
            .await
            .into_iter()
            .map(|r| r.game_name)
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
