//! Session protocol handler: turns client commands into store updates and
//! broadcasts.
//!
//! CONNECT runs inline on the caller's task. MAKE_MOVE, LEAVE, and RESIGN
//! read, modify, and write the stored record, so they run as jobs on the
//! game's room actor: two commands for the same game never interleave, and
//! the `LOAD_GAME` broadcasts go out in the order the moves were applied.
//!
//! Every rejection is sent back to the originating connection only, as an
//! `ERROR` message whose text is the [`CommandError`]'s `Display`.

use std::future::Future;
use std::sync::Arc;

use gambit_protocol::{Action, Codec, Command, GameId, GameRecord, ServerMessage, UserGameCommand};
use gambit_room::{ConnectionRegistry, RoomConfig, RoomManager};
use gambit_rules::{ChessMove, Color, Standing};
use gambit_session::{GameStore, IdentityStore};
use gambit_transport::{Connection, ConnectionId};
use tokio::sync::Mutex;

use crate::CommandError;

/// What a handled frame did to the connection's game memberships.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// The connection is now registered for this game.
    Joined(GameId),
    /// The connection left this game and has been closed.
    Left(GameId),
    /// Nothing changed membership-wise (including rejected commands).
    Handled,
}

/// Shared, per-server command handler.
///
/// Stores and codec are injected so tests can substitute fakes. Hold it in
/// an `Arc`; mutating commands hand a clone of that `Arc` to the room
/// actor.
pub struct Coordinator<I, G, C, K>
where
    I: IdentityStore,
    G: GameStore,
    C: Connection,
    K: Codec,
{
    identity: I,
    games: G,
    registry: ConnectionRegistry<C>,
    rooms: Mutex<RoomManager>,
    codec: K,
}

impl<I, G, C, K> Coordinator<I, G, C, K>
where
    I: IdentityStore,
    G: GameStore,
    C: Connection,
    K: Codec,
{
    pub fn new(identity: I, games: G, codec: K) -> Self {
        Self::with_room_config(identity, games, codec, RoomConfig::default())
    }

    pub fn with_room_config(identity: I, games: G, codec: K, room_config: RoomConfig) -> Self {
        Self {
            identity,
            games,
            registry: ConnectionRegistry::new(),
            rooms: Mutex::new(RoomManager::with_config(room_config)),
            codec,
        }
    }

    /// The connection registry, for diagnostics.
    pub fn registry(&self) -> &ConnectionRegistry<C> {
        &self.registry
    }

    /// Decodes one inbound frame and executes it.
    ///
    /// Never fails: a rejected command has already been reported to `conn`
    /// as an `ERROR` by the time this returns.
    pub async fn handle_frame(self: &Arc<Self>, conn: &Arc<C>, data: &[u8]) -> Dispatch {
        let result = match self.decode(data) {
            Ok(cmd) => self.execute(conn, cmd).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(dispatch) => dispatch,
            Err(err) => {
                self.reject(conn, &err).await;
                Dispatch::Handled
            }
        }
    }

    fn decode(&self, data: &[u8]) -> Result<Command, CommandError> {
        let raw: UserGameCommand = self.codec.decode(data)?;
        Ok(Command::try_from(raw)?)
    }

    /// Executes a decoded command on behalf of `conn`.
    ///
    /// # Errors
    /// The first failed check, in the order: auth, game exists, then the
    /// command-specific checks. The caller decides how to report it;
    /// [`handle_frame`](Self::handle_frame) sends it as an `ERROR`.
    pub async fn execute(self: &Arc<Self>, conn: &Arc<C>, cmd: Command) -> Result<Dispatch, CommandError> {
        let username = self.authenticate(&cmd.auth_token).await?;
        let game_id = cmd.game_id;
        tracing::debug!(
            conn_id = %conn.id(),
            %username,
            %game_id,
            action = ?cmd.action,
            "executing command"
        );

        match cmd.action {
            Action::Connect => {
                self.connect(conn, &username, game_id).await?;
                Ok(Dispatch::Joined(game_id))
            }
            Action::MakeMove(mv) => {
                let conn = Arc::clone(conn);
                self.in_room(game_id, move |this| async move {
                    this.make_move(&conn, &username, game_id, mv).await
                })
                .await?;
                Ok(Dispatch::Handled)
            }
            Action::Leave => {
                let conn = Arc::clone(conn);
                self.in_room(game_id, move |this| async move {
                    this.leave(&conn, &username, game_id).await
                })
                .await?;
                Ok(Dispatch::Left(game_id))
            }
            Action::Resign => {
                self.in_room(game_id, move |this| async move {
                    this.resign(&username, game_id).await
                })
                .await?;
                Ok(Dispatch::Handled)
            }
        }
    }

    /// Removes `conn_id` from every game in `games` after the transport
    /// closed without a LEAVE. Already-removed entries are fine.
    pub async fn disconnect(&self, conn_id: ConnectionId, games: impl IntoIterator<Item = GameId>) {
        for game_id in games {
            match self.registry.remove(game_id, conn_id).await {
                Ok(()) => tracing::info!(%conn_id, %game_id, "connection dropped from game"),
                Err(e) => tracing::debug!(%conn_id, %game_id, error = %e, "already unregistered"),
            }
        }
    }

    // -- Commands ---------------------------------------------------------

    async fn connect(&self, conn: &Arc<C>, username: &str, game_id: GameId) -> Result<(), CommandError> {
        // Read and send the snapshot under the game's registry lock: a move
        // broadcast either happened before the read or reaches us after it.
        let role = self
            .registry
            .add_with(game_id, Arc::clone(conn), |conn| async move {
                let record = self.load(game_id).await?;
                let role = match record.color_of(username) {
                    Some(color) => color.to_string(),
                    None => "an observer".to_string(),
                };
                let snapshot = self.codec.encode(&ServerMessage::load_game(record))?;
                self.registry.send(&conn, &snapshot).await;
                Ok::<_, CommandError>(role)
            })
            .await?;

        self.broadcast(
            game_id,
            Some(conn.id()),
            format!("{username} joined the game as {role}"),
        )
        .await?;

        tracing::info!(conn_id = %conn.id(), %username, %game_id, %role, "joined game");
        Ok(())
    }

    async fn make_move(
        &self,
        conn: &Arc<C>,
        username: &str,
        game_id: GameId,
        mv: ChessMove,
    ) -> Result<(), CommandError> {
        // `record` is our own copy; nothing is visible until it is saved.
        let mut record = self.load(game_id).await?;
        if record.game.is_finished() {
            return Err(CommandError::GameFinished);
        }
        let color = record
            .color_of(username)
            .ok_or(CommandError::ObserverForbidden)?;
        if color != record.game.turn() {
            return Err(CommandError::NotYourTurn);
        }
        match record.game.board().get(mv.start) {
            None => return Err(CommandError::IllegalMove),
            Some(piece) if piece.color != color => return Err(CommandError::NotYourPiece),
            Some(_) => {}
        }
        record.game.make_move(mv)?;

        let opponent = color.opponent();
        let standing = record.game.evaluate(opponent)?;
        self.games.save_game(record.clone()).await?;
        tracing::info!(%game_id, %username, %mv, ?standing, "move applied");

        let notice = standing_notice(&record, opponent, standing);
        let snapshot = self.codec.encode(&ServerMessage::load_game(record))?;
        self.registry.broadcast(game_id, None, &snapshot).await;
        self.broadcast(
            game_id,
            Some(conn.id()),
            format!("{username} moved {} to {}.", mv.start, mv.end),
        )
        .await?;
        if let Some(text) = notice {
            self.broadcast(game_id, None, text).await?;
        }
        Ok(())
    }

    async fn leave(&self, conn: &Arc<C>, username: &str, game_id: GameId) -> Result<(), CommandError> {
        let record = self.load(game_id).await?;

        // The store write comes first so a failure has no visible effect.
        for color in [Color::White, Color::Black] {
            if record.seat(color) == Some(username) {
                self.games.clear_seat(game_id, color).await?;
            }
        }

        // A player may leave from a connection that never sent CONNECT.
        if let Err(e) = self.registry.remove(game_id, conn.id()).await {
            tracing::debug!(conn_id = %conn.id(), %game_id, error = %e, "leave from unregistered connection");
        }

        let notice = match record.color_of(username) {
            Some(color) => format!("{} player {username} left the game.", side(color)),
            None => format!("{username} stopped observing the game."),
        };
        self.broadcast(game_id, Some(conn.id()), notice).await?;

        if let Err(e) = conn.close().await {
            tracing::debug!(conn_id = %conn.id(), error = %e, "close after leave failed");
        }
        tracing::info!(conn_id = %conn.id(), %username, %game_id, "left game");
        Ok(())
    }

    async fn resign(&self, username: &str, game_id: GameId) -> Result<(), CommandError> {
        let mut record = self.load(game_id).await?;
        if record.game.is_finished() {
            return Err(CommandError::GameFinished);
        }
        let color = record
            .color_of(username)
            .ok_or(CommandError::ObserverForbidden)?;

        record.game.resign();
        self.games.save_game(record).await?;
        tracing::info!(%game_id, %username, %color, "resigned");

        self.broadcast(
            game_id,
            None,
            format!("{} player {username} resigned.", side(color)),
        )
        .await?;
        Ok(())
    }

    // -- Helpers ----------------------------------------------------------

    async fn authenticate(&self, token: &str) -> Result<String, CommandError> {
        self.identity
            .resolve_user(token)
            .await?
            .ok_or(CommandError::Unauthorized)
    }

    async fn load(&self, game_id: GameId) -> Result<GameRecord, CommandError> {
        self.games
            .get_game(game_id)
            .await?
            .ok_or(CommandError::GameNotFound(game_id))
    }

    /// Runs `job` on `game_id`'s room actor and waits for it.
    async fn in_room<F, Fut>(self: &Arc<Self>, game_id: GameId, job: F) -> Result<(), CommandError>
    where
        F: FnOnce(Arc<Self>) -> Fut,
        Fut: Future<Output = Result<(), CommandError>> + Send + 'static,
    {
        let room = self.rooms.lock().await.room(game_id);
        room.run(job(Arc::clone(self))).await?
    }

    /// Sends a `NOTIFICATION` to the game, minus `excluding`.
    async fn broadcast(
        &self,
        game_id: GameId,
        excluding: Option<ConnectionId>,
        text: String,
    ) -> Result<(), CommandError> {
        let bytes = self.codec.encode(&ServerMessage::notification(text))?;
        self.registry.broadcast(game_id, excluding, &bytes).await;
        Ok(())
    }

    async fn reject(&self, conn: &C, err: &CommandError) {
        match err {
            CommandError::Store(e) => {
                tracing::error!(conn_id = %conn.id(), error = %e, "store failure");
            }
            _ => tracing::debug!(conn_id = %conn.id(), error = %err, "command rejected"),
        }
        match self.codec.encode(&ServerMessage::error(err.to_string())) {
            Ok(bytes) => {
                self.registry.send(conn, &bytes).await;
            }
            Err(e) => tracing::warn!(conn_id = %conn.id(), error = %e, "could not encode error"),
        }
    }
}

fn side(color: Color) -> &'static str {
    match color {
        Color::White => "White",
        Color::Black => "Black",
    }
}

/// The follow-up notice after a move, if the opponent's standing warrants
/// one.
fn standing_notice(record: &GameRecord, color: Color, standing: Standing) -> Option<String> {
    let verdict = match standing {
        Standing::Normal => return None,
        Standing::Check => "in check",
        Standing::Checkmate => "in checkmate",
        Standing::Stalemate => "in stalemate",
    };
    Some(match record.seat(color) {
        Some(name) => format!("{} player {name} is {verdict}.", side(color)),
        None => format!("{} player is {verdict}.", side(color)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standing_notice_normal_is_silent() {
        let record = GameRecord::new(GameId(1), "g");
        assert_eq!(standing_notice(&record, Color::Black, Standing::Normal), None);
    }

    #[test]
    fn test_standing_notice_names_seated_player() {
        let mut record = GameRecord::new(GameId(1), "g");
        record.set_seat(Color::Black, Some("bob".into()));
        assert_eq!(
            standing_notice(&record, Color::Black, Standing::Checkmate).as_deref(),
            Some("Black player bob is in checkmate.")
        );
        assert_eq!(
            standing_notice(&record, Color::White, Standing::Check).as_deref(),
            Some("White player is in check.")
        );
    }
}
