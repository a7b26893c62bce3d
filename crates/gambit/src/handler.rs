//! Per-connection loop: receive frames, hand them to the coordinator, and
//! clean up when the transport closes.
//!
//! Each accepted connection gets its own Tokio task running
//! [`handle_connection`].

use std::collections::HashSet;
use std::sync::Arc;

use gambit_protocol::{Codec, GameId};
use gambit_session::{GameStore, IdentityStore};
use gambit_transport::{Connection, ConnectionId};

use crate::coordinator::{Coordinator, Dispatch};

/// Drop guard that unregisters the connection from every game it joined.
///
/// Runs even if the loop exits early or panics. `Drop` is synchronous, so
/// the async cleanup is spawned as a fire-and-forget task.
struct ConnectionGuard<I, G, C, K>
where
    I: IdentityStore,
    G: GameStore,
    C: Connection,
    K: Codec,
{
    conn_id: ConnectionId,
    joined: HashSet<GameId>,
    coordinator: Arc<Coordinator<I, G, C, K>>,
}

impl<I, G, C, K> Drop for ConnectionGuard<I, G, C, K>
where
    I: IdentityStore,
    G: GameStore,
    C: Connection,
    K: Codec,
{
    fn drop(&mut self) {
        if self.joined.is_empty() {
            return;
        }
        let conn_id = self.conn_id;
        let joined = std::mem::take(&mut self.joined);
        let coordinator = Arc::clone(&self.coordinator);
        tokio::spawn(async move {
            coordinator.disconnect(conn_id, joined).await;
        });
    }
}

/// Handles a single connection from accept to close.
pub async fn handle_connection<I, G, C, K>(coordinator: Arc<Coordinator<I, G, C, K>>, conn: C)
where
    I: IdentityStore,
    G: GameStore,
    C: Connection,
    K: Codec,
{
    let conn = Arc::new(conn);
    let conn_id = conn.id();
    tracing::debug!(%conn_id, "handling new connection");

    let mut guard = ConnectionGuard {
        conn_id,
        joined: HashSet::new(),
        coordinator: Arc::clone(&coordinator),
    };

    loop {
        let data = match conn.recv().await {
            Ok(Some(data)) => data,
            Ok(None) => {
                tracing::info!(%conn_id, "connection closed");
                break;
            }
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "recv error");
                break;
            }
        };

        match coordinator.handle_frame(&conn, &data).await {
            Dispatch::Joined(game_id) => {
                guard.joined.insert(game_id);
            }
            Dispatch::Left(game_id) => {
                guard.joined.remove(&game_id);
            }
            Dispatch::Handled => {}
        }

        if !conn.is_open() {
            tracing::debug!(%conn_id, "connection closed by server");
            break;
        }
    }

    // Dropping the guard unregisters the connection.
}
