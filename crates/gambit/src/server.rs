//! `GambitServer` builder and accept loop.
//!
//! Ties the layers together: transport → protocol → coordinator → room.

use std::net::SocketAddr;
use std::sync::Arc;

use gambit_protocol::{Codec, JsonCodec};
use gambit_room::RoomConfig;
use gambit_session::{GameStore, IdentityStore};
use gambit_transport::{Transport, WebSocketConnection, WebSocketTransport};

use crate::GambitError;
use crate::coordinator::Coordinator;
use crate::handler::handle_connection;

/// Server settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the WebSocket listener binds to.
    pub bind_addr: String,
    /// Settings for every per-game room actor.
    pub room: RoomConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            room: RoomConfig::default(),
        }
    }
}

/// Builder for configuring and starting a Gambit server.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use gambit::prelude::*;
///
/// # async fn start() -> Result<(), GambitError> {
/// let store = Arc::new(MemoryStore::new());
/// let server = GambitServerBuilder::new()
///     .bind("0.0.0.0:8080")
///     .build(Arc::clone(&store), store)
///     .await?;
/// server.run().await
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct GambitServerBuilder {
    config: ServerConfig,
}

impl GambitServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.config.bind_addr = addr.to_string();
        self
    }

    /// Sets how many pending commands each game's room queue holds.
    pub fn room_queue_capacity(mut self, capacity: usize) -> Self {
        self.config.room.queue_capacity = capacity;
        self
    }

    /// Binds the listener and wires the coordinator to the given stores.
    ///
    /// Uses `JsonCodec` and `WebSocketTransport`.
    pub async fn build<I, G>(self, identity: I, games: G) -> Result<GambitServer<I, G, JsonCodec>, GambitError>
    where
        I: IdentityStore,
        G: GameStore,
    {
        let transport = WebSocketTransport::bind(&self.config.bind_addr).await?;
        let coordinator = Arc::new(Coordinator::with_room_config(
            identity,
            games,
            JsonCodec,
            self.config.room,
        ));
        Ok(GambitServer {
            transport,
            coordinator,
        })
    }
}

/// A bound Gambit server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct GambitServer<I, G, K>
where
    I: IdentityStore,
    G: GameStore,
    K: Codec,
{
    transport: WebSocketTransport,
    coordinator: Arc<Coordinator<I, G, WebSocketConnection, K>>,
}

impl<I, G, K> GambitServer<I, G, K>
where
    I: IdentityStore,
    G: GameStore,
    K: Codec,
{
    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.transport.local_addr()
    }

    /// The shared coordinator, for diagnostics.
    pub fn coordinator(&self) -> &Arc<Coordinator<I, G, WebSocketConnection, K>> {
        &self.coordinator
    }

    /// Runs the accept loop until the process is terminated.
    ///
    /// A failed handshake is logged and skipped; it never stops the loop.
    pub async fn run(mut self) -> Result<(), GambitError> {
        tracing::info!(addr = ?self.local_addr().ok(), "Gambit server running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    tokio::spawn(handle_connection(Arc::clone(&self.coordinator), conn));
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
