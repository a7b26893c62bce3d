//! Demo chess server backed by the in-memory store.
//!
//! ```text
//! GAMBIT_BIND=0.0.0.0:8080 GAMBIT_DEMO_USERS=alice,bob,carol RUST_LOG=debug \
//!     cargo run -p chess-server
//! ```
//!
//! One game is seeded at startup. The first two users take the white and
//! black seats; anyone after that can only observe. Every user's auth token
//! is logged so a client can connect with it.

use std::sync::Arc;

use gambit::prelude::*;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const DEFAULT_BIND: &str = "127.0.0.1:8080";
const DEFAULT_USERS: &str = "alice,bob";

/// Comma-separated usernames, blanks dropped.
fn parse_users(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Creates the demo game and issues one token per user.
async fn seed(store: &MemoryStore, users: &[String]) -> Result<(GameId, Vec<(String, String)>), GambitError> {
    let game = store.create_game("demo").await;
    for (user, color) in users.iter().zip([Color::White, Color::Black]) {
        store.seat_player(game, color, user.as_str()).await?;
    }

    let mut tokens = Vec::with_capacity(users.len());
    for user in users {
        tokens.push((user.clone(), store.issue_token(user.as_str()).await));
    }
    Ok((game, tokens))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let bind = std::env::var("GAMBIT_BIND").unwrap_or_else(|_| DEFAULT_BIND.to_string());
    let users = parse_users(
        &std::env::var("GAMBIT_DEMO_USERS").unwrap_or_else(|_| DEFAULT_USERS.to_string()),
    );

    let store = Arc::new(MemoryStore::new());
    let (game, tokens) = seed(&store, &users).await?;
    for (user, token) in &tokens {
        tracing::info!(game_id = %game, %user, %token, "demo credentials");
    }

    let server = GambitServerBuilder::new()
        .bind(&bind)
        .build(Arc::clone(&store), store)
        .await?;

    tokio::select! {
        result = server.run() => result?,
        _ = tokio::signal::ctrl_c() => tracing::info!("shutting down"),
    }
    Ok(())
}
