//! Property Hustle server: runs self-play rooms until they finish.

use hustle_core::{GameConfig, GameError};
use hustle_server::{GameServer, RoomError, RoomUpdate, ServerConfig};
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env();
    info!("Starting Property Hustle server with {:?}", config);

    let server = GameServer::new(config.clone());
    let mut watchers = Vec::with_capacity(config.rooms);

    for index in 0..config.rooms {
        let room_id = Uuid::new_v4().to_string();
        let mut game = GameConfig::all_bots(config.seats);
        if let Some(seed) = config.seed {
            game = game.with_seed(seed.wrapping_add(index as u64));
        }

        server.create_game_with(&room_id, &game)?;
        let updates = server.subscribe(&room_id)?;
        watchers.push(tokio::spawn(watch_room(
            Arc::clone(&server),
            room_id,
            updates,
            config.max_turns,
        )));
    }

    for watcher in watchers {
        watcher.await??;
    }

    info!("All rooms finished");
    Ok(())
}

/// Follow a room's feed until someone wins or the turn cap is hit
async fn watch_room(
    server: Arc<GameServer>,
    room_id: String,
    mut updates: broadcast::Receiver<RoomUpdate>,
    max_turns: u32,
) -> anyhow::Result<()> {
    loop {
        match updates.recv().await {
            Ok(RoomUpdate::Snapshot { state }) => {
                if let Some(winner) = state.winner {
                    let name = state.player(winner).map_or("?", |p| p.name.as_str());
                    info!(
                        "Room {}: {} wins on turn {}",
                        room_id, name, state.turn.turn_number
                    );
                    return Ok(());
                }
                if state.turn.turn_number > max_turns {
                    warn!("Room {}: no winner after {} turns, stopping", room_id, max_turns);
                    match server.set_paused(&room_id, true).await {
                        // Finished between the snapshot and the pause
                        Ok(()) | Err(RoomError::Game(GameError::GameAlreadyOver)) => {}
                        Err(err) => return Err(err.into()),
                    }
                    return Ok(());
                }
            }
            Ok(RoomUpdate::Error { code, message }) => {
                warn!("Room {}: {} ({})", room_id, message, code);
            }
            Err(RecvError::Lagged(skipped)) => {
                debug!("Room {}: watcher skipped {} updates", room_id, skipped);
            }
            Err(RecvError::Closed) => return Ok(()),
        }
    }
}
