//! Property Hustle game server.
//!
//! Hosts rooms around the `hustle-core` engine: one locked game state per
//! room, a broadcast feed of snapshots, and delayed bot turns.

pub mod config;
pub mod protocol;
pub mod room;

pub use config::ServerConfig;
pub use protocol::{InboundMove, RoomUpdate};
pub use room::{GameRoom, GameServer, RoomError, RoomId};
