//! Game room management.
//!
//! Each room owns one `GameState` behind an async mutex. Moves for a room are
//! applied in lock order; rooms never share locks. Bot seats are driven by
//! delayed tasks that sleep outside the lock and re-check the table before
//! acting.

use dashmap::DashMap;
use hustle_core::{bot, GameConfig, GameError, GameState, GameStatus, Move, MoveKind, PlayerId};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

use crate::config::ServerConfig;
use crate::protocol::{InboundMove, RoomUpdate};

pub type RoomId = String;

/// Updates buffered per room before slow subscribers start lagging
const UPDATE_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RoomError {
    #[error("Room {0} not found")]
    RoomNotFound(RoomId),

    #[error(transparent)]
    Game(#[from] GameError),
}

impl RoomError {
    pub fn code(&self) -> &'static str {
        match self {
            RoomError::RoomNotFound(_) => "ROOM_NOT_FOUND",
            RoomError::Game(err) => err.code(),
        }
    }
}

/// A single game table.
pub struct GameRoom {
    pub id: RoomId,
    state: Mutex<GameState>,
    updates: broadcast::Sender<RoomUpdate>,
}

impl GameRoom {
    fn new(id: RoomId, state: GameState) -> Self {
        let (updates, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);
        Self {
            id,
            state: Mutex::new(state),
            updates,
        }
    }

    pub async fn snapshot(&self) -> GameState {
        self.state.lock().await.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RoomUpdate> {
        self.updates.subscribe()
    }

    fn publish(&self, update: RoomUpdate) {
        // No subscribers is fine
        let _ = self.updates.send(update);
    }
}

/// The bot turn a delayed continuation was scheduled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BotTrigger {
    player: PlayerId,
    turn_number: u32,
    /// Log length when scheduled; any later change makes the trigger stale
    step: usize,
}

impl BotTrigger {
    /// The trigger for the table as it stands, if a bot should act
    fn current(state: &GameState) -> Option<Self> {
        if state.status != GameStatus::Playing || !state.active_is_bot() {
            return None;
        }
        Some(Self {
            player: state.active_player(),
            turn_number: state.turn.turn_number,
            step: state.log.len(),
        })
    }

    fn is_current(&self, state: &GameState) -> bool {
        Self::current(state) == Some(*self)
    }

    fn same_turn(&self, other: &BotTrigger) -> bool {
        self.player == other.player && self.turn_number == other.turn_number
    }
}

/// FNV-1a over the room id, starting from the server seed
fn room_seed(seed: u64, room_id: &str) -> u64 {
    room_id.bytes().fold(seed ^ 0xcbf2_9ce4_8422_2325, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(0x0000_0100_0000_01b3)
    })
}

/// Registry of rooms plus the bot scheduler.
pub struct GameServer {
    rooms: DashMap<RoomId, Arc<GameRoom>>,
    config: ServerConfig,
}

impl GameServer {
    pub fn new(config: ServerConfig) -> Arc<Self> {
        Arc::new(Self {
            rooms: DashMap::new(),
            config,
        })
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    fn room(&self, room_id: &str) -> Result<Arc<GameRoom>, RoomError> {
        self.rooms
            .get(room_id)
            .map(|room| Arc::clone(room.value()))
            .ok_or_else(|| RoomError::RoomNotFound(room_id.to_string()))
    }

    /// Whether `room` is still the table registered under its id
    fn is_registered(&self, room: &Arc<GameRoom>) -> bool {
        self.rooms
            .get(&room.id)
            .map_or(false, |current| Arc::ptr_eq(current.value(), room))
    }

    /// Start a one-human, three-bot game in `room_id`. A configured seed is
    /// mixed with the room id, so each seeded room deals its own deck.
    pub fn create_game(self: &Arc<Self>, room_id: &str) -> Result<GameState, RoomError> {
        let mut config = GameConfig::default();
        config.seed = self.config.seed.map(|seed| room_seed(seed, room_id));
        self.create_game_with(room_id, &config)
    }

    /// Start a game in `room_id`, replacing any game already there
    pub fn create_game_with(
        self: &Arc<Self>,
        room_id: &str,
        config: &GameConfig,
    ) -> Result<GameState, RoomError> {
        let state = GameState::new(room_id, config)?;
        let room = Arc::new(GameRoom::new(room_id.to_string(), state.clone()));

        if self.rooms.insert(room_id.to_string(), Arc::clone(&room)).is_some() {
            warn!("Room {} replaced by a new game", room_id);
        }
        info!(
            "Room {} created with {} players",
            room_id,
            state.player_count()
        );

        self.schedule_next(&room, &state, None);
        Ok(state)
    }

    pub async fn get_game_state(&self, room_id: &str) -> Option<GameState> {
        let room = self.room(room_id).ok()?;
        Some(room.snapshot().await)
    }

    pub fn subscribe(&self, room_id: &str) -> Result<broadcast::Receiver<RoomUpdate>, RoomError> {
        Ok(self.room(room_id)?.subscribe())
    }

    /// Apply a move under the room lock and publish the outcome
    pub async fn process_move(self: &Arc<Self>, room_id: &str, mv: Move) -> Result<(), RoomError> {
        let room = self.room(room_id)?;
        let mut state = room.state.lock().await;

        match state.apply_move(&mv) {
            Ok(events) => {
                info!(
                    "Room {}: player {} {:?} applied ({} events)",
                    room.id,
                    mv.player,
                    mv.kind,
                    events.len()
                );
                room.publish(RoomUpdate::snapshot(&state));
                self.schedule_next(&room, &state, None);
                Ok(())
            }
            Err(err) => {
                warn!(
                    "Room {}: player {} {:?} rejected: {}",
                    room.id, mv.player, mv.kind, err
                );
                room.publish(RoomUpdate::error(err.code(), &err));
                Err(err.into())
            }
        }
    }

    /// Parse a raw client move, then process it
    pub async fn process_inbound(
        self: &Arc<Self>,
        room_id: &str,
        inbound: InboundMove,
    ) -> Result<(), RoomError> {
        let room = self.room(room_id)?;
        match Move::try_from(inbound) {
            Ok(mv) => self.process_move(room_id, mv).await,
            Err(err) => {
                warn!("Room {}: unparseable move: {}", room.id, err);
                room.publish(RoomUpdate::error(err.code(), &err));
                Err(err.into())
            }
        }
    }

    /// Pause or resume a room. Pending bot continuations go stale.
    pub async fn set_paused(self: &Arc<Self>, room_id: &str, paused: bool) -> Result<(), RoomError> {
        let room = self.room(room_id)?;
        let mut state = room.state.lock().await;

        let events = if paused {
            state.pause()?
        } else {
            state.resume()?
        };
        // Already in the requested state; a pending trigger is still valid
        if events.is_empty() {
            return Ok(());
        }
        info!("Room {} {}", room.id, if paused { "paused" } else { "resumed" });

        room.publish(RoomUpdate::snapshot(&state));
        self.schedule_next(&room, &state, None);
        Ok(())
    }

    // ==================== Bot Scheduling ====================

    /// Schedule the active bot if it should act. A bot continuing its own
    /// turn waits the move delay; a bot starting a turn waits the turn delay.
    fn schedule_next(
        self: &Arc<Self>,
        room: &Arc<GameRoom>,
        state: &GameState,
        previous: Option<BotTrigger>,
    ) {
        let Some(trigger) = BotTrigger::current(state) else {
            return;
        };
        let delay = match previous {
            Some(previous) if previous.same_turn(&trigger) => self.config.bot_move_delay,
            _ => self.config.bot_turn_delay,
        };
        self.schedule_bot(room, trigger, delay);
    }

    fn schedule_bot(self: &Arc<Self>, room: &Arc<GameRoom>, trigger: BotTrigger, delay: Duration) {
        debug!(
            "Room {}: bot {} scheduled in {:?} (turn {})",
            room.id, trigger.player, delay, trigger.turn_number
        );
        let server = Arc::clone(self);
        let room = Arc::clone(room);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            server.run_bot(&room, trigger).await;
        });
    }

    async fn run_bot(self: &Arc<Self>, room: &Arc<GameRoom>, trigger: BotTrigger) {
        if !self.is_registered(room) {
            debug!("Room {}: dropping bot trigger for a replaced game", room.id);
            return;
        }
        let mut state = room.state.lock().await;
        if !trigger.is_current(&state) {
            debug!(
                "Room {}: stale bot trigger for player {} (turn {})",
                room.id, trigger.player, trigger.turn_number
            );
            return;
        }

        let mv = bot::choose_move(&state, trigger.player);
        let applied = match state.apply_move(&mv) {
            Ok(_) => Ok(mv.kind),
            Err(err) => {
                warn!(
                    "Room {}: bot {} move {:?} rejected ({}), ending turn",
                    room.id, trigger.player, mv.kind, err
                );
                state
                    .apply_move(&Move::end_turn(trigger.player))
                    .map(|_| MoveKind::EndTurn)
            }
        };

        match applied {
            Ok(kind) => {
                debug!("Room {}: bot {} played {:?}", room.id, trigger.player, kind);
                if let Some(winner) = state.winner {
                    info!("Room {}: player {} wins", room.id, winner);
                }
                room.publish(RoomUpdate::snapshot(&state));
                self.schedule_next(room, &state, Some(trigger));
            }
            Err(err) => {
                warn!("Room {}: bot {} is stuck: {}", room.id, trigger.player, err);
                room.publish(RoomUpdate::error(err.code(), &err));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hustle_core::cards::DECK_SIZE;
    use pretty_assertions::assert_eq;

    fn server() -> Arc<GameServer> {
        GameServer::new(ServerConfig {
            seed: Some(11),
            ..ServerConfig::default()
        })
    }

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[tokio::test(start_paused = true)]
    async fn test_create_and_get() {
        let server = server();
        let created = server.create_game("r1").unwrap();

        assert_eq!(server.room_count(), 1);
        let fetched = server.get_game_state("r1").await.unwrap();
        assert_eq!(fetched.players, created.players);
        assert_eq!(fetched.game_id, "r1");
        assert!(server.get_game_state("missing").await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_seeded_rooms_deal_their_own_decks() {
        let server = server();
        let first = server.create_game("r1").unwrap();
        let second = server.create_game("r2").unwrap();
        assert_ne!(first.players, second.players);

        let again = server.create_game("r1").unwrap();
        assert_eq!(again.players, first.players);
    }

    #[tokio::test(start_paused = true)]
    async fn test_replaced_room_stops_playing() {
        let server = server();
        server
            .create_game_with("r", &GameConfig::all_bots(2).with_seed(3))
            .unwrap();
        let old_room = server.room("r").unwrap();

        server
            .create_game_with("r", &GameConfig::all_bots(2).with_seed(4))
            .unwrap();
        let frozen = old_room.snapshot().await.log.len();

        tokio::time::sleep(ms(120_000)).await;
        assert_eq!(old_room.snapshot().await.log.len(), frozen);
        assert!(!server.is_registered(&old_room));

        let live = server.get_game_state("r").await.unwrap();
        assert!(live.log.len() > 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pausing_finished_room_reports_game_over() {
        let server = server();
        server.create_game("r1").unwrap();
        server.room("r1").unwrap().state.lock().await.status = GameStatus::GameOver;

        let err = server.set_paused("r1", true).await.unwrap_err();
        assert_eq!(err, RoomError::Game(GameError::GameAlreadyOver));
    }

    #[tokio::test(start_paused = true)]
    async fn test_create_rejects_bad_seat_count() {
        let server = server();
        let err = server
            .create_game_with("solo", &GameConfig::all_bots(1))
            .unwrap_err();
        assert_eq!(err, RoomError::Game(GameError::InvalidPlayerCount(1)));
        assert_eq!(server.room_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_room() {
        let server = server();
        let err = server.process_move("nowhere", Move::draw(0)).await.unwrap_err();
        assert_eq!(err.code(), "ROOM_NOT_FOUND");
    }

    #[tokio::test(start_paused = true)]
    async fn test_move_publishes_snapshot() {
        let server = server();
        server.create_game("r1").unwrap();
        let mut updates = server.subscribe("r1").unwrap();

        server.process_move("r1", Move::draw(0)).await.unwrap();
        match updates.recv().await.unwrap() {
            RoomUpdate::Snapshot { state } => {
                assert_eq!(state.turn.actions_remaining, 3);
                assert_eq!(state.players[0].hand.len(), 7);
            }
            other => panic!("expected snapshot, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_move_publishes_error() {
        let server = server();
        server.create_game("r1").unwrap();
        let mut updates = server.subscribe("r1").unwrap();

        let err = server.process_move("r1", Move::end_turn(2)).await.unwrap_err();
        assert_eq!(err, RoomError::Game(GameError::NotPlayersTurn { active: 0 }));

        match updates.recv().await.unwrap() {
            RoomUpdate::Error { code, .. } => assert_eq!(code, "NOT_PLAYERS_TURN"),
            other => panic!("expected error, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_inbound_kind_is_parsed() {
        let server = server();
        server.create_game("r1").unwrap();

        let bad = InboundMove {
            player: 0,
            kind: "teleport".to_string(),
            ..Default::default()
        };
        let err = server.process_inbound("r1", bad).await.unwrap_err();
        assert_eq!(err.code(), "INVALID_MOVE_TYPE");

        let draw = InboundMove {
            player: 0,
            kind: "DRAW".to_string(),
            ..Default::default()
        };
        server.process_inbound("r1", draw).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_bot_waits_for_turn_delay() {
        let server = server();
        server.create_game("r1").unwrap();
        server.process_move("r1", Move::end_turn(0)).await.unwrap();

        tokio::time::sleep(ms(1499)).await;
        let state = server.get_game_state("r1").await.unwrap();
        assert_eq!(state.active_player(), 1);
        assert_eq!(state.turn.actions_remaining, 0);

        tokio::time::sleep(ms(2)).await;
        let state = server.get_game_state("r1").await.unwrap();
        assert_eq!(state.active_player(), 1);
        assert_eq!(state.turn.actions_remaining, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_paused_room_freezes_bots() {
        let server = server();
        server.create_game("r1").unwrap();
        server.process_move("r1", Move::end_turn(0)).await.unwrap();
        server.set_paused("r1", true).await.unwrap();

        tokio::time::sleep(ms(10_000)).await;
        let state = server.get_game_state("r1").await.unwrap();
        assert_eq!(state.status, GameStatus::Paused);
        assert_eq!(state.turn.actions_remaining, 0);

        let err = server.process_move("r1", Move::draw(1)).await.unwrap_err();
        assert_eq!(err.code(), "GAME_PAUSED");
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_trigger_does_not_double_move() {
        let server = server();
        server.create_game("r1").unwrap();
        server.process_move("r1", Move::end_turn(0)).await.unwrap();

        // The first trigger goes stale; resuming schedules a fresh one
        server.set_paused("r1", true).await.unwrap();
        server.set_paused("r1", false).await.unwrap();

        tokio::time::sleep(ms(1501)).await;
        let state = server.get_game_state("r1").await.unwrap();
        assert_eq!(state.active_player(), 1);
        assert_eq!(state.turn.actions_remaining, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_bot_room_plays_on_its_own() {
        let server = server();
        server
            .create_game_with("bots", &GameConfig::all_bots(3).with_seed(8))
            .unwrap();
        let mut updates = server.subscribe("bots").unwrap();

        let mut snapshots = 0;
        while snapshots < 40 {
            match updates.recv().await.unwrap() {
                RoomUpdate::Snapshot { state } => {
                    assert_eq!(state.card_count(), DECK_SIZE);
                    snapshots += 1;
                    if state.is_over() {
                        break;
                    }
                }
                RoomUpdate::Error { code, .. } => panic!("bot move failed: {}", code),
            }
        }

        let state = server.get_game_state("bots").await.unwrap();
        assert!(state.turn.turn_number > 1 || state.is_over());
    }

    #[test]
    fn test_trigger_goes_stale_when_turn_passes() {
        let mut state = GameState::new("t", &GameConfig::all_bots(2).with_seed(1)).unwrap();
        let trigger = BotTrigger::current(&state).unwrap();
        assert!(trigger.is_current(&state));

        state.apply_move(&Move::draw(0)).unwrap();
        assert!(!trigger.is_current(&state));
        let next = BotTrigger::current(&state).unwrap();
        assert!(trigger.same_turn(&next));

        state.apply_move(&Move::end_turn(0)).unwrap();
        let moved_on = BotTrigger::current(&state).unwrap();
        assert_eq!(moved_on.player, 1);
        assert!(!next.same_turn(&moved_on));
    }

    #[test]
    fn test_no_trigger_for_human_seat() {
        let state = GameState::new("t", &GameConfig::default().with_seed(1)).unwrap();
        assert_eq!(BotTrigger::current(&state), None);
    }
}
