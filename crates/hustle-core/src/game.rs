//! Core game state machine.
//!
//! This module contains the main `GameState` struct, the move dispatcher and
//! the game log. Turn bookkeeping lives in [`crate::turn`], card effects in
//! [`crate::effects`] and move validation in [`crate::validate`].

use crate::actions::{
    Building, FizzleReason, GameEvent, LogEntry, LogKind, Move, MoveKind,
};
use crate::cards::{standard_deck, Card, CardId, CardKind, PropertyColor};
use crate::player::{Player, PlayerId};
use crate::rent;
use crate::turn::{TurnContext, TurnStage, INITIAL_HAND_SIZE};
use crate::validate;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fewest seats a game can start with
pub const MIN_PLAYERS: usize = 2;

/// Most seats a game can start with
pub const MAX_PLAYERS: usize = 4;

/// Names given to the default bot seats
pub const BOT_NAMES: [&str; 3] = ["Bot Alpha", "Bot Beta", "Bot Gamma"];

/// Overall game status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// Created but not dealt
    Waiting,
    /// Moves are being accepted
    Playing,
    /// Temporarily frozen; moves are rejected
    Paused,
    /// Someone holds three complete sets
    GameOver,
}

/// Errors that can occur when applying moves
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GameError {
    #[error("Not your turn (player {active} is active)")]
    NotPlayersTurn { active: PlayerId },

    #[error("Unknown move type: {0}")]
    InvalidMoveType(String),

    #[error("No card specified")]
    MissingCard,

    #[error("Card {0} is not in your hand")]
    CardNotInHand(CardId),

    #[error("No actions remaining")]
    NoActionsRemaining,

    #[error("Already drew this turn")]
    AlreadyDrawn,

    #[error("Invalid target player {0}")]
    InvalidTarget(PlayerId),

    #[error("Card cannot be used as {0}")]
    InvalidColor(PropertyColor),

    #[error("Invalid card play: {0}")]
    InvalidCardPlay(String),

    #[error("Game is paused")]
    GamePaused,

    #[error("Game is over")]
    GameAlreadyOver,

    #[error("A game needs 2-4 players, got {0}")]
    InvalidPlayerCount(usize),
}

impl GameError {
    /// Stable code sent to clients alongside the message
    pub fn code(&self) -> &'static str {
        match self {
            GameError::NotPlayersTurn { .. } => "NOT_PLAYERS_TURN",
            GameError::InvalidMoveType(_) => "INVALID_MOVE_TYPE",
            GameError::MissingCard => "CARD_NOT_FOUND",
            GameError::CardNotInHand(_) => "CARD_NOT_IN_HAND",
            GameError::NoActionsRemaining => "NO_ACTIONS_REMAINING",
            GameError::AlreadyDrawn => "ALREADY_DRAWN",
            GameError::InvalidTarget(_) => "INVALID_TARGET",
            GameError::InvalidColor(_) => "INVALID_COLOR",
            GameError::InvalidCardPlay(_) => "INVALID_CARD_PLAY",
            GameError::GamePaused => "GAME_PAUSED",
            GameError::GameAlreadyOver => "GAME_ALREADY_OVER",
            GameError::InvalidPlayerCount(_) => "INVALID_PLAYER_COUNT",
        }
    }
}

/// One seat at the table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatConfig {
    pub name: String,
    pub is_human: bool,
}

impl SeatConfig {
    pub fn human(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_human: true,
        }
    }

    pub fn bot(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_human: false,
        }
    }
}

/// Table setup for a new game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Seats in turn order
    pub seats: Vec<SeatConfig>,
    /// Seed for the shuffle; `None` draws from entropy
    pub seed: Option<u64>,
}

impl GameConfig {
    /// One human followed by `bots` bot seats
    pub fn single_player(bots: usize) -> Self {
        let mut seats = vec![SeatConfig::human("You")];
        seats.extend((0..bots).map(|i| SeatConfig::bot(bot_name(i))));
        Self { seats, seed: None }
    }

    /// Bots only, used for self-play
    pub fn all_bots(count: usize) -> Self {
        Self {
            seats: (0..count).map(|i| SeatConfig::bot(bot_name(i))).collect(),
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::single_player(BOT_NAMES.len())
    }
}

fn bot_name(index: usize) -> String {
    BOT_NAMES
        .get(index)
        .map(|name| name.to_string())
        .unwrap_or_else(|| format!("Bot {}", index + 1))
}

fn fresh_rng() -> StdRng {
    StdRng::from_entropy()
}

/// The complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub game_id: String,
    pub status: GameStatus,
    /// All players, in turn order
    pub players: Vec<Player>,
    /// Draw pile; the top card is the last element
    pub deck: Vec<Card>,
    pub discard_pile: Vec<Card>,
    pub turn: TurnContext,
    /// Append-only event log
    pub log: Vec<LogEntry>,
    pub winner: Option<PlayerId>,
    #[serde(skip, default = "fresh_rng")]
    pub(crate) rng: StdRng,
}

impl GameState {
    /// Shuffle a fresh deck and deal five cards to every seat
    pub fn new(game_id: impl Into<String>, config: &GameConfig) -> Result<Self, GameError> {
        let seat_count = config.seats.len();
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&seat_count) {
            return Err(GameError::InvalidPlayerCount(seat_count));
        }

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut deck = standard_deck(&mut rng);
        deck.shuffle(&mut rng);

        let mut players: Vec<Player> = config
            .seats
            .iter()
            .enumerate()
            .map(|(i, seat)| Player::new(i as PlayerId, seat.name.clone(), seat.is_human))
            .collect();

        for _ in 0..INITIAL_HAND_SIZE {
            for player in &mut players {
                if let Some(card) = deck.pop() {
                    player.hand.push(card);
                }
            }
        }

        Ok(Self {
            game_id: game_id.into(),
            status: GameStatus::Playing,
            players,
            deck,
            discard_pile: Vec::new(),
            turn: TurnContext::new(0),
            log: vec![LogEntry::new(
                "Property Hustle started! Draw 2 cards to begin.",
                LogKind::System,
            )],
            winner: None,
            rng,
        })
    }

    /// Get the number of players
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Get a player by ID
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id as usize)
    }

    pub(crate) fn player_mut(&mut self, id: PlayerId) -> &mut Player {
        &mut self.players[id as usize]
    }

    pub fn active_player(&self) -> PlayerId {
        self.turn.active_player
    }

    /// Whether the active seat is a bot
    pub fn active_is_bot(&self) -> bool {
        self.player(self.active_player()).map_or(false, Player::is_bot)
    }

    pub fn is_over(&self) -> bool {
        self.status == GameStatus::GameOver
    }

    /// Cards across every zone; constant for the life of a game
    pub fn card_count(&self) -> usize {
        self.deck.len()
            + self.discard_pile.len()
            + self.players.iter().map(Player::card_count).sum::<usize>()
    }

    /// Freeze the game; moves are rejected until [`GameState::resume`]
    pub fn pause(&mut self) -> Result<Vec<GameEvent>, GameError> {
        if self.is_over() {
            return Err(GameError::GameAlreadyOver);
        }
        let mut events = Vec::new();
        if self.status != GameStatus::Paused {
            self.status = GameStatus::Paused;
            self.emit(&mut events, GameEvent::PauseChanged { paused: true });
        }
        Ok(events)
    }

    pub fn resume(&mut self) -> Result<Vec<GameEvent>, GameError> {
        if self.is_over() {
            return Err(GameError::GameAlreadyOver);
        }
        let mut events = Vec::new();
        if self.status == GameStatus::Paused {
            self.status = GameStatus::Playing;
            self.emit(&mut events, GameEvent::PauseChanged { paused: false });
        }
        Ok(events)
    }

    /// Get all currently legal moves for a player
    pub fn valid_moves(&self, player: PlayerId) -> Vec<Move> {
        if self.status != GameStatus::Playing || player != self.active_player() {
            return Vec::new();
        }
        let Some(p) = self.player(player) else {
            return Vec::new();
        };

        let mut moves = Vec::new();
        match self.turn.stage() {
            TurnStage::MustDraw => moves.push(Move::draw(player)),
            TurnStage::CanAct => {
                for card in &p.hand {
                    moves.push(Move::play(player, card.id.clone()));
                    if matches!(card.kind, CardKind::Rent | CardKind::RentWild | CardKind::Action) {
                        moves.push(Move::bank(player, card.id.clone()));
                    }
                }
            }
        }
        moves.push(Move::end_turn(player));
        moves
    }

    /// Validate and apply a move
    pub fn apply_move(&mut self, mv: &Move) -> Result<Vec<GameEvent>, GameError> {
        validate::validate(self, mv)?;

        let mut events = Vec::new();
        let actor = mv.player;

        match mv.kind {
            // ==================== Turn Management ====================
            MoveKind::Draw => {
                self.draw_for_turn(actor, &mut events);
            }

            MoveKind::EndTurn => {
                self.end_turn(&mut events);
            }

            // ==================== Cards ====================
            MoveKind::PlayCard => {
                let card = self.take_hand_card(actor, mv)?;
                self.turn.spend_action();
                self.play_card(actor, card, mv, &mut events);

                if self.status == GameStatus::Playing && self.turn.actions_remaining == 0 {
                    self.end_turn(&mut events);
                }
            }

            MoveKind::React => {
                let card = self.take_hand_card(actor, mv)?;
                self.discard_pile.push(card);
                self.turn.close_window();
                self.emit(&mut events, GameEvent::JustSayNoPlayed { player: actor });
            }
        }

        Ok(events)
    }

    fn take_hand_card(&mut self, actor: PlayerId, mv: &Move) -> Result<Card, GameError> {
        let card_id = mv.card_id.as_deref().ok_or(GameError::MissingCard)?;
        self.player_mut(actor)
            .take_from_hand(card_id)
            .ok_or_else(|| GameError::CardNotInHand(card_id.to_string()))
    }

    // ==================== Helper Methods ====================

    /// End the game if `player` now holds enough complete sets
    pub(crate) fn check_win(&mut self, player: PlayerId, events: &mut Vec<GameEvent>) {
        if self.is_over() {
            return;
        }
        let sets = rent::completed_set_colors(&self.players[player as usize]).len();
        if sets >= rent::SETS_TO_WIN {
            self.status = GameStatus::GameOver;
            self.winner = Some(player);
            self.emit(events, GameEvent::GameWon { player, sets });
        }
    }

    /// Record an event and its log line
    pub(crate) fn emit(&mut self, events: &mut Vec<GameEvent>, event: GameEvent) {
        let entry = self.describe(&event);
        self.log.push(entry);
        events.push(event);
    }

    fn name(&self, player: PlayerId) -> &str {
        self.player(player).map_or("Unknown", |p| p.name.as_str())
    }

    fn property_name(&self, owner: PlayerId, card_id: &CardId) -> &str {
        self.player(owner)
            .and_then(|p| p.find_property(card_id))
            .map_or("a property", |c| c.name.as_str())
    }

    fn describe(&self, event: &GameEvent) -> LogEntry {
        match event {
            GameEvent::CardsDrawn { player, drawn, .. } => LogEntry::new(
                format!("{} drew {} card{}", self.name(*player), drawn, plural(*drawn)),
                LogKind::Info,
            ),
            GameEvent::DeckReshuffled { cards } => LogEntry::new(
                format!("Discard pile reshuffled into the deck ({} cards)", cards),
                LogKind::System,
            ),
            GameEvent::CardBanked { player, value, .. } => LogEntry::new(
                format!("{} banked ${}M", self.name(*player), value),
                LogKind::Event,
            ),
            GameEvent::PropertyPlayed {
                player,
                card_id,
                color,
            } => LogEntry::new(
                format!(
                    "{} played {} as {}",
                    self.name(*player),
                    self.property_name(*player, card_id),
                    color
                ),
                LogKind::Event,
            ),
            GameEvent::ActionPlayed { player, action } => LogEntry::new(
                format!("{} played {}", self.name(*player), action.name()),
                LogKind::Event,
            ),
            GameEvent::RentCharged {
                player,
                color,
                amount,
                doubled,
                ..
            } => LogEntry::new(
                format!(
                    "{} charged ${}M {} rent{}",
                    self.name(*player),
                    amount,
                    color,
                    if *doubled { " (doubled)" } else { "" }
                ),
                LogKind::Payment,
            ),
            GameEvent::ActionFizzled { player, reason, .. } => {
                let why = match reason {
                    FizzleReason::NoValidTarget => "no valid target",
                    FizzleReason::NoMatchingProperties => "no matching properties",
                    FizzleReason::NoEligibleSet => "no set to build on",
                    FizzleReason::NothingToOffer => "no property to trade",
                };
                LogEntry::new(
                    format!("{}'s card had no effect: {}", self.name(*player), why),
                    LogKind::Warning,
                )
            }
            GameEvent::ActionBlocked {
                blocker,
                attacker,
                card_name,
            } => LogEntry::new(
                format!(
                    "{} blocked {}'s {} with Just Say No!",
                    self.name(*blocker),
                    self.name(*attacker),
                    card_name
                ),
                LogKind::Event,
            ),
            GameEvent::JustSayNoPlayed { player } => LogEntry::new(
                format!("{} played Just Say No. Nothing to cancel.", self.name(*player)),
                LogKind::Info,
            ),
            GameEvent::PaymentSettled {
                debtor,
                creditor,
                amount,
                paid,
                reason,
                ..
            } => {
                let text = if *paid == 0 {
                    format!("{} has nothing to pay with!", self.name(*debtor))
                } else if paid < amount {
                    format!(
                        "{} could only pay {} ${}M of ${}M {}",
                        self.name(*debtor),
                        self.name(*creditor),
                        paid,
                        amount,
                        reason.label()
                    )
                } else {
                    format!(
                        "{} paid {} ${}M for {}",
                        self.name(*debtor),
                        self.name(*creditor),
                        paid,
                        reason.label()
                    )
                };
                let kind = if paid < amount {
                    LogKind::Warning
                } else {
                    LogKind::Payment
                };
                LogEntry::new(text, kind)
            }
            GameEvent::PropertyStolen {
                thief,
                victim,
                card_id,
            } => LogEntry::new(
                format!(
                    "{} stole {} from {}",
                    self.name(*thief),
                    self.property_name(*thief, card_id),
                    self.name(*victim)
                ),
                LogKind::Event,
            ),
            GameEvent::PropertiesSwapped {
                player,
                target,
                given,
                taken,
            } => LogEntry::new(
                format!(
                    "{} swapped {} for {}'s {}",
                    self.name(*player),
                    self.property_name(*target, given),
                    self.name(*target),
                    self.property_name(*player, taken)
                ),
                LogKind::Event,
            ),
            GameEvent::SetStolen {
                thief,
                victim,
                color,
                ..
            } => LogEntry::new(
                format!(
                    "{} took {}'s complete {} set!",
                    self.name(*thief),
                    self.name(*victim),
                    color
                ),
                LogKind::Event,
            ),
            GameEvent::BuildingAdded {
                player,
                color,
                building,
            } => {
                let building = match building {
                    Building::House => "House",
                    Building::Hotel => "Hotel",
                };
                LogEntry::new(
                    format!("{} added a {} to {}", self.name(*player), building, color),
                    LogKind::Event,
                )
            }
            GameEvent::DoubleRentArmed { player } => LogEntry::new(
                format!("{}'s next rent is doubled", self.name(*player)),
                LogKind::Event,
            ),
            GameEvent::HandTrimmed { player, card_ids } => LogEntry::new(
                format!(
                    "{} discarded {} card{}",
                    self.name(*player),
                    card_ids.len(),
                    plural(card_ids.len())
                ),
                LogKind::Info,
            ),
            GameEvent::TurnEnded { next_player, .. } => LogEntry::new(
                format!("{}'s turn", self.name(*next_player)),
                LogKind::Info,
            ),
            GameEvent::PauseChanged { paused } => LogEntry::new(
                if *paused { "Game paused" } else { "Game resumed" },
                LogKind::System,
            ),
            GameEvent::GameWon { player, sets } => LogEntry::new(
                format!("{} wins with {} complete sets!", self.name(*player), sets),
                LogKind::System,
            ),
        }
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}
