//! Turn bookkeeping: drawing, action budget and passing the turn.

use crate::actions::GameEvent;
use crate::game::GameState;
use crate::payment::PaymentRequest;
use crate::player::PlayerId;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Cards dealt to each player at game start
pub const INITIAL_HAND_SIZE: usize = 5;

/// Cards drawn at the start of a normal turn
pub const NORMAL_DRAW_COUNT: usize = 2;

/// Cards drawn when starting a turn with an empty hand
pub const EMPTY_HAND_DRAW_COUNT: usize = 5;

/// Cards a Pass Go draws
pub const PASS_GO_DRAW_COUNT: usize = 2;

/// Card plays allowed per turn
pub const ACTIONS_PER_TURN: u8 = 3;

/// Hand limit enforced at end of turn
pub const MAX_HAND_SIZE: usize = 7;

/// Where the active player is within their turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnStage {
    /// Has not drawn yet (no actions)
    MustDraw,
    /// Drew and has actions left
    CanAct,
}

/// Per-turn state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnContext {
    pub active_player: PlayerId,
    pub actions_remaining: u8,
    /// A reaction window is open
    pub waiting_for_response: bool,
    /// Player the open window is waiting on
    pub target_player: Option<PlayerId>,
    /// The next rent this turn is doubled
    pub double_rent: bool,
    /// Payments created this turn
    pub pending_payments: Vec<PaymentRequest>,
    /// Starts at 1, incremented whenever the turn passes
    pub turn_number: u32,
}

impl TurnContext {
    pub fn new(first_player: PlayerId) -> Self {
        Self {
            active_player: first_player,
            actions_remaining: 0,
            waiting_for_response: false,
            target_player: None,
            double_rent: false,
            pending_payments: Vec::new(),
            turn_number: 1,
        }
    }

    pub fn stage(&self) -> TurnStage {
        if self.actions_remaining == 0 {
            TurnStage::MustDraw
        } else {
            TurnStage::CanAct
        }
    }

    pub(crate) fn spend_action(&mut self) {
        self.actions_remaining = self.actions_remaining.saturating_sub(1);
    }

    pub(crate) fn open_window(&mut self, target: PlayerId) {
        self.waiting_for_response = true;
        self.target_player = Some(target);
    }

    pub(crate) fn close_window(&mut self) {
        self.waiting_for_response = false;
        self.target_player = None;
    }

    /// Hand the turn to `next`
    fn pass_to(&mut self, next: PlayerId) {
        self.active_player = next;
        self.actions_remaining = 0;
        self.double_rent = false;
        self.pending_payments.clear();
        self.close_window();
        self.turn_number += 1;
    }
}

impl GameState {
    /// Draw up to `count` cards, recycling the discard pile when the deck
    /// runs out. Returns the number actually drawn.
    pub(crate) fn draw_cards(
        &mut self,
        player: PlayerId,
        count: usize,
        events: &mut Vec<GameEvent>,
    ) -> usize {
        let mut drawn = 0;
        for _ in 0..count {
            if self.deck.is_empty() && !self.discard_pile.is_empty() {
                self.reshuffle_discards(events);
            }
            let Some(card) = self.deck.pop() else {
                break;
            };
            self.player_mut(player).hand.push(card);
            drawn += 1;
        }

        self.emit(
            events,
            GameEvent::CardsDrawn {
                player,
                requested: count,
                drawn,
            },
        );
        drawn
    }

    fn reshuffle_discards(&mut self, events: &mut Vec<GameEvent>) {
        self.deck.append(&mut self.discard_pile);
        self.deck.shuffle(&mut self.rng);
        let cards = self.deck.len();
        self.emit(events, GameEvent::DeckReshuffled { cards });
    }

    /// Start-of-turn draw. Opens the action budget.
    pub(crate) fn draw_for_turn(&mut self, player: PlayerId, events: &mut Vec<GameEvent>) {
        let count = if self.players[player as usize].hand.is_empty() {
            EMPTY_HAND_DRAW_COUNT
        } else {
            NORMAL_DRAW_COUNT
        };
        self.draw_cards(player, count, events);
        self.turn.actions_remaining = ACTIONS_PER_TURN;
    }

    /// Trim the active hand to the limit and pass the turn
    pub(crate) fn end_turn(&mut self, events: &mut Vec<GameEvent>) {
        let player = self.turn.active_player;

        let hand = &mut self.player_mut(player).hand;
        let excess = hand.len().saturating_sub(MAX_HAND_SIZE);
        let trimmed: Vec<_> = hand.drain(..excess).collect();
        if !trimmed.is_empty() {
            let card_ids = trimmed.iter().map(|c| c.id.clone()).collect();
            self.discard_pile.extend(trimmed);
            self.emit(events, GameEvent::HandTrimmed { player, card_ids });
        }

        let next_player = ((player as usize + 1) % self.player_count()) as PlayerId;
        self.turn.pass_to(next_player);
        self.emit(
            events,
            GameEvent::TurnEnded {
                player,
                next_player,
            },
        );
    }
}
