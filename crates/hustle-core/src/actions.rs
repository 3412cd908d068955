//! Moves players submit and the events they produce.
//!
//! This module defines the inbound move shape, the typed events returned by
//! `GameState::apply_move`, and the human-readable log entries kept on the
//! game state.

use crate::cards::{ActionKind, CardId, PropertyColor};
use crate::game::GameError;
use crate::payment::PaymentReason;
use crate::player::PlayerId;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The four kinds of move a player can submit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveKind {
    /// Draw at the start of the turn
    Draw,
    /// Play one card from hand
    PlayCard,
    /// Pass the turn to the next player
    EndTurn,
    /// Respond to an open reaction window
    React,
}

impl FromStr for MoveKind {
    type Err = GameError;

    /// Accepts `PLAY_CARD`, `PlayCard` and `play_card` spellings
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();

        match normalized.as_str() {
            "draw" => Ok(MoveKind::Draw),
            "playcard" => Ok(MoveKind::PlayCard),
            "endturn" => Ok(MoveKind::EndTurn),
            "react" => Ok(MoveKind::React),
            _ => Err(GameError::InvalidMoveType(s.to_string())),
        }
    }
}

/// A move submitted by a player or chosen by a bot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    /// Acting player
    pub player: PlayerId,
    pub kind: MoveKind,
    #[serde(default)]
    pub card_id: Option<CardId>,
    #[serde(default)]
    pub target_player: Option<PlayerId>,
    #[serde(default)]
    pub target_card: Option<CardId>,
    /// Explicit color for a wild, a rent card, a Deal Breaker or a building
    #[serde(default)]
    pub color: Option<PropertyColor>,
    /// Bank an action or rent card for its face value instead of playing it
    #[serde(default)]
    pub bank: bool,
}

impl Move {
    fn new(player: PlayerId, kind: MoveKind, card_id: Option<CardId>) -> Self {
        Self {
            player,
            kind,
            card_id,
            target_player: None,
            target_card: None,
            color: None,
            bank: false,
        }
    }

    pub fn draw(player: PlayerId) -> Self {
        Self::new(player, MoveKind::Draw, None)
    }

    pub fn end_turn(player: PlayerId) -> Self {
        Self::new(player, MoveKind::EndTurn, None)
    }

    pub fn play(player: PlayerId, card_id: impl Into<CardId>) -> Self {
        Self::new(player, MoveKind::PlayCard, Some(card_id.into()))
    }

    /// Play a card into the bank
    pub fn bank(player: PlayerId, card_id: impl Into<CardId>) -> Self {
        let mut mv = Self::play(player, card_id);
        mv.bank = true;
        mv
    }

    pub fn react(player: PlayerId, card_id: impl Into<CardId>) -> Self {
        Self::new(player, MoveKind::React, Some(card_id.into()))
    }

    pub fn targeting(mut self, target: PlayerId) -> Self {
        self.target_player = Some(target);
        self
    }

    pub fn taking(mut self, card_id: impl Into<CardId>) -> Self {
        self.target_card = Some(card_id.into());
        self
    }

    pub fn with_color(mut self, color: PropertyColor) -> Self {
        self.color = Some(color);
        self
    }
}

/// Why an action resolved without effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FizzleReason {
    /// No opponent can be targeted
    NoValidTarget,
    /// The player owns no property the rent card charges for
    NoMatchingProperties,
    /// No complete set can take the building
    NoEligibleSet,
    /// The actor has nothing to give in a swap
    NothingToOffer,
}

/// Building placed on a complete set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Building {
    House,
    Hotel,
}

/// Events produced while applying a move
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Cards were drawn (fewer than requested when deck and discard ran dry)
    CardsDrawn {
        player: PlayerId,
        requested: usize,
        drawn: usize,
    },

    /// The discard pile was shuffled back into the deck
    DeckReshuffled { cards: usize },

    /// A card went to the bank
    CardBanked {
        player: PlayerId,
        card_id: CardId,
        value: u32,
    },

    /// A property or wild was played
    PropertyPlayed {
        player: PlayerId,
        card_id: CardId,
        color: PropertyColor,
    },

    /// An action card was resolved
    ActionPlayed {
        player: PlayerId,
        action: ActionKind,
    },

    /// Rent was charged
    RentCharged {
        player: PlayerId,
        color: PropertyColor,
        amount: u32,
        doubled: bool,
        targets: Vec<PlayerId>,
    },

    /// A card resolved with no effect
    ActionFizzled {
        player: PlayerId,
        card_id: CardId,
        reason: FizzleReason,
    },

    /// A player blocked an action with Just Say No
    ActionBlocked {
        blocker: PlayerId,
        attacker: PlayerId,
        card_name: String,
    },

    /// Just Say No played outside a block
    JustSayNoPlayed { player: PlayerId },

    /// A debt was settled
    PaymentSettled {
        debtor: PlayerId,
        creditor: PlayerId,
        amount: u32,
        paid: u32,
        reason: PaymentReason,
        card_ids: Vec<CardId>,
    },

    /// A single property was stolen
    PropertyStolen {
        thief: PlayerId,
        victim: PlayerId,
        card_id: CardId,
    },

    /// Two properties changed owners
    PropertiesSwapped {
        player: PlayerId,
        target: PlayerId,
        given: CardId,
        taken: CardId,
    },

    /// A complete set was stolen
    SetStolen {
        thief: PlayerId,
        victim: PlayerId,
        color: PropertyColor,
        card_ids: Vec<CardId>,
    },

    /// A house or hotel was added to a set
    BuildingAdded {
        player: PlayerId,
        color: PropertyColor,
        building: Building,
    },

    /// The next rent this turn is doubled
    DoubleRentArmed { player: PlayerId },

    /// Excess cards were discarded at end of turn
    HandTrimmed {
        player: PlayerId,
        card_ids: Vec<CardId>,
    },

    /// Turn ended
    TurnEnded {
        player: PlayerId,
        next_player: PlayerId,
    },

    /// Game paused or resumed
    PauseChanged { paused: bool },

    /// A player won the game
    GameWon { player: PlayerId, sets: usize },
}

/// Log entry category, used by clients for styling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogKind {
    Info,
    Event,
    Payment,
    Warning,
    System,
}

/// One line of the game log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub text: String,
    pub kind: LogKind,
}

impl LogEntry {
    pub fn new(text: impl Into<String>, kind: LogKind) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_kind_parsing() {
        assert_eq!("PLAY_CARD".parse::<MoveKind>().unwrap(), MoveKind::PlayCard);
        assert_eq!("EndTurn".parse::<MoveKind>().unwrap(), MoveKind::EndTurn);
        assert_eq!("draw".parse::<MoveKind>().unwrap(), MoveKind::Draw);
        assert_eq!("react".parse::<MoveKind>().unwrap(), MoveKind::React);

        let err = "TRADE".parse::<MoveKind>().unwrap_err();
        assert!(matches!(err, GameError::InvalidMoveType(ref kind) if kind == "TRADE"));
    }

    #[test]
    fn test_move_builders() {
        let mv = Move::play(2, "c1").targeting(0).with_color(PropertyColor::Red);
        assert_eq!(mv.kind, MoveKind::PlayCard);
        assert_eq!(mv.card_id.as_deref(), Some("c1"));
        assert_eq!(mv.target_player, Some(0));
        assert_eq!(mv.color, Some(PropertyColor::Red));
        assert!(!mv.bank);
        assert!(Move::bank(1, "c2").bank);
    }

    #[test]
    fn test_move_json_defaults() {
        let mv: Move = serde_json::from_str(r#"{"player":1,"kind":"Draw"}"#).unwrap();
        assert_eq!(mv, Move::draw(1));
    }
}
