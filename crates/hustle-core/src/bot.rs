//! Bot players for Property Hustle.
//!
//! Bots follow a fixed priority list: the first tier with a playable card
//! wins. They also decide, when targeted, whether an attack is worth one of
//! their Just Say No cards.

use crate::actions::Move;
use crate::cards::{ActionKind, Card, CardKind};
use crate::game::GameState;
use crate::player::{Player, PlayerId};
use crate::property;
use crate::rent;
use crate::turn::TurnStage;
use serde::{Deserialize, Serialize};

/// An opponent banking at least this much is worth collecting from
const OPPONENT_CASH_THRESHOLD: u32 = 2;

/// Below this bank+hand wealth the bot goes collecting
const LOW_WEALTH_THRESHOLD: u32 = 10;

/// Below this bank value the bot banks money
const LOW_BANK_THRESHOLD: u32 = 5;

/// Complete sets at which the bot plays aggressively
const NEAR_WIN_SETS: usize = 2;

/// Threat needed to spend a lone Just Say No
const BLOCK_THRESHOLD_SINGLE: u32 = 7;

/// Threat needed to spend one of several Just Say No cards
const BLOCK_THRESHOLD_MULTIPLE: u32 = 5;

/// Extra threat from a payment when the bank is thin
const LOW_BANK_PENALTY: u32 = 3;

/// Payments at least this large count as high rent
const HIGH_PAYMENT: u32 = 6;

/// Extra threat from a high payment
const HIGH_PAYMENT_PENALTY: u32 = 4;

/// Extra threat when the target is close to winning
const NEAR_WIN_PENALTY: u32 = 3;

/// Property count above which a single steal hurts more
const MANY_PROPERTIES: usize = 5;

/// An attack a bot may block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Threat {
    DealBreaker,
    SlyDeal,
    ForcedDeal,
    DebtCollector { amount: u32 },
    Rent { amount: u32 },
}

impl Threat {
    fn level(&self, defender: &Player) -> u32 {
        match *self {
            Threat::DealBreaker => 10,
            Threat::SlyDeal => 6,
            Threat::ForcedDeal => 5,
            Threat::DebtCollector { amount } | Threat::Rent { amount } => {
                let mut level = amount;
                if defender.bank_value() < LOW_BANK_THRESHOLD {
                    level += LOW_BANK_PENALTY;
                }
                if amount >= HIGH_PAYMENT {
                    level += HIGH_PAYMENT_PENALTY;
                }
                level
            }
        }
    }
}

/// Decide whether `defender` spends a Just Say No against `attacker`
pub fn should_block(defender: &Player, attacker: &Player, threat: Threat) -> bool {
    let blockers = defender.count_action(ActionKind::JustSayNo);
    if blockers == 0 {
        return false;
    }

    let defender_sets = rent::completed_set_colors(defender).len();
    let attacker_sets = rent::completed_set_colors(attacker).len();

    // A far-ahead defender lets small attacks from a setless player through
    if attacker_sets == 0 && defender_sets >= NEAR_WIN_SETS {
        return false;
    }

    let mut level = threat.level(defender);
    if defender_sets >= NEAR_WIN_SETS {
        level += NEAR_WIN_PENALTY;
    }
    if matches!(threat, Threat::SlyDeal | Threat::ForcedDeal)
        && defender.properties.len() >= MANY_PROPERTIES
    {
        level += 1;
    }

    let bar = if blockers > 1 {
        BLOCK_THRESHOLD_MULTIPLE
    } else {
        BLOCK_THRESHOLD_SINGLE
    };
    level >= bar
}

fn find_action(player: &Player, action: ActionKind) -> Option<&Card> {
    player.hand.iter().find(|c| c.is_action(action))
}

fn play(bot: PlayerId, card: &Card) -> Move {
    Move::play(bot, card.id.clone())
}

/// Choose the bot's next move
pub fn choose_move(game: &GameState, bot: PlayerId) -> Move {
    let Some(player) = game.player(bot) else {
        return Move::end_turn(bot);
    };

    if game.turn.stage() == TurnStage::MustDraw {
        return Move::draw(bot);
    }
    if player.hand.is_empty() {
        return Move::end_turn(bot);
    }

    // Priority 1: Pass Go
    if let Some(card) = find_action(player, ActionKind::PassGo) {
        return play(bot, card);
    }

    let opponents: Vec<&Player> = property::opponents(&game.players, bot).collect();

    // Priority 2: collect money when short and someone can pay
    let opponent_has_cash = opponents
        .iter()
        .any(|p| p.bank_value() >= OPPONENT_CASH_THRESHOLD);
    let wealth = player.bank_value() + player.hand_value();
    if opponent_has_cash && wealth < LOW_WEALTH_THRESHOLD {
        if let Some(card) = find_action(player, ActionKind::Birthday) {
            return play(bot, card);
        }
        if let Some(card) = find_action(player, ActionKind::DebtCollector) {
            return play(bot, card);
        }
        if !player.properties.is_empty() {
            if let Some(card) = player.hand.iter().find(|c| c.kind == CardKind::RentWild) {
                return play(bot, card);
            }
            let matching_rent = player.hand.iter().find(|c| {
                c.kind == CardKind::Rent && c.colors.iter().any(|&color| player.count_color(color) > 0)
            });
            if let Some(card) = matching_rent {
                return play(bot, card);
            }
        }
    }

    // Priority 3: steal when close to winning or something is up for grabs
    let own_sets = rent::completed_set_colors(player).len();
    let anything_stealable = opponents.iter().any(|p| property::has_stealable(p));
    if own_sets >= NEAR_WIN_SETS || anything_stealable {
        let opponent_has_set = opponents
            .iter()
            .any(|p| !rent::completed_set_colors(p).is_empty());
        if opponent_has_set {
            if let Some(card) = find_action(player, ActionKind::DealBreaker) {
                return play(bot, card);
            }
        }
        if let Some(card) = find_action(player, ActionKind::SlyDeal) {
            return play(bot, card);
        }
        if property::select_give_away(player).is_some() {
            if let Some(card) = find_action(player, ActionKind::ForcedDeal) {
                return play(bot, card);
            }
        }
    }

    // Priority 4: lay down the first property in hand
    if let Some(card) = player.hand.iter().find(|c| c.is_property()) {
        return play(bot, card);
    }

    // Priority 5: improve complete sets
    if own_sets >= 1 {
        if property::building_target(player, ActionKind::House).is_some() {
            if let Some(card) = find_action(player, ActionKind::House) {
                return play(bot, card);
            }
        }
        if property::building_target(player, ActionKind::Hotel).is_some() {
            if let Some(card) = find_action(player, ActionKind::Hotel) {
                return play(bot, card);
            }
        }
        if !game.turn.double_rent && player.hand.iter().any(Card::is_rent) {
            if let Some(card) = find_action(player, ActionKind::DoubleRent) {
                return play(bot, card);
            }
        }
    }

    // Priority 6: build a cash cushion
    if player.bank_value() < LOW_BANK_THRESHOLD {
        if let Some(card) = player.hand.iter().find(|c| c.kind == CardKind::Money) {
            return play(bot, card);
        }
    }

    // Priority 7: bank whatever action or rent card is left
    let leftover = player
        .hand
        .iter()
        .find(|c| matches!(c.kind, CardKind::Action | CardKind::Rent | CardKind::RentWild));
    if let Some(card) = leftover {
        return Move::bank(bot, card.id.clone());
    }

    // Priority 8
    Move::end_turn(bot)
}
