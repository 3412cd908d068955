//! Payment requests and the automatic payment resolver.
//!
//! Debts are always settled from the debtor's bank and played properties,
//! never from the hand. The resolver picks a small overpayment while holding
//! on to the cards that matter most (complete sets, wilds, large bills).

use crate::cards::{Card, CardId, CardKind, PropertyColor};
use crate::player::{Player, PlayerId};
use crate::rent;
use serde::{Deserialize, Serialize};

/// Why a payment is owed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentReason {
    Rent,
    DebtCollector,
    Birthday,
    ForcedPayment,
}

impl PaymentReason {
    pub fn label(&self) -> &'static str {
        match self {
            PaymentReason::Rent => "rent",
            PaymentReason::DebtCollector => "debt",
            PaymentReason::Birthday => "birthday gift",
            PaymentReason::ForcedPayment => "forced payment",
        }
    }
}

/// A debt created by a card effect
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub debtor: PlayerId,
    pub creditor: PlayerId,
    pub amount: u32,
    pub reason: PaymentReason,
    /// Card that created the debt
    pub card_id: Option<CardId>,
    pub resolved: bool,
    /// Cards that changed hands to settle it
    pub paid_card_ids: Vec<CardId>,
}

impl PaymentRequest {
    pub fn new(
        debtor: PlayerId,
        creditor: PlayerId,
        amount: u32,
        reason: PaymentReason,
        card_id: Option<CardId>,
    ) -> Self {
        Self {
            debtor,
            creditor,
            amount,
            reason,
            card_id,
            resolved: false,
            paid_card_ids: Vec::new(),
        }
    }
}

/// Money and banked action cards are spent before properties at equal value
fn spend_priority(card: &Card) -> u8 {
    if card.is_property() {
        1
    } else {
        0
    }
}

/// Higher means the debtor would rather keep the card
fn keep_priority(card: &Card, complete: &[PropertyColor]) -> u8 {
    let in_complete_set = card
        .current_color
        .map_or(false, |color| complete.contains(&color));

    match card.kind {
        CardKind::Property | CardKind::PropertyWild if in_complete_set => 7,
        CardKind::PropertyWild => 6,
        CardKind::Money if card.value >= 10 => 5,
        CardKind::Money if card.value >= 5 => 4,
        CardKind::Property => 3,
        CardKind::Money => 1,
        CardKind::Rent | CardKind::RentWild | CardKind::Action => 2,
    }
}

/// Value the debtor could pay with right now
pub fn tradable_value(player: &Player) -> u32 {
    player.bank_value() + player.property_value()
}

/// Choose which bank/property cards pay `amount`.
///
/// Greedy ascending accumulation, then a reduction pass that drops the
/// least-wanted cards while the total still covers the debt. When the debtor
/// cannot cover the amount every tradable card is returned.
pub fn select_payment(player: &Player, amount: u32) -> Vec<CardId> {
    if amount == 0 {
        return Vec::new();
    }

    let mut pool: Vec<&Card> = player.bank.iter().chain(player.properties.iter()).collect();
    pool.sort_by_key(|card| (card.value, spend_priority(card)));

    let mut selected = Vec::new();
    let mut total = 0;
    for card in pool {
        if total >= amount {
            break;
        }
        total += card.value;
        selected.push(card);
    }

    if total < amount {
        return selected.into_iter().map(|c| c.id.clone()).collect();
    }

    let complete = rent::completed_set_colors(player);
    selected.sort_by(|a, b| {
        keep_priority(b, &complete)
            .cmp(&keep_priority(a, &complete))
            .then(b.value.cmp(&a.value))
    });

    let mut kept = vec![true; selected.len()];
    for index in (0..selected.len()).rev() {
        let value = selected[index].value;
        if total - value >= amount {
            total -= value;
            kept[index] = false;
        }
    }

    selected
        .into_iter()
        .zip(kept)
        .filter(|(_, keep)| *keep)
        .map(|(card, _)| card.id.clone())
        .collect()
}

/// Strip buildings from colors that are no longer complete
pub fn prune_buildings(player: &mut Player) {
    let complete = rent::completed_set_colors(player);
    for card in &mut player.properties {
        let keeps_buildings = card
            .current_color
            .map_or(false, |color| complete.contains(&color));
        if !keeps_buildings {
            card.clear_buildings();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::ActionKind;

    fn debtor() -> Player {
        Player::new(1, "Debtor", false)
    }

    fn value_of(player: &Player, ids: &[CardId]) -> u32 {
        player
            .bank
            .iter()
            .chain(player.properties.iter())
            .filter(|c| ids.contains(&c.id))
            .map(|c| c.value)
            .sum()
    }

    #[test]
    fn test_prefers_lone_property_over_large_bill() {
        let mut player = debtor();
        player.bank.push(Card::money("m5", 5));
        player
            .properties
            .push(Card::property("g1", "Pacific Ave", PropertyColor::Green, 1));

        assert_eq!(select_payment(&player, 1), vec!["g1".to_string()]);
    }

    #[test]
    fn test_drops_banked_action_when_property_covers() {
        let mut player = debtor();
        player.bank.push(Card::action("pg", ActionKind::PassGo, 1));
        player
            .properties
            .push(Card::property("rr", "Short Line", PropertyColor::Railroad, 2));

        assert_eq!(select_payment(&player, 2), vec!["rr".to_string()]);
    }

    #[test]
    fn test_reduction_is_locally_minimal() {
        let mut player = debtor();
        player.bank.push(Card::money("a", 1));
        player.bank.push(Card::money("b", 1));
        player
            .properties
            .push(Card::property("br", "Baltic Ave", PropertyColor::Brown, 2));

        let paid = select_payment(&player, 3);
        assert_eq!(paid.len(), 2);
        assert!(paid.contains(&"br".to_string()));
        assert_eq!(value_of(&player, &paid), 3);

        for id in &paid {
            let without: Vec<_> = paid.iter().filter(|p| *p != id).cloned().collect();
            assert!(value_of(&player, &without) < 3, "{} could be dropped", id);
        }
    }

    #[test]
    fn test_protects_complete_sets() {
        let mut player = debtor();
        player
            .properties
            .push(Card::property("d1", "Boardwalk", PropertyColor::DarkBlue, 4));
        player
            .properties
            .push(Card::property("d2", "Park Place", PropertyColor::DarkBlue, 4));
        player.bank.push(Card::money("m4", 4));

        assert_eq!(select_payment(&player, 3), vec!["m4".to_string()]);
    }

    #[test]
    fn test_never_uses_hand() {
        let mut player = debtor();
        player.hand.push(Card::money("h10", 10));
        player.bank.push(Card::money("m1", 1));

        let paid = select_payment(&player, 5);
        assert_eq!(paid, vec!["m1".to_string()]);
    }

    #[test]
    fn test_insufficient_pays_everything() {
        let mut player = debtor();
        player.bank.push(Card::money("m2", 2));
        player
            .properties
            .push(Card::property("o1", "Tennessee Ave", PropertyColor::Orange, 2));

        let paid = select_payment(&player, 10);
        assert_eq!(paid.len(), 2);
        assert_eq!(tradable_value(&player), 4);
    }

    #[test]
    fn test_nothing_owed() {
        let mut player = debtor();
        player.bank.push(Card::money("m2", 2));
        assert!(select_payment(&player, 0).is_empty());
    }

    #[test]
    fn test_prune_buildings() {
        let mut player = debtor();
        let mut housed = Card::property("b1", "Baltic Ave", PropertyColor::Brown, 1);
        housed.has_house = true;
        player.properties.push(housed);
        player
            .properties
            .push(Card::property("b2", "Mediterranean Ave", PropertyColor::Brown, 1));

        prune_buildings(&mut player);
        assert!(player.properties[0].has_house);

        player.take_property("b2");
        prune_buildings(&mut player);
        assert!(!player.properties[0].has_house);
    }
}
