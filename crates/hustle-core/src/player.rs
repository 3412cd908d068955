//! Player state: hand, bank and played properties.

use crate::cards::{ActionKind, Card, CardId, PropertyColor};
use serde::{Deserialize, Serialize};

/// Player identifier (0-based seat index, also the turn order)
pub type PlayerId = u8;

/// A player in the game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Player ID (0-3)
    pub id: PlayerId,
    /// Player's display name
    pub name: String,
    /// Human seats never get bot moves or automatic blocks
    pub is_human: bool,
    /// Cards in hand (hidden from other players)
    pub hand: Vec<Card>,
    /// Banked money and action cards
    pub bank: Vec<Card>,
    /// Played property and wild cards
    pub properties: Vec<Card>,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>, is_human: bool) -> Self {
        Self {
            id,
            name: name.into(),
            is_human,
            hand: Vec::new(),
            bank: Vec::new(),
            properties: Vec::new(),
        }
    }

    pub fn is_bot(&self) -> bool {
        !self.is_human
    }

    pub fn bank_value(&self) -> u32 {
        self.bank.iter().map(|c| c.value).sum()
    }

    pub fn hand_value(&self) -> u32 {
        self.hand.iter().map(|c| c.value).sum()
    }

    pub fn property_value(&self) -> u32 {
        self.properties.iter().map(|c| c.value).sum()
    }

    /// Everything the player holds, used to pick the richest target
    pub fn total_wealth(&self) -> u32 {
        self.bank_value() + self.hand_value() + self.property_value()
    }

    /// Properties currently assigned to `color`
    pub fn properties_of(&self, color: PropertyColor) -> impl Iterator<Item = &Card> {
        self.properties
            .iter()
            .filter(move |c| c.current_color == Some(color))
    }

    pub fn count_color(&self, color: PropertyColor) -> usize {
        self.properties_of(color).count()
    }

    pub fn hand_card(&self, card_id: &str) -> Option<&Card> {
        self.hand.iter().find(|c| c.id == card_id)
    }

    pub fn has_in_hand(&self, card_id: &str) -> bool {
        self.hand_card(card_id).is_some()
    }

    pub fn count_action(&self, action: ActionKind) -> usize {
        self.hand.iter().filter(|c| c.is_action(action)).count()
    }

    /// Remove a card from hand
    pub fn take_from_hand(&mut self, card_id: &str) -> Option<Card> {
        let index = self.hand.iter().position(|c| c.id == card_id)?;
        Some(self.hand.remove(index))
    }

    /// Remove a card from the bank or played properties
    pub fn take_tradable(&mut self, card_id: &str) -> Option<Card> {
        if let Some(index) = self.bank.iter().position(|c| c.id == card_id) {
            return Some(self.bank.remove(index));
        }
        self.take_property(card_id)
    }

    pub fn take_property(&mut self, card_id: &str) -> Option<Card> {
        let index = self.properties.iter().position(|c| c.id == card_id)?;
        Some(self.properties.remove(index))
    }

    /// Remove every property of one color, keeping their buildings
    pub fn take_color(&mut self, color: PropertyColor) -> Vec<Card> {
        let (taken, kept): (Vec<Card>, Vec<Card>) = std::mem::take(&mut self.properties)
            .into_iter()
            .partition(|c| c.current_color == Some(color));
        self.properties = kept;
        taken
    }

    pub fn find_property(&self, card_id: &CardId) -> Option<&Card> {
        self.properties.iter().find(|c| &c.id == card_id)
    }

    /// Total cards held across hand, bank and properties
    pub fn card_count(&self) -> usize {
        self.hand.len() + self.bank.len() + self.properties.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_player() -> Player {
        let mut player = Player::new(0, "Tester", true);
        player.hand.push(Card::money("m1", 1));
        player.hand.push(Card::action("sly", ActionKind::SlyDeal, 3));
        player.bank.push(Card::money("m5", 5));
        player
            .properties
            .push(Card::property("b1", "Baltic Ave", PropertyColor::Brown, 1));
        player
            .properties
            .push(Card::property("r1", "Kentucky Ave", PropertyColor::Red, 3));
        player
    }

    #[test]
    fn test_wealth() {
        let player = sample_player();
        assert_eq!(player.bank_value(), 5);
        assert_eq!(player.hand_value(), 4);
        assert_eq!(player.property_value(), 4);
        assert_eq!(player.total_wealth(), 13);
    }

    #[test]
    fn test_take_from_hand() {
        let mut player = sample_player();
        let card = player.take_from_hand("sly").unwrap();
        assert_eq!(card.action, Some(ActionKind::SlyDeal));
        assert!(!player.has_in_hand("sly"));
        assert!(player.take_from_hand("sly").is_none());
    }

    #[test]
    fn test_take_tradable_checks_bank_then_properties() {
        let mut player = sample_player();
        assert_eq!(player.take_tradable("m5").unwrap().value, 5);
        assert_eq!(player.take_tradable("r1").unwrap().name, "Kentucky Ave");
        assert!(player.take_tradable("m1").is_none(), "hand cards are not tradable");
        assert_eq!(player.card_count(), 3);
    }

    #[test]
    fn test_take_color() {
        let mut player = sample_player();
        player
            .properties
            .push(Card::property("b2", "Mediterranean Ave", PropertyColor::Brown, 1));

        let browns = player.take_color(PropertyColor::Brown);
        assert_eq!(browns.len(), 2);
        assert_eq!(player.count_color(PropertyColor::Brown), 0);
        assert_eq!(player.count_color(PropertyColor::Red), 1);
    }
}
