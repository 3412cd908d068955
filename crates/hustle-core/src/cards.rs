//! Card model and the standard deck.
//!
//! This module contains:
//! - Property colors with their set requirements and rent tables
//! - The `Card` struct shared by every card kind
//! - The 106-card deck factory

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Builder;

/// Unique card identifier
pub type CardId = String;

/// Property set colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyColor {
    Brown,
    LightBlue,
    Pink,
    Orange,
    Red,
    Yellow,
    Green,
    DarkBlue,
    Railroad,
    Utility,
}

impl PropertyColor {
    /// All colors in table order
    pub const ALL: [PropertyColor; 10] = [
        PropertyColor::Brown,
        PropertyColor::LightBlue,
        PropertyColor::Pink,
        PropertyColor::Orange,
        PropertyColor::Red,
        PropertyColor::Yellow,
        PropertyColor::Green,
        PropertyColor::DarkBlue,
        PropertyColor::Railroad,
        PropertyColor::Utility,
    ];

    /// Number of properties needed to complete the set
    pub fn set_size(&self) -> usize {
        match self {
            PropertyColor::Brown | PropertyColor::DarkBlue | PropertyColor::Utility => 2,
            PropertyColor::Railroad => 4,
            _ => 3,
        }
    }

    /// Rent owed for 1..=n properties of this color
    pub fn rent_table(&self) -> &'static [u32] {
        match self {
            PropertyColor::Brown => &[1, 2],
            PropertyColor::LightBlue => &[1, 2, 3],
            PropertyColor::Pink => &[1, 2, 4],
            PropertyColor::Orange => &[1, 3, 5],
            PropertyColor::Red => &[2, 3, 6],
            PropertyColor::Yellow => &[2, 4, 6],
            PropertyColor::Green => &[2, 4, 7],
            PropertyColor::DarkBlue => &[3, 8],
            PropertyColor::Railroad => &[1, 2, 3, 4],
            PropertyColor::Utility => &[1, 2],
        }
    }

    /// Highest rent the table can produce (without buildings)
    pub fn top_rent(&self) -> u32 {
        self.rent_table().last().copied().unwrap_or(0)
    }

    pub fn name(&self) -> &'static str {
        match self {
            PropertyColor::Brown => "Brown",
            PropertyColor::LightBlue => "Light Blue",
            PropertyColor::Pink => "Pink",
            PropertyColor::Orange => "Orange",
            PropertyColor::Red => "Red",
            PropertyColor::Yellow => "Yellow",
            PropertyColor::Green => "Green",
            PropertyColor::DarkBlue => "Dark Blue",
            PropertyColor::Railroad => "Railroad",
            PropertyColor::Utility => "Utility",
        }
    }
}

impl fmt::Display for PropertyColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Broad card category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardKind {
    Money,
    Property,
    PropertyWild,
    Rent,
    RentWild,
    Action,
}

/// Action card subtypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    /// Draw two extra cards
    PassGo,
    /// One player pays a fixed debt
    DebtCollector,
    /// Every other player pays a small fixed amount
    Birthday,
    /// Steal one property outside a complete set
    SlyDeal,
    /// Swap properties outside complete sets
    ForcedDeal,
    /// Steal a complete set with its buildings
    DealBreaker,
    /// Cancel an action played against you
    JustSayNo,
    /// Raise a complete set's rent by 3
    House,
    /// Raise a housed complete set's rent by 4
    Hotel,
    /// Doubles the next rent this turn
    DoubleRent,
}

impl ActionKind {
    pub fn name(&self) -> &'static str {
        match self {
            ActionKind::PassGo => "Pass Go",
            ActionKind::DebtCollector => "Debt Collector",
            ActionKind::Birthday => "It's My Birthday",
            ActionKind::SlyDeal => "Sly Deal",
            ActionKind::ForcedDeal => "Forced Deal",
            ActionKind::DealBreaker => "Deal Breaker",
            ActionKind::JustSayNo => "Just Say No",
            ActionKind::House => "House",
            ActionKind::Hotel => "Hotel",
            ActionKind::DoubleRent => "Double the Rent",
        }
    }
}

/// A single card. Which fields are meaningful depends on `kind`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub kind: CardKind,
    /// Face value, used both as currency and when paying debts
    pub value: u32,
    /// Eligible colors for properties, charged colors for rent cards.
    /// Empty on a rainbow wild (eligible for every color).
    #[serde(default)]
    pub colors: Vec<PropertyColor>,
    /// Color a played property or wild counts toward
    pub current_color: Option<PropertyColor>,
    pub action: Option<ActionKind>,
    #[serde(default)]
    pub has_house: bool,
    #[serde(default)]
    pub has_hotel: bool,
}

impl Card {
    fn base(id: impl Into<CardId>, name: impl Into<String>, kind: CardKind, value: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            kind,
            value,
            colors: Vec::new(),
            current_color: None,
            action: None,
            has_house: false,
            has_hotel: false,
        }
    }

    pub fn money(id: impl Into<CardId>, value: u32) -> Self {
        let mut card = Self::base(id, format!("${}M", value), CardKind::Money, value);
        card.description = "Money Card".to_string();
        card
    }

    pub fn property(
        id: impl Into<CardId>,
        name: impl Into<String>,
        color: PropertyColor,
        value: u32,
    ) -> Self {
        let mut card = Self::base(id, name, CardKind::Property, value);
        card.colors = vec![color];
        card.current_color = Some(color);
        card
    }

    /// Two-color wild. The color is assigned when played.
    pub fn wild(id: impl Into<CardId>, colors: [PropertyColor; 2], value: u32) -> Self {
        let name = format!("{}/{} Wild", colors[0], colors[1]);
        let mut card = Self::base(id, name, CardKind::PropertyWild, value);
        card.colors = colors.to_vec();
        card
    }

    pub fn rainbow_wild(id: impl Into<CardId>) -> Self {
        Self::base(id, "Multi-color Wild", CardKind::PropertyWild, 0)
    }

    pub fn rent(id: impl Into<CardId>, colors: [PropertyColor; 2], value: u32) -> Self {
        let name = format!("{}/{} Rent", colors[0], colors[1]);
        let mut card = Self::base(id, name, CardKind::Rent, value);
        card.colors = colors.to_vec();
        card
    }

    pub fn rent_wild(id: impl Into<CardId>, value: u32) -> Self {
        let mut card = Self::base(id, "Wild Rent", CardKind::RentWild, value);
        card.description =
            "Force any player to pay rent for any of your properties.".to_string();
        card
    }

    pub fn action(id: impl Into<CardId>, action: ActionKind, value: u32) -> Self {
        let mut card = Self::base(id, action.name(), CardKind::Action, value);
        card.description = action_description(action).to_string();
        card.action = Some(action);
        card
    }

    pub fn is_property(&self) -> bool {
        matches!(self.kind, CardKind::Property | CardKind::PropertyWild)
    }

    pub fn is_rent(&self) -> bool {
        matches!(self.kind, CardKind::Rent | CardKind::RentWild)
    }

    pub fn is_action(&self, action: ActionKind) -> bool {
        self.action == Some(action)
    }

    pub fn is_rainbow(&self) -> bool {
        self.kind == CardKind::PropertyWild && self.colors.is_empty()
    }

    /// Colors this card may be placed in (properties) or may charge (rent)
    pub fn eligible_colors(&self) -> Vec<PropertyColor> {
        if self.colors.is_empty() && matches!(self.kind, CardKind::PropertyWild | CardKind::RentWild)
        {
            PropertyColor::ALL.to_vec()
        } else {
            self.colors.clone()
        }
    }

    pub fn can_take_color(&self, color: PropertyColor) -> bool {
        self.eligible_colors().contains(&color)
    }

    /// Drop any buildings attached to this card
    pub fn clear_buildings(&mut self) {
        self.has_house = false;
        self.has_hotel = false;
    }
}

fn action_description(action: ActionKind) -> &'static str {
    match action {
        ActionKind::DealBreaker => "Steal a completed set from any player. (Includes any buildings)",
        ActionKind::JustSayNo => "Use any time an Action card is played against you.",
        ActionKind::SlyDeal => {
            "Steal a property from any player. (Cannot be part of a completed set)"
        }
        ActionKind::ForcedDeal => {
            "Swap any property with another player. (Cannot be part of a completed set)"
        }
        ActionKind::PassGo => "Draw 2 extra cards.",
        ActionKind::DebtCollector => "Force any player to pay you $5M.",
        ActionKind::Birthday => "All players pay you $2M.",
        ActionKind::House => "Add onto any completed set to add $3M to the rent value.",
        ActionKind::Hotel => {
            "Add onto any completed set that already has a house to add $4M to the rent value."
        }
        ActionKind::DoubleRent => "Play with a Rent card to double the total rent.",
    }
}

fn card_id<R: Rng>(rng: &mut R) -> CardId {
    Builder::from_random_bytes(rng.gen()).into_uuid().to_string()
}

/// Number of cards in the standard deck
pub const DECK_SIZE: usize = 106;

/// Build the standard deck in factory order. Shuffling is the caller's job.
///
/// Card ids are UUIDs drawn from `rng`, so a seeded game is reproducible.
pub fn standard_deck<R: Rng>(rng: &mut R) -> Vec<Card> {
    use ActionKind::*;
    use PropertyColor::*;

    let mut deck = Vec::with_capacity(DECK_SIZE);

    // Money (20)
    for (value, qty) in [(10, 1), (5, 2), (4, 3), (3, 3), (2, 5), (1, 6)] {
        for _ in 0..qty {
            deck.push(Card::money(card_id(rng), value));
        }
    }

    // Properties (28)
    let properties: [(PropertyColor, &[&str], u32); 10] = [
        (DarkBlue, &["Boardwalk", "Park Place"], 4),
        (Green, &["North Carolina Ave", "Pacific Ave", "Pennsylvania Ave"], 4),
        (Yellow, &["Marvin Gardens", "Ventnor Ave", "Atlantic Ave"], 3),
        (Red, &["Kentucky Ave", "Indiana Ave", "Illinois Ave"], 3),
        (Orange, &["New York Ave", "St. James Place", "Tennessee Ave"], 2),
        (Pink, &["St. Charles Place", "Virginia Ave", "States Ave"], 2),
        (LightBlue, &["Oriental Ave", "Vermont Ave", "Connecticut Ave"], 1),
        (Brown, &["Baltic Ave", "Mediterranean Ave"], 1),
        (
            Railroad,
            &["Reading Railroad", "Pennsylvania Railroad", "B. & O. Railroad", "Short Line"],
            2,
        ),
        (Utility, &["Electric Company", "Water Works"], 2),
    ];
    for (color, names, value) in properties {
        for name in names {
            deck.push(Card::property(card_id(rng), *name, color, value));
        }
    }

    // Actions (34)
    for (action, value, qty) in [
        (DealBreaker, 5, 2),
        (JustSayNo, 4, 3),
        (SlyDeal, 3, 3),
        (ForcedDeal, 3, 3),
        (PassGo, 1, 10),
        (DebtCollector, 3, 3),
        (Birthday, 2, 3),
        (House, 3, 3),
        (Hotel, 4, 2),
        (DoubleRent, 1, 2),
    ] {
        for _ in 0..qty {
            deck.push(Card::action(card_id(rng), action, value));
        }
    }

    // Property wilds (11)
    for (colors, value, qty) in [
        ([DarkBlue, Green], 4, 1),
        ([LightBlue, Brown], 1, 1),
        ([Pink, Orange], 2, 2),
        ([Red, Yellow], 3, 2),
        ([Green, Railroad], 4, 1),
        ([LightBlue, Railroad], 4, 1),
        ([Railroad, Utility], 2, 1),
    ] {
        for _ in 0..qty {
            deck.push(Card::wild(card_id(rng), colors, value));
        }
    }
    for _ in 0..2 {
        deck.push(Card::rainbow_wild(card_id(rng)));
    }

    // Rent (13)
    for colors in [
        [DarkBlue, Green],
        [Red, Yellow],
        [Pink, Orange],
        [LightBlue, Brown],
        [Railroad, Utility],
    ] {
        for _ in 0..2 {
            deck.push(Card::rent(card_id(rng), colors, 1));
        }
    }
    for _ in 0..3 {
        deck.push(Card::rent_wild(card_id(rng), 3));
    }

    deck
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn deck() -> Vec<Card> {
        standard_deck(&mut StdRng::seed_from_u64(7))
    }

    #[test]
    fn test_deck_composition() {
        let deck = deck();
        assert_eq!(deck.len(), DECK_SIZE);

        let count = |kind: CardKind| deck.iter().filter(|c| c.kind == kind).count();
        assert_eq!(count(CardKind::Money), 20);
        assert_eq!(count(CardKind::Property), 28);
        assert_eq!(count(CardKind::Action), 34);
        assert_eq!(count(CardKind::PropertyWild), 11);
        assert_eq!(count(CardKind::Rent) + count(CardKind::RentWild), 13);
    }

    #[test]
    fn test_deck_ids_unique() {
        let deck = deck();
        let ids: HashSet<_> = deck.iter().map(|c| c.id.clone()).collect();
        assert_eq!(ids.len(), DECK_SIZE);
    }

    #[test]
    fn test_deck_is_reproducible_from_seed() {
        let a = standard_deck(&mut StdRng::seed_from_u64(42));
        let b = standard_deck(&mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_properties_cover_every_set() {
        let deck = deck();
        for color in PropertyColor::ALL {
            let fixed = deck
                .iter()
                .filter(|c| c.kind == CardKind::Property && c.current_color == Some(color))
                .count();
            assert!(
                fixed >= color.set_size() - 1,
                "{} should be nearly completable without wilds",
                color
            );
        }
    }

    #[test]
    fn test_rainbow_wild_takes_any_color() {
        let card = Card::rainbow_wild("r");
        assert!(card.is_rainbow());
        for color in PropertyColor::ALL {
            assert!(card.can_take_color(color));
        }

        let wild = Card::wild("w", [PropertyColor::Red, PropertyColor::Yellow], 3);
        assert!(!wild.is_rainbow());
        assert!(wild.can_take_color(PropertyColor::Yellow));
        assert!(!wild.can_take_color(PropertyColor::Green));
        assert_eq!(wild.current_color, None);
    }

    #[test]
    fn test_set_sizes_match_rent_tables() {
        for color in PropertyColor::ALL {
            assert_eq!(color.set_size(), color.rent_table().len());
        }
    }
}
