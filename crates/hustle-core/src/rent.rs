//! Rent calculation.
//!
//! Pure functions over a player's played properties.

use crate::cards::PropertyColor;
use crate::player::Player;

/// Bonus rent for a house on a complete set
pub const HOUSE_BONUS: u32 = 3;

/// Bonus rent for a hotel on a complete set
pub const HOTEL_BONUS: u32 = 4;

/// Number of complete sets needed to win
pub const SETS_TO_WIN: usize = 3;

pub fn is_complete(player: &Player, color: PropertyColor) -> bool {
    player.count_color(color) >= color.set_size()
}

/// Complete colors in the order they were completed.
///
/// Scans played properties in placement order; a color is listed at the
/// point its count first reaches the set requirement.
pub fn completed_set_colors(player: &Player) -> Vec<PropertyColor> {
    let mut counts = [0usize; PropertyColor::ALL.len()];
    let mut completed = Vec::new();

    for color in player.properties.iter().filter_map(|c| c.current_color) {
        let slot = &mut counts[color as usize];
        *slot += 1;
        if *slot == color.set_size() {
            completed.push(color);
        }
    }

    completed
}

/// Colors the player owns at least one property of, in table order
pub fn owned_colors(player: &Player) -> Vec<PropertyColor> {
    PropertyColor::ALL
        .into_iter()
        .filter(|&color| player.count_color(color) > 0)
        .collect()
}

/// Table rent for `count` properties, capped at the table's last entry
pub fn base_rent(color: PropertyColor, count: usize) -> u32 {
    if count == 0 {
        return 0;
    }
    let table = color.rent_table();
    table[(count - 1).min(table.len() - 1)]
}

/// House and hotel bonus for a color. Zero unless the set is complete.
pub fn building_bonus(player: &Player, color: PropertyColor) -> u32 {
    if !is_complete(player, color) {
        return 0;
    }

    player
        .properties_of(color)
        .map(|card| {
            let mut bonus = 0;
            if card.has_house {
                bonus += HOUSE_BONUS;
            }
            if card.has_hotel {
                bonus += HOTEL_BONUS;
            }
            bonus
        })
        .sum()
}

/// Rent the player can charge for `color`
pub fn rent(player: &Player, color: PropertyColor) -> u32 {
    base_rent(color, player.count_color(color)) + building_bonus(player, color)
}

/// The candidate color with the highest rent. Colors with no properties are
/// skipped; ties keep the earlier candidate.
pub fn best_rent_color(player: &Player, candidates: &[PropertyColor]) -> Option<PropertyColor> {
    let mut best: Option<(PropertyColor, u32)> = None;
    for &color in candidates {
        let amount = rent(player, color);
        if amount == 0 {
            continue;
        }
        if best.map_or(true, |(_, top)| amount > top) {
            best = Some((color, amount));
        }
    }
    best.map(|(color, _)| color)
}

pub fn has_won(player: &Player) -> bool {
    completed_set_colors(player).len() >= SETS_TO_WIN
}
