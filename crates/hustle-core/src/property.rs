//! Property selection heuristics.
//!
//! Decides which property a thief takes, which one a player gives away in a
//! swap, who gets targeted, and which color a wild card joins.

use crate::cards::{ActionKind, Card, CardId, PropertyColor};
use crate::player::{Player, PlayerId};
use crate::rent;

/// Completion is worth more than any count score
const COMPLETION_BONUS: u32 = 1000;

/// Weight of each property already in the color
const COUNT_WEIGHT: u32 = 10;

/// Properties outside any complete set
pub fn stealable_properties(player: &Player) -> impl Iterator<Item = &Card> {
    let complete = rent::completed_set_colors(player);
    player
        .properties
        .iter()
        .filter(move |card| card.current_color.map_or(true, |c| !complete.contains(&c)))
}

pub fn has_stealable(player: &Player) -> bool {
    stealable_properties(player).next().is_some()
}

/// Whether taking a card of this color moves the thief closer to a set
fn advances_set(thief: &Player, card: &Card) -> bool {
    card.current_color.map_or(false, |color| {
        let owned = thief.count_color(color);
        owned > 0 && owned < color.set_size()
    })
}

/// Pick the property a thief takes from `victim`.
///
/// Prefers a color the thief is already building, otherwise the highest
/// value. Ties keep the victim's earlier card.
pub fn select_stealable(victim: &Player, thief: &Player) -> Option<CardId> {
    let candidates: Vec<&Card> = stealable_properties(victim).collect();

    if let Some(card) = candidates.iter().find(|card| advances_set(thief, card)) {
        return Some(card.id.clone());
    }

    let mut best: Option<&Card> = None;
    for card in candidates {
        if best.map_or(true, |b| card.value > b.value) {
            best = Some(card);
        }
    }
    best.map(|card| card.id.clone())
}

/// The lowest-value property outside a complete set
pub fn select_give_away(player: &Player) -> Option<CardId> {
    let mut lowest: Option<&Card> = None;
    for card in stealable_properties(player) {
        if lowest.map_or(true, |l| card.value < l.value) {
            lowest = Some(card);
        }
    }
    lowest.map(|card| card.id.clone())
}

/// Every player except `actor`, in seat order
pub fn opponents(players: &[Player], actor: PlayerId) -> impl Iterator<Item = &Player> {
    players.iter().filter(move |p| p.id != actor)
}

/// Opponent holding the most total wealth. Ties go to the lower seat.
pub fn richest_opponent(players: &[Player], actor: PlayerId) -> Option<PlayerId> {
    let mut best: Option<&Player> = None;
    for player in opponents(players, actor) {
        if best.map_or(true, |b| player.total_wealth() > b.total_wealth()) {
            best = Some(player);
        }
    }
    best.map(|p| p.id)
}

/// Opponent whose best stealable property is worth the most
pub fn best_steal_target(players: &[Player], actor: PlayerId) -> Option<PlayerId> {
    let thief = players.iter().find(|p| p.id == actor)?;
    let mut best: Option<(PlayerId, u32)> = None;

    for victim in opponents(players, actor) {
        let Some(card_id) = select_stealable(victim, thief) else {
            continue;
        };
        let value = victim.find_property(&card_id).map_or(0, |c| c.value);
        if best.map_or(true, |(_, top)| value > top) {
            best = Some((victim.id, value));
        }
    }

    best.map(|(id, _)| id)
}

/// First opponent (seat order) holding a complete set, with its
/// earliest-completed color
pub fn deal_breaker_target(
    players: &[Player],
    actor: PlayerId,
) -> Option<(PlayerId, PropertyColor)> {
    opponents(players, actor).find_map(|p| {
        rent::completed_set_colors(p)
            .first()
            .map(|&color| (p.id, color))
    })
}

/// Complete-set color that can take the given building, if any
pub fn building_target(player: &Player, building: ActionKind) -> Option<PropertyColor> {
    rent::completed_set_colors(player)
        .into_iter()
        .find(|&color| can_build(player, color, building))
}

pub fn can_build(player: &Player, color: PropertyColor, building: ActionKind) -> bool {
    if !rent::is_complete(player, color) {
        return false;
    }
    let has_house = player.properties_of(color).any(|c| c.has_house);
    let has_hotel = player.properties_of(color).any(|c| c.has_hotel);

    match building {
        ActionKind::House => !has_house && !has_hotel,
        ActionKind::Hotel => has_house && !has_hotel,
        _ => false,
    }
}

/// Choose the color a wild property joins.
///
/// Scores each eligible color by how many properties the player already has
/// there, with a large bonus when the wild completes the set and the color's
/// top rent as a tie-break.
pub fn choose_wild_color(player: &Player, card: &Card) -> Option<PropertyColor> {
    let eligible = card.eligible_colors();
    if player.properties.is_empty() {
        return eligible.first().copied();
    }

    let mut best: Option<(PropertyColor, u32)> = None;
    for color in eligible {
        let count = player.count_color(color);
        let mut score = count as u32 * COUNT_WEIGHT + color.top_rent();
        if count < color.set_size() && count + 1 >= color.set_size() {
            score += COMPLETION_BONUS;
        }
        if best.map_or(true, |(_, top)| score > top) {
            best = Some((color, score));
        }
    }
    best.map(|(color, _)| color)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prop(id: &str, color: PropertyColor, value: u32) -> Card {
        Card::property(id, id, color, value)
    }

    fn player(id: PlayerId, props: Vec<Card>) -> Player {
        let mut p = Player::new(id, format!("P{}", id), false);
        p.properties = props;
        p
    }

    #[test]
    fn test_complete_sets_are_not_stealable() {
        let victim = player(
            1,
            vec![
                prop("b1", PropertyColor::Brown, 1),
                prop("b2", PropertyColor::Brown, 1),
                prop("g1", PropertyColor::Green, 4),
            ],
        );
        let ids: Vec<_> = stealable_properties(&victim).map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["g1"]);
    }

    #[test]
    fn test_steal_prefers_set_progress() {
        let victim = player(
            1,
            vec![prop("g1", PropertyColor::Green, 4), prop("o1", PropertyColor::Orange, 2)],
        );
        let thief = player(0, vec![prop("o2", PropertyColor::Orange, 2)]);
        assert_eq!(select_stealable(&victim, &thief), Some("o1".to_string()));

        let empty_thief = player(0, vec![]);
        assert_eq!(select_stealable(&victim, &empty_thief), Some("g1".to_string()));
    }

    #[test]
    fn test_give_away_lowest() {
        let p = player(
            0,
            vec![prop("g1", PropertyColor::Green, 4), prop("l1", PropertyColor::LightBlue, 1)],
        );
        assert_eq!(select_give_away(&p), Some("l1".to_string()));
        assert_eq!(select_give_away(&player(0, vec![])), None);
    }

    #[test]
    fn test_richest_opponent() {
        let mut players = vec![player(0, vec![]), player(1, vec![]), player(2, vec![])];
        players[0].bank.push(Card::money("m10", 10));
        players[2].bank.push(Card::money("m3", 3));
        assert_eq!(richest_opponent(&players, 0), Some(2));
    }

    #[test]
    fn test_best_steal_target() {
        let players = vec![
            player(0, vec![]),
            player(1, vec![prop("l1", PropertyColor::LightBlue, 1)]),
            player(2, vec![prop("d1", PropertyColor::DarkBlue, 4)]),
        ];
        assert_eq!(best_steal_target(&players, 0), Some(2));
        assert_eq!(best_steal_target(&players[..1], 0), None);
    }

    #[test]
    fn test_deal_breaker_target() {
        let players = vec![
            player(0, vec![]),
            player(1, vec![prop("g1", PropertyColor::Green, 4)]),
            player(
                2,
                vec![
                    prop("u1", PropertyColor::Utility, 2),
                    prop("u2", PropertyColor::Utility, 2),
                ],
            ),
        ];
        assert_eq!(
            deal_breaker_target(&players, 0),
            Some((2, PropertyColor::Utility))
        );
        assert_eq!(deal_breaker_target(&players, 2), None);
    }

    #[test]
    fn test_building_targets() {
        let mut p = player(
            0,
            vec![
                prop("b1", PropertyColor::Brown, 1),
                prop("b2", PropertyColor::Brown, 1),
            ],
        );
        assert_eq!(building_target(&p, ActionKind::House), Some(PropertyColor::Brown));
        assert_eq!(building_target(&p, ActionKind::Hotel), None);

        p.properties[0].has_house = true;
        assert_eq!(building_target(&p, ActionKind::House), None);
        assert_eq!(building_target(&p, ActionKind::Hotel), Some(PropertyColor::Brown));
    }

    #[test]
    fn test_wild_prefers_existing_color() {
        let p = player(
            0,
            vec![prop("r1", PropertyColor::Red, 3), prop("b1", PropertyColor::Brown, 1)],
        );
        let wild = Card::wild("w", [PropertyColor::Red, PropertyColor::Yellow], 3);
        assert_eq!(choose_wild_color(&p, &wild), Some(PropertyColor::Red));
    }

    #[test]
    fn test_wild_completes_set() {
        let p = player(
            0,
            vec![
                prop("g1", PropertyColor::Green, 4),
                prop("g2", PropertyColor::Green, 4),
                prop("r1", PropertyColor::Railroad, 2),
                prop("r2", PropertyColor::Railroad, 2),
                prop("r3", PropertyColor::Railroad, 2),
            ],
        );
        let wild = Card::wild("w", [PropertyColor::Green, PropertyColor::Railroad], 4);
        // Both complete a set; three railroads outscore two greens
        assert_eq!(choose_wild_color(&p, &wild), Some(PropertyColor::Railroad));

        let rainbow = Card::rainbow_wild("rw");
        let lone = player(0, vec![prop("b1", PropertyColor::Brown, 1)]);
        assert_eq!(choose_wild_color(&lone, &rainbow), Some(PropertyColor::Brown));
    }

    #[test]
    fn test_wild_with_no_properties_takes_first_color() {
        let wild = Card::wild("w", [PropertyColor::Pink, PropertyColor::Orange], 2);
        assert_eq!(
            choose_wild_color(&player(0, vec![]), &wild),
            Some(PropertyColor::Pink)
        );
    }
}
