//! Move validation.
//!
//! Checks a move against the current state without touching it. The checks
//! run in a fixed order so clients always see the most fundamental problem
//! first.

use crate::actions::{Move, MoveKind};
use crate::cards::{ActionKind, Card, CardKind};
use crate::game::{GameError, GameState, GameStatus};
use crate::turn::TurnStage;

pub fn validate(state: &GameState, mv: &Move) -> Result<(), GameError> {
    match state.status {
        GameStatus::GameOver => return Err(GameError::GameAlreadyOver),
        GameStatus::Paused => return Err(GameError::GamePaused),
        GameStatus::Waiting | GameStatus::Playing => {}
    }

    let active = state.active_player();
    if mv.player != active {
        return Err(GameError::NotPlayersTurn { active });
    }

    match mv.kind {
        MoveKind::Draw => {
            if state.turn.stage() != TurnStage::MustDraw {
                return Err(GameError::AlreadyDrawn);
            }
            Ok(())
        }
        MoveKind::EndTurn => Ok(()),
        MoveKind::PlayCard => {
            let card_id = mv.card_id.as_deref().ok_or(GameError::MissingCard)?;
            if state.turn.actions_remaining == 0 {
                return Err(GameError::NoActionsRemaining);
            }
            let card = hand_card(state, mv, card_id)?;
            validate_play(state, mv, card)
        }
        MoveKind::React => {
            let card_id = mv.card_id.as_deref().ok_or(GameError::MissingCard)?;
            let card = hand_card(state, mv, card_id)?;
            if !card.is_action(ActionKind::JustSayNo) {
                return Err(GameError::InvalidCardPlay(format!(
                    "{} cannot be used as a reaction",
                    card.name
                )));
            }
            Ok(())
        }
    }
}

fn hand_card<'a>(state: &'a GameState, mv: &Move, card_id: &str) -> Result<&'a Card, GameError> {
    state
        .player(mv.player)
        .and_then(|p| p.hand_card(card_id))
        .ok_or_else(|| GameError::CardNotInHand(card_id.to_string()))
}

fn validate_play(state: &GameState, mv: &Move, card: &Card) -> Result<(), GameError> {
    if let Some(target) = mv.target_player {
        if target == mv.player || state.player(target).is_none() {
            return Err(GameError::InvalidTarget(target));
        }
    }

    if mv.bank {
        if card.is_property() {
            return Err(GameError::InvalidCardPlay(format!(
                "{} is a property and cannot be banked",
                card.name
            )));
        }
        return Ok(());
    }

    if let Some(color) = mv.color {
        let colored = matches!(
            card.kind,
            CardKind::Property | CardKind::PropertyWild | CardKind::Rent | CardKind::RentWild
        );
        if colored && !card.can_take_color(color) {
            return Err(GameError::InvalidColor(color));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::PropertyColor;
    use crate::game::GameConfig;

    fn acting_game() -> GameState {
        let mut game = GameState::new("v", &GameConfig::default().with_seed(3)).unwrap();
        game.players[0].hand = vec![
            Card::money("m1", 1),
            Card::property("g1", "Pacific Ave", PropertyColor::Green, 4),
            Card::wild("w1", [PropertyColor::Pink, PropertyColor::Orange], 2),
            Card::action("pg", ActionKind::PassGo, 1),
        ];
        game.turn.actions_remaining = 3;
        game
    }

    #[test]
    fn test_wrong_player() {
        let game = acting_game();
        assert_eq!(
            validate(&game, &Move::end_turn(2)),
            Err(GameError::NotPlayersTurn { active: 0 })
        );
    }

    #[test]
    fn test_play_requires_card() {
        let game = acting_game();
        let mut mv = Move::play(0, "m1");
        mv.card_id = None;
        assert_eq!(validate(&game, &mv), Err(GameError::MissingCard));
        assert_eq!(
            validate(&game, &Move::play(0, "nope")),
            Err(GameError::CardNotInHand("nope".to_string()))
        );
        assert_eq!(validate(&game, &Move::play(0, "m1")), Ok(()));
    }

    #[test]
    fn test_play_without_actions() {
        let mut game = acting_game();
        game.turn.actions_remaining = 0;
        assert_eq!(
            validate(&game, &Move::play(0, "m1")),
            Err(GameError::NoActionsRemaining)
        );
        assert_eq!(validate(&game, &Move::draw(0)), Ok(()));
    }

    #[test]
    fn test_target_must_be_opponent() {
        let game = acting_game();
        assert_eq!(
            validate(&game, &Move::play(0, "pg").targeting(0)),
            Err(GameError::InvalidTarget(0))
        );
        assert_eq!(
            validate(&game, &Move::play(0, "pg").targeting(9)),
            Err(GameError::InvalidTarget(9))
        );
        assert_eq!(validate(&game, &Move::play(0, "pg").targeting(1)), Ok(()));
    }

    #[test]
    fn test_properties_cannot_be_banked() {
        let game = acting_game();
        assert!(matches!(
            validate(&game, &Move::bank(0, "g1")),
            Err(GameError::InvalidCardPlay(_))
        ));
        assert_eq!(validate(&game, &Move::bank(0, "pg")), Ok(()));
    }

    #[test]
    fn test_wild_color_must_be_eligible() {
        let game = acting_game();
        assert_eq!(
            validate(&game, &Move::play(0, "w1").with_color(PropertyColor::Red)),
            Err(GameError::InvalidColor(PropertyColor::Red))
        );
        assert_eq!(
            validate(&game, &Move::play(0, "w1").with_color(PropertyColor::Orange)),
            Ok(())
        );
    }

    #[test]
    fn test_react_needs_just_say_no() {
        let game = acting_game();
        assert!(matches!(
            validate(&game, &Move::react(0, "pg")),
            Err(GameError::InvalidCardPlay(_))
        ));
    }
}
