//! Inbound and outbound room messages.

use hustle_core::{CardId, GameError, GameState, Move, PlayerId, PropertyColor};
use serde::{Deserialize, Serialize};

/// Published on a room's update feed after every processed move.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum RoomUpdate {
    /// Full state after a move was applied
    Snapshot { state: GameState },

    /// A move was rejected; the state is unchanged
    Error { code: String, message: String },
}

impl RoomUpdate {
    pub fn snapshot(state: &GameState) -> Self {
        RoomUpdate::Snapshot {
            state: state.clone(),
        }
    }

    pub fn error(code: &str, message: impl ToString) -> Self {
        RoomUpdate::Error {
            code: code.to_string(),
            message: message.to_string(),
        }
    }
}

/// A move as a client sends it, with the kind still a raw string.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InboundMove {
    pub player: PlayerId,
    pub kind: String,
    #[serde(default)]
    pub card_id: Option<CardId>,
    #[serde(default)]
    pub target_player: Option<PlayerId>,
    #[serde(default)]
    pub target_card: Option<CardId>,
    #[serde(default)]
    pub color: Option<PropertyColor>,
    #[serde(default)]
    pub bank: bool,
}

impl TryFrom<InboundMove> for Move {
    type Error = GameError;

    fn try_from(inbound: InboundMove) -> Result<Self, Self::Error> {
        Ok(Move {
            player: inbound.player,
            kind: inbound.kind.parse()?,
            card_id: inbound.card_id,
            target_player: inbound.target_player,
            target_card: inbound.target_card,
            color: inbound.color,
            bank: inbound.bank,
        })
    }
}
