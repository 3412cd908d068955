//! Property Hustle - a set-collecting card game engine
//!
//! This crate provides the core rules for Property Hustle, including:
//! - The card and player model with the standard 106-card deck
//! - Rent calculation over property sets, houses and hotels
//! - Payment resolution and property transfer heuristics
//! - Turn flow, move validation and the card effect engine
//! - A rule-based bot that plays and blocks
//!
//! # Architecture
//!
//! The engine is synchronous and platform-agnostic. Room hosting, timing and
//! concurrency live in `hustle-server`; the same state machine compiles to
//! WebAssembly for client-side play.
//!
//! # Modules
//!
//! - [`cards`]: Cards, colors and the standard deck
//! - [`player`]: Hands, banks and played properties
//! - [`rent`]: Set completion and rent
//! - [`payment`]: Which cards settle a debt
//! - [`property`]: Target and placement heuristics
//! - [`game`]: Game state and move dispatch
//! - [`bot`]: Bot move choice and blocking

pub mod actions;
pub mod bot;
pub mod cards;
pub mod effects;
pub mod game;
pub mod payment;
pub mod player;
pub mod property;
pub mod rent;
pub mod turn;
pub mod validate;
#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export commonly used types
pub use actions::{Building, FizzleReason, GameEvent, LogEntry, LogKind, Move, MoveKind};
pub use bot::{choose_move, should_block, Threat};
pub use cards::{standard_deck, ActionKind, Card, CardId, CardKind, PropertyColor};
pub use game::{GameConfig, GameError, GameState, GameStatus, SeatConfig};
pub use payment::{PaymentReason, PaymentRequest};
pub use player::{Player, PlayerId};
pub use turn::{TurnContext, TurnStage};
