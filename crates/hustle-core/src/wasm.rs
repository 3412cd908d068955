//! WebAssembly bindings for the Property Hustle engine.
//!
//! This module exposes the game engine to JavaScript through wasm-bindgen.

use wasm_bindgen::prelude::*;

use crate::actions::Move;
use crate::bot;
use crate::game::{GameConfig, GameState};

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// WASM-exposed game wrapper
#[wasm_bindgen]
pub struct WasmGame {
    state: GameState,
}

#[wasm_bindgen]
impl WasmGame {
    /// Create a game from a JSON `GameConfig`; an empty string means one
    /// human against three bots
    #[wasm_bindgen(constructor)]
    pub fn new(game_id: &str, config_json: &str) -> Result<WasmGame, JsValue> {
        let config = if config_json.trim().is_empty() {
            GameConfig::default()
        } else {
            serde_json::from_str(config_json)
                .map_err(|e| JsValue::from_str(&format!("Invalid config: {}", e)))?
        };

        let state = GameState::new(game_id, &config)
            .map_err(|e| JsValue::from_str(&format!("{}: {}", e.code(), e)))?;
        Ok(WasmGame { state })
    }

    /// Get the current game state as JSON
    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&self) -> String {
        serde_json::to_string(&self.state).unwrap_or_else(|_| "{}".to_string())
    }

    #[wasm_bindgen(js_name = getCurrentPlayer)]
    pub fn get_current_player(&self) -> u8 {
        self.state.active_player()
    }

    /// Get valid moves for a player as JSON array
    #[wasm_bindgen(js_name = getValidMoves)]
    pub fn get_valid_moves(&self, player: u8) -> String {
        let moves = self.state.valid_moves(player);
        serde_json::to_string(&moves).unwrap_or_else(|_| "[]".to_string())
    }

    /// Apply a move from JSON, returns events JSON or error
    #[wasm_bindgen(js_name = applyMove)]
    pub fn apply_move(&mut self, move_json: &str) -> Result<String, JsValue> {
        let mv: Move = serde_json::from_str(move_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid move JSON: {}", e)))?;

        match self.state.apply_move(&mv) {
            Ok(events) => Ok(serde_json::to_string(&events).unwrap_or_else(|_| "[]".to_string())),
            Err(e) => Err(JsValue::from_str(&format!("{}: {}", e.code(), e))),
        }
    }

    /// Get the bot's chosen move for a player as JSON
    #[wasm_bindgen(js_name = getBotMove)]
    pub fn get_bot_move(&self, player: u8) -> String {
        let mv = bot::choose_move(&self.state, player);
        serde_json::to_string(&mv).unwrap_or_else(|_| "null".to_string())
    }

    #[wasm_bindgen(js_name = setPaused)]
    pub fn set_paused(&mut self, paused: bool) -> Result<(), JsValue> {
        let result = if paused {
            self.state.pause()
        } else {
            self.state.resume()
        };
        result
            .map(|_| ())
            .map_err(|e| JsValue::from_str(&format!("{}: {}", e.code(), e)))
    }

    /// Check if the game is finished
    #[wasm_bindgen(js_name = isFinished)]
    pub fn is_finished(&self) -> bool {
        self.state.is_over()
    }

    /// Get the winner (if game is finished)
    #[wasm_bindgen(js_name = getWinner)]
    pub fn get_winner(&self) -> Option<u8> {
        self.state.winner
    }
}
