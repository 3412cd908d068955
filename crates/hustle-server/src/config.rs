//! Server configuration from the environment.

use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

use hustle_core::game::{MAX_PLAYERS, MIN_PLAYERS};

/// Runtime settings for the room orchestrator and the self-play runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Pause before a bot starts its turn
    pub bot_turn_delay: Duration,
    /// Pause between a bot's moves within a turn
    pub bot_move_delay: Duration,
    /// Seats in each self-play room
    pub seats: usize,
    /// Self-play rooms to run
    pub rooms: usize,
    /// A self-play room is stopped after this many turns
    pub max_turns: u32,
    pub seed: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bot_turn_delay: Duration::from_millis(1500),
            bot_move_delay: Duration::from_millis(800),
            seats: 4,
            rooms: 1,
            max_turns: 300,
            seed: None,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Unparseable values keep the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let seats = parse_or(&lookup, "HUSTLE_SEATS", defaults.seats);
        let seats = if (MIN_PLAYERS..=MAX_PLAYERS).contains(&seats) {
            seats
        } else {
            warn!(
                "HUSTLE_SEATS={} is outside {}-{}, using {}",
                seats, MIN_PLAYERS, MAX_PLAYERS, defaults.seats
            );
            defaults.seats
        };

        Self {
            bot_turn_delay: Duration::from_millis(parse_or(
                &lookup,
                "HUSTLE_BOT_TURN_DELAY_MS",
                defaults.bot_turn_delay.as_millis() as u64,
            )),
            bot_move_delay: Duration::from_millis(parse_or(
                &lookup,
                "HUSTLE_BOT_MOVE_DELAY_MS",
                defaults.bot_move_delay.as_millis() as u64,
            )),
            seats,
            rooms: parse_or(&lookup, "HUSTLE_ROOMS", defaults.rooms),
            max_turns: parse_or(&lookup, "HUSTLE_MAX_TURNS", defaults.max_turns),
            seed: lookup("HUSTLE_SEED").and_then(|raw| match raw.trim().parse() {
                Ok(seed) => Some(seed),
                Err(_) => {
                    warn!("Ignoring invalid HUSTLE_SEED={:?}", raw);
                    None
                }
            }),
        }
    }
}

fn parse_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Invalid value {:?} for {}, using default", raw, key);
            default
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> ServerConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        assert_eq!(config_from(&[]), ServerConfig::default());
    }

    #[test]
    fn test_reads_values() {
        let config = config_from(&[
            ("HUSTLE_BOT_TURN_DELAY_MS", "10"),
            ("HUSTLE_BOT_MOVE_DELAY_MS", " 5 "),
            ("HUSTLE_SEATS", "2"),
            ("HUSTLE_ROOMS", "3"),
            ("HUSTLE_SEED", "42"),
        ]);
        assert_eq!(config.bot_turn_delay, Duration::from_millis(10));
        assert_eq!(config.bot_move_delay, Duration::from_millis(5));
        assert_eq!(config.seats, 2);
        assert_eq!(config.rooms, 3);
        assert_eq!(config.max_turns, 300);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = config_from(&[
            ("HUSTLE_BOT_TURN_DELAY_MS", "soon"),
            ("HUSTLE_SEATS", "9"),
            ("HUSTLE_SEED", "abc"),
        ]);
        assert_eq!(config.bot_turn_delay, Duration::from_millis(1500));
        assert_eq!(config.seats, 4);
        assert_eq!(config.seed, None);
    }
}
