//! # Player Action Log
//!
//! The discrete actions a player can take, as they appear in the published
//! session record. The game engine dispatches on the variant; the replay
//! orchestrator schedules `LoggedAction`s against ticks.

use crate::session::{Direction, OptionDirection};
use serde::{Deserialize, Serialize};

/// One player action. Internally tagged on the wire:
///
/// ```json
/// {"type": "openPosition", "direction": "long", "sizePercent": 0.5, "leverage": 10}
/// ```
///
/// Percent-style fields are fractions in (0, 1]. Every action is a silent
/// no-op when its preconditions fail; the engine reports that through its
/// return value so the orchestrator can flag the entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PlayerAction {
    #[serde(rename_all = "camelCase")]
    OpenPosition {
        direction: Direction,
        size_percent: f64,
        leverage: f64,
    },
    ClosePosition,
    BuyShield,
    #[serde(rename_all = "camelCase")]
    BuyOption {
        direction: OptionDirection,
        premium: f64,
        multiplier: u32,
        duration_seconds: u32,
    },
    TriggerSimpleTurbo,
    #[serde(rename_all = "camelCase")]
    Relever { target_leverage: f64 },
    #[serde(rename_all = "camelCase")]
    AddEquity { additional_percent: f64 },
}

impl PlayerAction {
    /// Short name for logs and warnings.
    pub fn name(&self) -> &'static str {
        match self {
            PlayerAction::OpenPosition { .. } => "openPosition",
            PlayerAction::ClosePosition => "closePosition",
            PlayerAction::BuyShield => "buyShield",
            PlayerAction::BuyOption { .. } => "buyOption",
            PlayerAction::TriggerSimpleTurbo => "triggerSimpleTurbo",
            PlayerAction::Relever { .. } => "relever",
            PlayerAction::AddEquity { .. } => "addEquity",
        }
    }
}

/// An action as logged by the operator, pinned to a tick.
///
/// Actions are applied before the tick they name advances. Ordering within a
/// tick follows `timestamp` (stable, so equal timestamps keep log order).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggedAction {
    pub tick_number: u64,
    pub action: PlayerAction,
    /// Epoch milliseconds; only the relative order matters to replay.
    pub timestamp: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_wire_format() {
        let json = r#"{"type":"openPosition","direction":"long","sizePercent":0.5,"leverage":10.0}"#;
        let action: PlayerAction = serde_json::from_str(json).unwrap();
        assert_eq!(
            action,
            PlayerAction::OpenPosition {
                direction: Direction::Long,
                size_percent: 0.5,
                leverage: 10.0,
            }
        );
        assert_eq!(action.name(), "openPosition");

        let back = serde_json::to_string(&action).unwrap();
        assert!(back.contains("\"sizePercent\""));
        assert!(back.contains("\"openPosition\""));
    }

    #[test]
    fn test_unit_variants_need_no_payload() {
        let close: PlayerAction = serde_json::from_str(r#"{"type":"closePosition"}"#).unwrap();
        assert_eq!(close, PlayerAction::ClosePosition);
        let turbo: PlayerAction = serde_json::from_str(r#"{"type":"triggerSimpleTurbo"}"#).unwrap();
        assert_eq!(turbo, PlayerAction::TriggerSimpleTurbo);
    }

    #[test]
    fn test_logged_action_round_trip() {
        let logged = LoggedAction {
            tick_number: 42,
            action: PlayerAction::BuyOption {
                direction: OptionDirection::Put,
                premium: 25.0,
                multiplier: 5,
                duration_seconds: 30,
            },
            timestamp: 1_700_000_000_000,
        };
        let json = serde_json::to_string(&logged).unwrap();
        assert!(json.contains("\"tickNumber\":42"));
        assert!(json.contains("\"durationSeconds\":30"));
        let back: LoggedAction = serde_json::from_str(&json).unwrap();
        assert_eq!(back, logged);
    }
}
