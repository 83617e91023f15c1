//! Alert patterns — the named beep sequences the buzzer can play.

use serde::{Deserialize, Serialize};

/// A predefined buzzer pattern.
///
/// The actual tone sequences live behind the actuator driver; the core only
/// selects which pattern to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertPattern {
    /// Urgent repeating high-pitch pattern for gas detection.
    Gas,
    /// Ascending tones played when the door unlocks or the garage opens.
    DoorOpen,
    /// Descending tones played when the door locks or the garage closes.
    DoorClose,
    /// Two low beeps for rejected access attempts.
    Unauthorized,
    /// Short melody for recognised access.
    Welcome,
}

impl std::fmt::Display for AlertPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gas => f.write_str("gas"),
            Self::DoorOpen => f.write_str("door_open"),
            Self::DoorClose => f.write_str("door_close"),
            Self::Unauthorized => f.write_str("unauthorized"),
            Self::Welcome => f.write_str("welcome"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_serialize_in_snake_case() {
        assert_eq!(
            serde_json::to_string(&AlertPattern::DoorOpen).unwrap(),
            "\"door_open\""
        );
    }

    #[test]
    fn should_deserialize_from_snake_case() {
        let pattern: AlertPattern = serde_json::from_str("\"welcome\"").unwrap();
        assert_eq!(pattern, AlertPattern::Welcome);
    }

    #[test]
    fn should_display_snake_case_name() {
        assert_eq!(AlertPattern::Gas.to_string(), "gas");
        assert_eq!(AlertPattern::DoorClose.to_string(), "door_close");
    }
}
