//! Action — the effect side of an automation rule.
//!
//! Commands are closed enums: anything unrepresentable is rejected when a
//! rule is deserialised, so execution never has to deal with unknown
//! commands.

use serde::{Deserialize, Serialize};

use crate::alert::AlertPattern;
use crate::room::{Room, UnknownRoom};

/// Fan commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FanCommand {
    On,
    Off,
    Toggle,
}

/// Light commands. `Auto` releases the light override and re-derives the
/// colour from current motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LightCommand {
    On,
    Off,
    Auto,
}

/// Door commands. `Auto` releases the door override and forces locked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DoorCommand {
    Lock,
    Unlock,
    Auto,
}

/// Garage commands. `Open`/`Close` take the manual override; `Auto`
/// releases it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GarageCommand {
    Open,
    Close,
    Auto,
}

/// Alert commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertCommand {
    /// Enter emergency mode: all lights to alert colour, gas pattern.
    Emergency,
    /// Play a named pattern without other state change.
    Sound,
}

/// Which room(s) a light action targets.
///
/// Serialised as `"all"`, `"same"` (the triggering condition's room), or a
/// room name, matching the rule-file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum LightTarget {
    #[default]
    All,
    Same,
    Room(Room),
}

impl From<LightTarget> for String {
    fn from(target: LightTarget) -> Self {
        match target {
            LightTarget::All => "all".to_string(),
            LightTarget::Same => "same".to_string(),
            LightTarget::Room(room) => room.to_string(),
        }
    }
}

impl TryFrom<String> for LightTarget {
    type Error = UnknownRoom;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "all" => Ok(Self::All),
            "same" => Ok(Self::Same),
            _ => value.parse::<Room>().map(Self::Room),
        }
    }
}

/// An effect applied to the system when a rule's condition holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    Fan {
        command: FanCommand,
    },
    Light {
        command: LightCommand,
        #[serde(default)]
        location: LightTarget,
    },
    Door {
        command: DoorCommand,
    },
    Garage {
        command: GarageCommand,
    },
    Alert {
        command: AlertCommand,
        /// Pattern for `sound` commands; defaults to `welcome`.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        alert_type: Option<AlertPattern>,
    },
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fan { command } => write!(f, "fan({command:?})"),
            Self::Light { command, location } => {
                let location = String::from(*location);
                write!(f, "light({command:?}, {location})")
            }
            Self::Door { command } => write!(f, "door({command:?})"),
            Self::Garage { command } => write!(f, "garage({command:?})"),
            Self::Alert {
                command,
                alert_type,
            } => match alert_type {
                Some(pattern) => write!(f, "alert({command:?}, {pattern})"),
                None => write!(f, "alert({command:?})"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_deserialize_fan_action_from_tagged_json() {
        let json = serde_json::json!({"type": "fan", "command": "on"});
        let action: Action = serde_json::from_value(json).unwrap();
        assert_eq!(
            action,
            Action::Fan {
                command: FanCommand::On
            }
        );
    }

    #[test]
    fn should_deserialize_light_action_with_same_location() {
        let json = serde_json::json!({
            "type": "light",
            "location": "same",
            "command": "on"
        });
        let action: Action = serde_json::from_value(json).unwrap();
        assert_eq!(
            action,
            Action::Light {
                command: LightCommand::On,
                location: LightTarget::Same,
            }
        );
    }

    #[test]
    fn should_default_light_location_to_all() {
        let json = serde_json::json!({"type": "light", "command": "off"});
        let action: Action = serde_json::from_value(json).unwrap();
        assert_eq!(
            action,
            Action::Light {
                command: LightCommand::Off,
                location: LightTarget::All,
            }
        );
    }

    #[test]
    fn should_deserialize_light_action_with_room_location() {
        let json = serde_json::json!({
            "type": "light",
            "location": "Room3",
            "command": "on"
        });
        let action: Action = serde_json::from_value(json).unwrap();
        assert_eq!(
            action,
            Action::Light {
                command: LightCommand::On,
                location: LightTarget::Room(Room::Room3),
            }
        );
    }

    #[test]
    fn should_reject_light_action_with_unknown_location() {
        let json = serde_json::json!({
            "type": "light",
            "location": "Basement",
            "command": "on"
        });
        let result: Result<Action, _> = serde_json::from_value(json);
        assert!(result.is_err());
    }

    #[test]
    fn should_reject_unknown_command_for_known_action_type() {
        let json = serde_json::json!({"type": "fan", "command": "reverse"});
        let result: Result<Action, _> = serde_json::from_value(json);
        assert!(result.is_err());
    }

    #[test]
    fn should_reject_unknown_action_type() {
        let json = serde_json::json!({"type": "sprinkler", "command": "on"});
        let result: Result<Action, _> = serde_json::from_value(json);
        assert!(result.is_err());
    }

    #[test]
    fn should_deserialize_alert_sound_with_pattern() {
        let json = serde_json::json!({
            "type": "alert",
            "command": "sound",
            "alert_type": "unauthorized"
        });
        let action: Action = serde_json::from_value(json).unwrap();
        assert_eq!(
            action,
            Action::Alert {
                command: AlertCommand::Sound,
                alert_type: Some(AlertPattern::Unauthorized),
            }
        );
    }

    #[test]
    fn should_deserialize_alert_emergency_without_pattern() {
        let json = serde_json::json!({"type": "alert", "command": "emergency"});
        let action: Action = serde_json::from_value(json).unwrap();
        assert_eq!(
            action,
            Action::Alert {
                command: AlertCommand::Emergency,
                alert_type: None,
            }
        );
    }

    #[test]
    fn should_roundtrip_actions_through_serde_json() {
        let actions = vec![
            Action::Fan {
                command: FanCommand::Toggle,
            },
            Action::Light {
                command: LightCommand::Auto,
                location: LightTarget::Room(Room::LivingRoom),
            },
            Action::Door {
                command: DoorCommand::Unlock,
            },
            Action::Garage {
                command: GarageCommand::Close,
            },
            Action::Alert {
                command: AlertCommand::Sound,
                alert_type: Some(AlertPattern::Welcome),
            },
        ];

        for action in &actions {
            let json = serde_json::to_string(action).unwrap();
            let parsed: Action = serde_json::from_str(&json).unwrap();
            assert_eq!(&parsed, action);
        }
    }

    #[test]
    fn should_display_action_with_command() {
        let action = Action::Garage {
            command: GarageCommand::Open,
        };
        assert_eq!(action.to_string(), "garage(Open)");

        let action = Action::Light {
            command: LightCommand::On,
            location: LightTarget::Same,
        };
        assert_eq!(action.to_string(), "light(On, same)");
    }
}
