//! Condition — the predicate side of an automation rule.
//!
//! Conditions are evaluated once per tick against the current system state.
//! Evaluation is total: unknown or inapplicable combinations yield `false`,
//! never an error.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::room::{Room, UnknownRoom};
use crate::state::SystemState;

/// Comparison operator, serialised as its symbol (`">"`, `"=="`, …).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Op {
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
}

impl Op {
    /// Apply the operator to a pair of floats (ordinary IEEE comparison).
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn compare_f64(self, current: f64, value: f64) -> bool {
        match self {
            Self::Gt => current > value,
            Self::Lt => current < value,
            Self::Ge => current >= value,
            Self::Le => current <= value,
            Self::Eq => current == value,
            Self::Ne => current != value,
        }
    }

    /// Apply the operator to a pair of booleans.
    ///
    /// Only `==` and `!=` are meaningful on booleans; every other operator
    /// yields `false` by policy.
    #[must_use]
    pub fn compare_bool(self, current: bool, value: bool) -> bool {
        match self {
            Self::Eq => current == value,
            Self::Ne => current != value,
            _ => false,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gt => ">",
            Self::Lt => "<",
            Self::Ge => ">=",
            Self::Le => "<=",
            Self::Eq => "==",
            Self::Ne => "!=",
        }
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a motion condition looks: any room, or one specific room.
///
/// Serialised as `"any"` or the room name, matching the rule-file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum MotionLocation {
    #[default]
    Any,
    Room(Room),
}

impl From<MotionLocation> for String {
    fn from(location: MotionLocation) -> Self {
        match location {
            MotionLocation::Any => "any".to_string(),
            MotionLocation::Room(room) => room.to_string(),
        }
    }
}

impl TryFrom<String> for MotionLocation {
    type Error = UnknownRoom;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value == "any" {
            Ok(Self::Any)
        } else {
            value.parse::<Room>().map(Self::Room)
        }
    }
}

/// A predicate over the current system state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Condition {
    /// Compare the current temperature (°C) against a threshold.
    Temperature { operator: Op, value: f64 },
    /// Compare the current relative humidity (%) against a threshold.
    Humidity { operator: Op, value: f64 },
    /// Compare the gas-detection flag.
    Gas { operator: Op, value: bool },
    /// Compare a motion flag, either room-scoped or `any`.
    Motion {
        #[serde(default)]
        location: MotionLocation,
        operator: Op,
        value: bool,
    },
    /// Compare the evaluation instant's time of day against `HH:MM`.
    ///
    /// `==` treats the condition as satisfied within a one-minute window;
    /// `>`/`<` are exact. Other operators and unparseable values yield
    /// `false`.
    Time { operator: Op, value: String },
}

impl Condition {
    /// Evaluate against the current state at the given time of day.
    ///
    /// Total and panic-free: inapplicable operators and malformed time
    /// values evaluate to `false`.
    #[must_use]
    pub fn evaluate(&self, state: &SystemState, time_of_day: NaiveTime) -> bool {
        match self {
            Self::Temperature { operator, value } => {
                operator.compare_f64(state.temperature(), *value)
            }
            Self::Humidity { operator, value } => operator.compare_f64(state.humidity(), *value),
            Self::Gas { operator, value } => operator.compare_bool(state.gas_detected(), *value),
            Self::Motion {
                location,
                operator,
                value,
            } => {
                let current = match location {
                    MotionLocation::Any => state.any_motion(),
                    MotionLocation::Room(room) => state.motion(*room),
                };
                operator.compare_bool(current, *value)
            }
            Self::Time { operator, value } => {
                let Ok(target) = NaiveTime::parse_from_str(value, "%H:%M") else {
                    return false;
                };
                match operator {
                    Op::Gt => time_of_day > target,
                    Op::Lt => time_of_day < target,
                    Op::Eq => (time_of_day - target).num_seconds().abs() < 60,
                    _ => false,
                }
            }
        }
    }

    /// The rooms a `same`-targeted light action resolves to.
    ///
    /// A room-scoped motion condition names its room; an `any`-scoped one
    /// resolves to every room whose motion flag is currently set (the rooms
    /// that triggered it). Conditions with no room affinity resolve to
    /// nothing.
    #[must_use]
    pub fn matching_rooms(&self, state: &SystemState) -> Vec<Room> {
        match self {
            Self::Motion {
                location: MotionLocation::Room(room),
                ..
            } => vec![*room],
            Self::Motion {
                location: MotionLocation::Any,
                ..
            } => Room::ALL
                .into_iter()
                .filter(|room| state.motion(*room))
                .collect(),
            _ => Vec::new(),
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Temperature { operator, value } => write!(f, "temperature {operator} {value}"),
            Self::Humidity { operator, value } => write!(f, "humidity {operator} {value}"),
            Self::Gas { operator, value } => write!(f, "gas {operator} {value}"),
            Self::Motion {
                location,
                operator,
                value,
            } => {
                let location = String::from(*location);
                write!(f, "motion({location}) {operator} {value}")
            }
            Self::Time { operator, value } => write!(f, "time {operator} {value}"),
        }
    }
}
