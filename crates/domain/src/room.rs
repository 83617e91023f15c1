//! Room — the closed set of monitored rooms.
//!
//! Each room carries a PIR motion sensor and an RGB light. The set is fixed
//! at compile time; unknown room names fail at parse time rather than at
//! rule evaluation time.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A monitored room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Room {
    Room1,
    Room2,
    Room3,
    LivingRoom,
}

impl Room {
    /// All monitored rooms, in display order.
    pub const ALL: [Room; 4] = [Room::Room1, Room::Room2, Room::Room3, Room::LivingRoom];

    /// The room name as used in rule payloads and snapshots.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Room1 => "Room1",
            Self::Room2 => "Room2",
            Self::Room3 => "Room3",
            Self::LivingRoom => "LivingRoom",
        }
    }
}

impl fmt::Display for Room {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown room name.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown room: {0}")]
pub struct UnknownRoom(pub String);

impl FromStr for Room {
    type Err = UnknownRoom;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|room| room.as_str() == s)
            .ok_or_else(|| UnknownRoom(s.to_string()))
    }
}
