//! System state — the single source of truth for the coordination engine.
//!
//! One [`SystemState`] instance exists per process. All mutation goes
//! through typed setters that return the previous value, so callers can
//! detect transitions (needed for edge-triggered side effects such as the
//! gas alert sound). Serialization of the whole struct is the snapshot
//! format published to subscribers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::room::Room;
use crate::time::Timestamp;

/// Colour currently driven on a room's RGB light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LightColor {
    /// Light off.
    #[default]
    Off,
    /// Normal occupancy lighting.
    White,
    /// Emergency alert colour.
    Red,
}

impl std::fmt::Display for LightColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Off => f.write_str("off"),
            Self::White => f.write_str("white"),
            Self::Red => f.write_str("red"),
        }
    }
}

/// A device (or device group) that can be placed under manual override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverrideTarget {
    Fans,
    Door,
    Garage,
    Light(Room),
}

impl std::fmt::Display for OverrideTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fans => f.write_str("fans"),
            Self::Door => f.write_str("door"),
            Self::Garage => f.write_str("garage"),
            Self::Light(room) => write!(f, "light({room})"),
        }
    }
}

/// Per-device manual-override flags.
///
/// While a flag is set, automatic (rule-driven) control must not write to
/// that device; only explicit external commands may.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overrides {
    pub fans: bool,
    pub door: bool,
    pub garage: bool,
    pub lights: BTreeMap<Room, bool>,
}

impl Default for Overrides {
    fn default() -> Self {
        Self {
            fans: false,
            door: false,
            garage: false,
            lights: Room::ALL.into_iter().map(|room| (room, false)).collect(),
        }
    }
}

/// The shared mutable state of the whole system.
///
/// Created once at process start with defaults (door locked, garage closed,
/// no overrides) and mutated exclusively through the setters below, each of
/// which returns the previous value of the field it touches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemState {
    motion: BTreeMap<Room, bool>,
    temperature: f64,
    humidity: f64,
    gas_detected: bool,
    emergency_mode: bool,
    door_locked: bool,
    garage_open: bool,
    fans_on: bool,
    lights: BTreeMap<Room, LightColor>,
    garage_auto_close_deadline: Option<Timestamp>,
    door_relock_deadline: Option<Timestamp>,
    overrides: Overrides,
}

impl Default for SystemState {
    fn default() -> Self {
        Self {
            motion: Room::ALL.into_iter().map(|room| (room, false)).collect(),
            temperature: 0.0,
            humidity: 0.0,
            gas_detected: false,
            emergency_mode: false,
            door_locked: true,
            garage_open: false,
            fans_on: false,
            lights: Room::ALL
                .into_iter()
                .map(|room| (room, LightColor::Off))
                .collect(),
            garage_auto_close_deadline: None,
            door_relock_deadline: None,
            overrides: Overrides::default(),
        }
    }
}

impl SystemState {
    /// Fresh state with process-start defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ── Read access ────────────────────────────────────────────────

    /// Motion flag for a room.
    #[must_use]
    pub fn motion(&self, room: Room) -> bool {
        self.motion.get(&room).copied().unwrap_or(false)
    }

    /// Whether motion is currently detected in any room.
    #[must_use]
    pub fn any_motion(&self) -> bool {
        self.motion.values().any(|detected| *detected)
    }

    #[must_use]
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    #[must_use]
    pub fn humidity(&self) -> f64 {
        self.humidity
    }

    #[must_use]
    pub fn gas_detected(&self) -> bool {
        self.gas_detected
    }

    #[must_use]
    pub fn emergency_mode(&self) -> bool {
        self.emergency_mode
    }

    #[must_use]
    pub fn door_locked(&self) -> bool {
        self.door_locked
    }

    #[must_use]
    pub fn garage_open(&self) -> bool {
        self.garage_open
    }

    #[must_use]
    pub fn fans_on(&self) -> bool {
        self.fans_on
    }

    /// Colour currently recorded for a room's light.
    #[must_use]
    pub fn light(&self, room: Room) -> LightColor {
        self.lights.get(&room).copied().unwrap_or_default()
    }

    #[must_use]
    pub fn garage_auto_close_deadline(&self) -> Option<Timestamp> {
        self.garage_auto_close_deadline
    }

    #[must_use]
    pub fn door_relock_deadline(&self) -> Option<Timestamp> {
        self.door_relock_deadline
    }

    /// Whether a device is under manual override.
    #[must_use]
    pub fn is_overridden(&self, target: OverrideTarget) -> bool {
        match target {
            OverrideTarget::Fans => self.overrides.fans,
            OverrideTarget::Door => self.overrides.door,
            OverrideTarget::Garage => self.overrides.garage,
            OverrideTarget::Light(room) => {
                self.overrides.lights.get(&room).copied().unwrap_or(false)
            }
        }
    }

    // ── Typed setters (each returns the previous value) ────────────

    pub fn set_motion(&mut self, room: Room, detected: bool) -> bool {
        self.motion.insert(room, detected).unwrap_or(false)
    }

    pub fn set_temperature(&mut self, value: f64) -> f64 {
        std::mem::replace(&mut self.temperature, value)
    }

    pub fn set_humidity(&mut self, value: f64) -> f64 {
        std::mem::replace(&mut self.humidity, value)
    }

    pub fn set_gas(&mut self, detected: bool) -> bool {
        std::mem::replace(&mut self.gas_detected, detected)
    }

    pub fn set_emergency(&mut self, active: bool) -> bool {
        std::mem::replace(&mut self.emergency_mode, active)
    }

    /// Record the door-lock position.
    ///
    /// Locking by any path clears the pending relock deadline: the relock
    /// either fired or was preempted by an explicit lock.
    pub fn set_door_locked(&mut self, locked: bool) -> bool {
        if locked {
            self.door_relock_deadline = None;
        }
        std::mem::replace(&mut self.door_locked, locked)
    }

    /// Record the garage position.
    ///
    /// Closing by any path clears the auto-close deadline.
    pub fn set_garage_open(&mut self, open: bool) -> bool {
        if !open {
            self.garage_auto_close_deadline = None;
        }
        std::mem::replace(&mut self.garage_open, open)
    }

    pub fn set_fans(&mut self, on: bool) -> bool {
        std::mem::replace(&mut self.fans_on, on)
    }

    pub fn set_light(&mut self, room: Room, color: LightColor) -> LightColor {
        self.lights.insert(room, color).unwrap_or_default()
    }

    /// Set or clear a manual-override flag.
    ///
    /// Engaging the garage override cancels the auto-close deadline: the
    /// deadline is never armed while the garage is under manual control.
    /// (Releasing it while the garage is open is the caller's cue to re-arm.)
    pub fn set_override(&mut self, target: OverrideTarget, active: bool) -> bool {
        if active && target == OverrideTarget::Garage {
            self.garage_auto_close_deadline = None;
        }
        match target {
            OverrideTarget::Fans => std::mem::replace(&mut self.overrides.fans, active),
            OverrideTarget::Door => std::mem::replace(&mut self.overrides.door, active),
            OverrideTarget::Garage => std::mem::replace(&mut self.overrides.garage, active),
            OverrideTarget::Light(room) => {
                self.overrides.lights.insert(room, active).unwrap_or(false)
            }
        }
    }

    // ── Deferred-action deadlines (fire-once semantics) ────────────

    /// Arm the garage auto-close deadline.
    ///
    /// Has no effect while the garage is closed or under manual override —
    /// the deadline is `None` in both situations by invariant.
    pub fn arm_garage_auto_close(&mut self, deadline: Timestamp) {
        if self.garage_open && !self.overrides.garage {
            self.garage_auto_close_deadline = Some(deadline);
        }
    }

    pub fn cancel_garage_auto_close(&mut self) {
        self.garage_auto_close_deadline = None;
    }

    /// Check the garage auto-close deadline, clearing it when due.
    ///
    /// Returns `true` exactly once per armed deadline; a second call for the
    /// same deadline returns `false`.
    pub fn garage_auto_close_due(&mut self, now: Timestamp) -> bool {
        match self.garage_auto_close_deadline {
            Some(deadline) if now >= deadline => {
                self.garage_auto_close_deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Arm the door relock deadline. No effect while the door is locked.
    pub fn arm_door_relock(&mut self, deadline: Timestamp) {
        if !self.door_locked {
            self.door_relock_deadline = Some(deadline);
        }
    }

    pub fn cancel_door_relock(&mut self) {
        self.door_relock_deadline = None;
    }

    /// Check the door relock deadline, clearing it when due. Fire-once.
    pub fn door_relock_due(&mut self, now: Timestamp) -> bool {
        match self.door_relock_deadline {
            Some(deadline) if now >= deadline => {
                self.door_relock_deadline = None;
                true
            }
            _ => false,
        }
    }
}
