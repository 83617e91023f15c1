//! Simulated actuators — record every write instead of driving hardware.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Mutex;

use haven_app::ports::ActuatorDriver;
use haven_domain::alert::AlertPattern;
use haven_domain::error::DriverError;
use haven_domain::room::Room;
use haven_domain::state::LightColor;

#[derive(Default)]
struct Hardware {
    door_locked: Option<bool>,
    garage_open: Option<bool>,
    lights: BTreeMap<Room, LightColor>,
    fans_on: Option<bool>,
    patterns: Vec<AlertPattern>,
    door_failing: bool,
    garage_failing: bool,
}

/// Simulated actuators that remember the last position driven for each
/// device and every buzzer pattern played.
#[derive(Default)]
pub struct VirtualActuators {
    hardware: Mutex<Hardware>,
}

impl VirtualActuators {
    /// Last commanded door-lock position, if any write happened.
    #[must_use]
    pub fn door_locked(&self) -> Option<bool> {
        self.lock().door_locked
    }

    /// Last commanded garage position, if any write happened.
    #[must_use]
    pub fn garage_open(&self) -> Option<bool> {
        self.lock().garage_open
    }

    /// Last colour driven on a room's light.
    #[must_use]
    pub fn light(&self, room: Room) -> Option<LightColor> {
        self.lock().lights.get(&room).copied()
    }

    /// Last commanded fan state, if any write happened.
    #[must_use]
    pub fn fans_on(&self) -> Option<bool> {
        self.lock().fans_on
    }

    /// Every buzzer pattern played, in order.
    #[must_use]
    pub fn patterns(&self) -> Vec<AlertPattern> {
        self.lock().patterns.clone()
    }

    /// Make door-lock writes fail until reset.
    pub fn set_door_failing(&self, failing: bool) {
        self.lock().door_failing = failing;
    }

    /// Make garage writes fail until reset.
    pub fn set_garage_failing(&self, failing: bool) {
        self.lock().garage_failing = failing;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Hardware> {
        self.hardware
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl ActuatorDriver for VirtualActuators {
    fn set_door_lock(&self, locked: bool) -> impl Future<Output = Result<(), DriverError>> + Send {
        let mut hardware = self.lock();
        let result = if hardware.door_failing {
            Err(DriverError::Actuator("door servo fault".to_string()))
        } else {
            hardware.door_locked = Some(locked);
            Ok(())
        };
        async move { result }
    }

    fn set_garage(&self, open: bool) -> impl Future<Output = Result<(), DriverError>> + Send {
        let mut hardware = self.lock();
        let result = if hardware.garage_failing {
            Err(DriverError::Actuator("garage servo fault".to_string()))
        } else {
            hardware.garage_open = Some(open);
            Ok(())
        };
        async move { result }
    }

    fn set_light(
        &self,
        room: Room,
        color: LightColor,
    ) -> impl Future<Output = Result<(), DriverError>> + Send {
        self.lock().lights.insert(room, color);
        async move { Ok(()) }
    }

    fn set_fans(&self, on: bool) -> impl Future<Output = Result<(), DriverError>> + Send {
        self.lock().fans_on = Some(on);
        async move { Ok(()) }
    }

    fn play_pattern(
        &self,
        pattern: AlertPattern,
    ) -> impl Future<Output = Result<(), DriverError>> + Send {
        self.lock().patterns.push(pattern);
        async move { Ok(()) }
    }
}
