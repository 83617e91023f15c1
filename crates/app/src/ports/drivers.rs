//! Driver ports — sensor reads and actuator writes.
//!
//! Implementations are expected to return promptly; the controller wraps
//! every call in a timeout and treats an overrun as a failed read/write, so
//! a slow driver can never stall a tick indefinitely.

use std::future::Future;

use haven_domain::alert::AlertPattern;
use haven_domain::error::DriverError;
use haven_domain::room::Room;
use haven_domain::state::LightColor;

/// One temperature + humidity sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClimateReading {
    /// Temperature in °C.
    pub temperature: f64,
    /// Relative humidity in %.
    pub humidity: f64,
}

/// One gas-sensor sample (digital detection flag plus analog level).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GasReading {
    /// Whether the digital output reports gas.
    pub detected: bool,
    /// Analog output voltage, for dashboards and logs.
    pub voltage: f64,
}

/// Reads the environmental sensors.
pub trait SensorDriver: Send + Sync {
    /// Read the PIR motion flag for a room.
    fn read_motion(&self, room: Room) -> impl Future<Output = Result<bool, DriverError>> + Send;

    /// Read temperature and humidity.
    fn read_climate(&self) -> impl Future<Output = Result<ClimateReading, DriverError>> + Send;

    /// Read the gas sensor.
    fn read_gas(&self) -> impl Future<Output = Result<GasReading, DriverError>> + Send;
}

/// Drives the physical (or simulated) actuators.
pub trait ActuatorDriver: Send + Sync {
    /// Move the door-lock servo to the locked/unlocked position.
    fn set_door_lock(&self, locked: bool) -> impl Future<Output = Result<(), DriverError>> + Send;

    /// Move the garage servo to the open/closed position.
    fn set_garage(&self, open: bool) -> impl Future<Output = Result<(), DriverError>> + Send;

    /// Drive a room's RGB light.
    fn set_light(
        &self,
        room: Room,
        color: LightColor,
    ) -> impl Future<Output = Result<(), DriverError>> + Send;

    /// Switch the fans on or off.
    fn set_fans(&self, on: bool) -> impl Future<Output = Result<(), DriverError>> + Send;

    /// Play a buzzer pattern.
    fn play_pattern(
        &self,
        pattern: AlertPattern,
    ) -> impl Future<Output = Result<(), DriverError>> + Send;
}
