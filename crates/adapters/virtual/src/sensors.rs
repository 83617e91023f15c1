//! Simulated sensors — scriptable readings behind a mutex.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Mutex;

use haven_app::ports::{ClimateReading, GasReading, SensorDriver};
use haven_domain::error::DriverError;
use haven_domain::room::Room;

struct Readings {
    motion: BTreeMap<Room, bool>,
    temperature: f64,
    humidity: f64,
    gas: bool,
    climate_failing: bool,
    gas_failing: bool,
}

impl Default for Readings {
    fn default() -> Self {
        Self {
            motion: Room::ALL.into_iter().map(|room| (room, false)).collect(),
            temperature: 21.5,
            humidity: 45.0,
            gas: false,
            climate_failing: false,
            gas_failing: false,
        }
    }
}

/// Simulated environment: motion, climate, and gas readings that tests and
/// demos set explicitly.
#[derive(Default)]
pub struct VirtualSensors {
    readings: Mutex<Readings>,
}

impl VirtualSensors {
    /// Script the motion flag for a room.
    pub fn set_motion(&self, room: Room, detected: bool) {
        self.lock().motion.insert(room, detected);
    }

    /// Script temperature (°C) and humidity (%).
    pub fn set_climate(&self, temperature: f64, humidity: f64) {
        let mut readings = self.lock();
        readings.temperature = temperature;
        readings.humidity = humidity;
    }

    /// Script the gas-detection flag.
    pub fn set_gas(&self, detected: bool) {
        self.lock().gas = detected;
    }

    /// Make climate reads fail until reset, simulating a flaky DHT sensor.
    pub fn set_climate_failing(&self, failing: bool) {
        self.lock().climate_failing = failing;
    }

    /// Make gas reads fail until reset.
    pub fn set_gas_failing(&self, failing: bool) {
        self.lock().gas_failing = failing;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Readings> {
        self.readings
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl SensorDriver for VirtualSensors {
    fn read_motion(&self, room: Room) -> impl Future<Output = Result<bool, DriverError>> + Send {
        let result = Ok(self.lock().motion.get(&room).copied().unwrap_or(false));
        async move { result }
    }

    fn read_climate(&self) -> impl Future<Output = Result<ClimateReading, DriverError>> + Send {
        let readings = self.lock();
        let result = if readings.climate_failing {
            Err(DriverError::Sensor("climate sensor offline".to_string()))
        } else {
            Ok(ClimateReading {
                temperature: readings.temperature,
                humidity: readings.humidity,
            })
        };
        async move { result }
    }

    fn read_gas(&self) -> impl Future<Output = Result<GasReading, DriverError>> + Send {
        let readings = self.lock();
        let result = if readings.gas_failing {
            Err(DriverError::Sensor("gas sensor offline".to_string()))
        } else {
            Ok(GasReading {
                detected: readings.gas,
                voltage: if readings.gas { 2.4 } else { 0.4 },
            })
        };
        async move { result }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn should_report_no_motion_by_default() {
        let sensors = VirtualSensors::default();
        for room in Room::ALL {
            assert!(!sensors.read_motion(room).await.unwrap());
        }
    }

    #[tokio::test]
    async fn should_report_scripted_motion() {
        let sensors = VirtualSensors::default();
        sensors.set_motion(Room::LivingRoom, true);

        assert!(sensors.read_motion(Room::LivingRoom).await.unwrap());
        assert!(!sensors.read_motion(Room::Room1).await.unwrap());
    }

    #[tokio::test]
    async fn should_default_to_room_temperature() {
        let sensors = VirtualSensors::default();
        let reading = sensors.read_climate().await.unwrap();
        assert!((reading.temperature - 21.5).abs() < f64::EPSILON);
        assert!((reading.humidity - 45.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn should_report_scripted_climate() {
        let sensors = VirtualSensors::default();
        sensors.set_climate(26.0, 60.0);

        let reading = sensors.read_climate().await.unwrap();
        assert!((reading.temperature - 26.0).abs() < f64::EPSILON);
        assert!((reading.humidity - 60.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn should_fail_climate_reads_when_scripted() {
        let sensors = VirtualSensors::default();
        sensors.set_climate_failing(true);
        assert!(sensors.read_climate().await.is_err());

        sensors.set_climate_failing(false);
        assert!(sensors.read_climate().await.is_ok());
    }

    #[tokio::test]
    async fn should_raise_gas_voltage_when_detected() {
        let sensors = VirtualSensors::default();
        let clear = sensors.read_gas().await.unwrap();
        assert!(!clear.detected);

        sensors.set_gas(true);
        let detected = sensors.read_gas().await.unwrap();
        assert!(detected.detected);
        assert!(detected.voltage > clear.voltage);
    }

    #[tokio::test]
    async fn should_fail_gas_reads_when_scripted() {
        let sensors = VirtualSensors::default();
        sensors.set_gas_failing(true);
        assert!(sensors.read_gas().await.is_err());
    }
}
