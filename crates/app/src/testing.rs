//! Test doubles for the driver and store ports.
//!
//! Sensors are scriptable, actuators record every write, and the rule
//! store counts saves — enough to assert on edge-triggered behaviour and
//! failure handling without real hardware.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use haven_domain::alert::AlertPattern;
use haven_domain::error::{ConfigError, DriverError, HavenError};
use haven_domain::room::Room;
use haven_domain::rule::AutomationRule;
use haven_domain::state::LightColor;

use crate::controller::{Controller, Settings};
use crate::ports::{ActuatorDriver, ClimateReading, GasReading, RuleStore, SensorDriver};

pub(crate) type TestController = Controller<SpySensors, SpyActuators, InMemoryRuleStore>;

pub(crate) fn make_controller() -> TestController {
    make_controller_with_settings(Settings::default())
}

pub(crate) fn make_controller_with_settings(settings: Settings) -> TestController {
    Controller::new(
        SpySensors::default(),
        SpyActuators::default(),
        InMemoryRuleStore::default(),
        settings,
    )
}

impl TestController {
    /// Drop all rules so a test can observe tick behaviour without the
    /// default rule set interfering.
    pub(crate) async fn clear_rules(&self) {
        self.inner.lock().await.rules.clear();
    }
}

// ── Scriptable sensors ─────────────────────────────────────────────

struct SensorValues {
    motion: BTreeMap<Room, bool>,
    temperature: f64,
    humidity: f64,
    gas: bool,
    climate_failing: bool,
    gas_failing: bool,
}

impl Default for SensorValues {
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

#[derive(Default)]
pub(crate) struct SpySensors {
    inner: Mutex<SensorValues>,
}

impl SpySensors {
    pub(crate) fn set_motion(&self, room: Room, detected: bool) {
        self.inner.lock().unwrap().motion.insert(room, detected);
    }

    pub(crate) fn set_climate(&self, temperature: f64, humidity: f64) {
        let mut values = self.inner.lock().unwrap();
        values.temperature = temperature;
        values.humidity = humidity;
    }

    pub(crate) fn set_gas(&self, detected: bool) {
        self.inner.lock().unwrap().gas = detected;
    }

    pub(crate) fn set_climate_failing(&self, failing: bool) {
        self.inner.lock().unwrap().climate_failing = failing;
    }

    #[allow(dead_code)]
    pub(crate) fn set_gas_failing(&self, failing: bool) {
        self.inner.lock().unwrap().gas_failing = failing;
    }
}

impl SensorDriver for SpySensors {
    fn read_motion(&self, room: Room) -> impl Future<Output = Result<bool, DriverError>> + Send {
        let result = Ok(self
            .inner
            .lock()
            .unwrap()
            .motion
            .get(&room)
            .copied()
            .unwrap_or(false));
        async move { result }
    }

    fn read_climate(&self) -> impl Future<Output = Result<ClimateReading, DriverError>> + Send {
        let values = self.inner.lock().unwrap();
        let result = if values.climate_failing {
            Err(DriverError::Sensor("climate sensor offline".to_string()))
        } else {
            Ok(ClimateReading {
                temperature: values.temperature,
                humidity: values.humidity,
            })
        };
        async move { result }
    }

    fn read_gas(&self) -> impl Future<Output = Result<GasReading, DriverError>> + Send {
        let values = self.inner.lock().unwrap();
        let result = if values.gas_failing {
            Err(DriverError::Sensor("gas sensor offline".to_string()))
        } else {
            Ok(GasReading {
                detected: values.gas,
                voltage: if values.gas { 2.4 } else { 0.4 },
            })
        };
        async move { result }
    }
}

// ── Recording actuators ────────────────────────────────────────────

#[derive(Default)]
struct ActuatorLog {
    door_writes: Vec<bool>,
    garage_writes: Vec<bool>,
    light_writes: Vec<(Room, LightColor)>,
    fan_writes: Vec<bool>,
    patterns: Vec<AlertPattern>,
    door_failing: bool,
    fans_failing: bool,
}

#[derive(Default)]
pub(crate) struct SpyActuators {
    inner: Mutex<ActuatorLog>,
    /// When set, every call stalls past any sane driver timeout.
    stall: bool,
}

impl SpyActuators {
    /// An actuator whose calls never return in time.
    pub(crate) fn stalled() -> Self {
        Self {
            inner: Mutex::default(),
            stall: true,
        }
    }

    pub(crate) fn door_writes(&self) -> Vec<bool> {
        self.inner.lock().unwrap().door_writes.clone()
    }

    #[allow(dead_code)]
    pub(crate) fn garage_writes(&self) -> Vec<bool> {
        self.inner.lock().unwrap().garage_writes.clone()
    }

    #[allow(dead_code)]
    pub(crate) fn light_writes(&self) -> Vec<(Room, LightColor)> {
        self.inner.lock().unwrap().light_writes.clone()
    }

    pub(crate) fn fan_writes(&self) -> Vec<bool> {
        self.inner.lock().unwrap().fan_writes.clone()
    }

    pub(crate) fn patterns(&self) -> Vec<AlertPattern> {
        self.inner.lock().unwrap().patterns.clone()
    }

    pub(crate) fn set_door_failing(&self, failing: bool) {
        self.inner.lock().unwrap().door_failing = failing;
    }

    pub(crate) fn set_fans_failing(&self, failing: bool) {
        self.inner.lock().unwrap().fans_failing = failing;
    }

    fn finish(
        &self,
        result: Result<(), DriverError>,
    ) -> impl Future<Output = Result<(), DriverError>> + Send + 'static {
        let stall = self.stall;
        async move {
            if stall {
                tokio::time::sleep(Duration::from_secs(3600)).await;
            }
            result
        }
    }
}

impl ActuatorDriver for SpyActuators {
    fn set_door_lock(&self, locked: bool) -> impl Future<Output = Result<(), DriverError>> + Send {
        let mut log = self.inner.lock().unwrap();
        let result = if log.door_failing {
            Err(DriverError::Actuator("door servo fault".to_string()))
        } else {
            log.door_writes.push(locked);
            Ok(())
        };
        drop(log);
        self.finish(result)
    }

    fn set_garage(&self, open: bool) -> impl Future<Output = Result<(), DriverError>> + Send {
        let mut log = self.inner.lock().unwrap();
        log.garage_writes.push(open);
        drop(log);
        self.finish(Ok(()))
    }

    fn set_light(
        &self,
        room: Room,
        color: LightColor,
    ) -> impl Future<Output = Result<(), DriverError>> + Send {
        let mut log = self.inner.lock().unwrap();
        log.light_writes.push((room, color));
        drop(log);
        self.finish(Ok(()))
    }

    fn set_fans(&self, on: bool) -> impl Future<Output = Result<(), DriverError>> + Send {
        let mut log = self.inner.lock().unwrap();
        let result = if log.fans_failing {
            Err(DriverError::Actuator("fan driver fault".to_string()))
        } else {
            log.fan_writes.push(on);
            Ok(())
        };
        drop(log);
        self.finish(result)
    }

    fn play_pattern(
        &self,
        pattern: AlertPattern,
    ) -> impl Future<Output = Result<(), DriverError>> + Send {
        let mut log = self.inner.lock().unwrap();
        log.patterns.push(pattern);
        drop(log);
        self.finish(Ok(()))
    }
}

// ── In-memory rule store ───────────────────────────────────────────

#[derive(Default)]
struct StoreState {
    rules: Option<Vec<AutomationRule>>,
    saves: usize,
    load_failing: bool,
    save_failing: bool,
}

#[derive(Default)]
pub(crate) struct InMemoryRuleStore {
    inner: Mutex<StoreState>,
}

impl InMemoryRuleStore {
    pub(crate) fn seed(&self, rules: Vec<AutomationRule>) {
        self.inner.lock().unwrap().rules = Some(rules);
    }

    pub(crate) fn save_count(&self) -> usize {
        self.inner.lock().unwrap().saves
    }

    pub(crate) fn set_load_failing(&self, failing: bool) {
        self.inner.lock().unwrap().load_failing = failing;
    }

    pub(crate) fn set_save_failing(&self, failing: bool) {
        self.inner.lock().unwrap().save_failing = failing;
    }
}

impl RuleStore for InMemoryRuleStore {
    fn load(&self) -> impl Future<Output = Result<Option<Vec<AutomationRule>>, HavenError>> + Send {
        let state = self.inner.lock().unwrap();
        let result = if state.load_failing {
            let parse_error = serde_json::from_str::<Vec<AutomationRule>>("corrupt")
                .expect_err("invalid json must not parse");
            Err(ConfigError::Parse(parse_error).into())
        } else {
            Ok(state.rules.clone())
        };
        async move { result }
    }

    fn save(
        &self,
        rules: &[AutomationRule],
    ) -> impl Future<Output = Result<(), HavenError>> + Send {
        let mut state = self.inner.lock().unwrap();
        let result = if state.save_failing {
            Err(ConfigError::Io(std::io::Error::other("store unavailable")).into())
        } else {
            state.rules = Some(rules.to_vec());
            state.saves += 1;
            Ok(())
        };
        async move { result }
    }
}
