//! One poll-loop tick: sensor ingest → emergency check → lighting →
//! rule sweep → timers → snapshot publish.
//!
//! The whole tick runs under the controller's mutex, so manual-control
//! requests and rule CRUD serialise against it. Sensor read failures hold
//! the last known value; nothing in a tick is fatal.

use haven_domain::alert::AlertPattern;
use haven_domain::room::Room;
use haven_domain::state::SystemState;
use haven_domain::time::now;

use crate::controller::Controller;
use crate::ports::{ActuatorDriver, RuleStore, SensorDriver};

impl<S, A, R> Controller<S, A, R>
where
    S: SensorDriver,
    A: ActuatorDriver,
    R: RuleStore,
{
    /// Run one full tick.
    pub async fn tick(&self) {
        let mut guard = self.inner.lock().await;
        let inner = &mut *guard;

        self.ingest_sensors(&mut inner.state).await;
        self.recompute_lights(&mut inner.state).await;

        // Rules run sequentially in registration order; a later rule sees
        // (and may overwrite) the effects of an earlier one.
        let time_of_day = chrono::Local::now().time();
        let active: Vec<_> = inner.rules.iter().filter(|rule| rule.active).cloned().collect();
        for rule in &active {
            if rule.condition.evaluate(&inner.state, time_of_day) {
                tracing::debug!(rule = %rule.name, condition = %rule.condition, "rule fired");
                self.execute_action(&mut inner.state, &rule.action, Some(&rule.condition))
                    .await;
            }
        }

        self.check_timers(&mut inner.state).await;
        self.snapshots.publish(inner.state.clone());
    }

    /// Read all sensors into the state store, holding last known values on
    /// failure, and run the edge-triggered gas handling.
    async fn ingest_sensors(&self, state: &mut SystemState) {
        for room in Room::ALL {
            match self.drive(self.sensors.read_motion(room)).await {
                Ok(detected) => {
                    state.set_motion(room, detected);
                }
                Err(err) => {
                    tracing::warn!(%room, error = %err, "motion read failed; keeping last value");
                }
            }
        }

        match self.drive(self.sensors.read_climate()).await {
            Ok(reading) => {
                state.set_temperature(reading.temperature);
                state.set_humidity(reading.humidity);
            }
            Err(err) => {
                tracing::warn!(error = %err, "climate read failed; keeping last values");
            }
        }

        match self.drive(self.sensors.read_gas()).await {
            Ok(reading) => self.handle_gas(state, reading.detected).await,
            Err(err) => {
                tracing::warn!(error = %err, "gas read failed; keeping last value");
            }
        }
    }

    /// Edge-triggered emergency controller.
    ///
    /// The siren fires exactly once per clear→detected transition;
    /// re-ingesting `detected` while already in emergency mode keeps the
    /// lights red without replaying the sound. The detected→clear edge
    /// drops emergency mode and re-derives lighting from current motion.
    async fn handle_gas(&self, state: &mut SystemState, detected: bool) {
        let previous = state.set_gas(detected);
        if detected {
            if !previous {
                tracing::warn!("gas detected; entering emergency mode");
                self.play(AlertPattern::Gas).await;
            }
            state.set_emergency(true);
            self.force_all_lights_red(state).await;
        } else if state.emergency_mode() {
            tracing::info!("gas cleared; leaving emergency mode");
            state.set_emergency(false);
            self.recompute_lights(state).await;
        }
    }

    /// Fire any due deferred actions. Deadlines are fire-once: the check
    /// clears them, so a failed actuation is not retried next tick.
    async fn check_timers(&self, state: &mut SystemState) {
        let now = now();
        if state.garage_auto_close_due(now) {
            tracing::info!("garage auto-close deadline reached");
            self.apply_garage(state, false).await;
        }
        if state.door_relock_due(now) {
            tracing::info!("door relock deadline reached");
            self.apply_door_lock(state, true).await;
        }
    }
}
