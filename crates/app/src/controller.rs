//! Controller — the single owner of the shared system state.
//!
//! Every mutation path (the poll-loop tick, manual control from the
//! external dashboard, the access-control collaborator, rule CRUD) goes
//! through one `tokio::sync::Mutex` held for the full span of the
//! operation. Read-only snapshot access bypasses the lock via the
//! [`SnapshotBus`].
//!
//! The door and garage state machines live here: actuators are driven and
//! transition sounds played only when the target differs from the current
//! state, so repeated rule firing never re-actuates a servo or replays a
//! sound.

use std::future::Future;
use std::time::Duration;

use tokio::sync::{Mutex, watch};

use haven_domain::alert::AlertPattern;
use haven_domain::error::DriverError;
use haven_domain::room::Room;
use haven_domain::rule::AutomationRule;
use haven_domain::state::{LightColor, OverrideTarget, SystemState};
use haven_domain::time::{Timestamp, now};

use crate::ports::{ActuatorDriver, RuleStore, SensorDriver};
use crate::snapshot::SnapshotBus;

/// Tunable engine parameters.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Delay before an automatically opened garage closes itself.
    pub garage_auto_close: Duration,
    /// Upper bound on any single driver call.
    pub driver_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            garage_auto_close: Duration::from_secs(120),
            driver_timeout: Duration::from_secs(1),
        }
    }
}

pub(crate) struct Inner {
    pub(crate) state: SystemState,
    pub(crate) rules: Vec<AutomationRule>,
}

/// The coordination engine.
pub struct Controller<S, A, R> {
    pub(crate) sensors: S,
    pub(crate) actuators: A,
    pub(crate) rule_store: R,
    pub(crate) settings: Settings,
    pub(crate) inner: Mutex<Inner>,
    pub(crate) snapshots: SnapshotBus,
}

impl<S, A, R> Controller<S, A, R>
where
    S: SensorDriver,
    A: ActuatorDriver,
    R: RuleStore,
{
    /// Create a controller with default state and the built-in rule set.
    ///
    /// Call [`load_rules`](Self::load_rules) afterwards to replace the
    /// built-in rules with the persisted ones.
    pub fn new(sensors: S, actuators: A, rule_store: R, settings: Settings) -> Self {
        let state = SystemState::new();
        let snapshots = SnapshotBus::new(state.clone());
        Self {
            sensors,
            actuators,
            rule_store,
            settings,
            inner: Mutex::new(Inner {
                state,
                rules: AutomationRule::defaults(),
            }),
            snapshots,
        }
    }

    /// The sensor driver, e.g. for scripting a virtual environment.
    pub fn sensors(&self) -> &S {
        &self.sensors
    }

    /// The actuator driver, e.g. for inspecting a virtual installation.
    pub fn actuators(&self) -> &A {
        &self.actuators
    }

    // ── Snapshots ──────────────────────────────────────────────────

    /// The most recently published state snapshot (lock-free).
    #[must_use]
    pub fn snapshot(&self) -> SystemState {
        self.snapshots.latest()
    }

    /// Subscribe to state snapshots, one per tick or mutation.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SystemState> {
        self.snapshots.subscribe()
    }

    // ── Manual-control surface ─────────────────────────────────────

    /// Set or release a manual override.
    ///
    /// Releasing the garage override while the garage is open re-arms the
    /// auto-close timer; engaging it cancels any pending deadline.
    /// Releasing an override never changes device state by itself —
    /// automatic control resumes on the next tick.
    pub async fn set_override(&self, target: OverrideTarget, active: bool) {
        let mut guard = self.inner.lock().await;
        guard.state.set_override(target, active);
        if target == OverrideTarget::Garage && !active && guard.state.garage_open() {
            let deadline = self.auto_close_deadline();
            guard.state.arm_garage_auto_close(deadline);
        }
        self.snapshots.publish(guard.state.clone());
    }

    /// Manually switch the fans, taking the fan override.
    pub async fn set_fan(&self, on: bool) {
        let mut guard = self.inner.lock().await;
        guard.state.set_override(OverrideTarget::Fans, true);
        self.apply_fans(&mut guard.state, on).await;
        self.snapshots.publish(guard.state.clone());
    }

    /// Return the fans to automatic (rule-driven) control.
    pub async fn fan_auto(&self) {
        self.set_override(OverrideTarget::Fans, false).await;
    }

    /// Manually switch a room light, taking that room's light override.
    ///
    /// While emergency mode holds, the alert colour stays in place; the
    /// override is still recorded.
    pub async fn set_light(&self, room: Room, on: bool) {
        let mut guard = self.inner.lock().await;
        guard.state.set_override(OverrideTarget::Light(room), true);
        if !guard.state.emergency_mode() {
            let color = if on { LightColor::White } else { LightColor::Off };
            self.apply_light(&mut guard.state, room, color).await;
        }
        self.snapshots.publish(guard.state.clone());
    }

    /// Return a room light to motion-based control, re-deriving its colour
    /// immediately.
    pub async fn light_auto(&self, room: Room) {
        let mut guard = self.inner.lock().await;
        guard.state.set_override(OverrideTarget::Light(room), false);
        if !guard.state.emergency_mode() {
            let color = if guard.state.motion(room) {
                LightColor::White
            } else {
                LightColor::Off
            };
            self.apply_light(&mut guard.state, room, color).await;
        }
        self.snapshots.publish(guard.state.clone());
    }

    /// Manually drive the door lock, taking the door override.
    pub async fn set_door(&self, locked: bool) {
        let mut guard = self.inner.lock().await;
        guard.state.set_override(OverrideTarget::Door, true);
        self.apply_door_lock(&mut guard.state, locked).await;
        self.snapshots.publish(guard.state.clone());
    }

    /// Return the door to automatic control. Defaults to locked.
    pub async fn door_auto(&self) {
        let mut guard = self.inner.lock().await;
        guard.state.set_override(OverrideTarget::Door, false);
        self.apply_door_lock(&mut guard.state, true).await;
        self.snapshots.publish(guard.state.clone());
    }

    /// Manually drive the garage door, taking the garage override.
    ///
    /// Manual control suspends the auto-close timer until the override is
    /// released again.
    pub async fn set_garage(&self, open: bool) {
        let mut guard = self.inner.lock().await;
        guard.state.set_override(OverrideTarget::Garage, true);
        self.apply_garage(&mut guard.state, open).await;
        self.snapshots.publish(guard.state.clone());
    }

    /// Return the garage to automatic control, re-arming auto-close if the
    /// door is currently open.
    pub async fn garage_auto(&self) {
        self.set_override(OverrideTarget::Garage, false).await;
    }

    // ── Access-control entry points ────────────────────────────────

    /// Unlock the door for `duration`, then relock on a later tick.
    ///
    /// Called by the face-recognition subsystem after a successful match.
    /// Uses the same state machine as rule-driven unlocks: unlocking an
    /// already-unlocked door is a silent no-op (the relock deadline is
    /// still extended).
    pub async fn request_door_unlock(&self, duration: Duration) {
        let mut guard = self.inner.lock().await;
        self.apply_door_lock(&mut guard.state, false).await;
        let deadline = now() + to_chrono(duration);
        guard.state.arm_door_relock(deadline);
        tracing::info!(?duration, "door unlocked for access control");
        self.snapshots.publish(guard.state.clone());
    }

    /// Fingerprint-style garage trigger.
    ///
    /// Opens the garage only when it is closed and not under manual
    /// override, playing the welcome pattern first. Because the override is
    /// not taken, the auto-close timer arms as for any automatic open.
    /// Returns whether the garage was opened.
    pub async fn request_garage_open(&self) -> bool {
        let mut guard = self.inner.lock().await;
        if guard.state.garage_open() || guard.state.is_overridden(OverrideTarget::Garage) {
            return false;
        }
        tracing::info!("fingerprint trigger accepted; opening garage");
        self.play(AlertPattern::Welcome).await;
        self.apply_garage(&mut guard.state, true).await;
        let opened = guard.state.garage_open();
        self.snapshots.publish(guard.state.clone());
        opened
    }

    // ── Device state machines ──────────────────────────────────────

    /// Drive the door lock to `locked`. No actuator call and no sound when
    /// the door is already in that state.
    pub(crate) async fn apply_door_lock(&self, state: &mut SystemState, locked: bool) {
        if state.door_locked() == locked {
            return;
        }
        if let Err(err) = self.drive(self.actuators.set_door_lock(locked)).await {
            tracing::warn!(error = %err, locked, "door lock actuation failed");
            return;
        }
        state.set_door_locked(locked);
        let pattern = if locked {
            AlertPattern::DoorClose
        } else {
            AlertPattern::DoorOpen
        };
        self.play(pattern).await;
        tracing::info!(locked, "door lock changed");
    }

    /// Drive the garage to `open`. Transition-only, like the door.
    ///
    /// Opening arms the auto-close deadline unless the garage override is
    /// active; closing always clears it.
    pub(crate) async fn apply_garage(&self, state: &mut SystemState, open: bool) {
        if state.garage_open() == open {
            return;
        }
        if let Err(err) = self.drive(self.actuators.set_garage(open)).await {
            tracing::warn!(error = %err, open, "garage actuation failed");
            return;
        }
        state.set_garage_open(open);
        if open {
            let deadline = self.auto_close_deadline();
            state.arm_garage_auto_close(deadline);
            self.play(AlertPattern::DoorOpen).await;
        } else {
            self.play(AlertPattern::DoorClose).await;
        }
        tracing::info!(open, "garage door changed");
    }

    /// Drive the fans. Skips the actuator when already in the target state.
    pub(crate) async fn apply_fans(&self, state: &mut SystemState, on: bool) {
        if state.fans_on() == on {
            return;
        }
        if let Err(err) = self.drive(self.actuators.set_fans(on)).await {
            tracing::warn!(error = %err, on, "fan actuation failed");
            return;
        }
        state.set_fans(on);
        tracing::debug!(on, "fans changed");
    }

    /// Drive a room light. Skips the actuator when the colour is unchanged.
    pub(crate) async fn apply_light(&self, state: &mut SystemState, room: Room, color: LightColor) {
        if state.light(room) == color {
            return;
        }
        if let Err(err) = self.drive(self.actuators.set_light(room, color)).await {
            tracing::warn!(error = %err, %room, %color, "light actuation failed");
            return;
        }
        state.set_light(room, color);
    }

    /// Force every room light to the alert colour, ignoring overrides.
    pub(crate) async fn force_all_lights_red(&self, state: &mut SystemState) {
        for room in Room::ALL {
            self.apply_light(state, room, LightColor::Red).await;
        }
    }

    /// Re-derive non-overridden room lights from current motion.
    /// Does nothing while emergency mode holds.
    pub(crate) async fn recompute_lights(&self, state: &mut SystemState) {
        if state.emergency_mode() {
            return;
        }
        for room in Room::ALL {
            if state.is_overridden(OverrideTarget::Light(room)) {
                continue;
            }
            let color = if state.motion(room) {
                LightColor::White
            } else {
                LightColor::Off
            };
            self.apply_light(state, room, color).await;
        }
    }

    /// Play a buzzer pattern, logging failures.
    pub(crate) async fn play(&self, pattern: AlertPattern) {
        if let Err(err) = self.drive(self.actuators.play_pattern(pattern)).await {
            tracing::warn!(error = %err, %pattern, "buzzer actuation failed");
        }
    }

    // ── Helpers ────────────────────────────────────────────────────

    /// Bound a driver call by the configured timeout.
    pub(crate) async fn drive<T>(
        &self,
        call: impl Future<Output = Result<T, DriverError>> + Send,
    ) -> Result<T, DriverError> {
        match tokio::time::timeout(self.settings.driver_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(DriverError::Timeout(self.settings.driver_timeout)),
        }
    }

    pub(crate) fn auto_close_deadline(&self) -> Timestamp {
        now() + to_chrono(self.settings.garage_auto_close)
    }
}

fn to_chrono(duration: Duration) -> chrono::Duration {
    chrono::Duration::from_std(duration).unwrap_or_default()
}
