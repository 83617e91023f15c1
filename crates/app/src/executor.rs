//! Action executor — applies a rule's action to state and devices.
//!
//! Execution is permissive: anything that cannot be resolved (a `same`
//! light target without a room-scoped condition) is a logged no-op, and a
//! failed device write never aborts the remaining work of the tick.

use haven_domain::alert::AlertPattern;
use haven_domain::room::Room;
use haven_domain::rule::{
    Action, AlertCommand, Condition, DoorCommand, FanCommand, GarageCommand, LightCommand,
    LightTarget,
};
use haven_domain::state::{LightColor, OverrideTarget, SystemState};

use crate::controller::Controller;
use crate::ports::{ActuatorDriver, RuleStore, SensorDriver};

impl<S, A, R> Controller<S, A, R>
where
    S: SensorDriver,
    A: ActuatorDriver,
    R: RuleStore,
{
    /// Execute one action against the shared state.
    ///
    /// `condition` is the triggering rule's condition, used to resolve
    /// `same` light targets.
    pub(crate) async fn execute_action(
        &self,
        state: &mut SystemState,
        action: &Action,
        condition: Option<&Condition>,
    ) {
        match action {
            Action::Fan { command } => self.execute_fan(state, *command).await,
            Action::Light { command, location } => {
                self.execute_light(state, *command, *location, condition)
                    .await;
            }
            Action::Door { command } => self.execute_door(state, *command).await,
            Action::Garage { command } => self.execute_garage(state, *command).await,
            Action::Alert {
                command,
                alert_type,
            } => self.execute_alert(state, *command, *alert_type).await,
        }
    }

    /// Fans defer to the manual override: an overridden fan is untouched by
    /// rules until the override is released.
    async fn execute_fan(&self, state: &mut SystemState, command: FanCommand) {
        if state.is_overridden(OverrideTarget::Fans) {
            tracing::debug!("fan action skipped: manual override active");
            return;
        }
        let on = match command {
            FanCommand::On => true,
            FanCommand::Off => false,
            FanCommand::Toggle => !state.fans_on(),
        };
        self.apply_fans(state, on).await;
    }

    async fn execute_light(
        &self,
        state: &mut SystemState,
        command: LightCommand,
        location: LightTarget,
        condition: Option<&Condition>,
    ) {
        let rooms: Vec<Room> = match location {
            LightTarget::All => Room::ALL.to_vec(),
            LightTarget::Room(room) => vec![room],
            LightTarget::Same => {
                let rooms = condition
                    .map(|condition| condition.matching_rooms(state))
                    .unwrap_or_default();
                if rooms.is_empty() {
                    tracing::debug!("light target `same` resolves to no rooms; skipped");
                    return;
                }
                rooms
            }
        };

        for room in rooms {
            match command {
                // A rule-driven on/off wins visibly: it takes the room's
                // override so motion handling leaves the light alone until
                // the override is explicitly released.
                LightCommand::On => {
                    state.set_override(OverrideTarget::Light(room), true);
                    if !state.emergency_mode() {
                        self.apply_light(state, room, LightColor::White).await;
                    }
                }
                LightCommand::Off => {
                    state.set_override(OverrideTarget::Light(room), true);
                    if !state.emergency_mode() {
                        self.apply_light(state, room, LightColor::Off).await;
                    }
                }
                LightCommand::Auto => {
                    state.set_override(OverrideTarget::Light(room), false);
                    if !state.emergency_mode() {
                        let color = if state.motion(room) {
                            LightColor::White
                        } else {
                            LightColor::Off
                        };
                        self.apply_light(state, room, color).await;
                    }
                }
            }
        }
    }

    /// Door commands are unconditional: they drive the lock state machine
    /// directly, override or not.
    async fn execute_door(&self, state: &mut SystemState, command: DoorCommand) {
        match command {
            DoorCommand::Lock => self.apply_door_lock(state, true).await,
            DoorCommand::Unlock => self.apply_door_lock(state, false).await,
            DoorCommand::Auto => {
                state.set_override(OverrideTarget::Door, false);
                self.apply_door_lock(state, true).await;
            }
        }
    }

    /// `open`/`close` take the manual override first (an explicit win that
    /// also suspends auto-close); `auto` releases it and re-arms the timer
    /// if the garage is open.
    async fn execute_garage(&self, state: &mut SystemState, command: GarageCommand) {
        match command {
            GarageCommand::Open => {
                state.set_override(OverrideTarget::Garage, true);
                self.apply_garage(state, true).await;
            }
            GarageCommand::Close => {
                state.set_override(OverrideTarget::Garage, true);
                self.apply_garage(state, false).await;
            }
            GarageCommand::Auto => {
                state.set_override(OverrideTarget::Garage, false);
                if state.garage_open() {
                    let deadline = self.auto_close_deadline();
                    state.arm_garage_auto_close(deadline);
                }
            }
        }
    }

    async fn execute_alert(
        &self,
        state: &mut SystemState,
        command: AlertCommand,
        alert_type: Option<AlertPattern>,
    ) {
        match command {
            AlertCommand::Emergency => {
                let was_emergency = state.set_emergency(true);
                self.force_all_lights_red(state).await;
                // The siren fires on entry only; a rule that stays true
                // does not replay it every tick.
                if !was_emergency {
                    self.play(AlertPattern::Gas).await;
                }
            }
            AlertCommand::Sound => {
                self.play(alert_type.unwrap_or(AlertPattern::Welcome)).await;
            }
        }
    }
}
