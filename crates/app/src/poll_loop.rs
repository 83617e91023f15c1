//! Poll loop — drives one controller tick per interval until shutdown.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use crate::controller::Controller;
use crate::ports::{ActuatorDriver, RuleStore, SensorDriver};

/// Run the tick loop until the shutdown signal flips to `true` (or its
/// sender is dropped).
///
/// Timers are cooperative: deferred actions are checked once per tick, so
/// their worst-case drift is one tick interval.
pub async fn run<S, A, R>(
    controller: Arc<Controller<S, A, R>>,
    tick_interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) where
    S: SensorDriver,
    A: ActuatorDriver,
    R: RuleStore,
{
    let mut interval = tokio::time::interval(tick_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tracing::info!(?tick_interval, "poll loop started");

    loop {
        tokio::select! {
            _ = interval.tick() => {
                controller.tick().await;
            }
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }

    tracing::info!("poll loop stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::make_controller;

    #[tokio::test]
    async fn should_tick_until_shutdown_signal() {
        let controller = Arc::new(make_controller());
        controller.sensors.set_climate(26.0, 50.0);

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let mut snapshots = controller.subscribe();

        let handle = tokio::spawn(run(
            Arc::clone(&controller),
            Duration::from_millis(5),
            shutdown_rx,
        ));

        // Wait for at least one published tick.
        snapshots.changed().await.unwrap();
        assert!(snapshots.borrow().fans_on());

        shutdown_tx.send(true).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn should_stop_when_shutdown_sender_is_dropped() {
        let controller = Arc::new(make_controller());
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let handle = tokio::spawn(run(
            Arc::clone(&controller),
            Duration::from_millis(5),
            shutdown_rx,
        ));

        drop(shutdown_tx);
        handle.await.unwrap();
    }
}
