//! # havend — haven daemon
//!
//! Composition root that wires the drivers and rule store into the
//! controller and runs the poll loop.
//!
//! ## Responsibilities
//! - Parse configuration (TOML file, env vars)
//! - Initialise logging
//! - Construct driver and store adapters
//! - Construct the controller, injecting adapters via port traits
//! - Load the persisted rule set (seeding defaults when absent)
//! - Spawn the poll loop and handle graceful shutdown (SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use std::sync::Arc;

use tokio::sync::watch;

use haven_adapter_rules_json::JsonRuleStore;
use haven_adapter_virtual::{VirtualActuators, VirtualSensors};
use haven_app::controller::Controller;
use haven_app::poll_loop;

use config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&config.logging.filter))
        .init();

    let controller = Arc::new(Controller::new(
        VirtualSensors::default(),
        VirtualActuators::default(),
        JsonRuleStore::new(&config.rules.path),
        config.engine_settings(),
    ));
    controller.load_rules().await;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let poll_handle = tokio::spawn(poll_loop::run(
        Arc::clone(&controller),
        config.tick_interval(),
        shutdown_rx,
    ));

    tracing::info!("havend running; press Ctrl-C to stop");
    tokio::signal::ctrl_c().await?;
    tracing::info!("shutdown requested");

    let _ = shutdown_tx.send(true);
    poll_handle.await?;

    Ok(())
}
