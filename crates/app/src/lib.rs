//! # haven-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound
//!   ports): [`SensorDriver`](ports::SensorDriver),
//!   [`ActuatorDriver`](ports::ActuatorDriver),
//!   [`RuleStore`](ports::RuleStore)
//! - Provide the [`Controller`](controller::Controller): the single owner of
//!   the shared system state, serialising ticks, manual control,
//!   access-control entry points and rule CRUD through one critical section
//! - Provide **in-process infrastructure** (snapshot bus) that doesn't need
//!   IO
//! - Run the [`poll_loop`] that drives one tick per interval
//!
//! ## Dependency rule
//! Depends on `haven-domain` only (plus `tokio::sync`/`tokio::time` for
//! channels and timeouts). Never imports adapter crates. Adapters depend on
//! *this* crate, not the reverse.

pub mod controller;
pub mod poll_loop;
pub mod ports;
pub mod snapshot;

mod executor;
mod rules;
mod tick;

#[cfg(test)]
pub(crate) mod testing;
