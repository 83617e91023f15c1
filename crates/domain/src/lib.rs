//! # haven-domain
//!
//! Pure domain model for the haven home coordination engine.
//!
//! ## Responsibilities
//! - Foundational types: rule identifiers, error conventions, timestamps
//! - Define the **rooms** the system monitors and their light colours
//! - Define the **system state** (sensor readings, device states, override
//!   flags, deferred-action deadlines) and its typed setters
//! - Define **automation rules** (condition → action) and the pure
//!   condition evaluator
//! - Define the **alert patterns** the buzzer can play
//! - Contain all invariant enforcement and domain logic
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod alert;
pub mod room;
pub mod rule;
pub mod state;
