//! # haven-adapter-virtual
//!
//! Virtual/demo drivers that simulate the sensor and actuator hardware for
//! testing and demonstration purposes.
//!
//! ## Provided drivers
//!
//! | Driver | Simulates | Behaviour |
//! |--------|-----------|-----------|
//! | [`VirtualSensors`] | PIR motion, DHT climate, MQ gas | Scriptable readings, optional failure injection |
//! | [`VirtualActuators`] | Door servo, garage servo, RGB lights, fans, buzzer | Records every write for inspection |
//!
//! ## Dependency rule
//!
//! Depends on `haven-app` (port traits) and `haven-domain` only.

mod actuators;
mod sensors;

pub use actuators::VirtualActuators;
pub use sensors::VirtualSensors;
