//! parachute_core - Parachute release sequencing for autonomous vehicles
//!
//! This crate contains the platform-agnostic release state machine and its
//! configuration, testable on host without any embedded dependencies.
//!
//! # Design Principles
//!
//! - **Pure no_std**: No std library dependencies, no allocation
//! - **Trait abstractions**: Clock, actuator and notification output are
//!   injected via traits
//! - **Validated configuration**: Bad parameters are rejected when loaded,
//!   never inside the update loop
//!
//! # Modules
//!
//! - [`traits`]: Platform-agnostic trait abstractions (TimeSource)
//! - [`actuator`]: Relay/servo release mechanism abstraction
//! - [`notify`]: Release-active status output
//! - [`parameters`]: Parameter store and the `CHUTE_` parameter group
//! - [`parachute`]: Release controller, configuration and state types
//!
//! # Example
//!
//! ```
//! use parachute_core::actuator::{MockActuator, ReleaseType};
//! use parachute_core::notify::MockNotifier;
//! use parachute_core::parachute::{Parachute, ParachuteConfig, ReleaseEvent};
//! use parachute_core::traits::MockTime;
//!
//! let time = MockTime::new();
//! let config = ParachuteConfig {
//!     release_type: ReleaseType::Servo,
//!     ..ParachuteConfig::default()
//! };
//! let mut chute = Parachute::new(config, MockActuator::new(), MockNotifier::new(), &time)?;
//!
//! chute.request_release();
//! assert_eq!(chute.tick(500), Some(ReleaseEvent::Engaged));
//! assert_eq!(chute.actuator().servo_pulse(), Some(1300));
//! # Ok::<(), parachute_core::parachute::ConfigError>(())
//! ```

#![no_std]

#[cfg(test)]
extern crate std;

pub mod logging;

pub mod actuator;
pub mod notify;
pub mod parachute;
pub mod parameters;
pub mod traits;
