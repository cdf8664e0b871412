//! Core traits for platform-agnostic parachute functionality.
//!
//! # Design
//!
//! - Trait definitions are pure and have no feature gates
//! - Mock implementations are always available for host testing
//! - Platform implementations live in the firmware that embeds this crate

pub mod time;

pub use time::{elapsed_ms, MockTime, TimeSource};
