//! Release actuator abstraction
//!
//! The parachute is released either by switching one of four relay channels
//! or by moving a servo between two PWM pulse widths. This module provides:
//! - `ReleaseType`: closed set of supported mechanisms, validated when the
//!   `CHUTE_TYPE` parameter is loaded
//! - `ReleaseActuator`: the hardware seam implemented by the firmware
//! - `MockActuator`: recording implementation for host tests
//!
//! # Design
//!
//! Actuator writes are fire-and-forget. A hardware fault is not reported
//! back through this interface; it is the output driver's job (or a health
//! monitor's) to detect it.

pub mod mock;

pub use mock::{ActuatorCommand, MockActuator};

use core::fmt;

use crate::parachute::ConfigError;

/// `CHUTE_TYPE` value selecting the servo release mechanism
pub const RELEASE_TYPE_SERVO: i32 = 10;

/// Number of relay channels available for release
pub const RELAY_CHANNEL_COUNT: u8 = 4;

/// Relay channel index (0..=3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RelayChannel(u8);

impl RelayChannel {
    pub const RELAY_0: Self = Self(0);
    pub const RELAY_1: Self = Self(1);
    pub const RELAY_2: Self = Self(2);
    pub const RELAY_3: Self = Self(3);

    /// Create a channel, rejecting indices past the last relay
    pub const fn new(index: u8) -> Result<Self, ConfigError> {
        if index < RELAY_CHANNEL_COUNT {
            Ok(Self(index))
        } else {
            Err(ConfigError::InvalidRelayChannel(index))
        }
    }

    /// Zero-based channel index
    pub const fn index(self) -> u8 {
        self.0
    }
}

impl fmt::Display for RelayChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "relay {}", self.0)
    }
}

/// Parachute release mechanism
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReleaseType {
    /// Switch a relay channel on while released
    Relay(RelayChannel),
    /// Move a servo to the "on" pulse width while released
    Servo,
}

impl ReleaseType {
    /// Decode a `CHUTE_TYPE` parameter value
    ///
    /// Accepted values: 0-3 (relay channel), 10 (servo). Anything else is a
    /// configuration error; unknown codes are never defaulted.
    pub fn from_param(value: i32) -> Result<Self, ConfigError> {
        match value {
            RELEASE_TYPE_SERVO => Ok(Self::Servo),
            0..=3 => Ok(Self::Relay(RelayChannel(value as u8))),
            other => Err(ConfigError::UnknownReleaseType(other)),
        }
    }

    /// Encode as a `CHUTE_TYPE` parameter value
    pub const fn to_param(self) -> i32 {
        match self {
            Self::Relay(channel) => channel.0 as i32,
            Self::Servo => RELEASE_TYPE_SERVO,
        }
    }
}

impl Default for ReleaseType {
    fn default() -> Self {
        Self::Relay(RelayChannel::RELAY_0)
    }
}

impl fmt::Display for ReleaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Relay(channel) => write!(f, "{}", channel),
            Self::Servo => write!(f, "servo"),
        }
    }
}

/// Output hardware driven by the parachute controller
///
/// The controller calls exactly one of these methods per transition,
/// depending on the configured `ReleaseType`, and never mixes them within a
/// release cycle.
pub trait ReleaseActuator {
    /// Switch a relay channel on (true) or off (false)
    fn set_relay(&mut self, channel: RelayChannel, on: bool);

    /// Command the release servo to a pulse width in microseconds
    fn set_servo_pulse(&mut self, pulse_us: u16);
}

impl<A: ReleaseActuator + ?Sized> ReleaseActuator for &mut A {
    fn set_relay(&mut self, channel: RelayChannel, on: bool) {
        (**self).set_relay(channel, on);
    }

    fn set_servo_pulse(&mut self, pulse_us: u16) {
        (**self).set_servo_pulse(pulse_us);
    }
}
