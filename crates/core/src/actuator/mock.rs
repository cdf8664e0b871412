//! Mock release actuator for testing

use heapless::Vec;

use super::{ReleaseActuator, RelayChannel, RELAY_CHANNEL_COUNT};

/// Maximum number of commands retained by `MockActuator`
pub const MOCK_COMMAND_CAPACITY: usize = 32;

/// A single command received by `MockActuator`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorCommand {
    /// `set_relay` call
    Relay { channel: RelayChannel, on: bool },
    /// `set_servo_pulse` call
    ServoPulse(u16),
}

/// Mock actuator implementation
///
/// Records every command in order and tracks the resulting relay/servo
/// output state for test verification. Commands past
/// `MOCK_COMMAND_CAPACITY` still update the output state but are not logged.
#[derive(Debug, Default)]
pub struct MockActuator {
    commands: Vec<ActuatorCommand, MOCK_COMMAND_CAPACITY>,
    relays: [bool; RELAY_CHANNEL_COUNT as usize],
    servo_pulse: Option<u16>,
}

impl MockActuator {
    /// Create a mock with all relays off and no servo output
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded commands, oldest first
    pub fn commands(&self) -> &[ActuatorCommand] {
        &self.commands
    }

    /// Number of `set_relay` calls
    pub fn relay_calls(&self) -> usize {
        self.commands
            .iter()
            .filter(|cmd| matches!(cmd, ActuatorCommand::Relay { .. }))
            .count()
    }

    /// Number of `set_servo_pulse` calls
    pub fn servo_calls(&self) -> usize {
        self.commands
            .iter()
            .filter(|cmd| matches!(cmd, ActuatorCommand::ServoPulse(_)))
            .count()
    }

    /// Current state of a relay channel
    pub fn relay_state(&self, channel: RelayChannel) -> bool {
        self.relays[channel.index() as usize]
    }

    /// Last commanded servo pulse width
    pub fn servo_pulse(&self) -> Option<u16> {
        self.servo_pulse
    }

    /// Forget recorded commands (output state is kept)
    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl ReleaseActuator for MockActuator {
    fn set_relay(&mut self, channel: RelayChannel, on: bool) {
        self.relays[channel.index() as usize] = on;
        self.commands
            .push(ActuatorCommand::Relay { channel, on })
            .ok();
    }

    fn set_servo_pulse(&mut self, pulse_us: u16) {
        self.servo_pulse = Some(pulse_us);
        self.commands.push(ActuatorCommand::ServoPulse(pulse_us)).ok();
    }
}
