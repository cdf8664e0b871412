//! Release state machine types

use core::fmt;

use crate::actuator::ReleaseType;

/// Parachute release state
///
/// ```text
///        request_release()            elapsed >= DELAY
///  Idle ------------------> Pending ------------------> Active
///   ^                          |                          |  |
///   |   enable(_) (aborted)    |                          |  | enable(false)
///   +--------------------------+                          |  v
///   |          elapsed >= DELAY + DURATION                |  Latched
///   +-----------------------------------------------------+    |
///   |                       retract()                          |
///   +----------------------------------------------------------+
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReleaseState {
    /// No release pending or in progress
    #[default]
    Idle,
    /// Warning delay running, actuator not yet moved
    Pending {
        /// Clock value when the release was requested (ms)
        requested_at_ms: u32,
    },
    /// Actuator released, waiting for the hold duration to elapse
    Active {
        /// Clock value when the release was requested (ms)
        requested_at_ms: u32,
        /// Mechanism that was commanded on (retracted with the same one)
        release_type: ReleaseType,
    },
    /// Actuator released but the cycle was abandoned by disabling;
    /// stays released until `retract()` is called
    Latched {
        /// Mechanism that was commanded on
        release_type: ReleaseType,
    },
}

impl ReleaseState {
    /// Clock value of the pending/active request, if any
    pub fn requested_at_ms(&self) -> Option<u32> {
        match self {
            Self::Pending { requested_at_ms } | Self::Active { requested_at_ms, .. } => {
                Some(*requested_at_ms)
            }
            Self::Idle | Self::Latched { .. } => None,
        }
    }

    /// True while the actuator is physically commanded to its released position
    pub fn is_actuator_engaged(&self) -> bool {
        matches!(self, Self::Active { .. } | Self::Latched { .. })
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

impl fmt::Display for ReleaseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Pending { .. } => write!(f, "Pending"),
            Self::Active { .. } => write!(f, "Active"),
            Self::Latched { .. } => write!(f, "Latched"),
        }
    }
}

/// Transition reported by the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReleaseEvent {
    /// Warning delay elapsed, actuator commanded on
    Engaged,
    /// Hold duration elapsed (or latched actuator retracted), actuator commanded off
    Retracted,
    /// Pending release dropped by `enable()` before the actuator moved
    Aborted,
}
