//! Parachute release controller
//!
//! Sequences a parachute release once the flight-check layer has decided to
//! deploy:
//! - **Pending**: mandatory warning delay (`RELEASE_DELAY_MS`) before the
//!   actuator moves
//! - **Active**: actuator held released for `RELEASE_DURATION_MS`
//! - back to **Idle**: actuator returned to its off position/value
//!
//! All transitions happen in [`Parachute::tick`], which is level-triggered on
//! elapsed time and should be called at about 10 Hz. Calling it late delays
//! transitions but never skips or repeats one.
//!
//! Whether to deploy (attitude, sink rate, free fall, altitude window) is not
//! decided here. The thresholds are carried in [`ParachuteConfig`] and exposed
//! through accessors for that layer.

pub mod config;
pub mod state;

pub use config::{ConfigError, ParachuteConfig, ParamRange};
pub use state::{ReleaseEvent, ReleaseState};

use crate::actuator::{ReleaseActuator, ReleaseType};
use crate::notify::NotificationSink;
use crate::traits::{elapsed_ms, TimeSource};
use crate::{log_debug, log_info, log_warn};

/// Delay between `request_release()` and actuator movement (ms)
pub const RELEASE_DELAY_MS: u32 = 500;

/// Time the actuator stays released before returning to off (ms)
pub const RELEASE_DURATION_MS: u32 = 1000;

/// Time from request to actuator returning to off (ms)
const RELEASE_COMPLETE_MS: u32 = RELEASE_DELAY_MS + RELEASE_DURATION_MS;

/// Nominal rate for calling [`Parachute::tick`]
pub const UPDATE_RATE_HZ: u32 = 10;

/// Parachute release controller
///
/// # Type Parameters
///
/// * `A` - Relay/servo output driver
/// * `N` - Receiver of the release-active status
/// * `T` - Millisecond clock used to timestamp release requests
pub struct Parachute<A, N, T>
where
    A: ReleaseActuator,
    N: NotificationSink,
    T: TimeSource,
{
    config: ParachuteConfig,
    state: ReleaseState,
    actuator: A,
    notifier: N,
    time: T,
}

impl<A, N, T> Parachute<A, N, T>
where
    A: ReleaseActuator,
    N: NotificationSink,
    T: TimeSource,
{
    /// Create a controller in the `Idle` state
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found in `config`.
    pub fn new(
        config: ParachuteConfig,
        actuator: A,
        notifier: N,
        time: T,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            state: ReleaseState::Idle,
            actuator,
            notifier,
            time,
        })
    }

    /// Enable or disable parachute release
    ///
    /// Any call drops a pending release (reported as
    /// `Some(ReleaseEvent::Aborted)`), so re-enabling always needs a fresh
    /// `request_release()`. Disabling while the actuator is released does not
    /// retract it: the controller enters `Latched` and the actuator stays
    /// released until [`retract`](Self::retract) is called.
    pub fn enable(&mut self, on: bool) -> Option<ReleaseEvent> {
        self.config.enabled = on;

        match self.state {
            ReleaseState::Pending { .. } => {
                self.state = ReleaseState::Idle;
                log_warn!("Parachute: pending release aborted");
                Some(ReleaseEvent::Aborted)
            }
            ReleaseState::Active { release_type, .. } if !on => {
                self.state = ReleaseState::Latched { release_type };
                log_warn!(
                    "Parachute: disabled while released, {} left engaged",
                    release_type
                );
                None
            }
            _ => None,
        }
    }

    /// Returns true if parachute release is enabled
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Request a parachute release
    ///
    /// Records the request time; the actuator moves on the first `tick()`
    /// at least `RELEASE_DELAY_MS` later. Ignored when disabled, and ignored
    /// while a release is already pending or in progress so repeated
    /// requests never restart the delay.
    pub fn request_release(&mut self) {
        if !self.config.enabled {
            log_debug!("Parachute: release ignored, disabled");
            return;
        }

        if !self.state.is_idle() {
            return;
        }

        let now = self.time.now_ms();
        self.state = ReleaseState::Pending {
            requested_at_ms: now,
        };
        log_info!(
            "Parachute: release requested, {} in {} ms",
            self.config.release_type,
            RELEASE_DELAY_MS
        );
    }

    /// Advance the release sequence to `now_ms`
    ///
    /// Returns the transition performed by this call, if any.
    pub fn tick(&mut self, now_ms: u32) -> Option<ReleaseEvent> {
        let config = self.config;
        if !config.enabled {
            return None;
        }

        match self.state {
            ReleaseState::Pending { requested_at_ms }
                if elapsed_ms(now_ms, requested_at_ms) >= RELEASE_DELAY_MS =>
            {
                let release_type = config.release_type;
                self.command(release_type, true);
                self.notifier.set_release_active(true);
                self.state = ReleaseState::Active {
                    requested_at_ms,
                    release_type,
                };
                log_info!("Parachute: released ({})", release_type);
                Some(ReleaseEvent::Engaged)
            }
            ReleaseState::Active {
                requested_at_ms,
                release_type,
            } if elapsed_ms(now_ms, requested_at_ms) >= RELEASE_COMPLETE_MS => {
                self.command(release_type, false);
                self.notifier.set_release_active(false);
                self.state = ReleaseState::Idle;
                log_info!("Parachute: {} returned to off", release_type);
                Some(ReleaseEvent::Retracted)
            }
            _ => None,
        }
    }

    /// Advance the release sequence using the injected clock
    pub fn update(&mut self) -> Option<ReleaseEvent> {
        let now = self.time.now_ms();
        self.tick(now)
    }

    /// Return a latched actuator to its off position/value
    ///
    /// Only acts in the `Latched` state; a timed release cycle always runs to
    /// completion on its own. Returns true if the actuator was retracted.
    pub fn retract(&mut self) -> bool {
        let ReleaseState::Latched { release_type } = self.state else {
            return false;
        };

        self.command(release_type, false);
        self.notifier.set_release_active(false);
        self.state = ReleaseState::Idle;
        log_info!("Parachute: latched {} retracted", release_type);
        true
    }

    /// Drive the actuator selected for this cycle
    fn command(&mut self, release_type: ReleaseType, on: bool) {
        match release_type {
            ReleaseType::Relay(channel) => self.actuator.set_relay(channel, on),
            ReleaseType::Servo => {
                let pulse_us = if on {
                    self.config.servo_on_pwm
                } else {
                    self.config.servo_off_pwm
                };
                self.actuator.set_servo_pulse(pulse_us);
            }
        }
    }

    /// Current release state
    pub fn state(&self) -> ReleaseState {
        self.state
    }

    /// Returns true while the actuator is released
    pub fn released(&self) -> bool {
        self.state.is_actuator_engaged()
    }

    /// Clock value of the pending/active release request, if any
    pub fn release_requested_at(&self) -> Option<u32> {
        self.state.requested_at_ms()
    }

    pub fn config(&self) -> &ParachuteConfig {
        &self.config
    }

    /// Replace the configuration between updates
    ///
    /// An in-progress cycle keeps its request time and is retracted through
    /// the mechanism it was released with. A change of `enabled` is applied
    /// through [`enable`](Self::enable), whose result is returned.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] in `config`; the current
    /// configuration is kept.
    pub fn set_config(
        &mut self,
        config: ParachuteConfig,
    ) -> Result<Option<ReleaseEvent>, ConfigError> {
        config.validate()?;

        let enabled_changed = config.enabled != self.config.enabled;
        self.config = config;
        if enabled_changed {
            return Ok(self.enable(config.enabled));
        }
        Ok(None)
    }

    /// Min altitude above home before release (m), 0 = check disabled
    pub fn alt_min(&self) -> i16 {
        self.config.alt_min
    }

    /// Pitch/roll threshold (deg)
    pub fn pitchroll_thres(&self) -> i8 {
        self.config.pitchroll_thres
    }

    /// Free-fall acceleration threshold (m/s²)
    pub fn freefall_thres(&self) -> i8 {
        self.config.freefall_thres
    }

    /// Climb/descent rate threshold (m/s)
    pub fn hdot_thres(&self) -> i8 {
        self.config.hdot_thres
    }

    /// Maximum allowed altitude (m)
    pub fn alt_max_thres(&self) -> i16 {
        self.config.alt_max_thres
    }

    /// Abnormal-flight duration threshold (ms)
    pub fn duration_thres(&self) -> i16 {
        self.config.duration_thres
    }

    /// Output driver (for diagnostics and tests)
    pub fn actuator(&self) -> &A {
        &self.actuator
    }

    /// Notification sink (for diagnostics and tests)
    pub fn notifier(&self) -> &N {
        &self.notifier
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actuator::{ActuatorCommand, MockActuator, RelayChannel};
    use crate::notify::MockNotifier;
    use crate::traits::MockTime;

    type TestParachute<'a> = Parachute<MockActuator, MockNotifier, &'a MockTime>;

    fn servo_config() -> ParachuteConfig {
        ParachuteConfig {
            release_type: ReleaseType::Servo,
            ..ParachuteConfig::default()
        }
    }

    fn relay_config(channel: RelayChannel) -> ParachuteConfig {
        ParachuteConfig {
            release_type: ReleaseType::Relay(channel),
            ..ParachuteConfig::default()
        }
    }

    fn controller(config: ParachuteConfig, time: &MockTime) -> TestParachute<'_> {
        Parachute::new(config, MockActuator::new(), MockNotifier::new(), time).unwrap()
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let time = MockTime::new();
        let config = ParachuteConfig {
            servo_off_pwm: 0,
            ..servo_config()
        };
        let result = Parachute::new(config, MockActuator::new(), MockNotifier::new(), &time);
        assert!(matches!(result, Err(ConfigError::OutOfRange { .. })));
    }

    #[test]
    fn test_request_records_clock_time() {
        let time = MockTime::with_initial(12_345);
        let mut chute = controller(servo_config(), &time);

        assert_eq!(chute.release_requested_at(), None);
        chute.request_release();
        assert_eq!(chute.release_requested_at(), Some(12_345));
        assert_eq!(
            chute.state(),
            ReleaseState::Pending {
                requested_at_ms: 12_345
            }
        );
    }

    #[test]
    fn test_request_at_time_zero_is_recorded() {
        let time = MockTime::new();
        let mut chute = controller(servo_config(), &time);

        chute.request_release();
        assert_eq!(chute.release_requested_at(), Some(0));
    }

    #[test]
    fn test_servo_cycle_timing() {
        let time = MockTime::new();
        let mut chute = controller(servo_config(), &time);
        chute.request_release();

        assert_eq!(chute.tick(499), None);
        assert!(!chute.released());

        assert_eq!(chute.tick(500), Some(ReleaseEvent::Engaged));
        assert!(chute.released());
        assert_eq!(chute.actuator().servo_pulse(), Some(1300));
        assert_eq!(chute.notifier().toggles(), &[true]);

        assert_eq!(chute.tick(1499), None);
        assert!(chute.released());

        assert_eq!(chute.tick(1500), Some(ReleaseEvent::Retracted));
        assert!(!chute.released());
        assert_eq!(chute.release_requested_at(), None);
        assert_eq!(chute.actuator().servo_pulse(), Some(1100));
        assert_eq!(chute.notifier().toggles(), &[true, false]);
        assert_eq!(chute.actuator().relay_calls(), 0);
    }

    #[test]
    fn test_relay_cycle_uses_selected_channel() {
        let time = MockTime::new();
        let mut chute = controller(relay_config(RelayChannel::RELAY_2), &time);
        chute.request_release();

        chute.tick(500);
        assert!(chute.actuator().relay_state(RelayChannel::RELAY_2));
        assert!(!chute.actuator().relay_state(RelayChannel::RELAY_0));

        chute.tick(1500);
        assert_eq!(
            chute.actuator().commands(),
            &[
                ActuatorCommand::Relay {
                    channel: RelayChannel::RELAY_2,
                    on: true
                },
                ActuatorCommand::Relay {
                    channel: RelayChannel::RELAY_2,
                    on: false
                },
            ]
        );
        assert_eq!(chute.actuator().servo_calls(), 0);
    }

    #[test]
    fn test_disabled_request_ignored() {
        let time = MockTime::new();
        let mut chute = controller(
            ParachuteConfig {
                enabled: false,
                ..servo_config()
            },
            &time,
        );

        chute.request_release();
        assert_eq!(chute.state(), ReleaseState::Idle);
        for t in (0..=3000).step_by(100) {
            assert_eq!(chute.tick(t), None);
        }
        assert!(chute.actuator().commands().is_empty());
        assert!(chute.notifier().toggles().is_empty());
    }

    #[test]
    fn test_repeated_requests_keep_first_timestamp() {
        let time = MockTime::with_initial(1_000);
        let mut chute = controller(servo_config(), &time);

        chute.request_release();
        time.advance(300);
        chute.request_release();
        assert_eq!(chute.release_requested_at(), Some(1_000));

        // Delay still measured from the first request
        assert_eq!(chute.tick(1_500), Some(ReleaseEvent::Engaged));

        time.set(1_600);
        chute.request_release();
        assert_eq!(chute.release_requested_at(), Some(1_000));
        assert_eq!(chute.tick(2_500), Some(ReleaseEvent::Retracted));
        assert_eq!(chute.actuator().servo_calls(), 2);
    }

    #[test]
    fn test_late_tick_still_steps_through_active() {
        let time = MockTime::new();
        let mut chute = controller(servo_config(), &time);
        chute.request_release();

        // First tick arrives after the whole cycle should have finished
        assert_eq!(chute.tick(5_000), Some(ReleaseEvent::Engaged));
        assert_eq!(chute.tick(5_000), Some(ReleaseEvent::Retracted));
        assert_eq!(chute.tick(5_100), None);
    }

    #[test]
    fn test_disable_while_pending_aborts() {
        let time = MockTime::new();
        let mut chute = controller(servo_config(), &time);
        chute.request_release();

        assert_eq!(chute.enable(false), Some(ReleaseEvent::Aborted));
        assert_eq!(chute.release_requested_at(), None);

        assert_eq!(chute.enable(true), None);
        for t in (0..=3000).step_by(100) {
            assert_eq!(chute.tick(t), None);
        }
        assert!(chute.actuator().commands().is_empty());
    }

    #[test]
    fn test_enable_true_while_pending_also_aborts() {
        let time = MockTime::new();
        let mut chute = controller(servo_config(), &time);
        chute.request_release();

        assert_eq!(chute.enable(true), Some(ReleaseEvent::Aborted));
        assert_eq!(chute.tick(600), None);
        assert!(chute.is_enabled());
    }

    #[test]
    fn test_disable_while_active_latches() {
        let time = MockTime::new();
        let mut chute = controller(relay_config(RelayChannel::RELAY_1), &time);
        chute.request_release();
        chute.tick(500);

        assert_eq!(chute.enable(false), None);
        assert_eq!(
            chute.state(),
            ReleaseState::Latched {
                release_type: ReleaseType::Relay(RelayChannel::RELAY_1)
            }
        );
        assert_eq!(chute.release_requested_at(), None);
        assert!(chute.released());

        // Never auto-retracted, even once re-enabled
        chute.enable(true);
        for t in (600..=10_000).step_by(100) {
            assert_eq!(chute.tick(t), None);
        }
        assert!(chute.actuator().relay_state(RelayChannel::RELAY_1));
        assert!(chute.notifier().is_active());

        // A new request cannot restart the cycle on a released actuator
        chute.request_release();
        assert!(matches!(chute.state(), ReleaseState::Latched { .. }));
    }

    #[test]
    fn test_retract_latched_actuator() {
        let time = MockTime::new();
        let mut chute = controller(servo_config(), &time);
        assert!(!chute.retract());

        chute.request_release();
        chute.tick(500);
        assert!(!chute.retract());

        chute.enable(false);
        assert!(chute.retract());
        assert_eq!(chute.state(), ReleaseState::Idle);
        assert_eq!(chute.actuator().servo_pulse(), Some(1100));
        assert_eq!(chute.notifier().toggles(), &[true, false]);
        assert!(!chute.retract());
    }

    #[test]
    fn test_update_reads_clock() {
        let time = MockTime::new();
        let mut chute = controller(servo_config(), &time);
        chute.request_release();

        time.set(400);
        assert_eq!(chute.update(), None);
        time.set(500);
        assert_eq!(chute.update(), Some(ReleaseEvent::Engaged));
        time.set(1_500);
        assert_eq!(chute.update(), Some(ReleaseEvent::Retracted));
    }

    #[test]
    fn test_cycle_across_clock_wrap() {
        let start = u32::MAX - 199;
        let time = MockTime::with_initial(start);
        let mut chute = controller(servo_config(), &time);
        chute.request_release();

        assert_eq!(chute.tick(start.wrapping_add(400)), None);
        assert_eq!(
            chute.tick(start.wrapping_add(500)),
            Some(ReleaseEvent::Engaged)
        );
        assert_eq!(chute.tick(start.wrapping_add(1_499)), None);
        assert_eq!(
            chute.tick(start.wrapping_add(1_500)),
            Some(ReleaseEvent::Retracted)
        );
    }

    #[test]
    fn test_set_config_mid_cycle_retracts_original_actuator() {
        let time = MockTime::new();
        let mut chute = controller(relay_config(RelayChannel::RELAY_3), &time);
        chute.request_release();
        chute.tick(500);

        let updated = ParachuteConfig {
            pitchroll_thres: 30,
            ..servo_config()
        };
        assert_eq!(chute.set_config(updated), Ok(None));
        assert_eq!(chute.release_requested_at(), Some(0));
        assert_eq!(chute.pitchroll_thres(), 30);

        chute.tick(1_500);
        assert!(!chute.actuator().relay_state(RelayChannel::RELAY_3));
        assert_eq!(chute.actuator().servo_calls(), 0);
    }

    #[test]
    fn test_set_config_mid_cycle_uses_current_servo_off_pulse() {
        let time = MockTime::new();
        let mut chute = controller(servo_config(), &time);
        chute.request_release();
        assert_eq!(chute.tick(500), Some(ReleaseEvent::Engaged));

        let updated = ParachuteConfig {
            servo_off_pwm: 1000,
            ..servo_config()
        };
        assert_eq!(chute.set_config(updated), Ok(None));

        assert_eq!(chute.tick(1_500), Some(ReleaseEvent::Retracted));
        assert_eq!(
            chute.actuator().commands(),
            &[
                ActuatorCommand::ServoPulse(1300),
                ActuatorCommand::ServoPulse(1000)
            ]
        );
    }

    #[test]
    fn test_set_config_rejects_invalid_and_keeps_current() {
        let time = MockTime::new();
        let mut chute = controller(servo_config(), &time);
        let bad = ParachuteConfig {
            hdot_thres: 100,
            ..servo_config()
        };
        assert!(chute.set_config(bad).is_err());
        assert_eq!(chute.config(), &servo_config());
    }

    #[test]
    fn test_set_config_disable_routes_through_enable() {
        let time = MockTime::new();
        let mut chute = controller(servo_config(), &time);
        chute.request_release();

        let disabled = ParachuteConfig {
            enabled: false,
            ..servo_config()
        };
        assert_eq!(
            chute.set_config(disabled),
            Ok(Some(ReleaseEvent::Aborted))
        );
        assert!(!chute.is_enabled());
        assert_eq!(chute.state(), ReleaseState::Idle);
    }

    #[test]
    fn test_threshold_accessors() {
        let time = MockTime::new();
        let config = ParachuteConfig {
            alt_min: 15,
            pitchroll_thres: 45,
            freefall_thres: 7,
            hdot_thres: 12,
            alt_max_thres: 400,
            duration_thres: 2_000,
            ..ParachuteConfig::default()
        };
        let chute = controller(config, &time);

        assert_eq!(chute.alt_min(), 15);
        assert_eq!(chute.pitchroll_thres(), 45);
        assert_eq!(chute.freefall_thres(), 7);
        assert_eq!(chute.hdot_thres(), 12);
        assert_eq!(chute.alt_max_thres(), 400);
        assert_eq!(chute.duration_thres(), 2_000);
    }
}
