//! Parachute configuration and load-time validation
//!
//! `ParachuteConfig` is a plain `Copy` snapshot. It is validated once when
//! handed to the controller (or built from the parameter store), so the
//! release path never has to clamp or reinterpret values.

use thiserror::Error;

use crate::actuator::ReleaseType;
use crate::parameters::parachute::{
    ParachuteParams, CHUTE_ALT_MAX, CHUTE_ALT_MIN, CHUTE_DURATION, CHUTE_ENABLED, CHUTE_FREEFALL,
    CHUTE_HDOT, CHUTE_PITCHROLL, CHUTE_SERVO_OFF, CHUTE_SERVO_ON,
};

/// Default servo pulse width while released (µs)
pub const SERVO_ON_PWM_DEFAULT: u16 = 1300;
/// Default servo pulse width while not released (µs)
pub const SERVO_OFF_PWM_DEFAULT: u16 = 1100;
/// Default minimum altitude before release (m), 0 = check disabled
pub const ALT_MIN_DEFAULT: i16 = 0;
/// Default maximum pitch/roll (deg)
pub const PITCHROLL_DEFAULT: i8 = 50;
/// Default free-fall acceleration threshold (m/s²)
pub const FREEFALL_DEFAULT: i8 = 5;
/// Default maximum climb/descent rate (m/s)
pub const HDOT_DEFAULT: i8 = 10;
/// Default maximum allowed altitude (m)
pub const ALT_MAX_DEFAULT: i16 = 250;
/// Default abnormal-flight duration threshold (ms)
pub const DURATION_DEFAULT: i16 = 1000;

/// Configuration errors, reported when a configuration is loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// `CHUTE_TYPE` is not one of 0-3 (relay) or 10 (servo)
    #[error("unknown parachute release type {0}")]
    UnknownReleaseType(i32),
    /// Relay channel index past the last relay
    #[error("relay channel {0} out of range")]
    InvalidRelayChannel(u8),
    /// Parameter value outside its allowed range
    #[error("{param} = {value} outside {min}..={max}")]
    OutOfRange {
        param: &'static str,
        value: i32,
        min: i32,
        max: i32,
    },
    /// Stored value is not an integer (fractional, NaN or infinite float)
    #[error("{param} is not an integer value")]
    NonIntegral { param: &'static str },
}

/// Inclusive range accepted for a parachute parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamRange {
    pub param: &'static str,
    pub min: i32,
    pub max: i32,
}

impl ParamRange {
    const fn new(param: &'static str, min: i32, max: i32) -> Self {
        Self { param, min, max }
    }

    /// Return `value` unchanged if it lies within the range
    pub fn check(&self, value: i32) -> Result<i32, ConfigError> {
        if (self.min..=self.max).contains(&value) {
            Ok(value)
        } else {
            Err(ConfigError::OutOfRange {
                param: self.param,
                value,
                min: self.min,
                max: self.max,
            })
        }
    }
}

pub const ENABLED_RANGE: ParamRange = ParamRange::new(CHUTE_ENABLED, 0, 1);
pub const SERVO_ON_RANGE: ParamRange = ParamRange::new(CHUTE_SERVO_ON, 1000, 2000);
pub const SERVO_OFF_RANGE: ParamRange = ParamRange::new(CHUTE_SERVO_OFF, 1000, 2000);
pub const ALT_MIN_RANGE: ParamRange = ParamRange::new(CHUTE_ALT_MIN, 0, 32000);
pub const PITCHROLL_RANGE: ParamRange = ParamRange::new(CHUTE_PITCHROLL, 0, 90);
pub const FREEFALL_RANGE: ParamRange = ParamRange::new(CHUTE_FREEFALL, 0, 10);
pub const HDOT_RANGE: ParamRange = ParamRange::new(CHUTE_HDOT, 0, 25);
pub const ALT_MAX_RANGE: ParamRange = ParamRange::new(CHUTE_ALT_MAX, 0, 32000);
pub const DURATION_RANGE: ParamRange = ParamRange::new(CHUTE_DURATION, 100, 10000);

/// Parachute configuration
///
/// The thresholds are advisory: they are stored here for the flight-check
/// layer that decides when to call `request_release()`, and are never
/// evaluated by the controller itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ParachuteConfig {
    /// Master switch; release requests are ignored when false
    pub enabled: bool,
    /// Mechanism driven on release
    pub release_type: ReleaseType,
    /// Servo pulse width while released (µs)
    pub servo_on_pwm: u16,
    /// Servo pulse width while not released (µs)
    pub servo_off_pwm: u16,
    /// Minimum altitude above home before release (m), 0 = disabled
    pub alt_min: i16,
    /// Maximum pitch/roll (deg), 0 = disabled
    pub pitchroll_thres: i8,
    /// Free-fall acceleration threshold (m/s²), 0 = disabled
    pub freefall_thres: i8,
    /// Maximum climb/descent rate (m/s), 0 = disabled
    pub hdot_thres: i8,
    /// Maximum allowed altitude (m), 0 = disabled
    pub alt_max_thres: i16,
    /// Abnormal-flight duration before release (ms)
    pub duration_thres: i16,
}

impl Default for ParachuteConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            release_type: ReleaseType::default(),
            servo_on_pwm: SERVO_ON_PWM_DEFAULT,
            servo_off_pwm: SERVO_OFF_PWM_DEFAULT,
            alt_min: ALT_MIN_DEFAULT,
            pitchroll_thres: PITCHROLL_DEFAULT,
            freefall_thres: FREEFALL_DEFAULT,
            hdot_thres: HDOT_DEFAULT,
            alt_max_thres: ALT_MAX_DEFAULT,
            duration_thres: DURATION_DEFAULT,
        }
    }
}

impl ParachuteConfig {
    /// Check every field against its allowed range
    pub fn validate(&self) -> Result<(), ConfigError> {
        SERVO_ON_RANGE.check(self.servo_on_pwm.into())?;
        SERVO_OFF_RANGE.check(self.servo_off_pwm.into())?;
        ALT_MIN_RANGE.check(self.alt_min.into())?;
        PITCHROLL_RANGE.check(self.pitchroll_thres.into())?;
        FREEFALL_RANGE.check(self.freefall_thres.into())?;
        HDOT_RANGE.check(self.hdot_thres.into())?;
        ALT_MAX_RANGE.check(self.alt_max_thres.into())?;
        DURATION_RANGE.check(self.duration_thres.into())?;
        Ok(())
    }

    /// Build a validated configuration from raw parameter values
    ///
    /// Each value is range-checked before it is narrowed to its field type,
    /// so out-of-range values are reported rather than truncated.
    pub fn from_params(params: &ParachuteParams) -> Result<Self, ConfigError> {
        // Ranges above all fit the target types, so the narrowing casts are exact
        Ok(Self {
            enabled: ENABLED_RANGE.check(params.enabled)? != 0,
            release_type: ReleaseType::from_param(params.release_type)?,
            servo_on_pwm: SERVO_ON_RANGE.check(params.servo_on_pwm)? as u16,
            servo_off_pwm: SERVO_OFF_RANGE.check(params.servo_off_pwm)? as u16,
            alt_min: ALT_MIN_RANGE.check(params.alt_min)? as i16,
            pitchroll_thres: PITCHROLL_RANGE.check(params.pitchroll_thres)? as i8,
            freefall_thres: FREEFALL_RANGE.check(params.freefall_thres)? as i8,
            hdot_thres: HDOT_RANGE.check(params.hdot_thres)? as i8,
            alt_max_thres: ALT_MAX_RANGE.check(params.alt_max_thres)? as i16,
            duration_thres: DURATION_RANGE.check(params.duration_thres)? as i16,
        })
    }
}
