//! Parachute Parameter Definitions
//!
//! Defines the `CHUTE_` parameter group following ArduPilot naming.
//!
//! # Parameters
//!
//! - `CHUTE_ENABLED` - Release enabled (0: Disabled, 1: Enabled)
//! - `CHUTE_TYPE` - Release mechanism (0-3: Relay channel, 10: Servo)
//! - `CHUTE_SERVO_ON` - Servo PWM when released (µs, 1000-2000)
//! - `CHUTE_SERVO_OFF` - Servo PWM when not released (µs, 1000-2000)
//! - `CHUTE_ALT_MIN` - Min altitude above home for release (m, 0 = disabled)
//! - `CHUTE_PITCHROLL` - Pitch/roll threshold (deg, 0-90)
//! - `CHUTE_FREEFALL` - Free-fall acceleration threshold (m/s², 0-10)
//! - `CHUTE_HDOT` - Vertical speed threshold (m/s, 0-25)
//! - `CHUTE_ALT_MAX` - Maximum allowed altitude (m, 0-32000)
//! - `CHUTE_DURATION` - Abnormal flight duration threshold (ms, 100-10000)
//!
//! Values are stored raw; range checks happen in
//! [`ParachuteConfig::from_params`](crate::parachute::ParachuteConfig::from_params).

use super::error::ParameterError;
use super::storage::{ParamFlags, ParamValue, ParameterStore};
use crate::parachute::{ConfigError, ParachuteConfig};

pub const CHUTE_ENABLED: &str = "CHUTE_ENABLED";
pub const CHUTE_TYPE: &str = "CHUTE_TYPE";
pub const CHUTE_SERVO_ON: &str = "CHUTE_SERVO_ON";
pub const CHUTE_SERVO_OFF: &str = "CHUTE_SERVO_OFF";
pub const CHUTE_ALT_MIN: &str = "CHUTE_ALT_MIN";
pub const CHUTE_PITCHROLL: &str = "CHUTE_PITCHROLL";
pub const CHUTE_FREEFALL: &str = "CHUTE_FREEFALL";
pub const CHUTE_HDOT: &str = "CHUTE_HDOT";
pub const CHUTE_ALT_MAX: &str = "CHUTE_ALT_MAX";
pub const CHUTE_DURATION: &str = "CHUTE_DURATION";

/// Parachute parameters loaded from parameter store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParachuteParams {
    pub enabled: i32,
    pub release_type: i32,
    pub servo_on_pwm: i32,
    pub servo_off_pwm: i32,
    pub alt_min: i32,
    pub pitchroll_thres: i32,
    pub freefall_thres: i32,
    pub hdot_thres: i32,
    pub alt_max_thres: i32,
    pub duration_thres: i32,
}

impl ParachuteParams {
    /// Raw parameter values for a configuration
    pub fn from_config(config: &ParachuteConfig) -> Self {
        Self {
            enabled: config.enabled as i32,
            release_type: config.release_type.to_param(),
            servo_on_pwm: config.servo_on_pwm.into(),
            servo_off_pwm: config.servo_off_pwm.into(),
            alt_min: config.alt_min.into(),
            pitchroll_thres: config.pitchroll_thres.into(),
            freefall_thres: config.freefall_thres.into(),
            hdot_thres: config.hdot_thres.into(),
            alt_max_thres: config.alt_max_thres.into(),
            duration_thres: config.duration_thres.into(),
        }
    }

    fn entries(&self) -> [(&'static str, i32); 10] {
        [
            (CHUTE_ENABLED, self.enabled),
            (CHUTE_TYPE, self.release_type),
            (CHUTE_SERVO_ON, self.servo_on_pwm),
            (CHUTE_SERVO_OFF, self.servo_off_pwm),
            (CHUTE_ALT_MIN, self.alt_min),
            (CHUTE_PITCHROLL, self.pitchroll_thres),
            (CHUTE_FREEFALL, self.freefall_thres),
            (CHUTE_HDOT, self.hdot_thres),
            (CHUTE_ALT_MAX, self.alt_max_thres),
            (CHUTE_DURATION, self.duration_thres),
        ]
    }

    /// Register parachute parameters with default values
    ///
    /// Existing entries (e.g. loaded from Flash) are left untouched.
    pub fn register_defaults(store: &mut ParameterStore) -> Result<(), ParameterError> {
        let defaults = Self::from_config(&ParachuteConfig::default());
        for (name, value) in defaults.entries() {
            store.register(name, ParamValue::Int(value), ParamFlags::empty())?;
        }
        Ok(())
    }

    /// Load parachute parameters from parameter store
    ///
    /// Missing entries fall back to defaults. Float values (as sent by a
    /// ground station) must hold an exact integer; anything else is rejected
    /// instead of being truncated into a valid-looking value.
    pub fn from_store(store: &ParameterStore) -> Result<Self, ConfigError> {
        let defaults = Self::from_config(&ParachuteConfig::default());
        let read = |param: &'static str, default: i32| match store.get(param) {
            Some(value) => value.as_int().ok_or(ConfigError::NonIntegral { param }),
            None => Ok(default),
        };

        Ok(Self {
            enabled: read(CHUTE_ENABLED, defaults.enabled)?,
            release_type: read(CHUTE_TYPE, defaults.release_type)?,
            servo_on_pwm: read(CHUTE_SERVO_ON, defaults.servo_on_pwm)?,
            servo_off_pwm: read(CHUTE_SERVO_OFF, defaults.servo_off_pwm)?,
            alt_min: read(CHUTE_ALT_MIN, defaults.alt_min)?,
            pitchroll_thres: read(CHUTE_PITCHROLL, defaults.pitchroll_thres)?,
            freefall_thres: read(CHUTE_FREEFALL, defaults.freefall_thres)?,
            hdot_thres: read(CHUTE_HDOT, defaults.hdot_thres)?,
            alt_max_thres: read(CHUTE_ALT_MAX, defaults.alt_max_thres)?,
            duration_thres: read(CHUTE_DURATION, defaults.duration_thres)?,
        })
    }

    /// Write these values back to the store (parameters must be registered)
    pub fn save(&self, store: &mut ParameterStore) -> Result<(), ParameterError> {
        for (name, value) in self.entries() {
            store.set(name, ParamValue::Int(value))?;
        }
        Ok(())
    }
}
