//! Parameter management types and utilities
//!
//! This module provides the in-memory parameter store and the parachute
//! parameter group. Flash persistence of the store is platform-specific and
//! lives in the firmware.

pub mod error;
pub mod parachute;
pub mod storage;

pub use error::ParameterError;
pub use parachute::ParachuteParams;
pub use storage::{ParamFlags, ParamMetadata, ParamValue, ParameterStore};
pub use storage::{MAX_PARAMS, PARAM_NAME_LEN};
