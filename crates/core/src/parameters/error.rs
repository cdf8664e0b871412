//! Parameter error types
//!
//! Provides error types for parameter store operations.

use thiserror::Error;

/// Errors from parameter store operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParameterError {
    /// Invalid configuration (e.g., unknown parameter, name too long)
    #[error("invalid parameter configuration")]
    InvalidConfig,
    /// Store is full
    #[error("parameter store full")]
    StoreFull,
    /// Read-only parameter cannot be modified
    #[error("parameter is read-only")]
    ReadOnly,
}
