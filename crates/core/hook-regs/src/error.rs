//! Error types for register context handling

use thiserror::Error;

use crate::register::Register;

/// Errors raised while building or accessing a register bank
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegisterError {
    #[error("Failed to allocate a register slot of {size} bytes")]
    Allocation { size: usize },
    #[error("Access of {requested} bytes does not fit a {available}-byte register slot")]
    SizeMismatch { requested: usize, available: usize },
    #[error("Register {0} was not requested for this context")]
    InvalidAccess(Register),
}

/// Errors raised while loading register profiles
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse register configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Failed to read register configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid register configuration: {0}")]
    Invalid(String),
}

pub type Result<T, E = RegisterError> = std::result::Result<T, E>;
