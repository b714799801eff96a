//! Recovery errors
//!
//! The engine's derivations are infallible. Errors only arise while setting
//! up a session: loading or validating configuration, and seeding the clock
//! from the wall-clock source.

use crate::effects::TimeError;
use serde::{Deserialize, Serialize};

/// Error returned by session setup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum RecoveryError {
    /// Configuration was rejected
    #[error("Invalid: {message}")]
    Invalid {
        /// What was rejected and why
        message: String,
    },

    /// Configuration source could not be read
    #[error("Internal error: {message}")]
    Internal {
        /// Underlying failure
        message: String,
    },

    /// Wall-clock source failed while seeding the clock
    #[error("Time error: {0}")]
    Time(#[from] TimeError),
}

impl RecoveryError {
    /// Create an invalid input error
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

/// Standard Result type for recovery operations
pub type Result<T> = std::result::Result<T, RecoveryError>;
