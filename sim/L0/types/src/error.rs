//! Error types for joint operations.

use thiserror::Error;

use crate::BodyId;

/// Errors that can occur while configuring, connecting or stepping a joint.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum JointError {
    /// Operation not valid in the joint's current connection state.
    #[error("invalid joint state: {reason}")]
    InvalidState {
        /// Description of the state conflict.
        reason: String,
    },

    /// Argument outside the accepted domain.
    #[error("invalid argument: {reason}")]
    InvalidArgument {
        /// Description of the bad argument.
        reason: String,
    },

    /// A body referenced by a joint is missing from the lookup.
    #[error("body not found: {0}")]
    BodyNotFound(BodyId),

    /// A joint variant tried to submit more rows than its degrees of freedom.
    #[error("{kind} joint exceeded its row budget of {budget}")]
    RowBudgetExceeded {
        /// Name of the joint variant.
        kind: String,
        /// Maximum rows the variant may submit.
        budget: usize,
    },

    /// Invalid configuration.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the configuration error.
        reason: String,
    },
}

impl JointError {
    /// Create an invalid state error.
    #[must_use]
    pub fn invalid_state(reason: impl Into<String>) -> Self {
        Self::InvalidState {
            reason: reason.into(),
        }
    }

    /// Create an invalid argument error.
    #[must_use]
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Check if this is a state error.
    #[must_use]
    pub fn is_invalid_state(&self) -> bool {
        matches!(self, Self::InvalidState { .. })
    }

    /// Check if this is an argument error.
    #[must_use]
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }
}
