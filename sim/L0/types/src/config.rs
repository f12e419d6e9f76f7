//! Configuration shared by all joint variants.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{JointError, Result};

/// Default lever arm of offset-point constraint rows (model units).
pub const PIN_LENGTH: f64 = 50.0;

/// Default row stiffness.
pub const DEFAULT_STIFFNESS: f64 = 0.9;

/// Tunables read by joints at construction and every step.
///
/// # Example
///
/// ```
/// use sim_joint_types::JointConfig;
///
/// let config = JointConfig::default().stiffness(0.5).pin_length(10.0);
/// assert!(config.validate().is_ok());
///
/// let bad = JointConfig::default().stiffness(2.0);
/// assert!(bad.validate().is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct JointConfig {
    /// Stiffness applied to rows when the joint does not override it, in [0, 1].
    pub default_stiffness: f64,
    /// Distance from the pivot to the offset points used by rigid locks.
    pub pin_length: f64,
    /// Pin directions shorter than this are rejected.
    pub min_direction_norm: f64,
    /// Misalignment below which an up-vector joint counts as aligned.
    pub up_vector_threshold: f64,
    /// Accepted (min, max) cone angle for ball-and-socket limits, radians.
    pub ball_cone_range: (f64, f64),
    /// Accepted (min, max) twist angle for ball-and-socket limits, radians.
    pub ball_twist_range: (f64, f64),
}

impl Default for JointConfig {
    fn default() -> Self {
        Self {
            default_stiffness: DEFAULT_STIFFNESS,
            pin_length: PIN_LENGTH,
            min_direction_norm: 1.0e-9,
            up_vector_threshold: 1.0e-6,
            ball_cone_range: (5.0_f64.to_radians(), 175.0_f64.to_radians()),
            ball_twist_range: (5.0_f64.to_radians(), 90.0_f64.to_radians()),
        }
    }
}

impl JointConfig {
    /// Set the default stiffness.
    #[must_use]
    pub fn stiffness(mut self, stiffness: f64) -> Self {
        self.default_stiffness = stiffness;
        self
    }

    /// Set the offset-point lever arm.
    #[must_use]
    pub fn pin_length(mut self, pin_length: f64) -> Self {
        self.pin_length = pin_length;
        self
    }

    /// Set the up-vector alignment threshold.
    #[must_use]
    pub fn up_vector_threshold(mut self, threshold: f64) -> Self {
        self.up_vector_threshold = threshold;
        self
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` naming the first field out of range.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.default_stiffness) {
            return Err(JointError::invalid_config(format!(
                "default stiffness {} not in [0, 1]",
                self.default_stiffness
            )));
        }

        if !self.pin_length.is_finite() || self.pin_length <= 0.0 {
            return Err(JointError::invalid_config(format!(
                "pin length must be positive and finite, got {}",
                self.pin_length
            )));
        }

        if self.min_direction_norm.is_nan() || self.min_direction_norm <= 0.0 {
            return Err(JointError::invalid_config(
                "min_direction_norm must be positive",
            ));
        }

        if self.up_vector_threshold.is_nan() || self.up_vector_threshold <= 0.0 {
            return Err(JointError::invalid_config(
                "up_vector_threshold must be positive",
            ));
        }

        for (name, (lo, hi)) in [
            ("ball_cone_range", self.ball_cone_range),
            ("ball_twist_range", self.ball_twist_range),
        ] {
            let ordered = lo > 0.0 && lo <= hi && hi <= std::f64::consts::PI;
            if !ordered {
                return Err(JointError::invalid_config(format!(
                    "{name} ({lo}, {hi}) must satisfy 0 < min <= max <= pi"
                )));
            }
        }

        Ok(())
    }
}
