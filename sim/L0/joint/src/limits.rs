//! Stops on a joint's free coordinate.

use sim_joint_types::{JointError, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Allowed `[min, max]` interval of a joint angle (radians) or pin offset.
///
/// Always ordered and NaN-free; both constructors enforce it.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct JointLimits {
    min: f64,
    max: f64,
}

impl JointLimits {
    /// Stops at `min` and `max`. Equal bounds lock the coordinate.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `min > max` or either bound is NaN.
    pub fn new(min: f64, max: f64) -> Result<Self> {
        if min.is_nan() || max.is_nan() {
            return Err(JointError::invalid_argument("joint limit is NaN"));
        }
        if min > max {
            return Err(JointError::invalid_argument(format!(
                "joint limit min {min} exceeds max {max}"
            )));
        }
        Ok(Self { min, max })
    }

    /// Stops at `±bound`; the sign of `bound` is ignored.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `bound` is NaN.
    pub fn symmetric(bound: f64) -> Result<Self> {
        Self::new(-bound.abs(), bound.abs())
    }

    /// Lower stop.
    #[must_use]
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Upper stop.
    #[must_use]
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Whether `value` lies between the stops, inclusive.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// `value` moved onto the nearest stop when outside.
    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    /// Which stop, if any, `value` has passed and by how much.
    #[must_use]
    pub fn state(&self, value: f64) -> LimitState {
        if value < self.min {
            LimitState::BelowMin {
                stop: self.min,
                depth: self.min - value,
            }
        } else if value > self.max {
            LimitState::AboveMax {
                stop: self.max,
                depth: value - self.max,
            }
        } else {
            LimitState::Inside
        }
    }
}

/// Position of a coordinate relative to its [`JointLimits`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LimitState {
    /// Between the stops.
    Inside,
    /// Past the lower stop by `depth > 0`.
    BelowMin {
        /// The lower stop.
        stop: f64,
        /// Distance past it.
        depth: f64,
    },
    /// Past the upper stop by `depth > 0`.
    AboveMax {
        /// The upper stop.
        stop: f64,
        /// Distance past it.
        depth: f64,
    },
}

impl LimitState {
    /// The stop that was passed, if any.
    #[must_use]
    pub fn stop(&self) -> Option<f64> {
        match *self {
            Self::Inside => None,
            Self::BelowMin { stop, .. } | Self::AboveMax { stop, .. } => Some(stop),
        }
    }
}
