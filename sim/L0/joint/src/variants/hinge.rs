//! Hinge: free rotation about the pin, with optional limits and friction.

use sim_joint_types::{JointError, Result};

use crate::frame::JointFrame;
use crate::joint::{JointKind, JointVariant, StepOutcome};
use crate::limits::JointLimits;
use crate::rows;
use crate::sink::ConstraintRowSink;
use crate::tracking::AngleTracker;

/// A hinge joint (1 rotational DOF).
///
/// # Constraint Formulation
///
/// - 3 linear rows pin the pivots together
/// - 2 angular rows keep the pins parallel
/// - 1 optional row: a one-sided limit stop, or friction against rotation
#[derive(Debug, Clone, Default)]
pub struct Hinge {
    limits: Option<JointLimits>,
    friction: f64,
    tracker: AngleTracker,
    omega: f64,
}

impl Hinge {
    /// Create an unlimited, frictionless hinge.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Self::set_limits`].
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `min > max`.
    pub fn with_limits(mut self, min: f64, max: f64) -> Result<Self> {
        self.set_limits(min, max)?;
        Ok(self)
    }

    /// Builder form of [`Self::set_friction`].
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `friction` is negative.
    pub fn with_friction(mut self, friction: f64) -> Result<Self> {
        self.set_friction(friction)?;
        Ok(self)
    }

    /// Enable angle limits in radians.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `min > max`.
    pub fn set_limits(&mut self, min: f64, max: f64) -> Result<()> {
        self.limits = Some(JointLimits::new(min, max)?);
        Ok(())
    }

    /// Disable angle limits.
    pub fn clear_limits(&mut self) {
        self.limits = None;
    }

    /// Active angle limits.
    #[must_use]
    pub fn limits(&self) -> Option<&JointLimits> {
        self.limits.as_ref()
    }

    /// Set the friction bound opposing rotation; 0 disables it.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `friction` is negative or not finite.
    pub fn set_friction(&mut self, friction: f64) -> Result<()> {
        self.friction = non_negative("friction", friction)?;
        Ok(())
    }

    /// Friction bound.
    #[must_use]
    pub fn friction(&self) -> f64 {
        self.friction
    }

    /// Accumulated angle in radians.
    #[must_use]
    pub fn angle(&self) -> f64 {
        self.tracker.angle()
    }

    /// Angular velocity about the pin from the last step.
    #[must_use]
    pub fn omega(&self) -> f64 {
        self.omega
    }
}

impl JointVariant for Hinge {
    fn kind(&self) -> JointKind {
        JointKind::Hinge
    }

    fn on_disconnect(&mut self) {
        self.tracker.reset();
        self.omega = 0.0;
    }

    fn submit_constraints(
        &mut self,
        frame: &JointFrame<'_>,
        sink: &mut dyn ConstraintRowSink,
    ) -> StepOutcome {
        let (sin, cos) = frame.measure_angle();
        let angle = self.tracker.update(sin, cos);
        let z1 = frame.z1();
        self.omega = frame.angular_velocity_about(&z1);

        rows::pin_pivot(frame, sink);
        rows::lock_tilt_angular(frame, sink);

        let clamped = self
            .limits
            .and_then(|limits| rows::clamp_angular(frame, sink, &limits, angle));
        if let Some(angle) = clamped {
            self.tracker.set_angle(angle);
        } else if self.friction > 0.0 {
            let acceleration = -self.omega / frame.timestep;
            rows::drive_angular(frame, sink, &z1, acceleration, Some(self.friction));
        }

        StepOutcome::Continue
    }
}

/// Validate a non-negative setting.
pub(crate) fn non_negative(name: &str, value: f64) -> Result<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(JointError::invalid_argument(format!(
            "{name} must be non-negative and finite, got {value}"
        )))
    }
}
