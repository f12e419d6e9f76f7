//! Corkscrew: rotation and translation along the same pin.

use sim_joint_types::Result;

use super::hinge::non_negative;
use crate::frame::JointFrame;
use crate::joint::{JointKind, JointVariant, StepOutcome};
use crate::limits::JointLimits;
use crate::rows;
use crate::sink::ConstraintRowSink;
use crate::tracking::AngleTracker;

/// A cylindrical joint (1 rotational + 1 translational DOF).
///
/// Angular and linear limits are independent; each falls back to its own
/// friction row while inside its range.
#[derive(Debug, Clone, Default)]
pub struct Corkscrew {
    angular_limits: Option<JointLimits>,
    linear_limits: Option<JointLimits>,
    angular_friction: f64,
    linear_friction: f64,
    tracker: AngleTracker,
    omega: f64,
    position: f64,
    velocity: f64,
}

impl Corkscrew {
    /// Create an unlimited, frictionless corkscrew.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Self::set_angular_limits`].
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `min > max`.
    pub fn with_angular_limits(mut self, min: f64, max: f64) -> Result<Self> {
        self.set_angular_limits(min, max)?;
        Ok(self)
    }

    /// Builder form of [`Self::set_linear_limits`].
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `min > max`.
    pub fn with_linear_limits(mut self, min: f64, max: f64) -> Result<Self> {
        self.set_linear_limits(min, max)?;
        Ok(self)
    }

    /// Enable angle limits in radians.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `min > max`.
    pub fn set_angular_limits(&mut self, min: f64, max: f64) -> Result<()> {
        self.angular_limits = Some(JointLimits::new(min, max)?);
        Ok(())
    }

    /// Enable position limits along the pin.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `min > max`.
    pub fn set_linear_limits(&mut self, min: f64, max: f64) -> Result<()> {
        self.linear_limits = Some(JointLimits::new(min, max)?);
        Ok(())
    }

    /// Disable angle limits.
    pub fn clear_angular_limits(&mut self) {
        self.angular_limits = None;
    }

    /// Disable position limits.
    pub fn clear_linear_limits(&mut self) {
        self.linear_limits = None;
    }

    /// Active angle limits.
    #[must_use]
    pub fn angular_limits(&self) -> Option<&JointLimits> {
        self.angular_limits.as_ref()
    }

    /// Active position limits.
    #[must_use]
    pub fn linear_limits(&self) -> Option<&JointLimits> {
        self.linear_limits.as_ref()
    }

    /// Set the friction bound opposing rotation; 0 disables it.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `friction` is negative or not finite.
    pub fn set_angular_friction(&mut self, friction: f64) -> Result<()> {
        self.angular_friction = non_negative("angular friction", friction)?;
        Ok(())
    }

    /// Set the friction bound opposing sliding; 0 disables it.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `friction` is negative or not finite.
    pub fn set_linear_friction(&mut self, friction: f64) -> Result<()> {
        self.linear_friction = non_negative("linear friction", friction)?;
        Ok(())
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

    /// Offset along the pin from the last step.
    #[must_use]
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Sliding speed from the last step.
    #[must_use]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }
}

impl JointVariant for Corkscrew {
    fn kind(&self) -> JointKind {
        JointKind::Corkscrew
    }

    fn on_disconnect(&mut self) {
        self.tracker.reset();
        self.omega = 0.0;
        self.position = 0.0;
        self.velocity = 0.0;
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
        self.position = frame.pin_offset();
        self.velocity = frame.linear_velocity_along(&z1);

        rows::pin_lateral(frame, sink);
        rows::lock_tilt_offset(frame, sink);

        let clamped = self
            .angular_limits
            .and_then(|limits| rows::clamp_angular(frame, sink, &limits, angle));
        if let Some(angle) = clamped {
            self.tracker.set_angle(angle);
        } else if self.angular_friction > 0.0 {
            let acceleration = -self.omega / frame.timestep;
            rows::drive_angular(frame, sink, &z1, acceleration, Some(self.angular_friction));
        }

        let clamped = self
            .linear_limits
            .and_then(|limits| rows::clamp_linear(frame, sink, &limits, self.position));
        if clamped.is_none() && self.linear_friction > 0.0 {
            let acceleration = -self.velocity / frame.timestep;
            rows::drive_linear(frame, sink, acceleration, self.linear_friction);
        }

        StepOutcome::Continue
    }
}
