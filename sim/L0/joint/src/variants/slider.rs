//! Slider: translation along the pin only.

use sim_joint_types::Result;

use super::hinge::non_negative;
use crate::frame::JointFrame;
use crate::joint::{JointKind, JointVariant, StepOutcome};
use crate::limits::JointLimits;
use crate::rows;
use crate::sink::ConstraintRowSink;

/// A prismatic joint (1 translational DOF).
///
/// # Constraint Formulation
///
/// - 2 linear rows pin the pivots laterally
/// - 2 linear rows at the axial offset points keep the pins parallel
/// - 1 angular row stops rotation about the pin
/// - 1 optional row: a one-sided limit stop, or friction against sliding
#[derive(Debug, Clone, Default)]
pub struct Slider {
    limits: Option<JointLimits>,
    friction: f64,
    position: f64,
    velocity: f64,
}

impl Slider {
    /// Create an unlimited, frictionless slider.
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

    /// Enable position limits along the pin.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `min > max`.
    pub fn set_limits(&mut self, min: f64, max: f64) -> Result<()> {
        self.limits = Some(JointLimits::new(min, max)?);
        Ok(())
    }

    /// Disable position limits.
    pub fn clear_limits(&mut self) {
        self.limits = None;
    }

    /// Active position limits.
    #[must_use]
    pub fn limits(&self) -> Option<&JointLimits> {
        self.limits.as_ref()
    }

    /// Set the friction bound opposing sliding; 0 disables it.
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

    /// Offset of the child along the pin from the last step.
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

impl JointVariant for Slider {
    fn kind(&self) -> JointKind {
        JointKind::Slider
    }

    fn on_disconnect(&mut self) {
        self.position = 0.0;
        self.velocity = 0.0;
    }

    fn submit_constraints(
        &mut self,
        frame: &JointFrame<'_>,
        sink: &mut dyn ConstraintRowSink,
    ) -> StepOutcome {
        self.position = frame.pin_offset();
        self.velocity = frame.linear_velocity_along(&frame.z1());

        rows::pin_lateral(frame, sink);
        rows::lock_tilt_offset(frame, sink);
        rows::lock_twist(frame, sink);

        let clamped = self
            .limits
            .and_then(|limits| rows::clamp_linear(frame, sink, &limits, self.position));
        if clamped.is_none() && self.friction > 0.0 {
            let acceleration = -self.velocity / frame.timestep;
            rows::drive_linear(frame, sink, acceleration, self.friction);
        }

        StepOutcome::Continue
    }
}
