//! Servo: a hinge that drives itself to a target angle.

use sim_joint_types::Result;

use super::hinge::non_negative;
use crate::frame::JointFrame;
use crate::joint::{JointKind, JointVariant, StepOutcome};
use crate::limits::JointLimits;
use crate::rows;
use crate::sink::ConstraintRowSink;
use crate::tracking::AngleTracker;

/// A position-controlled hinge.
///
/// While a target is set the servo turns toward it at `angular_rate`. Once
/// the remaining angle fits in one step it holds position. A non-zero
/// `power` caps the torque impulse of the drive row.
#[derive(Debug, Clone)]
pub struct Servo {
    limits: Option<JointLimits>,
    target: Option<f64>,
    angular_rate: f64,
    power: f64,
    tracker: AngleTracker,
    omega: f64,
    reached: bool,
}

impl Default for Servo {
    fn default() -> Self {
        Self {
            limits: None,
            target: None,
            angular_rate: 1.0,
            power: 0.0,
            tracker: AngleTracker::new(),
            omega: 0.0,
            reached: false,
        }
    }
}

impl Servo {
    /// Create a servo with no target, turning at 1 rad/s with unlimited power.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Self::set_target`].
    #[must_use]
    pub fn with_target(mut self, target: f64) -> Self {
        self.set_target(Some(target));
        self
    }

    /// Builder form of [`Self::set_angular_rate`].
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `rate` is negative.
    pub fn with_angular_rate(mut self, rate: f64) -> Result<Self> {
        self.set_angular_rate(rate)?;
        Ok(self)
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

    /// Set or clear the target angle in radians.
    pub fn set_target(&mut self, target: Option<f64>) {
        self.target = target.filter(|t| t.is_finite());
        self.reached = false;
    }

    /// Target angle.
    #[must_use]
    pub fn target(&self) -> Option<f64> {
        self.target
    }

    /// Set the travel speed toward the target (rad/s).
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `rate` is negative or not finite.
    pub fn set_angular_rate(&mut self, rate: f64) -> Result<()> {
        self.angular_rate = non_negative("angular rate", rate)?;
        Ok(())
    }

    /// Travel speed toward the target.
    #[must_use]
    pub fn angular_rate(&self) -> f64 {
        self.angular_rate
    }

    /// Set the torque bound of the drive row; 0 means unbounded.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `power` is negative or not finite.
    pub fn set_power(&mut self, power: f64) -> Result<()> {
        self.power = non_negative("power", power)?;
        Ok(())
    }

    /// Torque bound of the drive row.
    #[must_use]
    pub fn power(&self) -> f64 {
        self.power
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

    /// Whether the last step found the servo within one step of its target.
    #[must_use]
    pub fn target_reached(&self) -> bool {
        self.reached
    }
}

impl JointVariant for Servo {
    fn kind(&self) -> JointKind {
        JointKind::Servo
    }

    fn on_disconnect(&mut self) {
        self.tracker.reset();
        self.omega = 0.0;
        self.reached = false;
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
            self.reached = false;
            return StepOutcome::Continue;
        }

        let Some(target) = self.target else {
            return StepOutcome::Continue;
        };
        let target = self.limits.map_or(target, |limits| limits.clamp(target));
        let remaining = target - angle;
        let dt = frame.timestep;

        let acceleration = if remaining.abs() > self.angular_rate * dt {
            self.reached = false;
            (self.angular_rate.copysign(remaining) - self.omega) / dt
        } else {
            self.reached = true;
            -self.omega / dt
        };
        rows::drive_angular(frame, sink, &z1, acceleration, rows::bound(self.power));

        StepOutcome::Continue
    }
}
