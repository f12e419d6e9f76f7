//! Motor: a hinge driven to a speed.

use sim_joint_types::{JointError, Result};

use super::hinge::non_negative;
use crate::frame::JointFrame;
use crate::joint::{JointKind, JointVariant, StepOutcome};
use crate::rows;
use crate::sink::ConstraintRowSink;
use crate::tracking::AngleTracker;

/// A velocity-controlled hinge.
///
/// The commanded speed is `angular_rate * controller`. Each step the motor
/// requests the acceleration that reaches it in one step, capped by
/// `max_accel`, with the torque impulse bounded by `power`. With a zero
/// controller it either spins freely or brakes.
#[derive(Debug, Clone)]
pub struct Motor {
    controller: f64,
    angular_rate: f64,
    max_accel: f64,
    power: f64,
    free_spin: bool,
    tracker: AngleTracker,
    omega: f64,
    acceleration: f64,
}

impl Default for Motor {
    fn default() -> Self {
        Self {
            controller: 1.0,
            angular_rate: 1.0,
            max_accel: f64::INFINITY,
            power: 0.0,
            free_spin: true,
            tracker: AngleTracker::new(),
            omega: 0.0,
            acceleration: 0.0,
        }
    }
}

impl Motor {
    /// Motor at 1 rad/s, full throttle, no acceleration cap, unlimited power.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
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

    /// Builder form of [`Self::set_max_accel`].
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `max_accel` is negative or `NaN`.
    pub fn with_max_accel(mut self, max_accel: f64) -> Result<Self> {
        self.set_max_accel(max_accel)?;
        Ok(self)
    }

    /// Builder form of [`Self::set_controller`].
    #[must_use]
    pub fn with_controller(mut self, controller: f64) -> Self {
        self.set_controller(controller);
        self
    }

    /// Throttle multiplier on `angular_rate`; negative values reverse.
    pub fn set_controller(&mut self, controller: f64) {
        self.controller = if controller.is_finite() { controller } else { 0.0 };
    }

    /// Throttle multiplier.
    #[must_use]
    pub fn controller(&self) -> f64 {
        self.controller
    }

    /// Set the full-throttle speed (rad/s).
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `rate` is negative or not finite.
    pub fn set_angular_rate(&mut self, rate: f64) -> Result<()> {
        self.angular_rate = non_negative("angular rate", rate)?;
        Ok(())
    }

    /// Full-throttle speed.
    #[must_use]
    pub fn angular_rate(&self) -> f64 {
        self.angular_rate
    }

    /// Cap on the requested acceleration magnitude; `f64::INFINITY` disables it.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `max_accel` is negative or `NaN`.
    pub fn set_max_accel(&mut self, max_accel: f64) -> Result<()> {
        if max_accel.is_nan() || max_accel < 0.0 {
            return Err(JointError::invalid_argument(format!(
                "max acceleration must be non-negative, got {max_accel}"
            )));
        }
        self.max_accel = max_accel;
        Ok(())
    }

    /// Acceleration cap.
    #[must_use]
    pub fn max_accel(&self) -> f64 {
        self.max_accel
    }

    /// Set the torque bound; 0 means unbounded.
    ///
    /// The bound applies to the drive row and, with free spin off, to the
    /// brake. A zero-power brake therefore stops the joint with no impulse
    /// limit at all; it is never inert. Only free spin makes the row inert.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `power` is negative or not finite.
    pub fn set_power(&mut self, power: f64) -> Result<()> {
        self.power = non_negative("power", power)?;
        Ok(())
    }

    /// Torque bound.
    #[must_use]
    pub fn power(&self) -> f64 {
        self.power
    }

    /// Spin freely (true) or brake (false) when the controller is zero.
    pub fn set_free_spin(&mut self, free_spin: bool) {
        self.free_spin = free_spin;
    }

    /// Whether a zero controller lets the motor coast.
    #[must_use]
    pub fn free_spin(&self) -> bool {
        self.free_spin
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

    /// Acceleration requested on the last step.
    #[must_use]
    pub fn acceleration(&self) -> f64 {
        self.acceleration
    }

    /// Acceleration needed to move from `omega` to the commanded speed in
    /// one step, capped by `max_accel`.
    #[must_use]
    pub fn drive_acceleration(&self, omega: f64, timestep: f64) -> f64 {
        let desired = self.angular_rate * self.controller;
        ((desired - omega) / timestep).clamp(-self.max_accel, self.max_accel)
    }
}

impl JointVariant for Motor {
    fn kind(&self) -> JointKind {
        JointKind::Motor
    }

    fn on_disconnect(&mut self) {
        self.tracker.reset();
        self.omega = 0.0;
        self.acceleration = 0.0;
    }

    fn submit_constraints(
        &mut self,
        frame: &JointFrame<'_>,
        sink: &mut dyn ConstraintRowSink,
    ) -> StepOutcome {
        let (sin, cos) = frame.measure_angle();
        self.tracker.update(sin, cos);
        let z1 = frame.z1();
        self.omega = frame.angular_velocity_about(&z1);

        rows::pin_pivot(frame, sink);
        rows::lock_tilt_angular(frame, sink);

        let bound = if self.controller == 0.0 {
            self.acceleration = -self.omega / frame.timestep;
            if self.free_spin {
                Some(0.0)
            } else {
                rows::bound(self.power)
            }
        } else {
            self.acceleration = self.drive_acceleration(self.omega, frame.timestep);
            rows::bound(self.power)
        };
        rows::drive_angular(frame, sink, &z1, self.acceleration, bound);

        StepOutcome::Continue
    }
}
