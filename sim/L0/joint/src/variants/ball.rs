//! BallAndSocket: a pivot handed to the solver's native ball constraint.

use sim_joint_types::{JointConfig, Result};
use tracing::debug;

use super::hinge::non_negative;
use crate::frame::JointFrame;
use crate::joint::{JointKind, JointVariant, StepOutcome};
use crate::sink::{BallSocketLimits, ConstraintRowSink};

/// A spherical joint (3 rotational DOF).
///
/// No manual rows are submitted. The first step after connecting creates
/// the native ball constraint at the pivot; the cone and twist limits are
/// pushed on that step and again on the step after any limit change.
///
/// Limits are stored as given. They are clamped into
/// [`JointConfig::ball_cone_range`] and [`JointConfig::ball_twist_range`]
/// when pushed, and a value of 0 disables the limit.
#[derive(Debug, Clone, Copy, Default)]
pub struct BallAndSocket {
    max_cone: f64,
    max_twist: f64,
    attached: bool,
    dirty: bool,
}

impl BallAndSocket {
    /// Ball joint without limits.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Self::set_max_cone`] and [`Self::set_max_twist`].
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if either angle is negative or not finite.
    pub fn with_limits(mut self, max_cone: f64, max_twist: f64) -> Result<Self> {
        self.set_max_cone(max_cone)?;
        self.set_max_twist(max_twist)?;
        Ok(self)
    }

    /// Set the cone half-angle in radians; 0 disables it.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `angle` is negative or not finite.
    pub fn set_max_cone(&mut self, angle: f64) -> Result<()> {
        self.max_cone = non_negative("cone angle", angle)?;
        self.dirty = true;
        Ok(())
    }

    /// Set the twist limit in radians; 0 disables it.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `angle` is negative or not finite.
    pub fn set_max_twist(&mut self, angle: f64) -> Result<()> {
        self.max_twist = non_negative("twist angle", angle)?;
        self.dirty = true;
        Ok(())
    }

    /// Cone half-angle as set.
    #[must_use]
    pub fn max_cone(&self) -> f64 {
        self.max_cone
    }

    /// Twist limit as set.
    #[must_use]
    pub fn max_twist(&self) -> f64 {
        self.max_twist
    }

    /// Whether the native constraint has been created for this connection.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Limits as they would be pushed, clamped into the configured ranges.
    ///
    /// A range given as `(max, min)` is read in order; `config` need not
    /// have been validated.
    #[must_use]
    pub fn effective_limits(&self, config: &JointConfig) -> (Option<f64>, Option<f64>) {
        let clamp = |value: f64, (a, b): (f64, f64)| {
            (value > 0.0).then(|| value.max(a.min(b)).min(a.max(b)))
        };
        (
            clamp(self.max_cone, config.ball_cone_range),
            clamp(self.max_twist, config.ball_twist_range),
        )
    }
}

impl JointVariant for BallAndSocket {
    fn kind(&self) -> JointKind {
        JointKind::BallAndSocket
    }

    fn on_connect(&mut self) {
        self.attached = false;
        self.dirty = true;
    }

    fn on_disconnect(&mut self) {
        self.attached = false;
        self.dirty = false;
    }

    fn submit_constraints(
        &mut self,
        frame: &JointFrame<'_>,
        sink: &mut dyn ConstraintRowSink,
    ) -> StepOutcome {
        let pin = frame.z1();
        if !self.attached {
            sink.attach_ball_socket(&frame.pivot1(), &pin);
            self.attached = true;
        }
        if self.dirty {
            let (max_cone, max_twist) = self.effective_limits(frame.config);
            debug!(?max_cone, ?max_twist, "pushing ball socket limits");
            sink.set_ball_socket_limits(&BallSocketLimits {
                pin,
                max_cone,
                max_twist,
            });
            self.dirty = false;
        }
        StepOutcome::Continue
    }
}
