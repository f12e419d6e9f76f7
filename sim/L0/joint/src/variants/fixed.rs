//! Fixed: a rigid, optionally breakable lock.

use sim_joint_types::Result;
use tracing::warn;

use super::hinge::non_negative;
use crate::frame::JointFrame;
use crate::joint::{JointKind, JointVariant, StepOutcome};
use crate::rows;
use crate::sink::ConstraintRowSink;

/// A weld between two bodies (0 DOF).
///
/// Orientation is locked through redundant point geometry rather than
/// angular rows: the pivot, a point one lever arm down the pin and a point
/// one lever arm along X must all coincide.
///
/// With a non-zero `breaking_force`, the lock gives way on the first step
/// where the child's net force reaches it.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fixed {
    breaking_force: f64,
}

impl Fixed {
    /// An unbreakable lock.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Self::set_breaking_force`].
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `force` is negative or not finite.
    pub fn breakable(mut self, force: f64) -> Result<Self> {
        self.set_breaking_force(force)?;
        Ok(self)
    }

    /// Set the force magnitude at which the lock breaks; 0 makes it unbreakable.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `force` is negative or not finite.
    pub fn set_breaking_force(&mut self, force: f64) -> Result<()> {
        self.breaking_force = non_negative("breaking force", force)?;
        Ok(())
    }

    /// Breaking threshold, 0 when unbreakable.
    #[must_use]
    pub fn breaking_force(&self) -> f64 {
        self.breaking_force
    }

    /// Whether a child force of `force` magnitude breaks the lock.
    #[must_use]
    pub fn breaks_under(&self, force: f64) -> bool {
        self.breaking_force > 0.0 && force >= self.breaking_force
    }
}

impl JointVariant for Fixed {
    fn kind(&self) -> JointKind {
        JointKind::Fixed
    }

    fn submit_constraints(
        &mut self,
        frame: &JointFrame<'_>,
        sink: &mut dyn ConstraintRowSink,
    ) -> StepOutcome {
        let force = frame.child.force.norm();
        if self.breaks_under(force) {
            warn!(force, threshold = self.breaking_force, "fixed joint breaking force reached");
            return StepOutcome::Broken { force };
        }

        rows::pin_pivot(frame, sink);
        rows::lock_tilt_offset(frame, sink);

        let (l0, l1) = frame.lateral_points();
        sink.add_linear_row(&l0, &l1, &frame.y1());
        sink.set_row_stiffness(frame.stiffness);

        StepOutcome::Continue
    }
}
