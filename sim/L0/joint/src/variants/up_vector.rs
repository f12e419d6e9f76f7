//! UpVector: keep the child's pin parallel to the parent's.

use crate::frame::JointFrame;
use crate::joint::{JointKind, JointVariant, StepOutcome};
use crate::sink::ConstraintRowSink;

/// Two angular rows that stop the child's pin from tilting.
///
/// Position and rotation about the pin stay free, so this is typically
/// attached to the world to keep a body upright.
#[derive(Debug, Clone, Copy, Default)]
pub struct UpVector {
    tilt: f64,
}

impl UpVector {
    /// Create an up-vector joint.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Angle between the two pins on the last step.
    #[must_use]
    pub fn tilt(&self) -> f64 {
        self.tilt
    }
}

impl JointVariant for UpVector {
    fn kind(&self) -> JointKind {
        JointKind::UpVector
    }

    fn on_disconnect(&mut self) {
        self.tilt = 0.0;
    }

    fn submit_constraints(
        &mut self,
        frame: &JointFrame<'_>,
        sink: &mut dyn ConstraintRowSink,
    ) -> StepOutcome {
        let (z0, z1) = (frame.z0(), frame.z1());
        let lateral = z0.cross(&z1);
        let magnitude = lateral.norm();
        self.tilt = magnitude.atan2(z0.dot(&z1));

        let drift = if magnitude > frame.config.up_vector_threshold {
            let axis = lateral / magnitude;
            sink.add_angular_row(self.tilt, &axis);
            sink.set_row_stiffness(frame.stiffness);
            axis.cross(&z0).normalize()
        } else {
            sink.add_angular_row(0.0, &frame.x0());
            sink.set_row_stiffness(frame.stiffness);
            frame.y0()
        };

        sink.add_angular_row(0.0, &drift);
        sink.set_row_stiffness(frame.stiffness);

        StepOutcome::Continue
    }
}
