//! Spring: placeholder that tracks its frames without constraining them.

use nalgebra::Isometry3;

use crate::frame::JointFrame;
use crate::joint::{JointKind, JointVariant, StepOutcome};
use crate::sink::ConstraintRowSink;

/// An inert joint. Each step records the child frame relative to the parent
/// frame and submits nothing.
#[derive(Debug, Clone, Copy)]
pub struct Spring {
    relative: Isometry3<f64>,
}

impl Default for Spring {
    fn default() -> Self {
        Self {
            relative: Isometry3::identity(),
        }
    }
}

impl Spring {
    /// Create a spring placeholder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Child attach frame in the parent attach frame, from the last step.
    #[must_use]
    pub fn relative_transform(&self) -> Isometry3<f64> {
        self.relative
    }
}

impl JointVariant for Spring {
    fn kind(&self) -> JointKind {
        JointKind::Spring
    }

    fn on_disconnect(&mut self) {
        self.relative = Isometry3::identity();
    }

    fn submit_constraints(
        &mut self,
        frame: &JointFrame<'_>,
        _sink: &mut dyn ConstraintRowSink,
    ) -> StepOutcome {
        self.relative = frame.relative_transform();
        StepOutcome::Continue
    }
}
