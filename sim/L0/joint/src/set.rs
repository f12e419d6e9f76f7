//! A heterogeneous collection of joints stepped together.

use sim_joint_types::{BodyId, BodyLookup, JointError, Result};
use tracing::{debug, trace};

use crate::joint::{AnyJoint, Joint, JointVariant};
use crate::sink::ConstraintRowSink;

/// Index of a joint in a [`JointSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JointHandle(usize);

impl JointHandle {
    /// Position in insertion order.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for JointHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Joint({})", self.0)
    }
}

/// Outcome of [`JointSet::step`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepSummary {
    /// Rows submitted by each stepped joint, in insertion order.
    pub rows: Vec<(JointHandle, usize)>,
    /// Number of joints that were connected and submitted.
    pub stepped: usize,
    /// Joints that broke this step and are now disconnected.
    pub broken: Vec<JointHandle>,
}

impl StepSummary {
    /// Total rows submitted across the set.
    #[must_use]
    pub fn total_rows(&self) -> usize {
        self.rows.iter().map(|(_, n)| n).sum()
    }
}

/// Joints of any variant, stepped in insertion order.
///
/// Joints are never removed, so handles stay valid for the set's lifetime;
/// a joint that is no longer wanted is simply disconnected.
///
/// # Example
///
/// ```
/// use sim_joint::{Fixed, Hinge, Joint, JointSet, RowRecorder};
/// use sim_joint_types::{BodyId, BodySet, BodyState};
/// use nalgebra::{Point3, Vector3};
///
/// let mut bodies = BodySet::new();
/// bodies.insert(BodyId::new(1), BodyState::default());
/// bodies.insert(BodyId::new(2), BodyState::default());
///
/// let mut joints = JointSet::new();
/// let hinge = joints.insert(Joint::new(Point3::origin(), Vector3::z(), Hinge::new()).unwrap());
/// joints.insert(Joint::new(Point3::origin(), Vector3::z(), Fixed::new()).unwrap());
/// joints.connect(hinge, &bodies, BodyId::new(1), Some(BodyId::new(2))).unwrap();
///
/// let mut rows = RowRecorder::new();
/// let summary = joints.step(&bodies, &mut rows, 1.0 / 60.0).unwrap();
/// assert_eq!(summary.stepped, 1);
/// assert_eq!(summary.total_rows(), 5);
/// ```
#[derive(Debug, Default)]
pub struct JointSet {
    joints: Vec<Box<dyn AnyJoint>>,
}

impl JointSet {
    /// Empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a joint and return its handle.
    pub fn insert<V: JointVariant + 'static>(&mut self, joint: Joint<V>) -> JointHandle {
        self.insert_boxed(Box::new(joint))
    }

    /// Add an already boxed joint.
    pub fn insert_boxed(&mut self, joint: Box<dyn AnyJoint>) -> JointHandle {
        let handle = JointHandle(self.joints.len());
        debug!(%handle, kind = %joint.kind(), "joint added to set");
        self.joints.push(joint);
        handle
    }

    /// Joint behind `handle`.
    #[must_use]
    pub fn get(&self, handle: JointHandle) -> Option<&dyn AnyJoint> {
        self.joints.get(handle.0).map(|j| &**j)
    }

    /// Mutable joint behind `handle`.
    pub fn get_mut(&mut self, handle: JointHandle) -> Option<&mut (dyn AnyJoint + 'static)> {
        self.joints.get_mut(handle.0).map(|j| &mut **j)
    }

    /// Typed access, `None` if the handle is unknown or holds another variant.
    #[must_use]
    pub fn get_as<V: JointVariant + 'static>(&self, handle: JointHandle) -> Option<&Joint<V>> {
        self.get(handle)?.as_any().downcast_ref()
    }

    /// Typed mutable access.
    pub fn get_as_mut<V: JointVariant + 'static>(
        &mut self,
        handle: JointHandle,
    ) -> Option<&mut Joint<V>> {
        self.get_mut(handle)?.as_any_mut().downcast_mut()
    }

    /// Connect the joint behind `handle`.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for an unknown handle, otherwise as
    /// [`Joint::connect`].
    pub fn connect(
        &mut self,
        handle: JointHandle,
        bodies: &dyn BodyLookup,
        child: BodyId,
        parent: Option<BodyId>,
    ) -> Result<()> {
        self.joints
            .get_mut(handle.0)
            .ok_or_else(|| unknown(handle))?
            .connect(bodies, child, parent)
    }

    /// Disconnect the joint behind `handle`.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for an unknown handle.
    pub fn disconnect(&mut self, handle: JointHandle) -> Result<()> {
        self.joints
            .get_mut(handle.0)
            .ok_or_else(|| unknown(handle))?
            .disconnect();
        Ok(())
    }

    /// Number of joints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.joints.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    /// Number of connected joints.
    #[must_use]
    pub fn connected_count(&self) -> usize {
        self.joints.iter().filter(|j| j.is_connected()).count()
    }

    /// Handles and joints in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (JointHandle, &dyn AnyJoint)> {
        self.joints
            .iter()
            .enumerate()
            .map(|(i, j)| (JointHandle(i), &**j))
    }

    /// Submit every connected joint's rows to `sink`.
    ///
    /// Disconnected joints are skipped. Joints that break are disconnected
    /// and listed in [`StepSummary::broken`].
    ///
    /// # Errors
    ///
    /// The first joint error stops the step; rows already submitted by
    /// earlier joints stay in `sink`.
    pub fn step(
        &mut self,
        bodies: &dyn BodyLookup,
        sink: &mut dyn ConstraintRowSink,
        timestep: f64,
    ) -> Result<StepSummary> {
        let mut summary = StepSummary::default();
        for (index, joint) in self.joints.iter_mut().enumerate() {
            if !joint.is_connected() {
                continue;
            }
            let handle = JointHandle(index);
            let report = joint.submit_constraints(bodies, sink, timestep)?;
            summary.stepped += 1;
            summary.rows.push((handle, report.rows));
            if report.broke {
                summary.broken.push(handle);
            }
        }
        trace!(
            stepped = summary.stepped,
            rows = summary.total_rows(),
            broken = summary.broken.len(),
            "joint set stepped"
        );
        Ok(summary)
    }
}

fn unknown(handle: JointHandle) -> JointError {
    JointError::invalid_argument(format!("unknown {handle}"))
}
