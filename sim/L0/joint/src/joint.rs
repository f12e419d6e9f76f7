//! Joint base: attach pose, connection lifecycle and row budget.
//!
//! [`Joint`] owns everything every variant shares. The variant itself only
//! decides which rows to submit each step, through [`JointVariant`].

use std::any::Any;

use nalgebra::{Isometry3, Point3, Vector3};
use sim_joint_types::{BodyId, BodyLookup, BodyState, JointConfig, JointError, Result};
use tracing::{debug, trace, warn};

use crate::frame::{attach_pose, JointFrame};
use crate::sink::{BudgetSink, ConstraintRowSink};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Type of joint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum JointKind {
    /// Ball and socket with optional cone/twist limits.
    BallAndSocket,
    /// Rotation and translation along one axis.
    Corkscrew,
    /// Rigid lock, optionally breakable.
    Fixed,
    /// Free rotation about one axis.
    Hinge,
    /// Rotation about one axis driven to a speed.
    Motor,
    /// Rotation about one axis driven to an angle.
    Servo,
    /// Translation along one axis.
    Slider,
    /// Placeholder that submits no rows.
    Spring,
    /// Keeps the child's pin parallel to the parent's.
    UpVector,
}

impl JointKind {
    /// Maximum number of rows the variant submits per step.
    #[must_use]
    pub fn degrees_of_freedom(&self) -> usize {
        match self {
            Self::UpVector => 2,
            Self::BallAndSocket
            | Self::Corkscrew
            | Self::Fixed
            | Self::Hinge
            | Self::Motor
            | Self::Servo
            | Self::Slider
            | Self::Spring => 6,
        }
    }

    /// Motion left free by the variant.
    #[must_use]
    pub fn free_motion(&self) -> JointDof {
        let (rotational, translational) = match self {
            Self::Fixed => (0, 0),
            Self::Hinge | Self::Motor | Self::Servo => (1, 0),
            Self::Slider => (0, 1),
            Self::Corkscrew => (1, 1),
            Self::BallAndSocket => (3, 0),
            Self::UpVector => (1, 3),
            Self::Spring => (3, 3),
        };
        JointDof {
            rotational,
            translational,
        }
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::BallAndSocket => "BallAndSocket",
            Self::Corkscrew => "Corkscrew",
            Self::Fixed => "Fixed",
            Self::Hinge => "Hinge",
            Self::Motor => "Motor",
            Self::Servo => "Servo",
            Self::Slider => "Slider",
            Self::Spring => "Spring",
            Self::UpVector => "UpVector",
        }
    }
}

impl std::fmt::Display for JointKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Count of motions a joint leaves unconstrained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct JointDof {
    /// Number of rotational DOF.
    pub rotational: usize,
    /// Number of translational DOF.
    pub translational: usize,
}

impl JointDof {
    /// Total DOF.
    #[must_use]
    pub fn total(&self) -> usize {
        self.rotational + self.translational
    }
}

/// What a variant asks of the base after submitting its rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    /// Keep the joint connected.
    Continue,
    /// The joint broke under `force` and must disconnect.
    Broken {
        /// Force magnitude that broke the joint.
        force: f64,
    },
}

/// Result of one successful row submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepReport {
    /// Rows the joint submitted.
    pub rows: usize,
    /// The joint broke and is now disconnected.
    pub broke: bool,
}

/// Per-variant row formulation.
///
/// Hooks default to no-ops. `submit_constraints` is only called while the
/// owning [`Joint`] is connected.
pub trait JointVariant: std::fmt::Debug + Send + Sync {
    /// Which variant this is.
    fn kind(&self) -> JointKind;

    /// Row budget; defaults to the kind's degrees of freedom.
    fn degrees_of_freedom(&self) -> usize {
        self.kind().degrees_of_freedom()
    }

    /// Called after the joint becomes connected.
    fn on_connect(&mut self) {}

    /// Called after the joint becomes disconnected. Clears derived state.
    fn on_disconnect(&mut self) {}

    /// Submit this step's rows.
    fn submit_constraints(
        &mut self,
        frame: &JointFrame<'_>,
        sink: &mut dyn ConstraintRowSink,
    ) -> StepOutcome;
}

impl<V: JointVariant + ?Sized> JointVariant for Box<V> {
    fn kind(&self) -> JointKind {
        (**self).kind()
    }

    fn degrees_of_freedom(&self) -> usize {
        (**self).degrees_of_freedom()
    }

    fn on_connect(&mut self) {
        (**self).on_connect();
    }

    fn on_disconnect(&mut self) {
        (**self).on_disconnect();
    }

    fn submit_constraints(
        &mut self,
        frame: &JointFrame<'_>,
        sink: &mut dyn ConstraintRowSink,
    ) -> StepOutcome {
        (**self).submit_constraints(frame, sink)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Connection {
    Disconnected,
    Connected {
        child: BodyId,
        parent: Option<BodyId>,
    },
}

/// A joint between a child body and an optional parent (the world if absent).
///
/// # Example
///
/// ```
/// use sim_joint::{Hinge, Joint, RowRecorder};
/// use sim_joint_types::{BodyId, BodySet, BodyState};
/// use nalgebra::{Point3, Vector3};
///
/// let mut bodies = BodySet::new();
/// bodies.insert(BodyId::new(1), BodyState::default());
///
/// let mut hinge = Joint::new(Point3::origin(), Vector3::z(), Hinge::new()).unwrap();
/// hinge.connect(&bodies, BodyId::new(1), None).unwrap();
///
/// let mut rows = RowRecorder::new();
/// let report = hinge.submit_constraints(&bodies, &mut rows, 1.0 / 60.0).unwrap();
/// assert_eq!(report.rows, 5);
/// ```
#[derive(Debug, Clone)]
pub struct Joint<V> {
    position: Point3<f64>,
    direction: Vector3<f64>,
    attach: Isometry3<f64>,
    local_matrix0: Isometry3<f64>,
    local_matrix1: Isometry3<f64>,
    stiffness: f64,
    config: JointConfig,
    connection: Connection,
    variant: V,
}

impl<V: JointVariant> Joint<V> {
    /// Create a disconnected joint with the default configuration.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `direction` has near-zero length.
    pub fn new(position: Point3<f64>, direction: Vector3<f64>, variant: V) -> Result<Self> {
        Self::with_config(position, direction, variant, JointConfig::default())
    }

    /// Create a disconnected joint with an explicit configuration.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if the configuration fails validation and
    /// `InvalidArgument` if `direction` has near-zero length.
    pub fn with_config(
        position: Point3<f64>,
        direction: Vector3<f64>,
        variant: V,
        config: JointConfig,
    ) -> Result<Self> {
        config.validate()?;
        let direction = checked_direction(&direction, &config)?;
        Ok(Self {
            position,
            direction,
            attach: attach_pose(&position, &direction),
            local_matrix0: Isometry3::identity(),
            local_matrix1: Isometry3::identity(),
            stiffness: config.default_stiffness,
            config,
            connection: Connection::Disconnected,
            variant,
        })
    }

    /// Variant kind.
    #[must_use]
    pub fn kind(&self) -> JointKind {
        self.variant.kind()
    }

    /// Row budget of the variant.
    #[must_use]
    pub fn degrees_of_freedom(&self) -> usize {
        self.variant.degrees_of_freedom()
    }

    /// The variant's state and settings.
    #[must_use]
    pub fn variant(&self) -> &V {
        &self.variant
    }

    /// Mutable access to the variant's settings.
    pub fn variant_mut(&mut self) -> &mut V {
        &mut self.variant
    }

    /// Joint configuration.
    #[must_use]
    pub fn config(&self) -> &JointConfig {
        &self.config
    }

    /// Attach position in world space.
    #[must_use]
    pub fn position(&self) -> Point3<f64> {
        self.position
    }

    /// Unit pin direction in world space.
    #[must_use]
    pub fn direction(&self) -> Vector3<f64> {
        self.direction
    }

    /// World attach frame built from position and direction.
    #[must_use]
    pub fn attach_pose(&self) -> Isometry3<f64> {
        self.attach
    }

    /// Row stiffness.
    #[must_use]
    pub fn stiffness(&self) -> f64 {
        self.stiffness
    }

    /// Set row stiffness, clamped to [0, 1].
    pub fn set_stiffness(&mut self, stiffness: f64) {
        self.stiffness = stiffness.clamp(0.0, 1.0);
    }

    /// Whether the joint is connected.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        matches!(self.connection, Connection::Connected { .. })
    }

    /// Child body, while connected.
    #[must_use]
    pub fn child(&self) -> Option<BodyId> {
        match self.connection {
            Connection::Connected { child, .. } => Some(child),
            Connection::Disconnected => None,
        }
    }

    /// Parent body, while connected to one.
    #[must_use]
    pub fn parent(&self) -> Option<BodyId> {
        match self.connection {
            Connection::Connected { parent, .. } => parent,
            Connection::Disconnected => None,
        }
    }

    /// Attach frames in child and parent (or world) space, as cached at
    /// connect time.
    #[must_use]
    pub fn local_matrices(&self) -> (Isometry3<f64>, Isometry3<f64>) {
        (self.local_matrix0, self.local_matrix1)
    }

    /// Connect `child` to `parent`, or to the world when `parent` is `None`.
    ///
    /// # Errors
    ///
    /// - `InvalidState` if already connected or `child` is not in `bodies`
    /// - `InvalidArgument` if `parent` is `child`
    /// - `BodyNotFound` if `parent` is not in `bodies`
    pub fn connect(
        &mut self,
        bodies: &dyn BodyLookup,
        child: BodyId,
        parent: Option<BodyId>,
    ) -> Result<()> {
        if self.is_connected() {
            return Err(JointError::invalid_state(format!(
                "{} joint is already connected",
                self.kind()
            )));
        }
        if parent == Some(child) {
            return Err(JointError::invalid_argument(format!(
                "cannot connect {child} to itself"
            )));
        }
        let child_state = bodies.body(child).ok_or_else(|| {
            JointError::invalid_state(format!("child {child} is not present"))
        })?;
        let parent_state = parent
            .map(|id| bodies.body(id).ok_or(JointError::BodyNotFound(id)))
            .transpose()?;

        self.local_matrix0 = child_state.transform.inverse() * self.attach;
        self.local_matrix1 =
            parent_state.map_or(self.attach, |p| p.transform.inverse() * self.attach);
        self.connection = Connection::Connected { child, parent };
        self.variant.on_connect();

        debug!(kind = %self.kind(), %child, ?parent, "joint connected");
        Ok(())
    }

    /// Disconnect and clear derived state. No-op when already disconnected.
    pub fn disconnect(&mut self) {
        if let Connection::Connected { child, .. } = self.connection {
            self.connection = Connection::Disconnected;
            self.variant.on_disconnect();
            debug!(kind = %self.kind(), %child, "joint disconnected");
        }
    }

    /// Move the attach point. A connected joint reconnects to the same
    /// bodies so its local frames follow.
    ///
    /// # Errors
    ///
    /// Propagates reconnection failures; the joint is left disconnected then.
    pub fn set_position(&mut self, bodies: &dyn BodyLookup, position: Point3<f64>) -> Result<()> {
        self.position = position;
        self.reattach(bodies)
    }

    /// Change the pin direction. A connected joint reconnects to the same
    /// bodies so its local frames follow.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for a near-zero direction (the joint is unchanged),
    /// or a reconnection failure.
    pub fn set_direction(
        &mut self,
        bodies: &dyn BodyLookup,
        direction: Vector3<f64>,
    ) -> Result<()> {
        self.direction = checked_direction(&direction, &self.config)?;
        self.reattach(bodies)
    }

    fn reattach(&mut self, bodies: &dyn BodyLookup) -> Result<()> {
        self.attach = attach_pose(&self.position, &self.direction);
        match self.connection {
            Connection::Connected { child, parent } => {
                self.disconnect();
                debug!(kind = %self.kind(), "recomputing local attach frames");
                self.connect(bodies, child, parent)
            }
            Connection::Disconnected => Ok(()),
        }
    }

    /// World-space attach frames of the child and the parent (or world).
    ///
    /// # Errors
    ///
    /// `InvalidState` when disconnected, `BodyNotFound` when a connected
    /// body is missing from `bodies`.
    pub fn global_matrices(
        &self,
        bodies: &dyn BodyLookup,
    ) -> Result<(Isometry3<f64>, Isometry3<f64>)> {
        let (child, parent) = self.connected_states(bodies)?;
        Ok(self.frames_for(&child, parent.as_ref()))
    }

    /// Submit this step's rows to `sink`.
    ///
    /// A Fixed joint that breaks disconnects itself and reports
    /// `broke == true`; that is not an error.
    ///
    /// # Errors
    ///
    /// - `InvalidState` when disconnected (nothing reaches `sink`)
    /// - `InvalidArgument` for a non-positive or non-finite `timestep`
    /// - `BodyNotFound` when a connected body is missing from `bodies`
    /// - `RowBudgetExceeded` if the variant overflowed its degrees of freedom
    pub fn submit_constraints(
        &mut self,
        bodies: &dyn BodyLookup,
        sink: &mut dyn ConstraintRowSink,
        timestep: f64,
    ) -> Result<StepReport> {
        if !(timestep.is_finite() && timestep > 0.0) {
            return Err(JointError::invalid_argument(format!(
                "timestep must be positive and finite, got {timestep}"
            )));
        }
        let (child, parent) = self.connected_states(bodies)?;
        let (matrix0, matrix1) = self.frames_for(&child, parent.as_ref());
        let frame = JointFrame {
            matrix0,
            matrix1,
            child,
            parent,
            timestep,
            stiffness: self.stiffness,
            config: &self.config,
        };

        let budget = self.variant.degrees_of_freedom();
        let mut budgeted = BudgetSink::new(sink, budget);
        let outcome = self.variant.submit_constraints(&frame, &mut budgeted);
        let rows = budgeted.rows();

        if budgeted.overflowed() {
            warn!(kind = %self.kind(), budget, "joint exceeded its row budget");
            return Err(JointError::RowBudgetExceeded {
                kind: self.kind().to_string(),
                budget,
            });
        }

        let broke = match outcome {
            StepOutcome::Continue => false,
            StepOutcome::Broken { force } => {
                warn!(kind = %self.kind(), force, "joint broke");
                self.disconnect();
                true
            }
        };
        trace!(kind = %self.kind(), rows, "constraint rows submitted");
        Ok(StepReport { rows, broke })
    }

    fn connected_states(&self, bodies: &dyn BodyLookup) -> Result<(BodyState, Option<BodyState>)> {
        let Connection::Connected { child, parent } = self.connection else {
            return Err(JointError::invalid_state(format!(
                "{} joint is not connected",
                self.kind()
            )));
        };
        let child = *bodies.body(child).ok_or(JointError::BodyNotFound(child))?;
        let parent = parent
            .map(|id| bodies.body(id).copied().ok_or(JointError::BodyNotFound(id)))
            .transpose()?;
        Ok((child, parent))
    }

    fn frames_for(
        &self,
        child: &BodyState,
        parent: Option<&BodyState>,
    ) -> (Isometry3<f64>, Isometry3<f64>) {
        let matrix0 = child.transform * self.local_matrix0;
        let matrix1 = parent.map_or(self.local_matrix1, |p| p.transform * self.local_matrix1);
        (matrix0, matrix1)
    }
}

fn checked_direction(direction: &Vector3<f64>, config: &JointConfig) -> Result<Vector3<f64>> {
    let norm = direction.norm();
    if !norm.is_finite() || norm < config.min_direction_norm {
        return Err(JointError::invalid_argument(format!(
            "pin direction {direction:?} is degenerate"
        )));
    }
    Ok(direction / norm)
}

/// Object-safe view of a [`Joint`] of any variant.
pub trait AnyJoint: std::fmt::Debug + Send + Sync {
    /// Variant kind.
    fn kind(&self) -> JointKind;
    /// Whether the joint is connected.
    fn is_connected(&self) -> bool;
    /// See [`Joint::connect`].
    fn connect(
        &mut self,
        bodies: &dyn BodyLookup,
        child: BodyId,
        parent: Option<BodyId>,
    ) -> Result<()>;
    /// See [`Joint::disconnect`].
    fn disconnect(&mut self);
    /// See [`Joint::submit_constraints`].
    fn submit_constraints(
        &mut self,
        bodies: &dyn BodyLookup,
        sink: &mut dyn ConstraintRowSink,
        timestep: f64,
    ) -> Result<StepReport>;
    /// Downcast support.
    fn as_any(&self) -> &dyn Any;
    /// Mutable downcast support.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<V: JointVariant + 'static> AnyJoint for Joint<V> {
    fn kind(&self) -> JointKind {
        Joint::kind(self)
    }

    fn is_connected(&self) -> bool {
        Joint::is_connected(self)
    }

    fn connect(
        &mut self,
        bodies: &dyn BodyLookup,
        child: BodyId,
        parent: Option<BodyId>,
    ) -> Result<()> {
        Joint::connect(self, bodies, child, parent)
    }

    fn disconnect(&mut self) {
        Joint::disconnect(self);
    }

    fn submit_constraints(
        &mut self,
        bodies: &dyn BodyLookup,
        sink: &mut dyn ConstraintRowSink,
        timestep: f64,
    ) -> Result<StepReport> {
        Joint::submit_constraints(self, bodies, sink, timestep)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
