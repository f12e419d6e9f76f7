//! The constraint-row boundary between joints and the solver.
//!
//! A joint never talks to the solver directly. Each step it pushes rows into
//! a [`ConstraintRowSink`]: a linear or angular row first, then optional
//! modifiers that apply to the row just added.

use nalgebra::{Point3, Vector3};
use tracing::warn;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Receiver of constraint rows for one solver step.
pub trait ConstraintRowSink {
    /// Request zero relative velocity between `point_a` (child) and
    /// `point_b` (parent) along `direction`.
    fn add_linear_row(
        &mut self,
        point_a: &Point3<f64>,
        point_b: &Point3<f64>,
        direction: &Vector3<f64>,
    );

    /// Request a rotation of the child by `relative_angle` about `axis`.
    fn add_angular_row(&mut self, relative_angle: f64, axis: &Vector3<f64>);

    /// Set the stiffness of the last row, in [0, 1].
    fn set_row_stiffness(&mut self, stiffness: f64);

    /// Set the lower impulse bound of the last row.
    fn set_row_minimum_friction(&mut self, friction: f64);

    /// Set the upper impulse bound of the last row.
    fn set_row_maximum_friction(&mut self, friction: f64);

    /// Set the desired acceleration of the last row.
    fn set_row_acceleration(&mut self, acceleration: f64);

    /// Create the solver's native ball constraint at `pivot`.
    ///
    /// Called once per connection by ball-and-socket joints.
    fn attach_ball_socket(&mut self, pivot: &Point3<f64>, pin: &Vector3<f64>);

    /// Update the cone and twist limits of the native ball constraint.
    fn set_ball_socket_limits(&mut self, limits: &BallSocketLimits);
}

/// Cone and twist limits pushed to a native ball constraint.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BallSocketLimits {
    /// Cone axis in world space.
    pub pin: Vector3<f64>,
    /// Maximum cone half-angle, `None` when disabled.
    pub max_cone: Option<f64>,
    /// Maximum twist angle, `None` when disabled.
    pub max_twist: Option<f64>,
}

/// Geometry of a recorded row.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RowKind {
    /// Linear row between two points.
    Linear {
        /// Child-side point.
        point_a: Point3<f64>,
        /// Parent-side point.
        point_b: Point3<f64>,
        /// Constrained direction.
        direction: Vector3<f64>,
    },
    /// Angular row about an axis.
    Angular {
        /// Rotation to correct.
        relative_angle: f64,
        /// Rotation axis.
        axis: Vector3<f64>,
    },
}

/// A row as received by a [`RowRecorder`], with its modifiers.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConstraintRow {
    /// Row geometry.
    pub kind: RowKind,
    /// Stiffness, if set.
    pub stiffness: Option<f64>,
    /// Lower impulse bound, if set.
    pub min_friction: Option<f64>,
    /// Upper impulse bound, if set.
    pub max_friction: Option<f64>,
    /// Desired acceleration, if set.
    pub acceleration: Option<f64>,
}

impl ConstraintRow {
    fn new(kind: RowKind) -> Self {
        Self {
            kind,
            stiffness: None,
            min_friction: None,
            max_friction: None,
            acceleration: None,
        }
    }

    /// Whether this is a linear row.
    #[must_use]
    pub fn is_linear(&self) -> bool {
        matches!(self.kind, RowKind::Linear { .. })
    }

    /// Whether this is an angular row.
    #[must_use]
    pub fn is_angular(&self) -> bool {
        matches!(self.kind, RowKind::Angular { .. })
    }

    /// Relative angle of an angular row.
    #[must_use]
    pub fn relative_angle(&self) -> Option<f64> {
        match self.kind {
            RowKind::Angular { relative_angle, .. } => Some(relative_angle),
            RowKind::Linear { .. } => None,
        }
    }

    /// Direction of a linear row or axis of an angular row.
    #[must_use]
    pub fn axis(&self) -> Vector3<f64> {
        match self.kind {
            RowKind::Linear { direction, .. } => direction,
            RowKind::Angular { axis, .. } => axis,
        }
    }

    /// Positional error of a linear row along its direction.
    #[must_use]
    pub fn linear_error(&self) -> Option<f64> {
        match self.kind {
            RowKind::Linear {
                point_a,
                point_b,
                direction,
            } => Some((point_a - point_b).dot(&direction)),
            RowKind::Angular { .. } => None,
        }
    }
}

/// Calls made to the native ball constraint.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BallSocketCall {
    /// Native constraint created.
    Attach {
        /// Pivot in world space.
        pivot: Point3<f64>,
        /// Cone axis in world space.
        pin: Vector3<f64>,
    },
    /// Limits updated.
    Limits(BallSocketLimits),
}

/// A sink that keeps every row it receives.
///
/// Useful for diagnostics, replaying a step against another solver, and
/// testing joint formulations without a solver.
///
/// # Example
///
/// ```
/// use sim_joint::{ConstraintRowSink, RowRecorder};
/// use nalgebra::Vector3;
///
/// let mut recorder = RowRecorder::new();
/// recorder.add_angular_row(0.25, &Vector3::z());
/// recorder.set_row_minimum_friction(0.0);
///
/// let row = &recorder.rows()[0];
/// assert_eq!(row.relative_angle(), Some(0.25));
/// assert_eq!(row.min_friction, Some(0.0));
/// ```
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RowRecorder {
    rows: Vec<ConstraintRow>,
    ball_calls: Vec<BallSocketCall>,
}

impl RowRecorder {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded rows in submission order.
    #[must_use]
    pub fn rows(&self) -> &[ConstraintRow] {
        &self.rows
    }

    /// Recorded ball constraint calls.
    #[must_use]
    pub fn ball_calls(&self) -> &[BallSocketCall] {
        &self.ball_calls
    }

    /// Number of recorded rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether no rows were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Last recorded row.
    #[must_use]
    pub fn last(&self) -> Option<&ConstraintRow> {
        self.rows.last()
    }

    /// Forget everything recorded so far.
    pub fn clear(&mut self) {
        self.rows.clear();
        self.ball_calls.clear();
    }

    /// Take the recorded rows, leaving the recorder empty.
    pub fn take_rows(&mut self) -> Vec<ConstraintRow> {
        std::mem::take(&mut self.rows)
    }

    fn modify(&mut self, what: &str, apply: impl FnOnce(&mut ConstraintRow)) {
        match self.rows.last_mut() {
            Some(row) => apply(row),
            None => warn!("row modifier {what} received before any row"),
        }
    }
}

impl ConstraintRowSink for RowRecorder {
    fn add_linear_row(
        &mut self,
        point_a: &Point3<f64>,
        point_b: &Point3<f64>,
        direction: &Vector3<f64>,
    ) {
        self.rows.push(ConstraintRow::new(RowKind::Linear {
            point_a: *point_a,
            point_b: *point_b,
            direction: *direction,
        }));
    }

    fn add_angular_row(&mut self, relative_angle: f64, axis: &Vector3<f64>) {
        self.rows.push(ConstraintRow::new(RowKind::Angular {
            relative_angle,
            axis: *axis,
        }));
    }

    fn set_row_stiffness(&mut self, stiffness: f64) {
        self.modify("stiffness", |row| row.stiffness = Some(stiffness));
    }

    fn set_row_minimum_friction(&mut self, friction: f64) {
        self.modify("minimum friction", |row| row.min_friction = Some(friction));
    }

    fn set_row_maximum_friction(&mut self, friction: f64) {
        self.modify("maximum friction", |row| row.max_friction = Some(friction));
    }

    fn set_row_acceleration(&mut self, acceleration: f64) {
        self.modify("acceleration", |row| row.acceleration = Some(acceleration));
    }

    fn attach_ball_socket(&mut self, pivot: &Point3<f64>, pin: &Vector3<f64>) {
        self.ball_calls.push(BallSocketCall::Attach {
            pivot: *pivot,
            pin: *pin,
        });
    }

    fn set_ball_socket_limits(&mut self, limits: &BallSocketLimits) {
        self.ball_calls.push(BallSocketCall::Limits(*limits));
    }
}

/// Caps the number of rows a joint may push into the wrapped sink.
///
/// Rows past the budget are dropped along with their modifiers and the
/// overflow is remembered for the caller to report.
pub(crate) struct BudgetSink<'a> {
    inner: &'a mut dyn ConstraintRowSink,
    budget: usize,
    rows: usize,
    accepting: bool,
    overflowed: bool,
}

impl<'a> BudgetSink<'a> {
    pub(crate) fn new(inner: &'a mut dyn ConstraintRowSink, budget: usize) -> Self {
        Self {
            inner,
            budget,
            rows: 0,
            accepting: false,
            overflowed: false,
        }
    }

    pub(crate) fn rows(&self) -> usize {
        self.rows
    }

    pub(crate) fn overflowed(&self) -> bool {
        self.overflowed
    }

    fn admit(&mut self) -> bool {
        self.accepting = self.rows < self.budget;
        if self.accepting {
            self.rows += 1;
        } else {
            self.overflowed = true;
        }
        self.accepting
    }
}

impl ConstraintRowSink for BudgetSink<'_> {
    fn add_linear_row(
        &mut self,
        point_a: &Point3<f64>,
        point_b: &Point3<f64>,
        direction: &Vector3<f64>,
    ) {
        if self.admit() {
            self.inner.add_linear_row(point_a, point_b, direction);
        }
    }

    fn add_angular_row(&mut self, relative_angle: f64, axis: &Vector3<f64>) {
        if self.admit() {
            self.inner.add_angular_row(relative_angle, axis);
        }
    }

    fn set_row_stiffness(&mut self, stiffness: f64) {
        if self.accepting {
            self.inner.set_row_stiffness(stiffness);
        }
    }

    fn set_row_minimum_friction(&mut self, friction: f64) {
        if self.accepting {
            self.inner.set_row_minimum_friction(friction);
        }
    }

    fn set_row_maximum_friction(&mut self, friction: f64) {
        if self.accepting {
            self.inner.set_row_maximum_friction(friction);
        }
    }

    fn set_row_acceleration(&mut self, acceleration: f64) {
        if self.accepting {
            self.inner.set_row_acceleration(acceleration);
        }
    }

    fn attach_ball_socket(&mut self, pivot: &Point3<f64>, pin: &Vector3<f64>) {
        self.inner.attach_ball_socket(pivot, pin);
    }

    fn set_ball_socket_limits(&mut self, limits: &BallSocketLimits) {
        self.inner.set_ball_socket_limits(limits);
    }
}
